//! Special field types filled in by the validation pipeline.
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::{User, normalize_email};

/// Roster of the request's course, keyed by normalized email.
///
/// Never decoded from the payload: declare the field `#[serde(skip)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseUsers(HashMap<String, User>);

impl CourseUsers {
    pub fn new(users: HashMap<String, User>) -> Self {
        Self(users)
    }

    /// Look up a user by email (normalized first).
    pub fn find(&self, email: &str) -> Option<&User> {
        self.0.get(&normalize_email(email))
    }
}

impl Deref for CourseUsers {
    type Target = HashMap<String, User>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A target user that must be the requester themselves, unless the requester is a grader or above.
///
/// On the wire this is just the target email string (empty means "myself"). After validation:
/// - `target_email` is the normalized email actually targeted
/// - `found` tells whether the course has such a user
/// - `user` is that user (when found)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetUserSelfOrGrader {
    pub found: bool,
    pub target_email: String,
    pub user: Option<User>,
}

impl TargetUserSelfOrGrader {
    pub fn new(target_email: impl Into<String>) -> Self {
        Self {
            found: false,
            target_email: target_email.into(),
            user: None,
        }
    }
}

impl Serialize for TargetUserSelfOrGrader {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.target_email)
    }
}

impl<'de> Deserialize<'de> for TargetUserSelfOrGrader {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Files uploaded alongside the request, staged into an ephemeral directory.
///
/// The directory only lives as long as the request; see `Validated`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFiles {
    pub filenames: Vec<String>,
    pub temp_dir: PathBuf,
}

impl PostFiles {
    pub fn paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.filenames.iter().map(|name| self.temp_dir.join(name))
    }
}

/// A string that must not be empty (after trimming) once decoded.
///
/// Declare the field `#[serde(default)]` so a missing value reaches validation (and gets a proper
/// locator) instead of failing as a decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for NonEmptyString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NonEmptyString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
