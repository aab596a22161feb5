use std::fmt;

use serde::{Deserialize, Serialize};

use crate::services::password;

/// Course-level role of a user.
///
/// Variant order is the privilege order: `Unknown < Other < Student < Grader < Admin < Owner`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Unknown,
    Other,
    Student,
    Grader,
    Admin,
    Owner,
}

impl UserRole {
    pub const ALL: [UserRole; 6] = [
        UserRole::Unknown,
        UserRole::Other,
        UserRole::Student,
        UserRole::Grader,
        UserRole::Admin,
        UserRole::Owner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Unknown => "unknown",
            UserRole::Other => "other",
            UserRole::Student => "student",
            UserRole::Grader => "grader",
            UserRole::Admin => "admin",
            UserRole::Owner => "owner",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member of a course roster as stored in `users.json`.
///
/// `pass` holds the server-side hash of the client-supplied password hash and is never serialized
/// into API responses (handlers convert to DTOs first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(rename = "display-name", default)]
    pub display_name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub pass: String,
    #[serde(rename = "lms-id", default)]
    pub lms_id: String,
}

impl User {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>, role: UserRole) -> Self {
        Self {
            email: normalize_email(&email.into()),
            display_name: display_name.into(),
            role,
            pass: String::new(),
            lms_id: String::new(),
        }
    }

    /// Store a client-supplied (already hashed) password.
    pub fn set_password(&mut self, pass_hash: &str) {
        self.pass = password::hash_for_storage(pass_hash);
    }

    /// Compare a client-supplied password hash against the stored one.
    ///
    /// A user without a stored password can never authenticate.
    pub fn check_password(&self, pass_hash: &str) -> bool {
        !self.pass.is_empty() && self.pass == password::hash_for_storage(pass_hash)
    }
}

/// Emails are matched case-insensitively and without surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
