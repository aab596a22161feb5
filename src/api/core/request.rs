//! Declaration side of the pipeline: what a request type tells the pipeline about itself.
//!
//! A request type is a plain serde struct. It implements [`ApiRequest`] to declare:
//! - its marker capabilities (minimum role, special fields) in `MARKERS`
//! - where its course/assignment context lives (`context`)
//! - which special fields the pipeline may write into (`special_fields`)
//! - which strings must be non-empty (`required_fields`)
//!
//! ```ignore
//! #[derive(Debug, Deserialize)]
//! pub struct UserListRequest {
//!     #[serde(flatten)]
//!     pub context: CourseUserContext,
//!     #[serde(skip)]
//!     pub users: CourseUsers,
//! }
//!
//! impl ApiRequest for UserListRequest {
//!     const MARKERS: &'static [Marker] = &[Marker::MinRole(UserRole::Grader), Marker::CourseUsers];
//!
//!     fn context(&mut self) -> Option<ContextSlot<'_>> {
//!         Some(ContextSlot::Course(&mut self.context))
//!     }
//!
//!     fn special_fields(&mut self) -> SpecialFields<'_> {
//!         SpecialFields { users: Some(&mut self.users), ..SpecialFields::default() }
//!     }
//! }
//! ```
use serde::de::DeserializeOwned;

use crate::api::core::context::{AssignmentContext, CourseUserContext};
use crate::api::core::fields::{CourseUsers, NonEmptyString, PostFiles, TargetUserSelfOrGrader};
use crate::model::UserRole;

/// A zero-content capability composed into a request declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// The requester must hold at least this role. With several, the highest one applies.
    MinRole(UserRole),
    /// The request carries the course roster.
    CourseUsers,
    /// The request carries a self-or-grader target user.
    TargetUser,
    /// The request carries uploaded files.
    PostFiles,
}

/// Mutable access to a request's context, so resolved entities can be attached in place.
#[derive(Debug)]
pub enum ContextSlot<'a> {
    Course(&'a mut CourseUserContext),
    Assignment(&'a mut AssignmentContext),
}

impl ContextSlot<'_> {
    pub fn course_user(&self) -> &CourseUserContext {
        match self {
            ContextSlot::Course(ctx) => ctx,
            ContextSlot::Assignment(ctx) => &ctx.course_user,
        }
    }
}

/// Special fields a request exposes to the pipeline.
///
/// A field declared in `MARKERS` but left `None` here cannot be written by the pipeline and is
/// reported as a configuration error.
#[derive(Debug, Default)]
pub struct SpecialFields<'a> {
    pub users: Option<&'a mut CourseUsers>,
    pub target_user: Option<&'a mut TargetUserSelfOrGrader>,
    pub files: Option<&'a mut PostFiles>,
}

/// A non-empty string field together with the name it has on the wire.
#[derive(Debug)]
pub struct RequiredField<'a> {
    pub wire_name: String,
    pub value: &'a NonEmptyString,
}

impl<'a> RequiredField<'a> {
    /// `rename` is the serde rename of the field, if any.
    pub fn new(field_name: &str, rename: Option<&str>, value: &'a NonEmptyString) -> Self {
        Self {
            wire_name: wire_name(field_name, rename),
            value,
        }
    }
}

/// The name a field has in the payload: the rename when given, otherwise the field's own name.
///
/// Anything after a comma in the rename is an attribute modifier, not part of the name.
pub fn wire_name(field_name: &str, rename: Option<&str>) -> String {
    rename
        .and_then(|r| r.split(',').next())
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(field_name)
        .to_string()
}

/// A typed API request handled by the validation pipeline.
pub trait ApiRequest: DeserializeOwned + Send + 'static {
    const MARKERS: &'static [Marker] = &[];

    fn context(&mut self) -> Option<ContextSlot<'_>> {
        None
    }

    fn special_fields(&mut self) -> SpecialFields<'_> {
        SpecialFields::default()
    }

    fn required_fields(&self) -> Vec<RequiredField<'_>> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Text", None, "Text")]
    #[case("text", Some("text"), "text")]
    #[case("text", Some("text,omitempty"), "text")]
    #[case("text", Some("foo-bar"), "foo-bar")]
    #[case("text", Some("foo-bar, omitempty"), "foo-bar")]
    #[case("text", Some(""), "text")]
    #[case("text", Some(",omitempty"), "text")]
    fn wire_name_prefers_rename(
        #[case] field: &str,
        #[case] rename: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(wire_name(field, rename), expected);
    }
}
