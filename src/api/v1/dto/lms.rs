use serde::{Deserialize, Serialize};

use crate::api::core::{
    ApiRequest, ContextSlot, CourseUserContext, CourseUsers, Marker, NonEmptyString,
    RequiredField, SpecialFields,
};
use crate::api::v1::dto::users::UserInfo;
use crate::model::UserRole;

/// `lms/user/get`: a course user together with what the LMS knows about them.
#[derive(Debug, Deserialize)]
pub struct LmsUserGetRequest {
    #[serde(flatten)]
    pub context: CourseUserContext,

    #[serde(skip)]
    pub users: CourseUsers,

    #[serde(rename = "target-email", default)]
    pub target_email: NonEmptyString,
}

impl ApiRequest for LmsUserGetRequest {
    const MARKERS: &'static [Marker] = &[Marker::MinRole(UserRole::Grader), Marker::CourseUsers];

    fn context(&mut self) -> Option<ContextSlot<'_>> {
        Some(ContextSlot::Course(&mut self.context))
    }

    fn special_fields(&mut self) -> SpecialFields<'_> {
        SpecialFields {
            users: Some(&mut self.users),
            ..SpecialFields::default()
        }
    }

    fn required_fields(&self) -> Vec<RequiredField<'_>> {
        vec![RequiredField::new(
            "target_email",
            Some("target-email"),
            &self.target_email,
        )]
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LmsUserGetResponse {
    #[serde(rename = "found-autograder-user")]
    pub found_autograder_user: bool,
    #[serde(rename = "found-lms-user")]
    pub found_lms_user: bool,
    pub user: Option<UserInfo>,
}
