/*
 * Responsibility
 * - user/get, user/list の request/response DTO
 * - request 側は ApiRequest 実装で pipeline に必要なもの (role, context, special fields) を宣言する
 */
use serde::{Deserialize, Serialize};

use crate::api::core::{
    ApiRequest, ContextSlot, CourseUserContext, CourseUsers, Marker, SpecialFields,
    TargetUserSelfOrGrader,
};
use crate::model::{User, UserRole};

/// Public view of a course user (no password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(rename = "lms-id")]
    pub lms_id: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.display_name.clone(),
            role: user.role,
            lms_id: user.lms_id.clone(),
        }
    }
}

/// `user/get`: look up yourself, or (graders and above) anyone in the course.
#[derive(Debug, Deserialize)]
pub struct UserGetRequest {
    #[serde(flatten)]
    pub context: CourseUserContext,

    #[serde(rename = "target-email", default)]
    pub target_user: TargetUserSelfOrGrader,
}

impl ApiRequest for UserGetRequest {
    const MARKERS: &'static [Marker] = &[Marker::MinRole(UserRole::Student), Marker::TargetUser];

    fn context(&mut self) -> Option<ContextSlot<'_>> {
        Some(ContextSlot::Course(&mut self.context))
    }

    fn special_fields(&mut self) -> SpecialFields<'_> {
        SpecialFields {
            target_user: Some(&mut self.target_user),
            ..SpecialFields::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserGetResponse {
    pub found: bool,
    pub user: Option<UserInfo>,
}

/// `user/list`: the whole roster, graders and above.
#[derive(Debug, Deserialize)]
pub struct UserListRequest {
    #[serde(flatten)]
    pub context: CourseUserContext,

    #[serde(skip)]
    pub users: CourseUsers,
}

impl ApiRequest for UserListRequest {
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
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserInfo>,
}
