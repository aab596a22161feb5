use axum::{Json, extract::State};

use crate::api::core::Validated;
use crate::api::v1::dto::lms::{LmsUserGetRequest, LmsUserGetResponse};
use crate::api::v1::dto::users::UserInfo;
use crate::error::{ApiError, locator};
use crate::state::AppState;

pub async fn get_lms_user(
    State(state): State<AppState>,
    request: Validated<LmsUserGetRequest>,
) -> Result<Json<LmsUserGetResponse>, ApiError> {
    let course = &request.context.course;

    let (Some(lms_course_id), Some(lms)) = (course.lms_course_id(), state.lms.as_ref()) else {
        return Err(
            ApiError::bad_request(locator::LMS_NOT_LINKED, "course is not linked to an LMS")
                .add("course", course.id.clone()),
        );
    };

    let mut response = LmsUserGetResponse::default();

    let Some(user) = request.users.find(request.target_email.as_str()) else {
        return Ok(Json(response));
    };

    response.found_autograder_user = true;
    let mut info = UserInfo::from(user);

    let lms_user = lms
        .fetch_user(lms_course_id, &user.email)
        .await
        .map_err(|e| {
            ApiError::internal(locator::LMS_FETCH_FAILED, "failed to fetch LMS user")
                .add("course", course.id.clone())
                .add("email", user.email.clone())
                .err(e)
        })?;

    if let Some(lms_user) = lms_user {
        response.found_lms_user = true;
        info.name = lms_user.name;
        info.lms_id = lms_user.id;
    }

    response.user = Some(info);
    Ok(Json(response))
}
