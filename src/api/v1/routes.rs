/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 全 endpoint は POST + typed request (Validated<T>)
 */
use axum::{Router, routing::post};

use crate::state::AppState;

use crate::api::v1::handlers::{
    lms::get_lms_user,
    submissions::stage_submission,
    users::{get_user, list_users},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/get", post(get_user))
        .route("/user/list", post(list_users))
        .route("/lms/user/get", post(get_lms_user))
        .route("/submission/stage", post(stage_submission))
}
