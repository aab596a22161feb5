/*
 * Responsibility
 * - user/get, user/list の handler
 * - 認証・権限・target user 解決は Validated<T> (pipeline) 側で済んでいる前提
 */
use axum::Json;

use crate::api::core::Validated;
use crate::api::v1::dto::users::{
    UserGetRequest, UserGetResponse, UserInfo, UserListRequest, UserListResponse,
};

pub async fn get_user(request: Validated<UserGetRequest>) -> Json<UserGetResponse> {
    let target = &request.target_user;

    Json(UserGetResponse {
        found: target.found,
        user: target.user.as_ref().map(UserInfo::from),
    })
}

pub async fn list_users(request: Validated<UserListRequest>) -> Json<UserListResponse> {
    let mut users: Vec<UserInfo> = request.users.values().map(UserInfo::from).collect();
    users.sort_by(|a, b| a.email.cmp(&b.email));

    Json(UserListResponse { users })
}
