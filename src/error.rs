/*
 * Responsibility
 * - API 共通の ApiError 定義 (locator + message + details + source chain)
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - internal / configuration エラーは原因をログに残し、呼び出し側には汎用メッセージだけ返す
 */
use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::model::UserRole;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Stable error locators.
///
/// These strings are part of the external contract: callers and tests match on them instead of
/// parsing messages. Never reuse or renumber an existing locator.
pub mod locator {
    pub const DECODE_FAILED: &str = "-301";
    pub const MISSING_COURSE_ID: &str = "-302";
    pub const MISSING_USER_EMAIL: &str = "-303";
    pub const MISSING_USER_PASS: &str = "-304";
    pub const MISSING_ASSIGNMENT_ID: &str = "-305";
    pub const UNKNOWN_COURSE: &str = "-306";
    pub const UNKNOWN_ASSIGNMENT: &str = "-307";
    pub const UNKNOWN_USER: &str = "-308";
    pub const BAD_PASSWORD: &str = "-309";
    pub const INSUFFICIENT_ROLE: &str = "-310";
    pub const MISSING_CONTEXT: &str = "-311";
    pub const NON_EXPORTED_USERS_FIELD: &str = "-312";
    pub const ROSTER_FETCH_FAILED: &str = "-313";
    pub const NON_EXPORTED_FILES_FIELD: &str = "-314";
    pub const FILE_STORE_FAILED: &str = "-315";
    pub const NO_FILES_UPLOADED: &str = "-316";
    pub const MALFORMED_UPLOAD: &str = "-317";
    pub const EMPTY_REQUIRED_FIELD: &str = "-318";
    pub const TARGET_PERMISSION_DENIED: &str = "-319";
    pub const ROLE_WITHOUT_CONTEXT: &str = "-320";
    pub const CONTEXT_LOOKUP_FAILED: &str = "-321";

    pub const LMS_NOT_LINKED: &str = "-501";
    pub const LMS_FETCH_FAILED: &str = "-502";

    pub const STAGED_FILE_READ_FAILED: &str = "-601";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Client-supplied data is malformed or semantically invalid.
    BadRequest,
    /// Credentials did not match a course user.
    Authentication,
    /// Authenticated, but the role is insufficient.
    Permission,
    /// The request type itself is declared wrongly (a programming defect).
    Configuration,
    /// A collaborator (store, LMS, filesystem) failed.
    Internal,
}

impl ErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Permission => StatusCode::FORBIDDEN,
            ErrorKind::Configuration | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Authentication => "UNAUTHORIZED",
            ErrorKind::Permission => "FORBIDDEN",
            ErrorKind::Configuration | ErrorKind::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    fn hides_details(&self) -> bool {
        matches!(self, ErrorKind::Configuration | ErrorKind::Internal)
    }
}

/// Where an error happened: endpoint plus the raw identifiers the caller supplied.
///
/// Only used for logging, never sent back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorOrigin {
    pub endpoint: String,
    pub course_id: Option<String>,
    pub user_email: Option<String>,
}

#[derive(Debug, Error)]
#[error("{locator}: {message}")]
pub struct ApiError {
    kind: ErrorKind,
    locator: &'static str,
    message: String,
    details: BTreeMap<String, String>,
    origin: Option<ErrorOrigin>,
    #[source]
    source: Option<BoxError>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, locator: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            locator,
            message: message.into(),
            details: BTreeMap::new(),
            origin: None,
            source: None,
        }
    }

    pub fn bad_request(locator: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, locator, message)
    }

    pub fn authentication(locator: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, locator, message)
    }

    /// Permission errors carry nothing beyond the required and actual role.
    pub fn permission(
        locator: &'static str,
        message: impl Into<String>,
        required: UserRole,
        actual: UserRole,
    ) -> Self {
        Self::new(ErrorKind::Permission, locator, message)
            .add("required-role", required.as_str())
            .add("actual-role", actual.as_str())
    }

    pub fn configuration(locator: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, locator, message)
    }

    pub fn internal(locator: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, locator, message)
    }

    /// Payload could not be decoded into the request type.
    pub fn decode(err: serde_json::Error) -> Self {
        Self::bad_request(
            locator::DECODE_FAILED,
            format!("could not decode request payload: {err}"),
        )
        .err(err)
    }

    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn err(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_origin(mut self, origin: ErrorOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn locator(&self) -> &'static str {
        self.locator
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &BTreeMap<String, String> {
        &self.details
    }

    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }

    pub fn origin(&self) -> Option<&ErrorOrigin> {
        self.origin.as_ref()
    }

    fn log(&self) {
        let origin = self.origin.clone().unwrap_or_default();
        match self.kind {
            ErrorKind::Configuration => tracing::error!(
                locator = self.locator,
                endpoint = %origin.endpoint,
                message = %self.message,
                "request type is misconfigured"
            ),
            ErrorKind::Internal => tracing::error!(
                locator = self.locator,
                endpoint = %origin.endpoint,
                course = ?origin.course_id,
                email = ?origin.user_email,
                message = %self.message,
                details = ?self.details,
                error = ?self.source,
                "request failed on a collaborator"
            ),
            ErrorKind::BadRequest | ErrorKind::Authentication | ErrorKind::Permission => {
                tracing::info!(
                    locator = self.locator,
                    endpoint = %origin.endpoint,
                    course = ?origin.course_id,
                    email = ?origin.user_email,
                    message = %self.message,
                    "request rejected"
                )
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub locator: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(e: &ApiError) -> Self {
        let (message, details) = if e.kind.hides_details() {
            ("internal server error".to_string(), BTreeMap::new())
        } else {
            (e.message.clone(), e.details.clone())
        };

        Self {
            error: ErrorBody {
                code: e.kind.code(),
                locator: e.locator,
                message,
                details,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let body = ErrorResponse::from(&self);
        (self.kind.status(), Json(body)).into_response()
    }
}
