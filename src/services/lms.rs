//! LMS adapter interface (Canvas and friends live behind this trait).
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::UserRole;

/// A user as reported by the LMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmsUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Error)]
pub enum LmsError {
    #[error("lms backend error: {0}")]
    Backend(String),
}

/// Narrow view of an LMS used by the API.
///
/// Implementations own retries and timeouts; callers treat any `Err` as a failed fetch.
#[async_trait]
pub trait LmsAdapter: Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Look up a single user of an LMS course by email.
    //
    // Returns:
    // - Ok(Some(_)) => user is enrolled in the LMS course
    // - Ok(None)    => no such user in the LMS course
    async fn fetch_user(&self, lms_course_id: &str, email: &str)
    -> Result<Option<LmsUser>, LmsError>;
}
