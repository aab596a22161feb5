use crate::error::{ApiError, locator};
use crate::model::UserRole;

/// Enforce the minimum role, if the request declared one.
pub fn authorize(required: Option<UserRole>, actual: UserRole) -> Result<(), ApiError> {
    match required {
        Some(required) if actual < required => Err(ApiError::permission(
            locator::INSUFFICIENT_ROLE,
            "insufficient permissions",
            required,
            actual,
        )),
        _ => Ok(()),
    }
}
