use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Decode a raw payload into a request value.
///
/// This is the only structural gate: malformed syntax, truncated input, unquoted keys and trailing
/// content all fail here, before any other stage runs.
pub fn decode_payload<T: DeserializeOwned>(payload: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(payload).map_err(ApiError::decode)
}
