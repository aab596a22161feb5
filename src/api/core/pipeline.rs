//! The validation pipeline:
//! decode -> scan capabilities -> resolve context -> authorize role -> populate special fields.
//!
//! Every stage returns at most one error and the first error stops the request.
use crate::api::core::authorize::authorize;
use crate::api::core::capability::Capabilities;
use crate::api::core::context;
use crate::api::core::decode::decode_payload;
use crate::api::core::extract::Validated;
use crate::api::core::populate::{self, missing_context};
use crate::api::core::request::ApiRequest;
use crate::api::core::upload::UploadedFile;
use crate::error::{ApiError, ErrorOrigin};
use crate::services::StagingDir;
use crate::state::AppState;

/// Decode a payload and run the full pipeline on it.
pub async fn process<T: ApiRequest>(
    state: &AppState,
    payload: &[u8],
    uploads: Vec<UploadedFile>,
    endpoint: &str,
) -> Result<Validated<T>, ApiError> {
    let mut request: T = decode_payload(payload).map_err(|e| {
        e.with_origin(ErrorOrigin {
            endpoint: endpoint.to_string(),
            ..ErrorOrigin::default()
        })
    })?;

    let staging = validate_request(state, &mut request, uploads, endpoint).await?;

    Ok(Validated::new(request, staging))
}

/// Run every stage after decoding on an already decoded request.
pub async fn validate_request<T: ApiRequest>(
    state: &AppState,
    request: &mut T,
    uploads: Vec<UploadedFile>,
    endpoint: &str,
) -> Result<Option<StagingDir>, ApiError> {
    let origin = origin_of(request, endpoint);
    run(state, request, uploads)
        .await
        .map_err(|e| e.with_origin(origin))
}

async fn run<T: ApiRequest>(
    state: &AppState,
    request: &mut T,
    uploads: Vec<UploadedFile>,
) -> Result<Option<StagingDir>, ApiError> {
    let caps = Capabilities::scan(request);
    caps.check()?;

    let resolved = match request.context() {
        Some(slot) => Some(context::resolve(state.store.as_ref(), slot).await?),
        None if caps.needs_course() => return Err(missing_context()),
        None => None,
    };

    if let Some(resolved) = &resolved {
        authorize(caps.min_role, resolved.user.role)?;
    }

    populate::populate(
        request,
        &caps,
        resolved.as_ref(),
        state.store.as_ref(),
        &state.staging,
        uploads,
    )
    .await
}

fn origin_of<T: ApiRequest>(request: &mut T, endpoint: &str) -> ErrorOrigin {
    let (course_id, user_email) = match request.context() {
        Some(slot) => {
            let ctx = slot.course_user();
            (Some(ctx.course_id.clone()), Some(ctx.user_email.clone()))
        }
        None => (None, None),
    };

    ErrorOrigin {
        endpoint: endpoint.to_string(),
        course_id,
        user_email,
    }
}
