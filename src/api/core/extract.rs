/*
 * Responsibility
 * - Handler が受け取る Validated<T> extractor
 * - body (JSON / multipart) を読み、pipeline に渡す
 * - staging directory の寿命を extractor の寿命に結びつける
 */
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
};

use crate::api::core::pipeline;
use crate::api::core::request::ApiRequest;
use crate::api::core::upload::UploadedFile;
use crate::error::{ApiError, locator};
use crate::services::StagingDir;
use crate::state::AppState;

/// Name of the multipart part that carries the JSON payload.
pub const CONTENT_PART: &str = "content";

/// A request that went through the whole validation pipeline.
///
/// Holds the staging directory of uploaded files (if any); it is removed when this value is
/// dropped, i.e. when the handler returns, fails or panics.
pub struct Validated<T> {
    request: T,
    staging: Option<StagingDir>,
}

impl<T> Validated<T> {
    pub(crate) fn new(request: T, staging: Option<StagingDir>) -> Self {
        Self { request, staging }
    }

    pub fn staging_path(&self) -> Option<&Path> {
        self.staging.as_ref().map(StagingDir::path)
    }
}

impl<T> Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.request
    }
}

impl<T> DerefMut for Validated<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.request
    }
}

impl<T: fmt::Debug> fmt::Debug for Validated<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validated")
            .field("request", &self.request)
            .field("staging", &self.staging_path())
            .finish()
    }
}

impl<T: ApiRequest> FromRequest<AppState> for Validated<T> {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let endpoint = req.uri().path().to_string();

        let (payload, uploads) = if is_multipart(&req) {
            read_multipart(req, state).await?
        } else {
            let body = Bytes::from_request(req, state).await.map_err(|e| {
                ApiError::bad_request(
                    locator::DECODE_FAILED,
                    format!("could not read request body: {e}"),
                )
                .err(e)
            })?;
            (body, Vec::new())
        };

        pipeline::process(state, &payload, uploads, &endpoint).await
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

async fn read_multipart(
    req: Request,
    state: &AppState,
) -> Result<(Bytes, Vec<UploadedFile>), ApiError> {
    let malformed = |e: Box<dyn std::error::Error + Send + Sync>| {
        ApiError::bad_request(
            locator::MALFORMED_UPLOAD,
            format!("could not read multipart body: {e}"),
        )
        .err(e)
    };

    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| malformed(Box::new(e)))?;

    let mut payload = None;
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| malformed(Box::new(e)))?
    {
        let file_name = field.file_name().map(str::to_owned);
        let part_name = field.name().map(str::to_owned);
        let bytes = field.bytes().await.map_err(|e| malformed(Box::new(e)))?;

        match (file_name, part_name.as_deref()) {
            (Some(name), _) => uploads.push(UploadedFile::new(name, bytes)),
            (None, Some(CONTENT_PART)) => payload = Some(bytes),
            (None, other) => {
                tracing::debug!(part = ?other, "ignoring unknown multipart part");
            }
        }
    }

    let payload = payload.ok_or_else(|| {
        ApiError::bad_request(
            locator::MALFORMED_UPLOAD,
            format!("multipart body has no '{CONTENT_PART}' part"),
        )
    })?;

    Ok((payload, uploads))
}
