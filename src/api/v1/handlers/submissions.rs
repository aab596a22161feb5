use axum::Json;

use crate::api::core::Validated;
use crate::api::v1::dto::submissions::{StageRequest, StageResponse, StagedFileInfo};
use crate::error::{ApiError, locator};

/// Report what was staged. The staging directory goes away once this handler returns.
pub async fn stage_submission(
    request: Validated<StageRequest>,
) -> Result<Json<StageResponse>, ApiError> {
    let mut files = Vec::with_capacity(request.files.filenames.len());

    for (name, path) in request.files.filenames.iter().zip(request.files.paths()) {
        let meta = tokio::fs::metadata(&path).await.map_err(|e| {
            ApiError::internal(
                locator::STAGED_FILE_READ_FAILED,
                "failed to inspect staged file",
            )
            .add("filename", name.clone())
            .err(e)
        })?;

        files.push(StagedFileInfo {
            name: name.clone(),
            size: meta.len(),
        });
    }

    tracing::info!(
        course = %request.context.course_user.course.id,
        assignment = %request.context.assignment.id,
        email = %request.context.course_user.user.email,
        count = files.len(),
        "staged submission files"
    );

    Ok(Json(StageResponse {
        course: request.context.course_user.course.id.clone(),
        assignment: request.context.assignment.id.clone(),
        files,
    }))
}
