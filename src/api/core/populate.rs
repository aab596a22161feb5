//! Special field population. Runs after context resolution and the role check.
use std::collections::HashMap;

use crate::api::core::capability::Capabilities;
use crate::api::core::context::ResolvedContext;
use crate::api::core::fields::{CourseUsers, PostFiles, TargetUserSelfOrGrader};
use crate::api::core::request::ApiRequest;
use crate::api::core::upload::UploadedFile;
use crate::error::{ApiError, locator};
use crate::model::{User, UserRole, normalize_email};
use crate::repos::CourseStore;
use crate::services::{StagingArea, StagingDir, StagingError, sanitize_file_name};

/// Fill every special field the request exposes.
///
/// Returns the staging directory guard when files were staged; the caller must keep it alive for
/// as long as the handler may read the files.
pub async fn populate<T: ApiRequest>(
    request: &mut T,
    caps: &Capabilities,
    resolved: Option<&ResolvedContext>,
    store: &dyn CourseStore,
    staging: &StagingArea,
    uploads: Vec<UploadedFile>,
) -> Result<Option<StagingDir>, ApiError> {
    check_required_fields(&*request)?;

    let Some(resolved) = resolved else {
        if caps.needs_course() {
            return Err(missing_context());
        }
        if !uploads.is_empty() {
            tracing::debug!(count = uploads.len(), "ignoring uploads on a request without files");
        }
        return Ok(None);
    };

    let fields = request.special_fields();

    let roster = if fields.users.is_some() || fields.target_user.is_some() {
        Some(fetch_roster(store, &resolved.course.id).await?)
    } else {
        None
    };

    if let (Some(users), Some(roster)) = (fields.users, &roster) {
        *users = CourseUsers::new(roster.clone());
    }

    if let (Some(target), Some(roster)) = (fields.target_user, &roster) {
        resolve_target(target, &resolved.user, roster)?;
    }

    match fields.files {
        Some(files) => stage_files(files, staging, uploads).await.map(Some),
        None => {
            if !uploads.is_empty() {
                tracing::debug!(count = uploads.len(), "ignoring uploads on a request without files");
            }
            Ok(None)
        }
    }
}

pub(crate) fn missing_context() -> ApiError {
    ApiError::bad_request(
        locator::MISSING_CONTEXT,
        "request has fields that require a course context, but no course context",
    )
}

fn check_required_fields<T: ApiRequest>(request: &T) -> Result<(), ApiError> {
    for field in request.required_fields() {
        if field.value.is_blank() {
            return Err(ApiError::bad_request(
                locator::EMPTY_REQUIRED_FIELD,
                format!("field '{}' must not be empty", field.wire_name),
            )
            .add("json-name", field.wire_name));
        }
    }
    Ok(())
}

async fn fetch_roster(
    store: &dyn CourseStore,
    course_id: &str,
) -> Result<HashMap<String, User>, ApiError> {
    store.get_users(course_id).await.map_err(|e| {
        ApiError::internal(locator::ROSTER_FETCH_FAILED, "failed to fetch course users")
            .add("course", course_id)
            .err(e)
    })
}

/// Self is always allowed; anyone else needs grader or above.
///
/// An email with no matching user is not an error: the result just has `found == false`.
fn resolve_target(
    target: &mut TargetUserSelfOrGrader,
    acting: &User,
    roster: &HashMap<String, User>,
) -> Result<(), ApiError> {
    let mut email = normalize_email(&target.target_email);
    if email.is_empty() {
        email = acting.email.clone();
    }

    if email != acting.email && acting.role < UserRole::Grader {
        return Err(ApiError::permission(
            locator::TARGET_PERMISSION_DENIED,
            "only graders and above may target other users",
            UserRole::Grader,
            acting.role,
        ));
    }

    target.user = roster.get(&email).cloned();
    target.found = target.user.is_some();
    target.target_email = email;

    Ok(())
}

async fn stage_files(
    files: &mut PostFiles,
    staging: &StagingArea,
    uploads: Vec<UploadedFile>,
) -> Result<StagingDir, ApiError> {
    if uploads.is_empty() {
        return Err(ApiError::bad_request(
            locator::NO_FILES_UPLOADED,
            "no files were uploaded",
        ));
    }

    // On any error below `dir` is dropped, which removes the partial directory.
    let dir = staging.create_dir().map_err(staging_error)?;

    let mut filenames: Vec<String> = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let name = sanitize_file_name(&upload.name).map_err(staging_error)?;
        if filenames.contains(&name) {
            return Err(duplicate_name(name));
        }

        dir.write_file(&name, &upload.contents)
            .await
            .map_err(staging_error)?;
        filenames.push(name);
    }

    tracing::debug!(
        path = %dir.path().display(),
        count = filenames.len(),
        "staged uploaded files"
    );

    files.temp_dir = dir.path().to_path_buf();
    files.filenames = filenames;

    Ok(dir)
}

fn duplicate_name(name: String) -> ApiError {
    ApiError::bad_request(
        locator::MALFORMED_UPLOAD,
        "the same file name was uploaded twice",
    )
    .add("filename", name)
}

fn staging_error(e: StagingError) -> ApiError {
    match e {
        StagingError::DuplicateName(name) => duplicate_name(name),
        StagingError::InvalidName(name) => {
            ApiError::bad_request(locator::MALFORMED_UPLOAD, "invalid upload file name")
                .add("filename", name)
        }
        other => ApiError::internal(locator::FILE_STORE_FAILED, "failed to store uploaded files")
            .err(other),
    }
}
