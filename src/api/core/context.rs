//! Course / assignment context: caller-supplied identifiers turned into validated entities.
use serde::Deserialize;

use crate::api::core::request::ContextSlot;
use crate::error::{ApiError, locator};
use crate::model::{Assignment, Course, User, normalize_email};
use crate::repos::CourseStore;

/// Course + acting user. Flatten this into a request to require a course context.
///
/// `course` and `user` are filled in by the pipeline once the credentials check out.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseUserContext {
    #[serde(rename = "course-id", default)]
    pub course_id: String,
    #[serde(rename = "user-email", default)]
    pub user_email: String,
    #[serde(rename = "user-pass", default)]
    pub user_pass: String,

    #[serde(skip)]
    pub course: Course,
    #[serde(skip)]
    pub user: User,
}

/// Course context plus an assignment of that course.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentContext {
    #[serde(flatten)]
    pub course_user: CourseUserContext,
    #[serde(rename = "assignment-id", default)]
    pub assignment_id: String,

    #[serde(skip)]
    pub assignment: Assignment,
}

impl CourseUserContext {
    pub fn new(
        course_id: impl Into<String>,
        user_email: impl Into<String>,
        user_pass: impl Into<String>,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            user_email: user_email.into(),
            user_pass: user_pass.into(),
            ..Self::default()
        }
    }
}

impl AssignmentContext {
    pub fn new(course_user: CourseUserContext, assignment_id: impl Into<String>) -> Self {
        Self {
            course_user,
            assignment_id: assignment_id.into(),
            assignment: Assignment::default(),
        }
    }
}

/// Entities resolved for one request. Owned copies, never shared with other requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedContext {
    pub course: Course,
    pub assignment: Option<Assignment>,
    pub user: User,
}

/// Resolve and authenticate a context slot, then attach the entities into it.
pub async fn resolve(
    store: &dyn CourseStore,
    mut slot: ContextSlot<'_>,
) -> Result<ResolvedContext, ApiError> {
    let assignment_id = match &slot {
        ContextSlot::Course(_) => None,
        ContextSlot::Assignment(ctx) => Some(ctx.assignment_id.trim().to_string()),
    };
    let ctx = slot.course_user();

    let course_id = ctx.course_id.trim().to_string();
    let email = normalize_email(&ctx.user_email);
    let pass = ctx.user_pass.trim().to_string();

    check_present(&course_id, locator::MISSING_COURSE_ID, "course-id")?;
    if let Some(assignment_id) = &assignment_id {
        check_present(assignment_id, locator::MISSING_ASSIGNMENT_ID, "assignment-id")?;
    }
    check_present(&email, locator::MISSING_USER_EMAIL, "user-email")?;
    check_present(&pass, locator::MISSING_USER_PASS, "user-pass")?;

    let course = store
        .get_course(&course_id)
        .await
        .map_err(|e| {
            ApiError::internal(locator::CONTEXT_LOOKUP_FAILED, "failed to load course")
                .add("course", course_id.clone())
                .err(e)
        })?
        .ok_or_else(|| {
            ApiError::bad_request(locator::UNKNOWN_COURSE, "could not find course")
                .add("course", course_id.clone())
        })?;

    // Roster reads later in the pipeline use `course.id`; it must be the course authenticated here.
    if course.id != course_id {
        return Err(ApiError::internal(
            locator::CONTEXT_LOOKUP_FAILED,
            "store returned a different course than requested",
        )
        .add("course", course_id)
        .add("returned-course", course.id));
    }

    let assignment = match &assignment_id {
        None => None,
        Some(id) => Some(course.assignment(id).cloned().ok_or_else(|| {
            ApiError::bad_request(locator::UNKNOWN_ASSIGNMENT, "could not find assignment")
                .add("course", course_id.clone())
                .add("assignment", id.clone())
        })?),
    };

    let user = authenticate(store, &course_id, &email, &pass).await?;

    tracing::debug!(
        course = %course.id,
        assignment = ?assignment.as_ref().map(|a| a.id.as_str()),
        email = %user.email,
        role = %user.role,
        "request context resolved"
    );

    let resolved = ResolvedContext {
        course,
        assignment,
        user,
    };
    attach(&mut slot, &resolved);

    Ok(resolved)
}

async fn authenticate(
    store: &dyn CourseStore,
    course_id: &str,
    email: &str,
    pass: &str,
) -> Result<User, ApiError> {
    let mut users = store.get_users(course_id).await.map_err(|e| {
        ApiError::internal(locator::CONTEXT_LOOKUP_FAILED, "failed to load course users")
            .add("course", course_id)
            .err(e)
    })?;

    let user = users.remove(email).ok_or_else(|| {
        ApiError::authentication(locator::UNKNOWN_USER, "could not find user")
            .add("course", course_id)
            .add("email", email)
    })?;

    if !user.check_password(pass) {
        return Err(
            ApiError::authentication(locator::BAD_PASSWORD, "bad password")
                .add("course", course_id)
                .add("email", email),
        );
    }

    Ok(user)
}

fn attach(slot: &mut ContextSlot<'_>, resolved: &ResolvedContext) {
    let course_user = match slot {
        ContextSlot::Course(ctx) => &mut **ctx,
        ContextSlot::Assignment(ctx) => {
            if let Some(assignment) = &resolved.assignment {
                ctx.assignment_id = assignment.id.clone();
                ctx.assignment = assignment.clone();
            }
            &mut ctx.course_user
        }
    };

    course_user.course_id = resolved.course.id.clone();
    course_user.user_email = resolved.user.email.clone();
    course_user.course = resolved.course.clone();
    course_user.user = resolved.user.clone();
}

fn check_present(value: &str, loc: &'static str, wire_name: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(
            ApiError::bad_request(loc, format!("missing required field '{wire_name}'"))
                .add("json-name", wire_name),
        );
    }
    Ok(())
}
