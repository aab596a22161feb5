//! Shared fixtures for unit tests: a disk course store with one course and one user per role.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::api::core::{AssignmentContext, CourseUserContext};
use crate::model::{Assignment, Course, LmsLink, User, UserRole};
use crate::repos::{CourseStore, DiskCourseStore};
use crate::services::password::sha256_hex;
use crate::services::{LmsAdapter, LmsError, LmsUser, StagingArea};
use crate::state::AppState;

pub const COURSE: &str = "course101";
pub const ASSIGNMENT: &str = "hw0";

pub const OTHER: &str = "other@test.com";
pub const STUDENT: &str = "student@test.com";
pub const GRADER: &str = "grader@test.com";
pub const ADMIN: &str = "admin@test.com";
pub const OWNER: &str = "owner@test.com";

/// Users of the fixture course. Everyone's password is the name of their role.
pub fn fixture_users() -> Vec<User> {
    [
        (OTHER, UserRole::Other),
        (STUDENT, UserRole::Student),
        (GRADER, UserRole::Grader),
        (ADMIN, UserRole::Admin),
        (OWNER, UserRole::Owner),
    ]
    .into_iter()
    .map(|(email, role)| {
        let mut user = User::new(email, role.as_str(), role);
        user.set_password(&client_pass(role));
        user.lms_id = format!("lms-{}", role.as_str());
        user
    })
    .collect()
}

/// The password a client sends for a fixture user of `role`.
pub fn client_pass(role: UserRole) -> String {
    sha256_hex(role.as_str())
}

pub fn role_of(email: &str) -> UserRole {
    match email {
        OTHER => UserRole::Other,
        STUDENT => UserRole::Student,
        GRADER => UserRole::Grader,
        ADMIN => UserRole::Admin,
        OWNER => UserRole::Owner,
        _ => UserRole::Unknown,
    }
}

pub fn course_context(email: &str) -> CourseUserContext {
    CourseUserContext::new(COURSE, email, client_pass(role_of(email)))
}

pub fn assignment_context(email: &str) -> AssignmentContext {
    AssignmentContext::new(course_context(email), ASSIGNMENT)
}

pub struct Fixture {
    pub state: AppState,
    pub store: Arc<DiskCourseStore>,
    // Keep the directories alive for as long as the fixture.
    pub courses_dir: TempDir,
    pub upload_dir: TempDir,
}

impl Fixture {
    pub async fn new() -> Self {
        let courses_dir = tempfile::tempdir().unwrap();
        let upload_dir = tempfile::tempdir().unwrap();

        let store = Arc::new(DiskCourseStore::open(courses_dir.path()).await.unwrap());

        let mut course = Course::new(COURSE, "Course 101")
            .with_assignment(Assignment::new(ASSIGNMENT, "Homework 0"));
        course.lms = Some(LmsLink {
            course_id: "lms-course-101".to_string(),
        });
        store.save_course(&course).await.unwrap();

        let users: HashMap<String, User> = fixture_users()
            .into_iter()
            .map(|u| (u.email.clone(), u))
            .collect();
        store.save_users(COURSE, &users).await.unwrap();

        let state = AppState::new(store.clone(), StagingArea::new(upload_dir.path()));

        Self {
            state,
            store,
            courses_dir,
            upload_dir,
        }
    }

    pub fn with_lms(mut self, lms: FakeLms) -> Self {
        self.state = self.state.with_lms(Arc::new(lms));
        self
    }

    /// Overwrite the roster file with garbage so the next roster read fails.
    pub fn corrupt_roster(&self) {
        std::fs::write(
            self.courses_dir.path().join(COURSE).join("users.json"),
            "{ not json",
        )
        .unwrap();
    }

    /// Number of entries currently in the upload root.
    pub fn staged_dir_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }
}

/// In-memory LMS keyed by email. `failing` makes every fetch fail.
#[derive(Debug, Default)]
pub struct FakeLms {
    pub users: HashMap<String, LmsUser>,
    pub failing: bool,
}

impl FakeLms {
    pub fn with_user(mut self, user: LmsUser) -> Self {
        self.users.insert(user.email.clone(), user);
        self
    }
}

#[async_trait]
impl LmsAdapter for FakeLms {
    fn backend_name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_user(
        &self,
        _lms_course_id: &str,
        email: &str,
    ) -> Result<Option<LmsUser>, LmsError> {
        if self.failing {
            return Err(LmsError::Backend("lms is down".to_string()));
        }
        Ok(self.users.get(email).cloned())
    }
}
