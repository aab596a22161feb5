use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use autograder_api::app::build_router;
use autograder_api::middleware::http::{self, HttpLimits};
use autograder_api::model::{Assignment, Course, User, UserRole};
use autograder_api::repos::{CourseStore, DiskCourseStore};
use autograder_api::services::StagingArea;
use autograder_api::services::password::sha256_hex;
use autograder_api::state::AppState;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const COURSE: &str = "course101";
pub const BOUNDARY: &str = "autograder-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub upload_dir: TempDir,
    _courses_dir: TempDir,
}

pub fn pass(role: UserRole) -> String {
    sha256_hex(role.as_str())
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(Router::new()).await
}

fn limits() -> HttpLimits {
    HttpLimits {
        max_body_bytes: 1024 * 1024,
        timeout: Duration::from_secs(10),
    }
}

/// Like `spawn_app`, with `extra` routes mounted behind the same middleware.
pub async fn spawn_app_with(extra: Router<AppState>) -> TestApp {
    let courses_dir = tempfile::tempdir().unwrap();
    let upload_dir = tempfile::tempdir().unwrap();

    let store = DiskCourseStore::open(courses_dir.path()).await.unwrap();
    store
        .save_course(
            &Course::new(COURSE, "Course 101").with_assignment(Assignment::new("hw0", "HW 0")),
        )
        .await
        .unwrap();

    let mut users = HashMap::new();
    for role in [UserRole::Student, UserRole::Grader] {
        let email = format!("{}@test.com", role.as_str());
        let mut user = User::new(&email, role.as_str(), role);
        user.set_password(&pass(role));
        users.insert(email, user);
    }
    store.save_users(COURSE, &users).await.unwrap();

    let state = AppState::new(Arc::new(store), StagingArea::new(upload_dir.path()));
    let router = build_router(state.clone(), limits())
        .merge(http::apply(extra.with_state(state), limits()));

    TestApp {
        router,
        upload_dir,
        _courses_dir: courses_dir,
    }
}

pub fn credentials(role: UserRole) -> Value {
    serde_json::json!({
        "course-id": COURSE,
        "user-email": format!("{}@test.com", role.as_str()),
        "user-pass": pass(role),
    })
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            // Non-JSON bodies (e.g. the panic fallback) come back as a plain string.
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(path, body.to_string()).await
    }

    pub async fn post_raw(&self, path: &str, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        self.send(request).await
    }

    /// `content` is sent as the JSON part; each file as a part with a filename.
    pub async fn post_multipart(
        &self,
        path: &str,
        content: Option<&Value>,
        files: &[(&str, &str)],
    ) -> (StatusCode, Value) {
        let mut body = String::new();
        if let Some(content) = content {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"content\"\r\n\r\n{content}\r\n"
            ));
        }
        for (name, contents) in files {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{contents}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        let request = Request::post(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub fn staged_dir_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }
}
