/*
 * Responsibility
 * - Course / roster 永続化の契約 (CourseStore)
 * - 読み出しは常にリクエストローカルなコピーを返す (共有状態への参照は返さない)
 */
use std::collections::HashMap;

use async_trait::async_trait;

use crate::model::{Assignment, Course, User};
use crate::repos::error::RepoResult;

/// Course and roster persistence.
///
/// Implementations are responsible for their own concurrency safety. Every read returns an owned
/// snapshot, so concurrent requests never observe each other's roster maps.
#[async_trait]
pub trait CourseStore: Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Returns Ok(None) when the course does not exist.
    async fn get_course(&self, course_id: &str) -> RepoResult<Option<Course>>;

    // Full roster of a course, keyed by normalized email.
    async fn get_users(&self, course_id: &str) -> RepoResult<HashMap<String, User>>;

    async fn save_course(&self, course: &Course) -> RepoResult<()>;

    async fn save_users(&self, course_id: &str, users: &HashMap<String, User>) -> RepoResult<()>;

    async fn get_assignment(
        &self,
        course_id: &str,
        assignment_id: &str,
    ) -> RepoResult<Option<Assignment>> {
        let course = self.get_course(course_id).await?;
        Ok(course.and_then(|c| c.assignment(assignment_id).cloned()))
    }
}
