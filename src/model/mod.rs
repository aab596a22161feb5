/*
 * Responsibility
 * - Course / Assignment / User のドメイン型
 * - 永続化の形式 (course.json / users.json) と同じ serde 表現を持つ
 */
pub mod course;
pub mod user;

pub use course::{Assignment, Course, LmsLink};
pub use user::{User, UserRole, normalize_email};
