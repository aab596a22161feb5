/*
 * Responsibility
 * - リポジトリ外の協調者 (LMS) との契約、パスワードハッシュ、アップロードの一時保存
 * - handler / pipeline はここの型だけを使い、実装の詳細から切り離す
 */
pub mod lms;
pub mod password;
pub mod staging;

pub use lms::{LmsAdapter, LmsError, LmsUser};
pub use staging::{StagingArea, StagingDir, StagingError, sanitize_file_name};
