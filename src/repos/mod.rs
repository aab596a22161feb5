pub mod course_store;
pub mod disk;
pub mod error;

pub use course_store::CourseStore;
pub use disk::DiskCourseStore;
pub use error::{RepoError, RepoResult};
