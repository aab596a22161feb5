/*!
 * Request validation and authorization pipeline
 *
 * Every API endpoint is a typed request/response pair. The request type declares what it needs
 * (`ApiRequest`); the pipeline decodes it, resolves course/assignment/user context, checks roles
 * and fills the special fields before the handler ever runs.
 */
pub mod authorize;
pub mod capability;
pub mod context;
pub mod decode;
pub mod extract;
pub mod fields;
pub mod pipeline;
pub mod populate;
pub mod request;
pub mod upload;


pub use capability::{Capabilities, ContextKind, FieldPresence};
pub use context::{AssignmentContext, CourseUserContext, ResolvedContext};
pub use extract::Validated;
pub use fields::{CourseUsers, NonEmptyString, PostFiles, TargetUserSelfOrGrader};
pub use request::{ApiRequest, ContextSlot, Marker, RequiredField, SpecialFields};
pub use upload::UploadedFile;
