use serde::{Deserialize, Serialize};

use crate::api::core::{ApiRequest, AssignmentContext, ContextSlot, Marker, PostFiles, SpecialFields};
use crate::model::UserRole;

/// `submission/stage`: upload files for an assignment (multipart, JSON in the `content` part).
#[derive(Debug, Deserialize)]
pub struct StageRequest {
    #[serde(flatten)]
    pub context: AssignmentContext,

    #[serde(skip)]
    pub files: PostFiles,
}

impl ApiRequest for StageRequest {
    const MARKERS: &'static [Marker] = &[Marker::MinRole(UserRole::Student), Marker::PostFiles];

    fn context(&mut self) -> Option<ContextSlot<'_>> {
        Some(ContextSlot::Assignment(&mut self.context))
    }

    fn special_fields(&mut self) -> SpecialFields<'_> {
        SpecialFields {
            files: Some(&mut self.files),
            ..SpecialFields::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StagedFileInfo {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StageResponse {
    pub course: String,
    pub assignment: String,
    pub files: Vec<StagedFileInfo>,
}
