/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - store: CourseStore, staging: StagingArea, lms: LmsAdapter
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::fmt;
use std::sync::Arc;

use crate::repos::CourseStore;
use crate::services::{LmsAdapter, StagingArea};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CourseStore>,
    pub staging: StagingArea,
    pub lms: Option<Arc<dyn LmsAdapter>>,
}

impl AppState {
    pub fn new(store: Arc<dyn CourseStore>, staging: StagingArea) -> Self {
        Self {
            store,
            staging,
            lms: None,
        }
    }

    pub fn with_lms(mut self, lms: Arc<dyn LmsAdapter>) -> Self {
        self.lms = Some(lms);
        self
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend_name())
            .field("staging", &self.staging.root())
            .field("lms", &self.lms.as_ref().map(|l| l.backend_name()))
            .finish()
    }
}
