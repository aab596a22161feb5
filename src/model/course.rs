use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Link between a course and its LMS counterpart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmsLink {
    #[serde(rename = "course-id")]
    pub course_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    #[serde(rename = "display-name", default)]
    pub display_name: String,
    #[serde(rename = "lms-id", default)]
    pub lms_id: String,
}

/// Course configuration as stored in `course.json`.
///
/// The roster is not part of this value; it is fetched separately through the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    #[serde(rename = "display-name", default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lms: Option<LmsLink>,
    #[serde(default)]
    pub assignments: BTreeMap<String, Assignment>,
}

impl Course {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            lms: None,
            assignments: BTreeMap::new(),
        }
    }

    pub fn with_assignment(mut self, assignment: Assignment) -> Self {
        self.assignments.insert(assignment.id.clone(), assignment);
        self
    }

    pub fn assignment(&self, id: &str) -> Option<&Assignment> {
        self.assignments.get(id)
    }

    pub fn lms_course_id(&self) -> Option<&str> {
        self.lms
            .as_ref()
            .map(|link| link.course_id.as_str())
            .filter(|id| !id.is_empty())
    }
}

impl Assignment {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            lms_id: String::new(),
        }
    }
}
