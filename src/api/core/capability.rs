//! Capability scanning: what a request declares, and whether the declaration is usable.
use crate::api::core::request::{ApiRequest, ContextSlot, Marker};
use crate::error::{ApiError, locator};
use crate::model::UserRole;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContextKind {
    #[default]
    None,
    Course,
    Assignment,
}

/// Whether a special field is declared, and if so whether the pipeline can write into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldPresence {
    #[default]
    Absent,
    Exposed,
    Hidden,
}

impl FieldPresence {
    fn of(declared: bool, exposed: bool) -> Self {
        match (declared, exposed) {
            (_, true) => FieldPresence::Exposed,
            (true, false) => FieldPresence::Hidden,
            (false, false) => FieldPresence::Absent,
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, FieldPresence::Absent)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// `None` means no role check applies (distinct from requiring the lowest role).
    pub min_role: Option<UserRole>,
    pub context: ContextKind,
    pub users: FieldPresence,
    pub target_user: FieldPresence,
    pub files: FieldPresence,
}

impl Capabilities {
    pub fn scan<T: ApiRequest>(request: &mut T) -> Self {
        let declared = |marker: Marker| T::MARKERS.contains(&marker);

        let context = match request.context() {
            None => ContextKind::None,
            Some(ContextSlot::Course(_)) => ContextKind::Course,
            Some(ContextSlot::Assignment(_)) => ContextKind::Assignment,
        };

        let fields = request.special_fields();

        Self {
            min_role: max_role(T::MARKERS),
            context,
            users: FieldPresence::of(declared(Marker::CourseUsers), fields.users.is_some()),
            target_user: FieldPresence::of(
                declared(Marker::TargetUser),
                fields.target_user.is_some(),
            ),
            files: FieldPresence::of(declared(Marker::PostFiles), fields.files.is_some()),
        }
    }

    /// Any special field that only makes sense with a resolved course.
    pub fn needs_course(&self) -> bool {
        self.users.is_present() || self.target_user.is_present() || self.files.is_present()
    }

    /// Reject declarations the pipeline cannot honour.
    pub fn check(&self) -> Result<(), ApiError> {
        if self.users == FieldPresence::Hidden || self.target_user == FieldPresence::Hidden {
            return Err(ApiError::configuration(
                locator::NON_EXPORTED_USERS_FIELD,
                "a users field is declared but not exposed to the pipeline",
            ));
        }

        if self.files == FieldPresence::Hidden {
            return Err(ApiError::configuration(
                locator::NON_EXPORTED_FILES_FIELD,
                "a files field is declared but not exposed to the pipeline",
            ));
        }

        if let (Some(role), ContextKind::None) = (self.min_role, self.context) {
            return Err(ApiError::configuration(
                locator::ROLE_WITHOUT_CONTEXT,
                format!("minimum role '{role}' declared without a user context"),
            ));
        }

        Ok(())
    }
}

/// The effective minimum role: the highest among all role markers, `None` without any.
pub fn max_role(markers: &[Marker]) -> Option<UserRole> {
    markers
        .iter()
        .filter_map(|marker| match marker {
            Marker::MinRole(role) => Some(*role),
            _ => None,
        })
        .max()
}
