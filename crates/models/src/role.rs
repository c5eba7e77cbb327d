use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// The role a user acts under
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Admin,
    Student,
    Lecturer,
    Assistant,
    CoLecturer,
    Mentor,
    EducationOfficeHead,
    DepartmentAdmin,
}

impl Role {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// Whether this role may create, edit or delete schedule entries
    pub fn can_manage_schedules(self) -> bool {
        matches!(self, Self::Admin | Self::Lecturer)
    }

    pub fn all() -> Vec<Role> {
        Role::iter().collect()
    }
}

#[cfg(feature = "database")]
crate::db_value::string_column!(Role);
