//! User account and role models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access.
    Admin,
    /// Read access scoped to the head's own department.
    DepartmentHead,
    /// Self-service access.
    Employee,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::DepartmentHead => "DEPARTMENT_HEAD",
            Role::Employee => "EMPLOYEE",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal identifier.
    pub id: Uuid,
    /// Login email, unique ignoring case.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Access role.
    pub role: Role,
    /// Linked employee record; required for DEPARTMENT_HEAD and EMPLOYEE.
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    /// Disabled accounts cannot log in.
    pub active: bool,
}
