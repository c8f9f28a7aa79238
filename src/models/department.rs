//! Department model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organizational unit employees belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Internal identifier.
    pub id: Uuid,
    /// Department name, unique ignoring case.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Employee heading the department.
    #[serde(default)]
    pub head_employee_id: Option<Uuid>,
}
