//! Holiday model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Philippine holiday classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    /// Regular holiday (double pay when worked).
    Regular,
    /// Special non-working day (130% when worked).
    SpecialNonWorking,
}

/// A company-observed holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Internal identifier.
    pub id: Uuid,
    /// Date of the holiday; unique.
    pub date: NaiveDate,
    /// Holiday name.
    pub name: String,
    /// Classification.
    pub kind: HolidayKind,
}
