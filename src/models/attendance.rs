//! Attendance model and clock actions.
//!
//! One [`Attendance`] record exists per employee per day. It is created by
//! an `IN` clock action and completed by `OUT`; the break actions sit in
//! between.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A clock action performed by or for an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClockAction {
    /// Start of the work day.
    In,
    /// Start of the break.
    BreakOut,
    /// End of the break.
    BreakIn,
    /// End of the work day.
    Out,
}

/// Day status derived from the clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Clocked in on time.
    Present,
    /// Clocked in after the grace period.
    Late,
    /// Worked less than half the scheduled minutes.
    HalfDay,
}

/// How the clock action reached the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceSource {
    /// Clocked through the application.
    Manual,
    /// Clocked by scanning a QR badge.
    QrScan,
}

/// Where an attendance record is in the clock sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    /// Clocked in, no break taken yet.
    ClockedIn,
    /// Currently on break.
    OnBreak,
    /// Back from break, still clocked in.
    BreakDone,
    /// Clocked out for the day.
    ClockedOut,
}

/// A daily attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    /// Internal identifier.
    pub id: Uuid,
    /// Employee this record belongs to.
    pub employee_id: Uuid,
    /// The work date (date of the scheduled start).
    pub date: NaiveDate,
    /// Time in.
    pub time_in: NaiveDateTime,
    /// Start of the break.
    pub break_out: Option<NaiveDateTime>,
    /// End of the break.
    pub break_in: Option<NaiveDateTime>,
    /// Time out.
    pub time_out: Option<NaiveDateTime>,
    /// Day status.
    pub status: AttendanceStatus,
    /// Minutes late past the scheduled start.
    pub late_minutes: i64,
    /// Minutes short of the schedule, including overbreak.
    pub undertime_minutes: i64,
    /// Minutes worked past the scheduled end.
    pub overtime_minutes: i64,
    /// Actual break length.
    pub break_minutes: i64,
    /// Minutes worked excluding the break.
    pub worked_minutes: i64,
    /// How the record was created.
    pub source: AttendanceSource,
}

impl Attendance {
    /// Returns the current position in the clock sequence.
    pub fn clock_state(&self) -> ClockState {
        match (self.break_out, self.break_in, self.time_out) {
            (_, _, Some(_)) => ClockState::ClockedOut,
            (Some(_), None, None) => ClockState::OnBreak,
            (Some(_), Some(_), None) => ClockState::BreakDone,
            _ => ClockState::ClockedIn,
        }
    }

    /// Returns the most recent recorded timestamp.
    pub fn last_event_at(&self) -> NaiveDateTime {
        [self.break_out, self.break_in, self.time_out]
            .into_iter()
            .flatten()
            .fold(self.time_in, Ord::max)
    }
}
