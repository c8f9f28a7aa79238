//! Attendance clock transitions and time metrics.
//!
//! This module applies `IN`, `BREAK_OUT`, `BREAK_IN` and `OUT` actions to a
//! daily attendance record and computes lateness, undertime and overtime
//! minutes against the employee's schedule.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{HrError, HrResult};
use crate::models::{
    Attendance, AttendanceSource, AttendanceStatus, ClockAction, ClockState, Employee, Schedule,
};

/// Minutes computed when an employee clocks out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockOutMetrics {
    /// Actual break length.
    pub break_minutes: i64,
    /// Minutes worked excluding the break.
    pub worked_minutes: i64,
    /// Early departure plus break taken beyond the allowance.
    pub undertime_minutes: i64,
    /// Minutes past the scheduled end, zero below the minimum.
    pub overtime_minutes: i64,
    /// True if less than half the scheduled minutes were worked.
    pub half_day: bool,
}

/// Returns the employee's assigned schedule, or `default` when none is
/// assigned or the assigned one no longer exists.
pub fn resolve_schedule<'a>(
    employee: &Employee,
    schedules: &'a [Schedule],
    default: &'a Schedule,
) -> &'a Schedule {
    employee
        .schedule_id
        .and_then(|id| schedules.iter().find(|s| s.id == id))
        .unwrap_or(default)
}

/// Computes late minutes for a time in.
///
/// Lateness is measured from the scheduled start but only counted once the
/// time in passes the grace period.
///
/// # Examples
///
/// ```
/// use hr_payroll::calculation::late_minutes;
/// use hr_payroll::models::Schedule;
/// use chrono::{NaiveDate, NaiveTime, Weekday};
/// use uuid::Uuid;
///
/// let schedule = Schedule {
///     id: Uuid::nil(),
///     name: "Day".to_string(),
///     time_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
///     time_out: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
///     break_minutes: 60,
///     grace_minutes: 15,
///     work_days: vec![Weekday::Mon],
/// };
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
///
/// // Within grace: not late
/// let on_time = date.and_hms_opt(8, 10, 0).unwrap();
/// assert_eq!(late_minutes(&schedule, date, on_time), 0);
///
/// // Past grace: counted from 08:00
/// let late = date.and_hms_opt(8, 20, 0).unwrap();
/// assert_eq!(late_minutes(&schedule, date, late), 20);
/// ```
pub fn late_minutes(schedule: &Schedule, date: NaiveDate, time_in: NaiveDateTime) -> i64 {
    let start = schedule.start_on(date);
    let grace_end = start + Duration::minutes(schedule.grace_minutes);

    if time_in > grace_end {
        (time_in - start).num_minutes()
    } else {
        0
    }
}

/// Computes the clock-out metrics for a record.
///
/// # Arguments
///
/// * `attendance` - The record being closed (break times already set)
/// * `time_out` - The clock-out instant
/// * `schedule` - The employee's schedule
/// * `min_overtime_minutes` - Overtime below this is not recorded
pub fn clock_out_metrics(
    attendance: &Attendance,
    time_out: NaiveDateTime,
    schedule: &Schedule,
    min_overtime_minutes: i64,
) -> ClockOutMetrics {
    let break_minutes = match (attendance.break_out, attendance.break_in) {
        (Some(out), Some(back)) => (back - out).num_minutes().max(0),
        _ => 0,
    };

    let worked_minutes = ((time_out - attendance.time_in).num_minutes() - break_minutes).max(0);

    let scheduled_end = schedule.end_on(attendance.date);
    let early_minutes = (scheduled_end - time_out).num_minutes().max(0);
    let overbreak_minutes = (break_minutes - schedule.break_minutes).max(0);
    let undertime_minutes = early_minutes + overbreak_minutes;

    let past_end = (time_out - scheduled_end).num_minutes();
    let overtime_minutes = if past_end > 0 && past_end >= min_overtime_minutes {
        past_end
    } else {
        0
    };

    let half_day = worked_minutes * 2 < schedule.work_minutes();

    ClockOutMetrics {
        break_minutes,
        worked_minutes,
        undertime_minutes,
        overtime_minutes,
        half_day,
    }
}

/// Applies a clock action to an employee's attendance for the day.
///
/// `existing` is the record the action applies to, if any: the record for
/// the shift `at` falls in, or an unfinished overnight record that is still
/// being clocked out. A new record is dated by [`Schedule::shift_date`].
/// Returns the new or updated record; the caller persists it.
///
/// # Errors
///
/// Returns [`HrError::InvalidTransition`] when the action is not allowed in
/// the record's current state or when `at` precedes the last clock event.
#[allow(clippy::too_many_arguments)]
pub fn apply_clock_action(
    existing: Option<&Attendance>,
    employee_id: Uuid,
    action: ClockAction,
    at: NaiveDateTime,
    schedule: &Schedule,
    min_overtime_minutes: i64,
    source: AttendanceSource,
) -> HrResult<Attendance> {
    let Some(current) = existing else {
        return match action {
            ClockAction::In => Ok(clock_in(employee_id, at, schedule, source)),
            _ => Err(transition("not clocked in today")),
        };
    };

    let state = current.clock_state();
    if state == ClockState::ClockedOut {
        return Err(transition("already clocked out for the day"));
    }
    if at < current.last_event_at() {
        return Err(transition("clock time precedes the previous clock event"));
    }

    let mut record = current.clone();
    match (action, state) {
        (ClockAction::In, _) => return Err(transition("already clocked in")),
        (ClockAction::BreakOut, ClockState::ClockedIn) => {
            record.break_out = Some(at);
        }
        (ClockAction::BreakOut, ClockState::OnBreak) => {
            return Err(transition("already on break"));
        }
        (ClockAction::BreakOut, _) => {
            return Err(transition("break already taken today"));
        }
        (ClockAction::BreakIn, ClockState::OnBreak) => {
            record.break_in = Some(at);
        }
        (ClockAction::BreakIn, _) => return Err(transition("not on break")),
        (ClockAction::Out, ClockState::OnBreak) => {
            return Err(transition("end the break before clocking out"));
        }
        (ClockAction::Out, _) => {
            let metrics = clock_out_metrics(&record, at, schedule, min_overtime_minutes);
            record.time_out = Some(at);
            record.break_minutes = metrics.break_minutes;
            record.worked_minutes = metrics.worked_minutes;
            record.undertime_minutes = metrics.undertime_minutes;
            record.overtime_minutes = metrics.overtime_minutes;
            if metrics.half_day {
                record.status = AttendanceStatus::HalfDay;
            }
        }
    }

    Ok(record)
}

fn clock_in(
    employee_id: Uuid,
    at: NaiveDateTime,
    schedule: &Schedule,
    source: AttendanceSource,
) -> Attendance {
    let date = schedule.shift_date(at);
    let late = late_minutes(schedule, date, at);

    Attendance {
        id: Uuid::new_v4(),
        employee_id,
        date,
        time_in: at,
        break_out: None,
        break_in: None,
        time_out: None,
        status: if late > 0 {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        },
        late_minutes: late,
        undertime_minutes: 0,
        overtime_minutes: 0,
        break_minutes: 0,
        worked_minutes: 0,
        source,
    }
}

fn transition(message: &str) -> HrError {
    HrError::InvalidTransition {
        message: message.to_string(),
    }
}
