//! Attendance records and the holiday calendar.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::calculation::{apply_clock_action, resolve_schedule};
use crate::error::{HrError, HrResult};
use crate::models::{Attendance, AttendanceSource, ClockAction, ClockState, Holiday, Schedule};

use super::{Store, ensure_unique};

/// Filters for listing attendance.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    /// Only this employee.
    pub employee_id: Option<Uuid>,
    /// Only employees currently in this department.
    pub department_id: Option<Uuid>,
    /// First date (inclusive).
    pub from: Option<NaiveDate>,
    /// Last date (inclusive).
    pub to: Option<NaiveDate>,
}

/// How long after an overnight shift's scheduled end it can still be
/// clocked out.
pub const OVERNIGHT_CLOCK_OUT_WINDOW_HOURS: i64 = 12;

/// Finds the unfinished overnight shift from the day before `at`'s shift.
fn open_overnight_shift(
    attendance: &[Attendance],
    employee_id: Uuid,
    schedule: &Schedule,
    at: NaiveDateTime,
) -> Option<usize> {
    if !schedule.is_overnight() {
        return None;
    }
    let previous = schedule.shift_date(at) - Duration::days(1);
    let deadline = schedule.end_on(previous) + Duration::hours(OVERNIGHT_CLOCK_OUT_WINDOW_HOURS);
    if at > deadline {
        return None;
    }
    attendance.iter().position(|a| {
        a.employee_id == employee_id
            && a.date == previous
            && a.clock_state() != ClockState::ClockedOut
    })
}

impl Store {
    /// Applies a clock action for an employee at a local instant.
    ///
    /// The action applies to the employee's record for the shift `at` falls
    /// in (see [`Schedule::shift_date`]). On an overnight schedule a non-`IN`
    /// action with no such record falls back to the unfinished shift from the
    /// previous day, until [`OVERNIGHT_CLOCK_OUT_WINDOW_HOURS`] after its
    /// scheduled end. Day schedules never fall back: a forgotten `OUT` stays
    /// open and the next day's actions need a fresh `IN`.
    ///
    /// # Errors
    ///
    /// [`HrError::NotFound`] for an unknown employee,
    /// [`HrError::Validation`] for an inactive one, and
    /// [`HrError::InvalidTransition`] when the action is not allowed.
    pub fn record_clock_event(
        &self,
        employee_id: Uuid,
        action: ClockAction,
        at: NaiveDateTime,
        default_schedule: &Schedule,
        min_overtime_minutes: i64,
        source: AttendanceSource,
    ) -> HrResult<Attendance> {
        self.write(|data| {
            let employee = data
                .employees
                .iter()
                .find(|e| e.id == employee_id)
                .ok_or_else(|| HrError::not_found("employee", employee_id))?;
            if !employee.active {
                return Err(HrError::validation("employee_id", "employee is inactive"));
            }
            let schedule = resolve_schedule(employee, &data.schedules, default_schedule);

            let date = schedule.shift_date(at);
            let index = data
                .attendance
                .iter()
                .position(|a| a.employee_id == employee_id && a.date == date)
                .or_else(|| match action {
                    ClockAction::In => None,
                    _ => open_overnight_shift(&data.attendance, employee_id, schedule, at),
                });

            let existing = index.map(|i| &data.attendance[i]);
            let record = apply_clock_action(
                existing,
                employee_id,
                action,
                at,
                schedule,
                min_overtime_minutes,
                source,
            )?;

            debug!(
                employee_id = %employee_id,
                action = ?action,
                date = %record.date,
                status = ?record.status,
                "Clock event applied"
            );

            match index {
                Some(i) => data.attendance[i] = record.clone(),
                None => data.attendance.push(record.clone()),
            }
            Ok(record)
        })
    }

    /// Lists attendance by date, then employee.
    pub fn list_attendance(&self, filter: &AttendanceFilter) -> Vec<Attendance> {
        self.read(|data| {
            let department_members: Option<Vec<Uuid>> = filter.department_id.map(|department_id| {
                data.employees
                    .iter()
                    .filter(|e| e.department_id == Some(department_id))
                    .map(|e| e.id)
                    .collect()
            });

            let mut records: Vec<Attendance> = data
                .attendance
                .iter()
                .filter(|a| filter.employee_id.is_none_or(|id| a.employee_id == id))
                .filter(|a| {
                    department_members
                        .as_ref()
                        .is_none_or(|members| members.contains(&a.employee_id))
                })
                .filter(|a| filter.from.is_none_or(|from| a.date >= from))
                .filter(|a| filter.to.is_none_or(|to| a.date <= to))
                .cloned()
                .collect();
            records.sort_by(|a, b| a.date.cmp(&b.date).then(a.time_in.cmp(&b.time_in)));
            records
        })
    }

    /// Lists holidays by date, optionally within a range.
    pub fn list_holidays(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Vec<Holiday> {
        self.read(|data| {
            let mut holidays: Vec<Holiday> = data
                .holidays
                .iter()
                .filter(|h| from.is_none_or(|from| h.date >= from))
                .filter(|h| to.is_none_or(|to| h.date <= to))
                .cloned()
                .collect();
            holidays.sort_by_key(|h| h.date);
            holidays
        })
    }

    /// Adds a holiday; one per date.
    pub fn create_holiday(&self, holiday: Holiday) -> HrResult<Holiday> {
        self.write(|data| {
            ensure_unique(
                data.holidays.iter().any(|h| h.date == holiday.date),
                "holiday",
                "date",
                &holiday.date.to_string(),
            )?;
            data.holidays.push(holiday.clone());
            Ok(holiday)
        })
    }

    /// Deletes a holiday.
    pub fn delete_holiday(&self, id: Uuid) -> HrResult<()> {
        self.write(|data| {
            if !data.holidays.iter().any(|h| h.id == id) {
                return Err(HrError::not_found("holiday", id));
            }
            data.holidays.retain(|h| h.id != id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, HolidayKind};
    use crate::store::test_support::{department, employee, schedule};
    use chrono::NaiveTime;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn clock(store: &Store, employee_id: Uuid, action: ClockAction, when: &str) -> HrResult<Attendance> {
        store.record_clock_event(
            employee_id,
            action,
            at(when),
            &schedule("Default"),
            30,
            AttendanceSource::Manual,
        )
    }

    #[test]
    fn test_one_record_per_employee_day() {
        let store = Store::in_memory();
        let emp = store.create_employee(employee("EMP-1")).unwrap();

        clock(&store, emp.id, ClockAction::In, "2026-03-02 08:00").unwrap();
        clock(&store, emp.id, ClockAction::Out, "2026-03-02 17:00").unwrap();
        let again = clock(&store, emp.id, ClockAction::In, "2026-03-02 18:00");

        assert!(matches!(again, Err(HrError::InvalidTransition { .. })));
        assert_eq!(store.list_attendance(&AttendanceFilter::default()).len(), 1);
    }

    #[test]
    fn test_assigned_schedule_used() {
        let store = Store::in_memory();
        let mut late_shift = schedule("Late");
        late_shift.time_in = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        late_shift.time_out = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        let late_shift = store.create_schedule(late_shift).unwrap();
        let mut emp = employee("EMP-1");
        emp.schedule_id = Some(late_shift.id);
        let emp = store.create_employee(emp).unwrap();

        // 09:30 is late against the default 08:00 start but early for 10:00
        let record = clock(&store, emp.id, ClockAction::In, "2026-03-02 09:30").unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
    }

    fn night_shift_employee(store: &Store) -> Uuid {
        let mut night = schedule("Night");
        night.time_in = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
        night.time_out = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
        let night = store.create_schedule(night).unwrap();
        let mut emp = employee("EMP-N");
        emp.schedule_id = Some(night.id);
        store.create_employee(emp).unwrap().id
    }

    #[test]
    fn test_overnight_clock_out_uses_previous_day() {
        let store = Store::in_memory();
        let emp = night_shift_employee(&store);

        clock(&store, emp, ClockAction::In, "2026-03-02 22:00").unwrap();
        let out = clock(&store, emp, ClockAction::Out, "2026-03-03 06:00").unwrap();

        assert_eq!(out.date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert!(out.time_out.is_some());
        assert_eq!(out.undertime_minutes, 60);
        assert_eq!(store.list_attendance(&AttendanceFilter::default()).len(), 1);
    }

    #[test]
    fn test_overnight_overtime_clock_out_after_scheduled_end() {
        let store = Store::in_memory();
        let emp = night_shift_employee(&store);

        clock(&store, emp, ClockAction::In, "2026-03-02 22:00").unwrap();
        let out = clock(&store, emp, ClockAction::Out, "2026-03-03 08:00").unwrap();

        assert_eq!(out.date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(out.overtime_minutes, 60);
        assert_eq!(out.undertime_minutes, 0);
    }

    #[test]
    fn test_overnight_fallback_closes_after_window() {
        let store = Store::in_memory();
        let emp = night_shift_employee(&store);

        clock(&store, emp, ClockAction::In, "2026-03-02 22:00").unwrap();
        // Scheduled end 07:00 plus the window is 19:00
        let late_out = clock(&store, emp, ClockAction::Out, "2026-03-03 20:00");

        assert!(matches!(late_out, Err(HrError::InvalidTransition { .. })));
    }

    #[test]
    fn test_night_shift_late_in_after_midnight() {
        let store = Store::in_memory();
        let emp = night_shift_employee(&store);

        let record = clock(&store, emp, ClockAction::In, "2026-03-03 00:30").unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(record.late_minutes, 150);
        assert_eq!(record.status, AttendanceStatus::Late);

        let out = clock(&store, emp, ClockAction::Out, "2026-03-03 07:00").unwrap();
        assert_eq!(out.date, record.date);
        assert_eq!(out.undertime_minutes, 0);
        assert_eq!(out.overtime_minutes, 0);
        assert_eq!(store.list_attendance(&AttendanceFilter::default()).len(), 1);
    }

    #[test]
    fn test_night_shift_break_across_midnight() {
        let store = Store::in_memory();
        let emp = night_shift_employee(&store);

        clock(&store, emp, ClockAction::In, "2026-03-02 22:00").unwrap();
        clock(&store, emp, ClockAction::BreakOut, "2026-03-02 23:45").unwrap();
        let back = clock(&store, emp, ClockAction::BreakIn, "2026-03-03 00:45").unwrap();
        assert_eq!(back.date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(back.clock_state(), ClockState::BreakDone);

        let out = clock(&store, emp, ClockAction::Out, "2026-03-03 07:00").unwrap();
        assert_eq!(out.break_minutes, 60);
        assert_eq!(out.worked_minutes, 480);
        assert_eq!(out.undertime_minutes, 0);
    }

    #[test]
    fn test_day_shift_forgotten_clock_out_not_carried_over() {
        let store = Store::in_memory();
        let emp = store.create_employee(employee("EMP-1")).unwrap();

        clock(&store, emp.id, ClockAction::In, "2026-03-02 08:00").unwrap();
        for action in [ClockAction::Out, ClockAction::BreakOut, ClockAction::BreakIn] {
            let next_day = clock(&store, emp.id, action, "2026-03-03 17:00");
            assert!(matches!(next_day, Err(HrError::InvalidTransition { .. })));
        }

        let monday = store.list_attendance(&AttendanceFilter::default());
        assert_eq!(monday.len(), 1);
        assert!(monday[0].time_out.is_none());
        assert_eq!(monday[0].overtime_minutes, 0);

        // Tuesday starts a fresh record
        let tuesday = clock(&store, emp.id, ClockAction::In, "2026-03-03 08:00").unwrap();
        assert_eq!(tuesday.date, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
    }

    #[test]
    fn test_inactive_and_unknown_employees_rejected() {
        let store = Store::in_memory();
        let emp = store.create_employee(employee("EMP-1")).unwrap();
        store.deactivate_employee(emp.id).unwrap();

        assert!(matches!(
            clock(&store, emp.id, ClockAction::In, "2026-03-02 08:00"),
            Err(HrError::Validation { .. })
        ));
        assert!(matches!(
            clock(&store, Uuid::new_v4(), ClockAction::In, "2026-03-02 08:00"),
            Err(HrError::NotFound { .. })
        ));
    }

    #[test]
    fn test_attendance_filters() {
        let store = Store::in_memory();
        let ops = store.create_department(department("Ops")).unwrap();
        let mut a = employee("EMP-1");
        a.department_id = Some(ops.id);
        let a = store.create_employee(a).unwrap();
        let b = store.create_employee(employee("EMP-2")).unwrap();

        for day in ["2026-03-02", "2026-03-03", "2026-03-04"] {
            clock(&store, a.id, ClockAction::In, &format!("{} 08:00", day)).unwrap();
            clock(&store, b.id, ClockAction::In, &format!("{} 08:00", day)).unwrap();
        }

        let only_a = store.list_attendance(&AttendanceFilter {
            employee_id: Some(a.id),
            ..Default::default()
        });
        assert_eq!(only_a.len(), 3);

        let ops_range = store.list_attendance(&AttendanceFilter {
            department_id: Some(ops.id),
            from: NaiveDate::from_ymd_opt(2026, 3, 3),
            to: NaiveDate::from_ymd_opt(2026, 3, 3),
            ..Default::default()
        });
        assert_eq!(ops_range.len(), 1);
        assert_eq!(ops_range[0].employee_id, a.id);
    }

    #[test]
    fn test_holiday_dates_unique() {
        let store = Store::in_memory();
        let holiday = |name: &str| Holiday {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 6, 12).unwrap(),
            name: name.to_string(),
            kind: HolidayKind::Regular,
        };
        let first = store.create_holiday(holiday("Independence Day")).unwrap();

        assert!(matches!(
            store.create_holiday(holiday("Duplicate")),
            Err(HrError::Duplicate { .. })
        ));

        store.delete_holiday(first.id).unwrap();
        assert!(store.list_holidays(None, None).is_empty());
    }
}
