//! Dashboard aggregation.
//!
//! Pure functions over store snapshots. The caller scopes the inputs (a
//! department head passes only their department's employees); attendance
//! and payroll items for employees outside `employees` are ignored.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    Attendance, ClockState, Department, Employee, Holiday, PayrollItem, PayrollPeriod,
    PeriodStatus, Schedule,
};

use super::attendance::resolve_schedule;

/// Number of days ahead shown in the upcoming holidays list.
pub const UPCOMING_HOLIDAY_DAYS: i64 = 30;

/// Employees in one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentHeadcount {
    /// Department id, `None` for unassigned employees.
    pub department_id: Option<Uuid>,
    /// Department name.
    pub name: String,
    /// Active employees in the department.
    pub active: usize,
}

/// Employee counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headcount {
    /// All employee records.
    pub total: usize,
    /// Active employees.
    pub active: usize,
    /// Active employees per department, sorted by name.
    pub by_department: Vec<DepartmentHeadcount>,
}

/// Today's attendance counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayAttendance {
    /// The local date counted.
    pub date: Option<NaiveDate>,
    /// Active employees expected to work today.
    pub scheduled: usize,
    /// Employees with a record today.
    pub present: usize,
    /// Records with late minutes.
    pub late: usize,
    /// Employees currently on break.
    pub on_break: usize,
    /// Employees who have clocked out.
    pub clocked_out: usize,
    /// Scheduled employees without a record.
    pub absent: usize,
}

/// One day of the attendance trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// The day.
    pub date: NaiveDate,
    /// Employees with a record.
    pub present: usize,
    /// Records with late minutes.
    pub late: usize,
    /// Scheduled employees without a record.
    pub absent: usize,
}

/// Totals for a processed payroll period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Period id.
    pub period_id: Uuid,
    /// Period name.
    pub name: String,
    /// Period status.
    pub status: PeriodStatus,
    /// Number of payroll items.
    pub employees: usize,
    /// Sum of gross pay.
    pub gross_pay: Decimal,
    /// Sum of total deductions.
    pub total_deductions: Decimal,
    /// Sum of net pay.
    pub net_pay: Decimal,
}

/// The complete dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Local time the summary was built.
    pub generated_at: NaiveDateTime,
    /// Employee counts.
    pub headcount: Headcount,
    /// Today's attendance.
    pub today: TodayAttendance,
    /// Totals of the most recent period with payroll items.
    pub latest_period: Option<PeriodTotals>,
    /// Holidays in the coming days.
    pub upcoming_holidays: Vec<Holiday>,
}

/// Snapshot of the records the dashboard aggregates.
#[derive(Debug, Clone)]
pub struct DashboardInput<'a> {
    /// Employees in scope.
    pub employees: &'a [Employee],
    /// All departments.
    pub departments: &'a [Department],
    /// All schedules.
    pub schedules: &'a [Schedule],
    /// Schedule for employees without one.
    pub default_schedule: &'a Schedule,
    /// Attendance records covering at least the trend window.
    pub attendance: &'a [Attendance],
    /// All holidays.
    pub holidays: &'a [Holiday],
    /// All payroll periods.
    pub periods: &'a [PayrollPeriod],
    /// Payroll items of all periods.
    pub items: &'a [PayrollItem],
    /// Current local time.
    pub now: NaiveDateTime,
}

/// Counts employees overall and per department.
pub fn headcount(employees: &[Employee], departments: &[Department]) -> Headcount {
    let mut per_department: HashMap<Option<Uuid>, usize> = HashMap::new();
    for employee in employees.iter().filter(|e| e.active) {
        *per_department.entry(employee.department_id).or_default() += 1;
    }

    let mut by_department: Vec<DepartmentHeadcount> = per_department
        .into_iter()
        .map(|(department_id, active)| {
            let name = department_id
                .and_then(|id| departments.iter().find(|d| d.id == id))
                .map(|d| d.name.clone())
                .unwrap_or_else(|| "Unassigned".to_string());
            DepartmentHeadcount {
                department_id,
                name,
                active,
            }
        })
        .collect();
    by_department.sort_by(|a, b| a.name.cmp(&b.name));

    Headcount {
        total: employees.len(),
        active: employees.iter().filter(|e| e.active).count(),
        by_department,
    }
}

fn expected_on(
    employee: &Employee,
    date: NaiveDate,
    schedules: &[Schedule],
    default_schedule: &Schedule,
    holiday_dates: &HashSet<NaiveDate>,
) -> bool {
    employee.active
        && employee.is_employed_on(date)
        && !holiday_dates.contains(&date)
        && resolve_schedule(employee, schedules, default_schedule).is_work_day(date)
}

/// Counts attendance for one day.
pub fn attendance_on(input: &DashboardInput<'_>, date: NaiveDate) -> TodayAttendance {
    let holiday_dates: HashSet<NaiveDate> = input.holidays.iter().map(|h| h.date).collect();
    let in_scope: HashSet<Uuid> = input.employees.iter().map(|e| e.id).collect();
    let records: HashMap<Uuid, &Attendance> = input
        .attendance
        .iter()
        .filter(|a| a.date == date && in_scope.contains(&a.employee_id))
        .map(|a| (a.employee_id, a))
        .collect();

    let expected: Vec<&Employee> = input
        .employees
        .iter()
        .filter(|e| {
            expected_on(
                e,
                date,
                input.schedules,
                input.default_schedule,
                &holiday_dates,
            )
        })
        .collect();

    TodayAttendance {
        date: Some(date),
        scheduled: expected.len(),
        present: records.len(),
        late: records.values().filter(|a| a.late_minutes > 0).count(),
        on_break: records
            .values()
            .filter(|a| a.clock_state() == ClockState::OnBreak)
            .count(),
        clocked_out: records
            .values()
            .filter(|a| a.clock_state() == ClockState::ClockedOut)
            .count(),
        absent: expected
            .iter()
            .filter(|e| !records.contains_key(&e.id))
            .count(),
    }
}

/// Builds a daily trend for the `days` days ending on `end` (inclusive),
/// oldest first.
///
/// # Example
///
/// ```
/// use hr_payroll::calculation::{attendance_trend, DashboardInput};
/// use hr_payroll::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let config = ConfigLoader::load("./config/hrms").unwrap();
/// let schedule = config.app().attendance.default_schedule.to_schedule();
/// let now = NaiveDate::from_ymd_opt(2026, 3, 6).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let input = DashboardInput {
///     employees: &[],
///     departments: &[],
///     schedules: &[],
///     default_schedule: &schedule,
///     attendance: &[],
///     holidays: &[],
///     periods: &[],
///     items: &[],
///     now,
/// };
///
/// let trend = attendance_trend(&input, now.date(), 7);
/// assert_eq!(trend.len(), 7);
/// assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
/// ```
pub fn attendance_trend(input: &DashboardInput<'_>, end: NaiveDate, days: u32) -> Vec<TrendPoint> {
    (0..days as i64)
        .rev()
        .map(|offset| {
            let date = end - Duration::days(offset);
            let counts = attendance_on(input, date);
            TrendPoint {
                date,
                present: counts.present,
                late: counts.late,
                absent: counts.absent,
            }
        })
        .collect()
}

/// Totals the items of the most recent period that has any.
pub fn latest_period_totals(
    periods: &[PayrollPeriod],
    items: &[PayrollItem],
    employees: &[Employee],
) -> Option<PeriodTotals> {
    let in_scope: HashSet<Uuid> = employees.iter().map(|e| e.id).collect();
    let mut candidates: Vec<&PayrollPeriod> = periods.iter().collect();
    candidates.sort_by(|a, b| b.end_date.cmp(&a.end_date));

    candidates.into_iter().find_map(|period| {
        let period_items: Vec<&PayrollItem> = items
            .iter()
            .filter(|i| i.period_id == period.id && in_scope.contains(&i.employee_id))
            .collect();
        if period_items.is_empty() {
            return None;
        }
        Some(PeriodTotals {
            period_id: period.id,
            name: period.name.clone(),
            status: period.status,
            employees: period_items.len(),
            gross_pay: period_items.iter().map(|i| i.gross_pay).sum(),
            total_deductions: period_items.iter().map(|i| i.total_deductions).sum(),
            net_pay: period_items.iter().map(|i| i.net_pay).sum(),
        })
    })
}

/// Holidays from `today` through the next `days` days, in date order.
pub fn upcoming_holidays(holidays: &[Holiday], today: NaiveDate, days: i64) -> Vec<Holiday> {
    let until = today + Duration::days(days);
    let mut upcoming: Vec<Holiday> = holidays
        .iter()
        .filter(|h| h.date >= today && h.date <= until)
        .cloned()
        .collect();
    upcoming.sort_by_key(|h| h.date);
    upcoming
}

/// Builds the full dashboard summary.
pub fn build_summary(input: &DashboardInput<'_>) -> DashboardSummary {
    let today = input.now.date();
    DashboardSummary {
        generated_at: input.now,
        headcount: headcount(input.employees, input.departments),
        today: attendance_on(input, today),
        latest_period: latest_period_totals(input.periods, input.items, input.employees),
        upcoming_holidays: upcoming_holidays(input.holidays, today, UPCOMING_HOLIDAY_DAYS),
    }
}
