//! Calculation logic for the HR/payroll service.
//!
//! This module contains the pure functions behind attendance and payroll:
//! the clock state machine with lateness, undertime and overtime minutes,
//! salary rate derivation, statutory contributions, withholding tax, the
//! payroll item computation with its audit trace, and dashboard aggregation.

mod attendance;
mod contributions;
mod dashboard;
mod payroll;
mod salary;
mod tax;

pub use attendance::{
    ClockOutMetrics, apply_clock_action, clock_out_metrics, late_minutes, resolve_schedule,
};
pub use contributions::{
    ContributionsResult, calculate_contributions, pagibig_employee_share,
    philhealth_employee_share, sss_employee_share, sss_salary_credit,
};
pub use dashboard::{
    DashboardInput, DashboardSummary, DepartmentHeadcount, Headcount, PeriodTotals,
    TodayAttendance, TrendPoint, UPCOMING_HOLIDAY_DAYS, attendance_on, attendance_trend,
    build_summary, headcount, latest_period_totals, upcoming_holidays,
};
pub use payroll::{PayrollInput, compute_payroll_item};
pub use salary::{RateBreakdown, monthly_rate, rate_breakdown, round_money};
pub use tax::{WithholdingTaxResult, annual_tax, calculate_withholding_tax};
