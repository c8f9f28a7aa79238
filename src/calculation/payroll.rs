//! Payroll item computation.
//!
//! This module orchestrates the rate, attendance, contribution and tax rules
//! into a single [`PayrollItem`] for one employee and one period. Every rule
//! appends an [`AuditStep`] so a payslip can be explained line by line.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::PayrollConfig;
use crate::models::{
    Attendance, AuditStep, Benefit, BenefitEnrollment, BenefitKind, DeductionMethod,
    DeductionType, Employee, Holiday, HolidayKind, PayrollItem, PayrollPeriod, Schedule,
};

use super::contributions::calculate_contributions;
use super::salary::{rate_breakdown, round_money};
use super::tax::calculate_withholding_tax;

/// Everything needed to compute one employee's pay for one period.
#[derive(Debug, Clone)]
pub struct PayrollInput<'a> {
    /// The period being processed.
    pub period: &'a PayrollPeriod,
    /// The employee being paid.
    pub employee: &'a Employee,
    /// The employee's resolved monthly rate.
    pub monthly_rate: Decimal,
    /// The employee's schedule (or the default schedule).
    pub schedule: &'a Schedule,
    /// The employee's attendance records; records outside the period are ignored.
    pub attendance: &'a [Attendance],
    /// Holidays; those outside the period are ignored.
    pub holidays: &'a [Holiday],
    /// The employee's enrollments paired with their benefits.
    pub benefits: &'a [(BenefitEnrollment, Benefit)],
    /// All deduction types; inactive ones are skipped.
    pub deduction_types: &'a [DeductionType],
    /// Local date of processing. Days after it are never counted absent.
    pub today: NaiveDate,
}

struct Trace {
    steps: Vec<AuditStep>,
}

impl Trace {
    fn new() -> Self {
        Self { steps: Vec::new() }
    }

    fn next_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }

    fn push(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.next_number();
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning,
        });
    }
}

/// Computes a payroll item for one employee and one period.
///
/// # Arguments
///
/// * `input` - The employee, period and the records that feed the computation
/// * `config` - Payroll rules
///
/// # Returns
///
/// A [`PayrollItem`] with a fresh id and the full audit trace.
///
/// # Example
///
/// ```
/// use hr_payroll::calculation::{compute_payroll_item, PayrollInput};
/// use hr_payroll::config::ConfigLoader;
/// use hr_payroll::models::*;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let config = ConfigLoader::load("./config/hrms").unwrap();
/// let schedule = config.app().attendance.default_schedule.to_schedule();
/// let employee = Employee {
///     id: Uuid::new_v4(),
///     employee_no: "EMP-0001".to_string(),
///     first_name: "Maria".to_string(),
///     last_name: "Santos".to_string(),
///     email: "maria@example.com".to_string(),
///     department_id: None,
///     schedule_id: None,
///     position: "Clerk".to_string(),
///     employment_status: EmploymentStatus::Regular,
///     salary: SalarySource::Monthly { amount: Decimal::new(22000, 0) },
///     hired_on: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
///     active: true,
/// };
/// let period = PayrollPeriod {
///     id: Uuid::new_v4(),
///     name: "March 2026".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
///     pay_date: NaiveDate::from_ymd_opt(2026, 4, 5).unwrap(),
///     frequency: PayFrequency::Monthly,
///     status: PeriodStatus::Open,
///     processed_at: None,
/// };
///
/// let item = compute_payroll_item(
///     &PayrollInput {
///         period: &period,
///         employee: &employee,
///         monthly_rate: Decimal::new(22000, 0),
///         schedule: &schedule,
///         attendance: &[],
///         holidays: &[],
///         benefits: &[],
///         deduction_types: &[],
///         today: NaiveDate::from_ymd_opt(2026, 4, 5).unwrap(),
///     },
///     config.payroll(),
/// );
///
/// // Hired after the period: no absences are charged
/// assert_eq!(item.days_absent, 0);
/// assert_eq!(item.basic_pay, Decimal::new(22000, 0));
/// ```
pub fn compute_payroll_item(input: &PayrollInput<'_>, config: &PayrollConfig) -> PayrollItem {
    let period = input.period;
    let employee = input.employee;
    let frequency = period.frequency;
    let per_month = frequency.periods_per_month();
    let rates = rate_breakdown(input.monthly_rate, config);
    let mut trace = Trace::new();

    let attendance: HashMap<NaiveDate, &Attendance> = input
        .attendance
        .iter()
        .filter(|a| a.employee_id == employee.id && period.contains_date(a.date))
        .map(|a| (a.date, a))
        .collect();
    let holidays: HashMap<NaiveDate, &Holiday> = input
        .holidays
        .iter()
        .filter(|h| period.contains_date(h.date))
        .map(|h| (h.date, h))
        .collect();

    // Step: basic pay
    let basic_pay = round_money(rates.monthly / per_month);
    trace.push(
        "basic_pay",
        "Basic Pay",
        serde_json::json!({
            "monthly_rate": rates.monthly.to_string(),
            "periods_per_month": per_month.to_string()
        }),
        serde_json::json!({
            "basic_pay": basic_pay.to_string(),
            "daily_rate": round_money(rates.daily).to_string(),
            "hourly_rate": round_money(rates.hourly).to_string()
        }),
        format!(
            "Monthly rate {} over {} period(s)",
            rates.monthly.normalize(),
            per_month
        ),
    );

    // Step: absences
    let absent_dates: Vec<NaiveDate> = period
        .dates()
        .filter(|d| *d <= input.today)
        .filter(|d| employee.is_employed_on(*d))
        .filter(|d| input.schedule.is_work_day(*d))
        .filter(|d| !holidays.contains_key(d))
        .filter(|d| !attendance.contains_key(d))
        .collect();
    let days_absent = absent_dates.len() as u32;
    let absence_deduction = round_money(Decimal::from(days_absent) * rates.daily);
    trace.push(
        "absence_deduction",
        "Absence Deduction",
        serde_json::json!({
            "absent_dates": absent_dates.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            "daily_rate": rates.daily.to_string()
        }),
        serde_json::json!({
            "days_absent": days_absent,
            "absence_deduction": absence_deduction.to_string()
        }),
        if days_absent == 0 {
            "No scheduled work day without attendance".to_string()
        } else {
            format!(
                "{} scheduled work day(s) without attendance at the daily rate",
                days_absent
            )
        },
    );

    // Step: late and undertime
    let late_minutes: i64 = attendance.values().map(|a| a.late_minutes).sum();
    let undertime_minutes: i64 = attendance.values().map(|a| a.undertime_minutes).sum();
    let late_deduction = round_money(Decimal::from(late_minutes) * rates.per_minute);
    let undertime_deduction = round_money(Decimal::from(undertime_minutes) * rates.per_minute);
    trace.push(
        "tardiness_deduction",
        "Late and Undertime Deduction",
        serde_json::json!({
            "late_minutes": late_minutes,
            "undertime_minutes": undertime_minutes,
            "per_minute_rate": rates.per_minute.to_string()
        }),
        serde_json::json!({
            "late_deduction": late_deduction.to_string(),
            "undertime_deduction": undertime_deduction.to_string()
        }),
        format!(
            "{} late and {} undertime minute(s) at the per-minute rate",
            late_minutes, undertime_minutes
        ),
    );

    // Step: overtime
    let overtime_minutes: i64 = attendance.values().map(|a| a.overtime_minutes).sum();
    let overtime_pay = round_money(
        Decimal::from(overtime_minutes) * rates.per_minute * config.overtime_multiplier,
    );
    trace.push(
        "overtime_pay",
        "Overtime Pay",
        serde_json::json!({
            "overtime_minutes": overtime_minutes,
            "per_minute_rate": rates.per_minute.to_string(),
            "multiplier": config.overtime_multiplier.to_string()
        }),
        serde_json::json!({
            "overtime_pay": overtime_pay.to_string()
        }),
        format!(
            "{} overtime minute(s) at {}x",
            overtime_minutes,
            config.overtime_multiplier.normalize()
        ),
    );

    // Step: holiday premium
    let mut holiday_premium = Decimal::ZERO;
    let mut holidays_worked = Vec::new();
    for (date, holiday) in &holidays {
        if !attendance.contains_key(date) {
            continue;
        }
        let multiplier = match holiday.kind {
            HolidayKind::Regular => config.regular_holiday_multiplier,
            HolidayKind::SpecialNonWorking => config.special_holiday_multiplier,
        };
        holiday_premium += rates.daily * (multiplier - Decimal::ONE);
        holidays_worked.push(date.to_string());
    }
    holidays_worked.sort();
    let holiday_pay = round_money(holiday_premium);
    trace.push(
        "holiday_pay",
        "Holiday Premium",
        serde_json::json!({
            "holidays_worked": holidays_worked,
            "daily_rate": rates.daily.to_string()
        }),
        serde_json::json!({
            "holiday_pay": holiday_pay.to_string()
        }),
        format!("Worked {} holiday(s) in the period", holidays_worked.len()),
    );

    // Step: allowances
    let enrolled: Vec<&(BenefitEnrollment, Benefit)> = input
        .benefits
        .iter()
        .filter(|(e, b)| b.active && e.employee_id == employee.id && e.enrolled_on <= period.end_date)
        .collect();
    let mut allowances = Decimal::ZERO;
    let mut non_taxable_allowances = Decimal::ZERO;
    for (enrollment, benefit) in enrolled.iter().copied() {
        if benefit.kind != BenefitKind::Allowance {
            continue;
        }
        let amount = round_money(enrollment.monthly_amount(benefit) / per_month);
        allowances += amount;
        if !benefit.taxable {
            non_taxable_allowances += amount;
        }
    }
    trace.push(
        "allowances",
        "Allowances",
        serde_json::json!({
            "enrolled_benefits": enrolled.len(),
            "periods_per_month": per_month.to_string()
        }),
        serde_json::json!({
            "allowances": allowances.to_string(),
            "non_taxable": non_taxable_allowances.to_string()
        }),
        format!("Allowances of {} this period", allowances),
    );

    // Step: gross pay
    let gross_raw = basic_pay + overtime_pay + holiday_pay + allowances
        - late_deduction
        - undertime_deduction
        - absence_deduction;
    let gross_pay = gross_raw.max(Decimal::ZERO);
    trace.push(
        "gross_pay",
        "Gross Pay",
        serde_json::json!({
            "basic_pay": basic_pay.to_string(),
            "overtime_pay": overtime_pay.to_string(),
            "holiday_pay": holiday_pay.to_string(),
            "allowances": allowances.to_string(),
            "late_deduction": late_deduction.to_string(),
            "undertime_deduction": undertime_deduction.to_string(),
            "absence_deduction": absence_deduction.to_string()
        }),
        serde_json::json!({
            "gross_pay": gross_pay.to_string()
        }),
        if gross_raw < Decimal::ZERO {
            format!("Attendance deductions exceed earnings ({}); floored at 0", gross_raw)
        } else {
            "Earnings less attendance deductions".to_string()
        },
    );

    // Steps: statutory contributions
    let contributions =
        calculate_contributions(rates.monthly, frequency, config, trace.next_number());
    trace.steps.extend(contributions.audit_steps.iter().cloned());

    // Step: benefit contributions
    let benefit_deductions: Decimal = enrolled
        .iter()
        .filter(|(_, b)| b.kind == BenefitKind::Contribution)
        .map(|(e, b)| round_money(e.monthly_amount(b) / per_month))
        .sum();
    trace.push(
        "benefit_deductions",
        "Benefit Contributions",
        serde_json::json!({
            "periods_per_month": per_month.to_string()
        }),
        serde_json::json!({
            "benefit_deductions": benefit_deductions.to_string()
        }),
        "Employee share of enrolled contribution benefits".to_string(),
    );

    // Step: configured deductions
    let mut other_deductions = Decimal::ZERO;
    let mut applied = Vec::new();
    for deduction in input.deduction_types.iter().filter(|d| d.active) {
        let amount = match &deduction.method {
            DeductionMethod::Fixed { amount } => round_money(*amount / per_month),
            DeductionMethod::Percentage { rate } => round_money(basic_pay * *rate),
        };
        other_deductions += amount;
        applied.push(serde_json::json!({
            "name": deduction.name,
            "amount": amount.to_string()
        }));
    }
    trace.push(
        "other_deductions",
        "Other Deductions",
        serde_json::json!({
            "deductions": applied
        }),
        serde_json::json!({
            "other_deductions": other_deductions.to_string()
        }),
        format!("{} active deduction type(s)", applied.len()),
    );

    // Step: withholding tax
    let taxable_income =
        gross_pay - non_taxable_allowances - contributions.employee_total();
    let tax = calculate_withholding_tax(
        taxable_income,
        frequency,
        &config.tax.brackets,
        trace.next_number(),
    );
    trace.steps.push(tax.audit_step.clone());

    // Step: net pay
    let total_deductions = contributions.employee_total()
        + tax.period_tax
        + benefit_deductions
        + other_deductions;
    let net_pay = gross_pay - total_deductions;
    trace.push(
        "net_pay",
        "Net Pay",
        serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "total_deductions": total_deductions.to_string()
        }),
        serde_json::json!({
            "net_pay": net_pay.to_string()
        }),
        format!("Gross {} less deductions {}", gross_pay, total_deductions),
    );

    PayrollItem {
        id: Uuid::new_v4(),
        period_id: period.id,
        employee_id: employee.id,
        monthly_rate: rates.monthly,
        basic_pay,
        overtime_pay,
        holiday_pay,
        allowances,
        gross_pay,
        late_deduction,
        undertime_deduction,
        absence_deduction,
        sss: contributions.sss,
        philhealth: contributions.philhealth,
        pagibig: contributions.pagibig,
        taxable_income: tax.taxable_income,
        withholding_tax: tax.period_tax,
        benefit_deductions,
        other_deductions,
        total_deductions,
        net_pay,
        days_absent,
        late_minutes,
        undertime_minutes,
        overtime_minutes,
        trace: trace.steps,
    }
}
