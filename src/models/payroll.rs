//! Payroll period and payroll item models.
//!
//! This module contains the [`PayrollPeriod`] date range payroll is computed
//! over and the per-employee [`PayrollItem`] (payslip) produced when a period
//! is processed, together with the [`AuditStep`] trace that explains it.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How often the period recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// Once a month.
    Monthly,
    /// Twice a month.
    SemiMonthly,
}

impl PayFrequency {
    /// Number of periods in one month.
    pub fn periods_per_month(self) -> Decimal {
        match self {
            PayFrequency::Monthly => Decimal::ONE,
            PayFrequency::SemiMonthly => Decimal::TWO,
        }
    }

    /// Number of periods in one year.
    pub fn periods_per_year(self) -> Decimal {
        self.periods_per_month() * Decimal::new(12, 0)
    }
}

/// Lifecycle of a payroll period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// Created, not yet processed.
    Open,
    /// Items generated; may be reprocessed.
    Processed,
    /// Final; no further changes.
    Closed,
}

/// A date range over which payroll is computed and closed.
///
/// # Example
///
/// ```
/// use hr_payroll::models::{PayFrequency, PayrollPeriod, PeriodStatus};
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let period = PayrollPeriod {
///     id: Uuid::new_v4(),
///     name: "March 2026 A".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
///     pay_date: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
///     frequency: PayFrequency::SemiMonthly,
///     status: PeriodStatus::Open,
///     processed_at: None,
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// Internal identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Date the payroll is released.
    pub pay_date: NaiveDate,
    /// Pay frequency.
    pub frequency: PayFrequency,
    /// Lifecycle status.
    pub status: PeriodStatus,
    /// When items were last generated.
    #[serde(default)]
    pub processed_at: Option<NaiveDateTime>,
}

impl PayrollPeriod {
    /// Checks if a date falls within the period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Checks if two inclusive ranges share at least one day.
    pub fn overlaps(&self, start_date: NaiveDate, end_date: NaiveDate) -> bool {
        self.start_date <= end_date && start_date <= self.end_date
    }

    /// Iterates every date in the period.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }

    /// Returns true once the period can no longer change.
    pub fn is_closed(&self) -> bool {
        self.status == PeriodStatus::Closed
    }
}

/// A single step in a payroll computation trace.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// One employee's computed pay for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollItem {
    /// Internal identifier.
    pub id: Uuid,
    /// Period this item belongs to.
    pub period_id: Uuid,
    /// Employee paid.
    pub employee_id: Uuid,
    /// Monthly rate the item was computed from.
    pub monthly_rate: Decimal,
    /// Basic pay for the period.
    pub basic_pay: Decimal,
    /// Overtime pay.
    pub overtime_pay: Decimal,
    /// Holiday premium pay.
    pub holiday_pay: Decimal,
    /// Allowances from enrolled benefits.
    pub allowances: Decimal,
    /// Gross pay after attendance deductions.
    pub gross_pay: Decimal,
    /// Deduction for late minutes.
    pub late_deduction: Decimal,
    /// Deduction for undertime minutes.
    pub undertime_deduction: Decimal,
    /// Deduction for absent days.
    pub absence_deduction: Decimal,
    /// SSS employee share.
    pub sss: Decimal,
    /// PhilHealth employee share.
    pub philhealth: Decimal,
    /// Pag-IBIG employee share.
    pub pagibig: Decimal,
    /// Taxable income for the period.
    pub taxable_income: Decimal,
    /// Withholding tax.
    pub withholding_tax: Decimal,
    /// Employee contributions to enrolled benefits.
    pub benefit_deductions: Decimal,
    /// Configured deduction types.
    pub other_deductions: Decimal,
    /// Sum of all deductions from gross.
    pub total_deductions: Decimal,
    /// Take-home pay.
    pub net_pay: Decimal,
    /// Scheduled days without attendance.
    pub days_absent: u32,
    /// Total late minutes.
    pub late_minutes: i64,
    /// Total undertime minutes.
    pub undertime_minutes: i64,
    /// Total overtime minutes.
    pub overtime_minutes: i64,
    /// Trace of every rule applied.
    pub trace: Vec<AuditStep>,
}
