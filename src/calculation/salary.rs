//! Salary rate derivation.
//!
//! This module resolves an employee's monthly rate (fixed or from a salary
//! grade step) and derives the daily, hourly and per-minute rates used by
//! the attendance deductions and overtime pay.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::PayrollConfig;
use crate::error::{HrError, HrResult};
use crate::models::{Employee, SalaryGrade, SalarySource};

/// An employee's rates derived from the monthly rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBreakdown {
    /// Monthly rate.
    pub monthly: Decimal,
    /// Monthly rate over working days per month.
    pub daily: Decimal,
    /// Daily rate over hours per day.
    pub hourly: Decimal,
    /// Hourly rate over 60.
    pub per_minute: Decimal,
}

/// Rounds a money amount to centavos, midpoint away from zero.
///
/// # Examples
///
/// ```
/// use hr_payroll::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("10.005").unwrap()), Decimal::from_str("10.01").unwrap());
/// assert_eq!(round_money(Decimal::from_str("10.004").unwrap()), Decimal::from_str("10.00").unwrap());
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Resolves an employee's monthly rate.
///
/// # Errors
///
/// Returns [`HrError::NotFound`] if the referenced grade does not exist and
/// [`HrError::Validation`] if the step is outside the grade.
pub fn monthly_rate(employee: &Employee, grades: &[SalaryGrade]) -> HrResult<Decimal> {
    match &employee.salary {
        SalarySource::Monthly { amount } => Ok(*amount),
        SalarySource::Grade { grade, step } => {
            let salary_grade = grades
                .iter()
                .find(|g| g.grade == *grade)
                .ok_or_else(|| HrError::not_found("salary grade", grade))?;

            salary_grade.monthly_for_step(*step).ok_or_else(|| {
                HrError::validation(
                    "salary.step",
                    format!(
                        "step {} is outside grade {} (1..={})",
                        step,
                        grade,
                        salary_grade.steps.len()
                    ),
                )
            })
        }
    }
}

/// Derives daily, hourly and per-minute rates from a monthly rate.
///
/// Intermediate rates are kept unrounded; rounding happens on the amounts
/// they produce.
///
/// # Examples
///
/// ```
/// use hr_payroll::calculation::rate_breakdown;
/// use hr_payroll::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("./config/hrms").unwrap();
/// let rates = rate_breakdown(Decimal::new(22000, 0), config.payroll());
/// assert_eq!(rates.daily, Decimal::new(1000, 0));
/// assert_eq!(rates.hourly, Decimal::new(125, 0));
/// ```
pub fn rate_breakdown(monthly: Decimal, config: &PayrollConfig) -> RateBreakdown {
    let daily = monthly / config.working_days_per_month;
    let hourly = daily / config.hours_per_day;
    let per_minute = hourly / Decimal::new(60, 0);

    RateBreakdown {
        monthly,
        daily,
        hourly,
        per_minute,
    }
}
