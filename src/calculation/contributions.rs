//! Statutory contribution calculations: SSS, PhilHealth and Pag-IBIG.
//!
//! All three are defined on monthly compensation. The monthly employee
//! share is split evenly across the periods of a month.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::{PagIbigConfig, PayrollConfig, PhilHealthConfig, SssConfig};
use crate::models::{AuditStep, PayFrequency};

use super::salary::round_money;

/// Employee and employer shares for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionsResult {
    /// SSS employee share for the period.
    pub sss: Decimal,
    /// PhilHealth employee share for the period.
    pub philhealth: Decimal,
    /// Pag-IBIG employee share for the period.
    pub pagibig: Decimal,
    /// SSS employer share for the period.
    pub employer_sss: Decimal,
    /// PhilHealth employer share for the period.
    pub employer_philhealth: Decimal,
    /// Pag-IBIG employer share for the period.
    pub employer_pagibig: Decimal,
    /// One audit step per contribution.
    pub audit_steps: Vec<AuditStep>,
}

impl ContributionsResult {
    /// Sum of the employee shares.
    pub fn employee_total(&self) -> Decimal {
        self.sss + self.philhealth + self.pagibig
    }
}

/// Returns the SSS monthly salary credit for a monthly compensation.
///
/// Compensation is rounded to the nearest credit step (half up) and clamped
/// to the configured range.
///
/// # Examples
///
/// ```
/// use hr_payroll::calculation::sss_salary_credit;
/// use hr_payroll::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("./config/hrms").unwrap();
/// let sss = &config.payroll().sss;
///
/// assert_eq!(sss_salary_credit(Decimal::new(5_249, 0), sss), Decimal::new(5_000, 0));
/// assert_eq!(sss_salary_credit(Decimal::new(5_250, 0), sss), Decimal::new(5_500, 0));
/// assert_eq!(sss_salary_credit(Decimal::new(90_000, 0), sss), Decimal::new(35_000, 0));
/// ```
pub fn sss_salary_credit(compensation: Decimal, config: &SssConfig) -> Decimal {
    let steps = (compensation / config.msc_step)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    (steps * config.msc_step).clamp(config.msc_min, config.msc_max)
}

/// SSS monthly employee share.
pub fn sss_employee_share(compensation: Decimal, config: &SssConfig) -> Decimal {
    sss_salary_credit(compensation, config) * config.employee_rate
}

/// PhilHealth monthly employee share.
///
/// The premium is a flat rate on compensation clamped between the floor and
/// ceiling; the employee pays `employee_share` of it.
pub fn philhealth_employee_share(compensation: Decimal, config: &PhilHealthConfig) -> Decimal {
    let base = compensation.clamp(config.floor, config.ceiling);
    base * config.premium_rate * config.employee_share
}

/// Pag-IBIG monthly employee share.
pub fn pagibig_employee_share(compensation: Decimal, config: &PagIbigConfig) -> Decimal {
    let rate = if compensation <= config.threshold {
        config.low_rate
    } else {
        config.high_rate
    };
    compensation.min(config.max_compensation) * rate
}

/// Computes all statutory contributions for one period.
///
/// # Arguments
///
/// * `monthly_compensation` - The employee's monthly rate
/// * `frequency` - The period's pay frequency
/// * `config` - Payroll rules
/// * `step_number` - First step number for the audit trail
///
/// # Examples
///
/// ```
/// use hr_payroll::calculation::calculate_contributions;
/// use hr_payroll::config::ConfigLoader;
/// use hr_payroll::models::PayFrequency;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("./config/hrms").unwrap();
/// let result = calculate_contributions(
///     Decimal::new(30_000, 0),
///     PayFrequency::Monthly,
///     config.payroll(),
///     1,
/// );
/// assert_eq!(result.sss, Decimal::new(1_500, 0));
/// assert_eq!(result.philhealth, Decimal::new(750, 0));
/// assert_eq!(result.pagibig, Decimal::new(200, 0));
/// ```
pub fn calculate_contributions(
    monthly_compensation: Decimal,
    frequency: PayFrequency,
    config: &PayrollConfig,
    step_number: u32,
) -> ContributionsResult {
    let per_month = frequency.periods_per_month();
    let compensation = monthly_compensation.max(Decimal::ZERO);

    let msc = sss_salary_credit(compensation, &config.sss);
    let sss_monthly = msc * config.sss.employee_rate;
    let sss_employer_monthly = msc * config.sss.employer_rate;

    let philhealth_monthly = philhealth_employee_share(compensation, &config.philhealth);
    let philhealth_premium = compensation.clamp(config.philhealth.floor, config.philhealth.ceiling)
        * config.philhealth.premium_rate;

    let pagibig_monthly = pagibig_employee_share(compensation, &config.pagibig);
    let pagibig_employer_monthly =
        compensation.min(config.pagibig.max_compensation) * config.pagibig.employer_rate;

    let sss = round_money(sss_monthly / per_month);
    let philhealth = round_money(philhealth_monthly / per_month);
    let pagibig = round_money(pagibig_monthly / per_month);

    let audit_steps = vec![
        AuditStep {
            step_number,
            rule_id: "sss_contribution".to_string(),
            rule_name: "SSS Contribution".to_string(),
            input: serde_json::json!({
                "monthly_compensation": compensation.to_string(),
                "periods_per_month": per_month.to_string()
            }),
            output: serde_json::json!({
                "salary_credit": msc.to_string(),
                "employee_share": sss.to_string()
            }),
            reasoning: format!(
                "Salary credit {} x {} = {} monthly, {} this period",
                msc.normalize(),
                config.sss.employee_rate.normalize(),
                sss_monthly.normalize(),
                sss
            ),
        },
        AuditStep {
            step_number: step_number + 1,
            rule_id: "philhealth_contribution".to_string(),
            rule_name: "PhilHealth Contribution".to_string(),
            input: serde_json::json!({
                "monthly_compensation": compensation.to_string(),
                "periods_per_month": per_month.to_string()
            }),
            output: serde_json::json!({
                "premium": philhealth_premium.to_string(),
                "employee_share": philhealth.to_string()
            }),
            reasoning: format!(
                "Premium {} split {} to employee, {} this period",
                philhealth_premium.normalize(),
                config.philhealth.employee_share.normalize(),
                philhealth
            ),
        },
        AuditStep {
            step_number: step_number + 2,
            rule_id: "pagibig_contribution".to_string(),
            rule_name: "Pag-IBIG Contribution".to_string(),
            input: serde_json::json!({
                "monthly_compensation": compensation.to_string(),
                "periods_per_month": per_month.to_string()
            }),
            output: serde_json::json!({
                "employee_share": pagibig.to_string()
            }),
            reasoning: format!(
                "Fund salary {} at {} = {} monthly, {} this period",
                compensation.min(config.pagibig.max_compensation).normalize(),
                if compensation <= config.pagibig.threshold {
                    config.pagibig.low_rate.normalize()
                } else {
                    config.pagibig.high_rate.normalize()
                },
                pagibig_monthly.normalize(),
                pagibig
            ),
        },
    ];

    ContributionsResult {
        sss,
        philhealth,
        pagibig,
        employer_sss: round_money(sss_employer_monthly / per_month),
        employer_philhealth: round_money((philhealth_premium - philhealth_monthly) / per_month),
        employer_pagibig: round_money(pagibig_employer_monthly / per_month),
        audit_steps,
    }
}
