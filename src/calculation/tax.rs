//! Progressive withholding tax calculation.
//!
//! The tax table is annual. Period income is annualized by the pay
//! frequency, taxed against the table, and the annual tax is spread back
//! over the periods of the year.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::TaxBracket;
use crate::models::{AuditStep, PayFrequency};

use super::salary::round_money;

/// The result of a withholding tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingTaxResult {
    /// Taxable income for the period, floored at zero.
    pub taxable_income: Decimal,
    /// Period income times periods per year.
    pub annualized_income: Decimal,
    /// Tax on the annualized income.
    pub annual_tax: Decimal,
    /// Tax withheld this period.
    pub period_tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the annual tax on an annual taxable income.
///
/// `brackets` must be sorted ascending by `over` (the config loader does
/// this). The applicable bracket is the highest one whose `over` the income
/// exceeds.
///
/// # Examples
///
/// ```
/// use hr_payroll::calculation::annual_tax;
/// use hr_payroll::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("./config/hrms").unwrap();
/// let brackets = &config.payroll().tax.brackets;
///
/// assert_eq!(annual_tax(Decimal::new(250_000, 0), brackets), Decimal::ZERO);
/// assert_eq!(annual_tax(Decimal::new(400_000, 0), brackets), Decimal::new(22_500, 0));
/// ```
pub fn annual_tax(annual_income: Decimal, brackets: &[TaxBracket]) -> Decimal {
    if annual_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    match brackets.iter().rev().find(|b| annual_income > b.over) {
        Some(bracket) => bracket.base_tax + (annual_income - bracket.over) * bracket.rate,
        None => Decimal::ZERO,
    }
}

/// Computes the withholding tax for one payroll period.
///
/// # Arguments
///
/// * `taxable_income` - Taxable income for the period (after statutory contributions)
/// * `frequency` - The period's pay frequency
/// * `brackets` - The annual tax table, sorted ascending
/// * `step_number` - The step number for audit trail sequencing
pub fn calculate_withholding_tax(
    taxable_income: Decimal,
    frequency: PayFrequency,
    brackets: &[TaxBracket],
    step_number: u32,
) -> WithholdingTaxResult {
    let taxable_income = taxable_income.max(Decimal::ZERO);
    let periods_per_year = frequency.periods_per_year();
    let annualized_income = taxable_income * periods_per_year;
    let annual = annual_tax(annualized_income, brackets);
    let period_tax = round_money(annual / periods_per_year);

    let reasoning = if period_tax.is_zero() {
        format!(
            "Annualized income {} falls in the zero-rated bracket",
            annualized_income.normalize()
        )
    } else {
        format!(
            "Annualized income {} taxed {} per year, {} over {} periods",
            annualized_income.normalize(),
            annual.normalize(),
            period_tax,
            periods_per_year
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "withholding_tax".to_string(),
        rule_name: "Withholding Tax".to_string(),
        input: serde_json::json!({
            "taxable_income": taxable_income.to_string(),
            "periods_per_year": periods_per_year.to_string()
        }),
        output: serde_json::json!({
            "annualized_income": annualized_income.to_string(),
            "annual_tax": annual.to_string(),
            "period_tax": period_tax.to_string()
        }),
        reasoning,
    };

    WithholdingTaxResult {
        taxable_income,
        annualized_income,
        annual_tax: annual,
        period_tax,
        audit_step,
    }
}
