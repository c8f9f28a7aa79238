//! Benefit and benefit enrollment models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a benefit affects pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitKind {
    /// Paid to the employee on top of basic pay (e.g. rice allowance).
    Allowance,
    /// Deducted from the employee as their share (e.g. HMO premium).
    Contribution,
}

/// A benefit employees can be enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benefit {
    /// Internal identifier.
    pub id: Uuid,
    /// Benefit name, unique ignoring case.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Allowance or contribution.
    pub kind: BenefitKind,
    /// Default monthly amount.
    pub amount: Decimal,
    /// Whether an allowance counts towards taxable income.
    pub taxable: bool,
    /// Inactive benefits accept no new enrollments and are skipped in payroll.
    pub active: bool,
}

/// An employee's enrollment in a benefit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitEnrollment {
    /// Internal identifier.
    pub id: Uuid,
    /// Enrolled employee.
    pub employee_id: Uuid,
    /// Benefit enrolled in.
    pub benefit_id: Uuid,
    /// Date the enrollment takes effect.
    pub enrolled_on: NaiveDate,
    /// Monthly amount overriding the benefit default.
    #[serde(default)]
    pub amount_override: Option<Decimal>,
}

impl BenefitEnrollment {
    /// Monthly amount for this enrollment.
    pub fn monthly_amount(&self, benefit: &Benefit) -> Decimal {
        self.amount_override.unwrap_or(benefit.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins_over_default() {
        let benefit = Benefit {
            id: Uuid::new_v4(),
            name: "Rice".to_string(),
            description: None,
            kind: BenefitKind::Allowance,
            amount: Decimal::new(2000, 0),
            taxable: false,
            active: true,
        };
        let mut enrollment = BenefitEnrollment {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            benefit_id: benefit.id,
            enrolled_on: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            amount_override: None,
        };
        assert_eq!(enrollment.monthly_amount(&benefit), Decimal::new(2000, 0));

        enrollment.amount_override = Some(Decimal::new(1500, 0));
        assert_eq!(enrollment.monthly_amount(&benefit), Decimal::new(1500, 0));
    }
}
