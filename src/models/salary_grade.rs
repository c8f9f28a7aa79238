//! Salary grade model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A salary grade with monthly amounts per step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryGrade {
    /// Internal identifier.
    pub id: Uuid,
    /// Grade number, unique.
    pub grade: u8,
    /// Display name.
    pub name: String,
    /// Monthly amount for step 1, step 2, ...
    pub steps: Vec<Decimal>,
}

impl SalaryGrade {
    /// Monthly amount for a one-based step.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_payroll::models::SalaryGrade;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let grade = SalaryGrade {
    ///     id: Uuid::nil(),
    ///     grade: 1,
    ///     name: "SG-1".to_string(),
    ///     steps: vec![Decimal::new(14000, 0), Decimal::new(14500, 0)],
    /// };
    /// assert_eq!(grade.monthly_for_step(2), Some(Decimal::new(14500, 0)));
    /// assert_eq!(grade.monthly_for_step(0), None);
    /// assert_eq!(grade.monthly_for_step(3), None);
    /// ```
    pub fn monthly_for_step(&self, step: u8) -> Option<Decimal> {
        let index = usize::from(step).checked_sub(1)?;
        self.steps.get(index).copied()
    }
}
