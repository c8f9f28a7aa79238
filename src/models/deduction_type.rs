//! Deduction type model.
//!
//! Active deduction types apply to every employee when a payroll period is
//! processed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the deduction amount is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeductionMethod {
    /// A fixed monthly amount.
    Fixed {
        /// Monthly amount.
        amount: Decimal,
    },
    /// A fraction of the period's basic pay.
    Percentage {
        /// Rate between 0 and 1.
        rate: Decimal,
    },
}

/// A configurable payroll deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionType {
    /// Internal identifier.
    pub id: Uuid,
    /// Name, unique ignoring case.
    pub name: String,
    /// Amount derivation.
    pub method: DeductionMethod,
    /// Only active types are deducted.
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_percentage_method() {
        let json = r#"{"type": "percentage", "rate": "0.02"}"#;
        let method: DeductionMethod = serde_json::from_str(json).unwrap();
        assert_eq!(
            method,
            DeductionMethod::Percentage {
                rate: Decimal::new(2, 2)
            }
        );
    }
}
