//! Employee model and related types.
//!
//! This module defines the Employee struct together with its employment
//! status and the source of its monthly salary.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the employment arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Permanent employee.
    Regular,
    /// Employee under probation.
    Probationary,
    /// Fixed-term contract.
    Contractual,
}

/// Where an employee's monthly salary comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SalarySource {
    /// A fixed monthly amount.
    Monthly {
        /// Monthly salary.
        amount: Decimal,
    },
    /// A step within a salary grade.
    Grade {
        /// Salary grade number.
        grade: u8,
        /// One-based step within the grade.
        step: u8,
    },
}

/// Represents an employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Internal identifier.
    pub id: Uuid,
    /// Business employee number, unique across the company.
    pub employee_no: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Work email, unique ignoring case.
    pub email: String,
    /// Department the employee belongs to.
    pub department_id: Option<Uuid>,
    /// Assigned work schedule; the configured default applies when absent.
    pub schedule_id: Option<Uuid>,
    /// Job title.
    pub position: String,
    /// Employment arrangement.
    pub employment_status: EmploymentStatus,
    /// Salary source.
    pub salary: SalarySource,
    /// First day of employment.
    pub hired_on: NaiveDate,
    /// Inactive employees are excluded from attendance and payroll.
    pub active: bool,
}

impl Employee {
    /// Returns "First Last".
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_payroll::models::{Employee, EmploymentStatus, SalarySource};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let employee = Employee {
    ///     id: Uuid::new_v4(),
    ///     employee_no: "EMP-0001".to_string(),
    ///     first_name: "Maria".to_string(),
    ///     last_name: "Santos".to_string(),
    ///     email: "maria@example.com".to_string(),
    ///     department_id: None,
    ///     schedule_id: None,
    ///     position: "Accountant".to_string(),
    ///     employment_status: EmploymentStatus::Regular,
    ///     salary: SalarySource::Monthly { amount: Decimal::new(30000, 0) },
    ///     hired_on: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
    ///     active: true,
    /// };
    /// assert_eq!(employee.full_name(), "Maria Santos");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true if the employee had started by `date`.
    pub fn is_employed_on(&self, date: NaiveDate) -> bool {
        self.hired_on <= date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_employee() -> Employee {
        Employee {
            id: Uuid::new_v4(),
            employee_no: "EMP-0001".to_string(),
            first_name: "Juan".to_string(),
            last_name: "Dela Cruz".to_string(),
            email: "juan@example.com".to_string(),
            department_id: None,
            schedule_id: None,
            position: "Clerk".to_string(),
            employment_status: EmploymentStatus::Probationary,
            salary: SalarySource::Grade { grade: 3, step: 2 },
            hired_on: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            active: true,
        }
    }

    #[test]
    fn test_deserialize_monthly_salary() {
        let json = r#"{"type": "monthly", "amount": "25000.00"}"#;
        let salary: SalarySource = serde_json::from_str(json).unwrap();
        assert_eq!(
            salary,
            SalarySource::Monthly {
                amount: Decimal::new(2500000, 2)
            }
        );
    }

    #[test]
    fn test_deserialize_grade_salary() {
        let json = r#"{"type": "grade", "grade": 11, "step": 3}"#;
        let salary: SalarySource = serde_json::from_str(json).unwrap();
        assert_eq!(salary, SalarySource::Grade { grade: 11, step: 3 });
    }

    #[test]
    fn test_employment_status_serialization() {
        assert_eq!(
            serde_json::to_string(&EmploymentStatus::Probationary).unwrap(),
            "\"probationary\""
        );
    }

    #[test]
    fn test_is_employed_on_hire_date() {
        let employee = create_test_employee();
        assert!(employee.is_employed_on(employee.hired_on));
        assert!(!employee.is_employed_on(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()));
    }

    #[test]
    fn test_full_name() {
        assert_eq!(create_test_employee().full_name(), "Juan Dela Cruz");
    }
}
