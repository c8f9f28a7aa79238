//! Core data models for the HR/payroll service.
//!
//! This module contains the records the service stores and the payroll
//! results it produces.

mod attendance;
mod benefit;
mod deduction_type;
mod department;
mod employee;
mod holiday;
mod payroll;
mod salary_grade;
mod schedule;
mod user;

pub use attendance::{Attendance, AttendanceSource, AttendanceStatus, ClockAction, ClockState};
pub use benefit::{Benefit, BenefitEnrollment, BenefitKind};
pub use deduction_type::{DeductionMethod, DeductionType};
pub use department::Department;
pub use employee::{Employee, EmploymentStatus, SalarySource};
pub use holiday::{Holiday, HolidayKind};
pub use payroll::{AuditStep, PayFrequency, PayrollItem, PayrollPeriod, PeriodStatus};
pub use salary_grade::SalaryGrade;
pub use schedule::Schedule;
pub use user::{Role, User};
