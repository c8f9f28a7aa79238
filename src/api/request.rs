//! Request types for the HR/payroll API.
//!
//! This module defines the JSON request bodies and query strings of every
//! endpoint. Each body implements [`Validate`] for the checks serde cannot
//! express, and converts into its model with the record id supplied by the
//! handler (a fresh id on create, the path id on update).

use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::MIN_PASSWORD_LENGTH;
use crate::error::{HrError, HrResult};
use crate::models::{
    Benefit, BenefitEnrollment, BenefitKind, ClockAction, DeductionMethod, DeductionType,
    Department, Employee, EmploymentStatus, Holiday, HolidayKind, PayFrequency, PayrollPeriod,
    PeriodStatus, Role, SalaryGrade, SalarySource, Schedule,
};

/// Largest window accepted by the attendance trend endpoint.
pub const MAX_TREND_DAYS: u32 = 90;

/// Default window of the attendance trend endpoint.
pub const DEFAULT_TREND_DAYS: u32 = 7;

/// Checks a request beyond what deserialization enforces.
pub trait Validate {
    /// Returns the first problem found.
    fn validate(&self) -> HrResult<()>;
}

fn require_text(field: &str, value: &str) -> HrResult<()> {
    if value.trim().is_empty() {
        Err(HrError::validation(field, "must not be empty"))
    } else {
        Ok(())
    }
}

fn require_email(field: &str, value: &str) -> HrResult<()> {
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(())
    } else {
        Err(HrError::validation(field, "must be an email address"))
    }
}

fn require_non_negative(field: &str, value: Decimal) -> HrResult<()> {
    if value.is_sign_negative() {
        Err(HrError::validation(field, "must not be negative"))
    } else {
        Ok(())
    }
}

fn trimmed_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn default_true() -> bool {
    true
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> HrResult<()> {
        require_text("email", &self.email)?;
        require_text("password", &self.password)
    }
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Login email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Role.
    pub role: Role,
    /// Linked employee; required unless the role is ADMIN.
    #[serde(default)]
    pub employee_id: Option<Uuid>,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> HrResult<()> {
        require_email("email", &self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(HrError::validation(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }
        Ok(())
    }
}

/// Body of `POST /departments` and `PUT /departments/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentRequest {
    /// Department name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional department head.
    #[serde(default)]
    pub head_employee_id: Option<Uuid>,
}

impl Validate for DepartmentRequest {
    fn validate(&self) -> HrResult<()> {
        require_text("name", &self.name)
    }
}

impl DepartmentRequest {
    /// Converts into a department with the given id.
    pub fn into_model(self, id: Uuid) -> Department {
        Department {
            id,
            name: self.name.trim().to_string(),
            description: trimmed_optional(self.description),
            head_employee_id: self.head_employee_id,
        }
    }
}

/// Body of `POST /schedules` and `PUT /schedules/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Schedule name.
    pub name: String,
    /// Start of the working day.
    pub time_in: NaiveTime,
    /// End of the working day; at or before `time_in` means overnight.
    pub time_out: NaiveTime,
    /// Unpaid break allowance in minutes.
    #[serde(default)]
    pub break_minutes: i64,
    /// Minutes after `time_in` before a clock-in counts as late.
    #[serde(default)]
    pub grace_minutes: i64,
    /// Scheduled working days.
    pub work_days: Vec<Weekday>,
}

impl Validate for ScheduleRequest {
    fn validate(&self) -> HrResult<()> {
        require_text("name", &self.name)?;
        if self.break_minutes < 0 {
            return Err(HrError::validation("break_minutes", "must not be negative"));
        }
        if self.grace_minutes < 0 {
            return Err(HrError::validation("grace_minutes", "must not be negative"));
        }
        if self.work_days.is_empty() {
            return Err(HrError::validation("work_days", "must name at least one day"));
        }
        if self.time_in == self.time_out {
            return Err(HrError::validation("time_out", "must differ from time_in"));
        }
        let schedule = self.clone().into_model(Uuid::nil());
        if schedule.work_minutes() == 0 {
            return Err(HrError::validation(
                "break_minutes",
                "must be shorter than the working day",
            ));
        }
        Ok(())
    }
}

impl ScheduleRequest {
    /// Converts into a schedule with the given id.
    pub fn into_model(self, id: Uuid) -> Schedule {
        let mut work_days = self.work_days;
        work_days.sort_by_key(|d| d.num_days_from_monday());
        work_days.dedup();
        Schedule {
            id,
            name: self.name.trim().to_string(),
            time_in: self.time_in,
            time_out: self.time_out,
            break_minutes: self.break_minutes,
            grace_minutes: self.grace_minutes,
            work_days,
        }
    }
}

/// Body of `POST /salary-grades` and `PUT /salary-grades/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryGradeRequest {
    /// Grade number.
    pub grade: u8,
    /// Display name.
    pub name: String,
    /// Monthly salary of each step, step 1 first.
    pub steps: Vec<Decimal>,
}

impl Validate for SalaryGradeRequest {
    fn validate(&self) -> HrResult<()> {
        if self.grade == 0 {
            return Err(HrError::validation("grade", "must be at least 1"));
        }
        require_text("name", &self.name)?;
        if self.steps.is_empty() {
            return Err(HrError::validation("steps", "must contain at least one step"));
        }
        if self.steps.iter().any(|s| *s <= Decimal::ZERO) {
            return Err(HrError::validation("steps", "every step must be positive"));
        }
        if self.steps.windows(2).any(|w| w[1] < w[0]) {
            return Err(HrError::validation("steps", "must not decrease"));
        }
        Ok(())
    }
}

impl SalaryGradeRequest {
    /// Converts into a salary grade with the given id.
    pub fn into_model(self, id: Uuid) -> SalaryGrade {
        SalaryGrade {
            id,
            grade: self.grade,
            name: self.name.trim().to_string(),
            steps: self.steps,
        }
    }
}

/// Body of `POST /employees` and `PUT /employees/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Company employee number.
    pub employee_no: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Work email.
    pub email: String,
    /// Department.
    #[serde(default)]
    pub department_id: Option<Uuid>,
    /// Assigned schedule; the default schedule applies when absent.
    #[serde(default)]
    pub schedule_id: Option<Uuid>,
    /// Job title.
    pub position: String,
    /// Employment status.
    pub employment_status: EmploymentStatus,
    /// Salary source.
    pub salary: SalarySource,
    /// Hire date.
    pub hired_on: NaiveDate,
    /// Active flag; defaults to true.
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Validate for EmployeeRequest {
    fn validate(&self) -> HrResult<()> {
        require_text("employee_no", &self.employee_no)?;
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)?;
        require_email("email", &self.email)?;
        require_text("position", &self.position)?;
        match self.salary {
            SalarySource::Monthly { amount } if amount <= Decimal::ZERO => {
                Err(HrError::validation("salary.amount", "must be positive"))
            }
            SalarySource::Grade { step: 0, .. } => {
                Err(HrError::validation("salary.step", "must be at least 1"))
            }
            _ => Ok(()),
        }
    }
}

impl EmployeeRequest {
    /// Converts into an employee with the given id.
    pub fn into_model(self, id: Uuid) -> Employee {
        Employee {
            id,
            employee_no: self.employee_no.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            department_id: self.department_id,
            schedule_id: self.schedule_id,
            position: self.position.trim().to_string(),
            employment_status: self.employment_status,
            salary: self.salary,
            hired_on: self.hired_on,
            active: self.active,
        }
    }
}

/// Body of `POST /attendance/clock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockRequest {
    /// The clock action.
    pub action: ClockAction,
    /// Employee to clock; defaults to the caller's own employee record.
    #[serde(default)]
    pub employee_id: Option<Uuid>,
}

impl Validate for ClockRequest {
    fn validate(&self) -> HrResult<()> {
        Ok(())
    }
}

/// Body of `POST /attendance/scan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Token read from the employee's QR badge.
    pub qr_token: String,
    /// The clock action.
    pub action: ClockAction,
}

impl Validate for ScanRequest {
    fn validate(&self) -> HrResult<()> {
        require_text("qr_token", &self.qr_token)
    }
}

/// Body of `POST /holidays`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayRequest {
    /// Calendar date.
    pub date: NaiveDate,
    /// Holiday name.
    pub name: String,
    /// Regular or special non-working.
    pub kind: HolidayKind,
}

impl Validate for HolidayRequest {
    fn validate(&self) -> HrResult<()> {
        require_text("name", &self.name)
    }
}

impl HolidayRequest {
    /// Converts into a holiday with the given id.
    pub fn into_model(self, id: Uuid) -> Holiday {
        Holiday {
            id,
            date: self.date,
            name: self.name.trim().to_string(),
            kind: self.kind,
        }
    }
}

/// Body of `POST /deduction-types` and `PUT /deduction-types/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionTypeRequest {
    /// Display name.
    pub name: String,
    /// Fixed amount or percentage of basic pay.
    pub method: DeductionMethod,
    /// Whether processing applies it.
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Validate for DeductionTypeRequest {
    fn validate(&self) -> HrResult<()> {
        require_text("name", &self.name)?;
        match self.method {
            DeductionMethod::Fixed { amount } => require_non_negative("method.amount", amount),
            DeductionMethod::Percentage { rate } => {
                require_non_negative("method.rate", rate)?;
                if rate > Decimal::ONE_HUNDRED {
                    return Err(HrError::validation("method.rate", "must not exceed 100"));
                }
                Ok(())
            }
        }
    }
}

impl DeductionTypeRequest {
    /// Converts into a deduction type with the given id.
    pub fn into_model(self, id: Uuid) -> DeductionType {
        DeductionType {
            id,
            name: self.name.trim().to_string(),
            method: self.method,
            active: self.active,
        }
    }
}

/// Body of `POST /benefits` and `PUT /benefits/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenefitRequest {
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Allowance (adds to pay) or contribution (deducted).
    pub kind: BenefitKind,
    /// Monthly amount.
    pub amount: Decimal,
    /// Whether an allowance is taxable.
    #[serde(default)]
    pub taxable: bool,
    /// Whether new enrollments are accepted.
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Validate for BenefitRequest {
    fn validate(&self) -> HrResult<()> {
        require_text("name", &self.name)?;
        require_non_negative("amount", self.amount)
    }
}

impl BenefitRequest {
    /// Converts into a benefit with the given id.
    pub fn into_model(self, id: Uuid) -> Benefit {
        Benefit {
            id,
            name: self.name.trim().to_string(),
            description: trimmed_optional(self.description),
            kind: self.kind,
            amount: self.amount,
            taxable: self.taxable,
            active: self.active,
        }
    }
}

/// Body of `POST /employees/:id/benefits`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    /// Benefit to enroll in.
    pub benefit_id: Uuid,
    /// Enrollment date; defaults to today.
    #[serde(default)]
    pub enrolled_on: Option<NaiveDate>,
    /// Monthly amount replacing the benefit's default.
    #[serde(default)]
    pub amount_override: Option<Decimal>,
}

impl Validate for EnrollmentRequest {
    fn validate(&self) -> HrResult<()> {
        match self.amount_override {
            Some(amount) => require_non_negative("amount_override", amount),
            None => Ok(()),
        }
    }
}

impl EnrollmentRequest {
    /// Converts into an enrollment of `employee_id`.
    pub fn into_model(self, employee_id: Uuid, today: NaiveDate) -> BenefitEnrollment {
        BenefitEnrollment {
            id: Uuid::new_v4(),
            employee_id,
            benefit_id: self.benefit_id,
            enrolled_on: self.enrolled_on.unwrap_or(today),
            amount_override: self.amount_override,
        }
    }
}

/// Body of `POST /payroll/periods`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// Display name.
    pub name: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Pay date; defaults to the end date.
    #[serde(default)]
    pub pay_date: Option<NaiveDate>,
    /// Pay frequency.
    pub frequency: PayFrequency,
}

impl Validate for PeriodRequest {
    fn validate(&self) -> HrResult<()> {
        require_text("name", &self.name)?;
        if self.start_date > self.end_date {
            return Err(HrError::validation(
                "end_date",
                "must be on or after start_date",
            ));
        }
        if self.pay_date.is_some_and(|pay| pay < self.start_date) {
            return Err(HrError::validation("pay_date", "must not precede start_date"));
        }
        Ok(())
    }
}

impl PeriodRequest {
    /// Converts into a new open period.
    pub fn into_model(self, id: Uuid) -> PayrollPeriod {
        PayrollPeriod {
            id,
            name: self.name.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            pay_date: self.pay_date.unwrap_or(self.end_date),
            frequency: self.frequency,
            status: PeriodStatus::Open,
            processed_at: None,
        }
    }
}

/// Query of `GET /employees`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeQuery {
    /// Only this department.
    #[serde(default)]
    pub department_id: Option<Uuid>,
    /// Include deactivated employees.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Query of `GET /attendance`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceQuery {
    /// Only this employee.
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    /// Only this department.
    #[serde(default)]
    pub department_id: Option<Uuid>,
    /// First date (inclusive).
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Last date (inclusive).
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

/// Query of `GET /holidays`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRangeQuery {
    /// First date (inclusive).
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Last date (inclusive).
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl Validate for DateRangeQuery {
    fn validate(&self) -> HrResult<()> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => {
                Err(HrError::validation("to", "must be on or after from"))
            }
            _ => Ok(()),
        }
    }
}

impl Validate for AttendanceQuery {
    fn validate(&self) -> HrResult<()> {
        DateRangeQuery {
            from: self.from,
            to: self.to,
        }
        .validate()
    }
}

/// Query of `GET /dashboard/trend`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendQuery {
    /// Number of days ending today.
    #[serde(default)]
    pub days: Option<u32>,
}

impl TrendQuery {
    /// The requested window, defaulted and bounds-checked.
    pub fn window(&self) -> HrResult<u32> {
        match self.days.unwrap_or(DEFAULT_TREND_DAYS) {
            0 => Err(HrError::validation("days", "must be at least 1")),
            days if days > MAX_TREND_DAYS => Err(HrError::validation(
                "days",
                format!("must be at most {}", MAX_TREND_DAYS),
            )),
            days => Ok(days),
        }
    }
}
