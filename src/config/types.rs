//! Configuration types for the HR/payroll service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::{NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::Schedule;

/// HTTP server and logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind (e.g. "0.0.0.0:8080").
    pub bind: String,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Emit logs as JSON lines instead of the human format.
    #[serde(default)]
    pub json_logs: bool,
    /// Optional path of the JSON snapshot written after every change.
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Session and badge token settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// HMAC secret used to sign session and badge tokens.
    pub secret: String,
    /// Session lifetime in minutes.
    pub ttl_minutes: i64,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Lifetime of QR badge tokens in days.
    pub badge_ttl_days: i64,
}

fn default_cookie_name() -> String {
    "hr_session".to_string()
}

/// Credentials for the administrator created on first start.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapAdmin {
    /// Login email.
    pub email: String,
    /// Initial password.
    pub password: String,
}

/// Schedule applied to employees without an assigned one.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultSchedule {
    /// Expected time in.
    pub time_in: NaiveTime,
    /// Expected time out.
    pub time_out: NaiveTime,
    /// Allowed break length in minutes.
    pub break_minutes: i64,
    /// Minutes after time in before lateness is counted.
    pub grace_minutes: i64,
    /// Scheduled work days.
    pub work_days: Vec<Weekday>,
}

impl DefaultSchedule {
    /// Returns the default as a [`Schedule`] with a nil id.
    pub fn to_schedule(&self) -> Schedule {
        Schedule {
            id: Uuid::nil(),
            name: "Default".to_string(),
            time_in: self.time_in,
            time_out: self.time_out,
            break_minutes: self.break_minutes,
            grace_minutes: self.grace_minutes,
            work_days: self.work_days.clone(),
        }
    }
}

/// Attendance rules.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceConfig {
    /// Schedule used when an employee has none.
    pub default_schedule: DefaultSchedule,
    /// Minutes past scheduled time out before overtime is recorded.
    pub min_overtime_minutes: i64,
}

/// Application configuration from app.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server settings.
    pub server: ServerConfig,
    /// Session settings.
    pub session: SessionConfig,
    /// Local UTC offset in minutes (480 for Asia/Manila).
    pub timezone_offset_minutes: i32,
    /// Administrator seeded on an empty store.
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
    /// Attendance rules.
    pub attendance: AttendanceConfig,
}

/// One row of the annual withholding tax table.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBracket {
    /// Annual taxable income above which this bracket applies.
    pub over: Decimal,
    /// Fixed tax for income up to `over`.
    pub base_tax: Decimal,
    /// Marginal rate on the excess over `over`.
    pub rate: Decimal,
}

/// Withholding tax table.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxConfig {
    /// Brackets in any order; sorted ascending on load.
    pub brackets: Vec<TaxBracket>,
}

/// Social Security System contribution rules.
#[derive(Debug, Clone, Deserialize)]
pub struct SssConfig {
    /// Employee share of the monthly salary credit.
    pub employee_rate: Decimal,
    /// Employer share of the monthly salary credit.
    pub employer_rate: Decimal,
    /// Lowest monthly salary credit.
    pub msc_min: Decimal,
    /// Highest monthly salary credit.
    pub msc_max: Decimal,
    /// Monthly salary credit increment.
    pub msc_step: Decimal,
}

/// PhilHealth premium rules.
#[derive(Debug, Clone, Deserialize)]
pub struct PhilHealthConfig {
    /// Total premium rate.
    pub premium_rate: Decimal,
    /// Income floor.
    pub floor: Decimal,
    /// Income ceiling.
    pub ceiling: Decimal,
    /// Fraction of the premium paid by the employee.
    pub employee_share: Decimal,
}

/// Pag-IBIG (HDMF) contribution rules.
#[derive(Debug, Clone, Deserialize)]
pub struct PagIbigConfig {
    /// Employee rate at or below `threshold`.
    pub low_rate: Decimal,
    /// Employee rate above `threshold`.
    pub high_rate: Decimal,
    /// Compensation threshold between the two rates.
    pub threshold: Decimal,
    /// Maximum fund salary.
    pub max_compensation: Decimal,
    /// Employer rate.
    pub employer_rate: Decimal,
}

/// Payroll rules from payroll.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Divisor from monthly to daily rate.
    pub working_days_per_month: Decimal,
    /// Divisor from daily to hourly rate.
    pub hours_per_day: Decimal,
    /// Multiplier for overtime minutes.
    pub overtime_multiplier: Decimal,
    /// Pay multiplier for work on a regular holiday.
    pub regular_holiday_multiplier: Decimal,
    /// Pay multiplier for work on a special non-working day.
    pub special_holiday_multiplier: Decimal,
    /// Withholding tax table.
    pub tax: TaxConfig,
    /// SSS rules.
    pub sss: SssConfig,
    /// PhilHealth rules.
    pub philhealth: PhilHealthConfig,
    /// Pag-IBIG rules.
    pub pagibig: PagIbigConfig,
}

/// The complete service configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct HrConfig {
    app: AppConfig,
    payroll: PayrollConfig,
}

impl HrConfig {
    /// Creates a new HrConfig from its component parts.
    pub fn new(app: AppConfig, payroll: PayrollConfig) -> Self {
        let mut payroll = payroll;
        payroll.tax.brackets.sort_by(|a, b| a.over.cmp(&b.over));
        Self { app, payroll }
    }

    /// Returns the application settings.
    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Returns mutable application settings, used for environment overrides.
    pub fn app_mut(&mut self) -> &mut AppConfig {
        &mut self.app
    }

    /// Returns the payroll rules.
    pub fn payroll(&self) -> &PayrollConfig {
        &self.payroll
    }
}
