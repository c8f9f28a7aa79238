//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from YAML files.

use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};
use std::fs;
use std::path::Path;

use crate::error::{HrError, HrResult};

use super::types::{AppConfig, HrConfig, PayrollConfig};

/// Loads and provides access to the service configuration.
///
/// # Directory Structure
///
/// ```text
/// config/hrms/
/// ├── app.yaml      # Server, sessions, timezone, attendance rules
/// └── payroll.yaml  # Rates, tax table, statutory contributions
/// ```
///
/// # Example
///
/// ```no_run
/// use hr_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/hrms").unwrap();
/// println!("Binding to {}", loader.app().server.bind);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: HrConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing, is not valid YAML, or
    /// fails validation (bad offset, empty tax table, non-positive divisors).
    pub fn load<P: AsRef<Path>>(path: P) -> HrResult<Self> {
        let path = path.as_ref();

        let app = Self::load_yaml::<AppConfig>(&path.join("app.yaml"))?;
        let payroll = Self::load_yaml::<PayrollConfig>(&path.join("payroll.yaml"))?;

        Self::from_parts(app, payroll)
    }

    /// Builds a loader from already-parsed parts, validating them.
    pub fn from_parts(app: AppConfig, payroll: PayrollConfig) -> HrResult<Self> {
        if FixedOffset::east_opt(app.timezone_offset_minutes * 60).is_none() {
            return Err(HrError::ConfigParseError {
                path: "app.yaml".to_string(),
                message: format!(
                    "timezone_offset_minutes {} is out of range",
                    app.timezone_offset_minutes
                ),
            });
        }
        if app.session.secret.len() < 16 {
            return Err(HrError::ConfigParseError {
                path: "app.yaml".to_string(),
                message: "session.secret must be at least 16 bytes".to_string(),
            });
        }
        if payroll.tax.brackets.is_empty() {
            return Err(HrError::ConfigParseError {
                path: "payroll.yaml".to_string(),
                message: "tax.brackets must not be empty".to_string(),
            });
        }
        if payroll.working_days_per_month <= rust_decimal::Decimal::ZERO
            || payroll.hours_per_day <= rust_decimal::Decimal::ZERO
        {
            return Err(HrError::ConfigParseError {
                path: "payroll.yaml".to_string(),
                message: "working_days_per_month and hours_per_day must be positive".to_string(),
            });
        }

        Ok(Self {
            config: HrConfig::new(app, payroll),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> HrResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| HrError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| HrError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &HrConfig {
        &self.config
    }

    /// Returns mutable access for environment overrides applied at startup.
    pub fn config_mut(&mut self) -> &mut HrConfig {
        &mut self.config
    }

    /// Returns the application settings.
    pub fn app(&self) -> &AppConfig {
        self.config.app()
    }

    /// Returns the payroll rules.
    pub fn payroll(&self) -> &PayrollConfig {
        self.config.payroll()
    }

    /// Returns the configured local UTC offset.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.app().timezone_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }

    /// Returns the current wall-clock time in the configured offset.
    pub fn now_local(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset()).naive_local()
    }
}
