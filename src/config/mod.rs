//! Configuration loading and management for the HR/payroll service.
//!
//! This module loads the service configuration from YAML files: server and
//! session settings, attendance rules, and the payroll rule tables (tax
//! brackets and statutory contribution parameters).
//!
//! # Example
//!
//! ```no_run
//! use hr_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/hrms").unwrap();
//! println!("Overtime multiplier: {}", config.payroll().overtime_multiplier);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, AttendanceConfig, BootstrapAdmin, DefaultSchedule, HrConfig, PagIbigConfig,
    PayrollConfig, PhilHealthConfig, ServerConfig, SessionConfig, SssConfig, TaxBracket,
    TaxConfig,
};
