//! HR and payroll administration service.
//!
//! This crate manages employees, departments and work schedules, records
//! attendance (including QR badge scans), and computes semi-monthly or
//! monthly Philippine payroll: basic pay, attendance deductions, overtime
//! and holiday pay, SSS, PhilHealth and Pag-IBIG contributions and
//! withholding tax. Every payroll item carries an audit trace of the rules
//! applied.

#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
