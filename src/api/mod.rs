//! HTTP API for the HR/payroll service.
//!
//! This module provides the REST endpoints: sessions, organization and
//! employee records, attendance, compensation reference data, payroll
//! processing and the dashboard.

mod extract;
mod handlers;
mod request;
mod response;
mod state;

pub use extract::{CurrentUser, session_token};
pub use handlers::create_router;
pub use request::{DEFAULT_TREND_DAYS, MAX_TREND_DAYS, Validate};
pub use response::{ApiError, ApiErrorResponse, UserResponse};
pub use state::AppState;
