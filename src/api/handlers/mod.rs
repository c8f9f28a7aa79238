//! HTTP request handlers for the HR/payroll API.
//!
//! Handlers are grouped by resource. Every handler authenticates through
//! [`CurrentUser`](super::extract::CurrentUser) (except login, logout and
//! health), checks a [`Permission`](crate::auth::Permission), and maps
//! store errors through [`ApiErrorResponse`].

mod attendance;
mod auth;
mod compensation;
mod dashboard;
mod employees;
mod organization;
mod payroll;
mod users;

use axum::{
    Json, Router,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Serialize;

use super::response::{ApiErrorResponse, HealthResponse};
use super::state::AppState;

/// Result type of every handler.
pub(crate) type HandlerResult = Result<Response, ApiErrorResponse>;

/// Builds a JSON response with an explicit content type.
pub(crate) fn respond<T: Serialize>(status: StatusCode, body: T) -> HandlerResult {
    Ok((
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response())
}

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/users", get(users::list).post(users::create))
        .route("/users/:id", delete(users::remove))
        .route(
            "/departments",
            get(organization::list_departments).post(organization::create_department),
        )
        .route(
            "/departments/:id",
            get(organization::get_department)
                .put(organization::update_department)
                .delete(organization::delete_department),
        )
        .route(
            "/schedules",
            get(organization::list_schedules).post(organization::create_schedule),
        )
        .route(
            "/schedules/:id",
            get(organization::get_schedule)
                .put(organization::update_schedule)
                .delete(organization::delete_schedule),
        )
        .route(
            "/salary-grades",
            get(organization::list_salary_grades).post(organization::create_salary_grade),
        )
        .route(
            "/salary-grades/:id",
            get(organization::get_salary_grade)
                .put(organization::update_salary_grade)
                .delete(organization::delete_salary_grade),
        )
        .route("/employees", get(employees::list).post(employees::create))
        .route(
            "/employees/:id",
            get(employees::get_one)
                .put(employees::update)
                .delete(employees::deactivate),
        )
        .route("/employees/:id/qr", get(employees::badge))
        .route(
            "/employees/:id/benefits",
            get(employees::list_enrollments).post(employees::enroll),
        )
        .route(
            "/employees/:id/benefits/:benefit_id",
            delete(employees::unenroll),
        )
        .route("/attendance", get(attendance::list))
        .route("/attendance/clock", post(attendance::clock))
        .route("/attendance/scan", post(attendance::scan))
        .route(
            "/holidays",
            get(attendance::list_holidays).post(attendance::create_holiday),
        )
        .route("/holidays/:id", delete(attendance::delete_holiday))
        .route(
            "/deduction-types",
            get(compensation::list_deduction_types).post(compensation::create_deduction_type),
        )
        .route(
            "/deduction-types/:id",
            put(compensation::update_deduction_type)
                .delete(compensation::delete_deduction_type),
        )
        .route(
            "/benefits",
            get(compensation::list_benefits).post(compensation::create_benefit),
        )
        .route(
            "/benefits/:id",
            put(compensation::update_benefit)
                .delete(compensation::delete_benefit),
        )
        .route(
            "/payroll/periods",
            get(payroll::list_periods).post(payroll::create_period),
        )
        .route(
            "/payroll/periods/:id",
            get(payroll::get_period).delete(payroll::delete_period),
        )
        .route("/payroll/periods/:id/process", post(payroll::process))
        .route("/payroll/periods/:id/close", post(payroll::close))
        .route("/payroll/periods/:id/items", get(payroll::list_items))
        .route(
            "/payroll/periods/:id/items/:employee_id",
            get(payroll::payslip),
        )
        .route("/dashboard/summary", get(dashboard::summary))
        .route("/dashboard/attendance-trend", get(dashboard::trend))
        .with_state(state)
}

/// Handler for GET /health.
async fn health() -> HandlerResult {
    respond(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    )
}
