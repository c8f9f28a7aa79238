//! Payroll periods, processing and payslips.

use std::time::Instant;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::{Permission, Scope};
use crate::error::HrError;
use crate::models::{PayrollItem, PayrollPeriod};
use crate::store::ProcessContext;

use crate::api::extract::{CurrentUser, IdPairPath, IdPath, validated_body};
use crate::api::request::PeriodRequest;
use crate::api::state::AppState;
use super::{HandlerResult, respond};

/// Result of processing a period.
#[derive(Debug, Serialize)]
struct ProcessResponse {
    period: PayrollPeriod,
    employees: usize,
    gross_pay: Decimal,
    total_deductions: Decimal,
    net_pay: Decimal,
    items: Vec<PayrollItem>,
}

/// Handler for GET /payroll/periods.
pub(crate) async fn list_periods(
    State(state): State<AppState>,
    current: CurrentUser,
) -> HandlerResult {
    current.require(Permission::ManagePayroll)?;
    respond(StatusCode::OK, state.store().list_periods())
}

/// Handler for GET /payroll/periods/:id.
pub(crate) async fn get_period(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManagePayroll)?;
    respond(StatusCode::OK, state.store().get_period(id)?)
}

/// Handler for POST /payroll/periods.
pub(crate) async fn create_period(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<PeriodRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManagePayroll)?;
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;
    let period = state
        .store()
        .create_period(request.into_model(Uuid::new_v4()))?;
    info!(
        correlation_id = %correlation_id,
        period_id = %period.id,
        start_date = %period.start_date,
        end_date = %period.end_date,
        "Payroll period created"
    );
    respond(StatusCode::CREATED, period)
}

/// Handler for DELETE /payroll/periods/:id.
pub(crate) async fn delete_period(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManagePayroll)?;
    state.store().delete_period(id)?;
    info!(period_id = %id, "Payroll period deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for POST /payroll/periods/:id/process.
pub(crate) async fn process(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManagePayroll)?;
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, period_id = %id, "Processing payroll period");

    let now = state.now();
    let ctx = ProcessContext {
        config: state.config().payroll(),
        default_schedule: state.default_schedule(),
        today: now.date(),
        now,
    };

    let start_time = Instant::now();
    let (period, items) = state.store().process_period(id, &ctx)?;
    let response = ProcessResponse {
        employees: items.len(),
        gross_pay: items.iter().map(|i| i.gross_pay).sum(),
        total_deductions: items.iter().map(|i| i.total_deductions).sum(),
        net_pay: items.iter().map(|i| i.net_pay).sum(),
        period,
        items,
    };

    info!(
        correlation_id = %correlation_id,
        period_id = %id,
        employees = response.employees,
        net_pay = %response.net_pay,
        duration_us = start_time.elapsed().as_micros(),
        "Payroll period processed successfully"
    );
    respond(StatusCode::OK, response)
}

/// Handler for POST /payroll/periods/:id/close.
pub(crate) async fn close(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManagePayroll)?;
    let period = state.store().close_period(id)?;
    info!(period_id = %id, "Payroll period closed");
    respond(StatusCode::OK, period)
}

/// Handler for GET /payroll/periods/:id/items.
pub(crate) async fn list_items(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManagePayroll)?;
    respond(StatusCode::OK, state.store().list_items(id)?)
}

/// Handler for GET /payroll/periods/:id/items/:employee_id.
///
/// Admins read any payslip; everyone else reads only their own.
pub(crate) async fn payslip(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPairPath(period_id, employee_id): IdPairPath,
) -> HandlerResult {
    current.require(Permission::ReadPayslip)?;
    let allowed = match current.scope() {
        Scope::All => true,
        _ => current.employee.as_ref().is_some_and(|e| e.id == employee_id),
    };
    if !allowed {
        return Err(HrError::Forbidden {
            permission: Permission::ReadPayslip.as_str().to_string(),
        }
        .into());
    }
    respond(StatusCode::OK, state.store().get_item(period_id, employee_id)?)
}
