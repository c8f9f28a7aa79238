//! Employee records, QR badges and benefit enrollments.

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

use crate::auth::Permission;
use crate::error::HrError;
use crate::models::{Benefit, BenefitEnrollment};
use crate::store::EmployeeFilter;

use crate::api::extract::{CurrentUser, IdPairPath, IdPath, QueryParams, validated_body};
use crate::api::request::{EmployeeQuery, EmployeeRequest, EnrollmentRequest};
use crate::api::response::BadgeResponse;
use crate::api::state::AppState;
use super::{HandlerResult, respond};

/// An enrollment with its benefit, as listed under an employee.
#[derive(Debug, Serialize)]
struct EnrollmentView {
    #[serde(flatten)]
    enrollment: BenefitEnrollment,
    benefit: Benefit,
    monthly_amount: Decimal,
}

/// Handler for GET /employees.
///
/// Department heads see their department and employees see themselves,
/// whatever the query asks for.
pub(crate) async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
    QueryParams(query): QueryParams<EmployeeQuery>,
) -> HandlerResult {
    current.require(Permission::ReadEmployees)?;
    let scope = current.scope();
    let employees: Vec<_> = state
        .store()
        .list_employees(&EmployeeFilter {
            department_id: query.department_id,
            include_inactive: query.include_inactive,
        })
        .into_iter()
        .filter(|e| scope.includes(e))
        .collect();
    respond(StatusCode::OK, employees)
}

/// Handler for GET /employees/:id.
pub(crate) async fn get_one(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ReadEmployees)?;
    let employee = state.store().get_employee(id)?;
    current.require_in_scope(&employee)?;
    respond(StatusCode::OK, employee)
}

/// Handler for POST /employees.
pub(crate) async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageEmployees)?;
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;
    let employee = state
        .store()
        .create_employee(request.into_model(Uuid::new_v4()))?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee.id,
        employee_no = %employee.employee_no,
        "Employee created"
    );
    respond(StatusCode::CREATED, employee)
}

/// Handler for PUT /employees/:id.
pub(crate) async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageEmployees)?;
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;
    let employee = state.store().update_employee(request.into_model(id))?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee.id,
        "Employee updated"
    );
    respond(StatusCode::OK, employee)
}

/// Handler for DELETE /employees/:id.
///
/// Deactivates rather than deletes; attendance and payslips keep
/// referring to the record.
pub(crate) async fn deactivate(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManageEmployees)?;
    let employee = state.store().deactivate_employee(id)?;
    info!(employee_id = %employee.id, "Employee deactivated");
    respond(StatusCode::OK, employee)
}

/// Handler for GET /employees/:id/qr.
pub(crate) async fn badge(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::IssueBadge)?;
    let employee = state.store().get_employee(id)?;
    current.require_in_scope(&employee)?;
    if !employee.active {
        return Err(HrError::validation("employee_id", "employee is inactive").into());
    }

    let qr_token = state.tokens().issue_badge(employee.id)?;
    respond(
        StatusCode::OK,
        BadgeResponse {
            employee_id: employee.id,
            employee_no: employee.employee_no,
            qr_token,
        },
    )
}

/// Handler for GET /employees/:id/benefits.
pub(crate) async fn list_enrollments(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ReadEnrollments)?;
    let employee = state.store().get_employee(id)?;
    current.require_in_scope(&employee)?;

    let views: Vec<EnrollmentView> = state
        .store()
        .list_enrollments(id)?
        .into_iter()
        .map(|(enrollment, benefit)| EnrollmentView {
            monthly_amount: enrollment.monthly_amount(&benefit),
            enrollment,
            benefit,
        })
        .collect();
    respond(StatusCode::OK, views)
}

/// Handler for POST /employees/:id/benefits.
pub(crate) async fn enroll(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
    payload: Result<Json<EnrollmentRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageEnrollments)?;
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;
    let enrollment = state
        .store()
        .enroll(request.into_model(id, state.now().date()))?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %id,
        benefit_id = %enrollment.benefit_id,
        "Employee enrolled in benefit"
    );
    respond(StatusCode::CREATED, enrollment)
}

/// Handler for DELETE /employees/:id/benefits/:benefit_id.
pub(crate) async fn unenroll(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPairPath(employee_id, benefit_id): IdPairPath,
) -> HandlerResult {
    current.require(Permission::ManageEnrollments)?;
    state.store().unenroll(employee_id, benefit_id)?;
    info!(employee_id = %employee_id, benefit_id = %benefit_id, "Benefit enrollment removed");
    Ok(StatusCode::NO_CONTENT.into_response())
}
