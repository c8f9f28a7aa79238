//! Departments, schedules and salary grades.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use crate::auth::Permission;

use crate::api::extract::{CurrentUser, IdPath, validated_body};
use crate::api::request::{DepartmentRequest, SalaryGradeRequest, ScheduleRequest};
use crate::api::state::AppState;
use super::{HandlerResult, respond};

// =============================================================================
// Departments
// =============================================================================

/// Handler for GET /departments.
pub(crate) async fn list_departments(
    State(state): State<AppState>,
    current: CurrentUser,
) -> HandlerResult {
    current.require(Permission::ReadOrganization)?;
    respond(StatusCode::OK, state.store().list_departments())
}

/// Handler for GET /departments/:id.
pub(crate) async fn get_department(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ReadOrganization)?;
    respond(StatusCode::OK, state.store().get_department(id)?)
}

/// Handler for POST /departments.
pub(crate) async fn create_department(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<DepartmentRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageOrganization)?;
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;
    let department = state
        .store()
        .create_department(request.into_model(Uuid::new_v4()))?;
    info!(
        correlation_id = %correlation_id,
        department_id = %department.id,
        name = %department.name,
        "Department created"
    );
    respond(StatusCode::CREATED, department)
}

/// Handler for PUT /departments/:id.
pub(crate) async fn update_department(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
    payload: Result<Json<DepartmentRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageOrganization)?;
    let request = validated_body(payload, Uuid::new_v4())?;
    respond(
        StatusCode::OK,
        state.store().update_department(request.into_model(id))?,
    )
}

/// Handler for DELETE /departments/:id.
pub(crate) async fn delete_department(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManageOrganization)?;
    state.store().delete_department(id)?;
    info!(department_id = %id, "Department deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

// =============================================================================
// Schedules
// =============================================================================

/// Handler for GET /schedules.
pub(crate) async fn list_schedules(
    State(state): State<AppState>,
    current: CurrentUser,
) -> HandlerResult {
    current.require(Permission::ReadOrganization)?;
    respond(StatusCode::OK, state.store().list_schedules())
}

/// Handler for GET /schedules/:id.
pub(crate) async fn get_schedule(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ReadOrganization)?;
    respond(StatusCode::OK, state.store().get_schedule(id)?)
}

/// Handler for POST /schedules.
pub(crate) async fn create_schedule(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageOrganization)?;
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;
    let schedule = state
        .store()
        .create_schedule(request.into_model(Uuid::new_v4()))?;
    info!(
        correlation_id = %correlation_id,
        schedule_id = %schedule.id,
        overnight = schedule.is_overnight(),
        "Schedule created"
    );
    respond(StatusCode::CREATED, schedule)
}

/// Handler for PUT /schedules/:id.
pub(crate) async fn update_schedule(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageOrganization)?;
    let request = validated_body(payload, Uuid::new_v4())?;
    respond(
        StatusCode::OK,
        state.store().update_schedule(request.into_model(id))?,
    )
}

/// Handler for DELETE /schedules/:id.
pub(crate) async fn delete_schedule(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManageOrganization)?;
    state.store().delete_schedule(id)?;
    info!(schedule_id = %id, "Schedule deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

// =============================================================================
// Salary grades
// =============================================================================

/// Handler for GET /salary-grades.
pub(crate) async fn list_salary_grades(
    State(state): State<AppState>,
    current: CurrentUser,
) -> HandlerResult {
    current.require(Permission::ManageSalaryGrades)?;
    respond(StatusCode::OK, state.store().list_salary_grades())
}

/// Handler for GET /salary-grades/:id.
pub(crate) async fn get_salary_grade(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManageSalaryGrades)?;
    respond(StatusCode::OK, state.store().get_salary_grade(id)?)
}

/// Handler for POST /salary-grades.
pub(crate) async fn create_salary_grade(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<SalaryGradeRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageSalaryGrades)?;
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;
    let grade = state
        .store()
        .create_salary_grade(request.into_model(Uuid::new_v4()))?;
    info!(
        correlation_id = %correlation_id,
        grade = grade.grade,
        steps = grade.steps.len(),
        "Salary grade created"
    );
    respond(StatusCode::CREATED, grade)
}

/// Handler for PUT /salary-grades/:id.
pub(crate) async fn update_salary_grade(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
    payload: Result<Json<SalaryGradeRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageSalaryGrades)?;
    let request = validated_body(payload, Uuid::new_v4())?;
    respond(
        StatusCode::OK,
        state.store().update_salary_grade(request.into_model(id))?,
    )
}

/// Handler for DELETE /salary-grades/:id.
pub(crate) async fn delete_salary_grade(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManageSalaryGrades)?;
    state.store().delete_salary_grade(id)?;
    info!(salary_grade_id = %id, "Salary grade deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
