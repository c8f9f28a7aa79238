//! Clocking, QR badge scans, attendance listing and the holiday calendar.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{Permission, Scope};
use crate::error::HrError;
use crate::models::{AttendanceSource, ClockAction};
use crate::store::AttendanceFilter;

use crate::api::extract::{CurrentUser, IdPath, QueryParams, validated_body};
use crate::api::request::{
    AttendanceQuery, ClockRequest, DateRangeQuery, HolidayRequest, ScanRequest, Validate,
};
use crate::api::response::{ApiErrorResponse, ClockResponse};
use crate::api::state::AppState;
use super::{HandlerResult, respond};

fn record_event(
    state: &AppState,
    employee_id: Uuid,
    action: ClockAction,
    source: AttendanceSource,
    correlation_id: Uuid,
) -> HandlerResult {
    let now = state.now();
    let attendance = state
        .store()
        .record_clock_event(
            employee_id,
            action,
            now,
            state.default_schedule(),
            state.config().app().attendance.min_overtime_minutes,
            source,
        )
        .inspect_err(|err| {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                action = ?action,
                error = %err,
                "Clock event rejected"
            );
        })?;
    let employee = state.store().get_employee(employee_id)?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        action = ?action,
        source = ?source,
        status = ?attendance.status,
        "Clock event recorded"
    );
    respond(
        StatusCode::OK,
        ClockResponse {
            employee_name: employee.full_name(),
            recorded_at: now,
            attendance,
        },
    )
}

/// Handler for POST /attendance/clock.
///
/// Without `employee_id` the caller clocks themselves; clocking someone
/// else needs [`Permission::ClockOthers`].
pub(crate) async fn clock(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ClockSelf)?;
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;

    let own = current.employee.as_ref().map(|e| e.id);
    let employee_id = match request.employee_id {
        Some(id) if Some(id) != own => {
            current.require(Permission::ClockOthers)?;
            id
        }
        Some(id) => id,
        None => current.own_employee_id()?,
    };

    record_event(
        &state,
        employee_id,
        request.action,
        AttendanceSource::Manual,
        correlation_id,
    )
}

/// Handler for POST /attendance/scan.
pub(crate) async fn scan(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ScanBadges)?;
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;

    let employee_id = state
        .tokens()
        .verify_badge(request.qr_token.trim())
        .inspect_err(|_| {
            warn!(correlation_id = %correlation_id, "Badge rejected");
        })?;

    record_event(
        &state,
        employee_id,
        request.action,
        AttendanceSource::QrScan,
        correlation_id,
    )
}

/// Narrows a query to what the caller may see.
fn scoped_filter(scope: Scope, query: AttendanceQuery) -> Result<Option<AttendanceFilter>, ApiErrorResponse> {
    let forbidden = || -> ApiErrorResponse {
        HrError::Forbidden {
            permission: Permission::ReadAttendance.as_str().to_string(),
        }
        .into()
    };

    let mut filter = AttendanceFilter {
        employee_id: query.employee_id,
        department_id: query.department_id,
        from: query.from,
        to: query.to,
    };
    match scope {
        Scope::All => {}
        Scope::Department(department_id) => {
            if query.department_id.is_some_and(|d| d != department_id) {
                return Err(forbidden());
            }
            filter.department_id = Some(department_id);
        }
        Scope::Employee(employee_id) => {
            if query.employee_id.is_some_and(|e| e != employee_id) {
                return Err(forbidden());
            }
            filter.employee_id = Some(employee_id);
        }
        Scope::Nothing => return Ok(None),
    }
    Ok(Some(filter))
}

/// Handler for GET /attendance.
pub(crate) async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
    QueryParams(query): QueryParams<AttendanceQuery>,
) -> HandlerResult {
    current.require(Permission::ReadAttendance)?;
    query.validate()?;

    let records = match scoped_filter(current.scope(), query)? {
        Some(filter) => state.store().list_attendance(&filter),
        None => Vec::new(),
    };
    respond(StatusCode::OK, records)
}

/// Handler for GET /holidays.
pub(crate) async fn list_holidays(
    State(state): State<AppState>,
    current: CurrentUser,
    QueryParams(query): QueryParams<DateRangeQuery>,
) -> HandlerResult {
    current.require(Permission::ReadReferenceData)?;
    query.validate()?;
    respond(StatusCode::OK, state.store().list_holidays(query.from, query.to))
}

/// Handler for POST /holidays.
pub(crate) async fn create_holiday(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<HolidayRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageReferenceData)?;
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;
    let holiday = state
        .store()
        .create_holiday(request.into_model(Uuid::new_v4()))?;
    info!(
        correlation_id = %correlation_id,
        date = %holiday.date,
        kind = ?holiday.kind,
        "Holiday created"
    );
    respond(StatusCode::CREATED, holiday)
}

/// Handler for DELETE /holidays/:id.
pub(crate) async fn delete_holiday(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManageReferenceData)?;
    state.store().delete_holiday(id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
