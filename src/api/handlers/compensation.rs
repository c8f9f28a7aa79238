//! Deduction types and benefits.

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
use crate::api::request::{BenefitRequest, DeductionTypeRequest};
use crate::api::state::AppState;
use super::{HandlerResult, respond};

/// Handler for GET /deduction-types.
pub(crate) async fn list_deduction_types(
    State(state): State<AppState>,
    current: CurrentUser,
) -> HandlerResult {
    current.require(Permission::ManageReferenceData)?;
    respond(StatusCode::OK, state.store().list_deduction_types())
}

/// Handler for POST /deduction-types.
pub(crate) async fn create_deduction_type(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<DeductionTypeRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageReferenceData)?;
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;
    let deduction = state
        .store()
        .create_deduction_type(request.into_model(Uuid::new_v4()))?;
    info!(
        correlation_id = %correlation_id,
        deduction_type_id = %deduction.id,
        method = ?deduction.method,
        "Deduction type created"
    );
    respond(StatusCode::CREATED, deduction)
}

/// Handler for PUT /deduction-types/:id.
pub(crate) async fn update_deduction_type(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
    payload: Result<Json<DeductionTypeRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageReferenceData)?;
    let request = validated_body(payload, Uuid::new_v4())?;
    respond(
        StatusCode::OK,
        state.store().update_deduction_type(request.into_model(id))?,
    )
}

/// Handler for DELETE /deduction-types/:id.
pub(crate) async fn delete_deduction_type(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManageReferenceData)?;
    state.store().delete_deduction_type(id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for GET /benefits.
pub(crate) async fn list_benefits(
    State(state): State<AppState>,
    current: CurrentUser,
) -> HandlerResult {
    current.require(Permission::ReadReferenceData)?;
    respond(StatusCode::OK, state.store().list_benefits())
}

/// Handler for POST /benefits.
pub(crate) async fn create_benefit(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<BenefitRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageReferenceData)?;
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;
    let benefit = state
        .store()
        .create_benefit(request.into_model(Uuid::new_v4()))?;
    info!(
        correlation_id = %correlation_id,
        benefit_id = %benefit.id,
        kind = ?benefit.kind,
        "Benefit created"
    );
    respond(StatusCode::CREATED, benefit)
}

/// Handler for PUT /benefits/:id.
pub(crate) async fn update_benefit(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
    payload: Result<Json<BenefitRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageReferenceData)?;
    let request = validated_body(payload, Uuid::new_v4())?;
    respond(
        StatusCode::OK,
        state.store().update_benefit(request.into_model(id))?,
    )
}

/// Handler for DELETE /benefits/:id.
pub(crate) async fn delete_benefit(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManageReferenceData)?;
    state.store().delete_benefit(id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
