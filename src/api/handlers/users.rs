//! Login account management.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use crate::auth::{Permission, hash_password};
use crate::error::HrError;
use crate::models::User;

use crate::api::extract::{CurrentUser, IdPath, validated_body};
use crate::api::request::CreateUserRequest;
use crate::api::response::UserResponse;
use crate::api::state::AppState;
use super::{HandlerResult, respond};

/// Handler for GET /users.
pub(crate) async fn list(State(state): State<AppState>, current: CurrentUser) -> HandlerResult {
    current.require(Permission::ManageUsers)?;
    let users: Vec<UserResponse> = state
        .store()
        .list_users()
        .into_iter()
        .map(UserResponse::from)
        .collect();
    respond(StatusCode::OK, users)
}

/// Handler for POST /users.
pub(crate) async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> HandlerResult {
    current.require(Permission::ManageUsers)?;
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;

    let user = state.store().create_user(User {
        id: Uuid::new_v4(),
        email: request.email.trim().to_lowercase(),
        password_hash: hash_password(&request.password)?,
        role: request.role,
        employee_id: request.employee_id,
        active: true,
    })?;

    info!(
        correlation_id = %correlation_id,
        user_id = %user.id,
        role = %user.role,
        "User created"
    );
    respond(StatusCode::CREATED, UserResponse::from(user))
}

/// Handler for DELETE /users/:id.
pub(crate) async fn remove(
    State(state): State<AppState>,
    current: CurrentUser,
    IdPath(id): IdPath,
) -> HandlerResult {
    current.require(Permission::ManageUsers)?;
    if id == current.user.id {
        return Err(HrError::conflict("cannot delete your own account").into());
    }
    state.store().delete_user(id)?;
    info!(user_id = %id, deleted_by = %current.user.id, "User deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
