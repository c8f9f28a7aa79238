//! Login, logout and the current session.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::verify_password;
use crate::error::HrError;

use crate::api::extract::{CurrentUser, validated_body};
use crate::api::request::LoginRequest;
use crate::api::response::{ApiErrorResponse, LoginResponse, MeResponse, UserResponse};
use crate::api::state::AppState;
use super::{HandlerResult, respond};

fn session_cookie(name: &str, token: &str, max_age_secs: i64) -> Result<HeaderValue, ApiErrorResponse> {
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        name, token, max_age_secs
    );
    HeaderValue::from_str(&cookie)
        .map_err(|err| HrError::internal(format!("invalid session cookie: {}", err)).into())
}

/// Handler for POST /auth/login.
///
/// Sets the session cookie and also returns the token for API clients.
pub(crate) async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = validated_body(payload, correlation_id)?;

    let user = match state.store().find_user_by_email(request.email.trim()) {
        Some(user) if user.active && verify_password(&request.password, &user.password_hash) => {
            user
        }
        _ => {
            warn!(correlation_id = %correlation_id, "Login rejected");
            return Err(ApiErrorResponse::invalid_credentials());
        }
    };

    let token = state.tokens().issue_session(&user)?;
    let ttl = state.tokens().session_ttl().num_seconds();
    let cookie = session_cookie(&state.config().app().session.cookie_name, &token, ttl)?;

    info!(
        correlation_id = %correlation_id,
        user_id = %user.id,
        role = %user.role,
        "User logged in"
    );

    let body = LoginResponse {
        token,
        expires_at: Utc::now().timestamp() + ttl,
        user: UserResponse::from(user),
    };
    let mut response = respond(StatusCode::OK, body)?;
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// Handler for POST /auth/logout.
///
/// Sessions are stateless tokens; logging out clears the cookie.
pub(crate) async fn logout(State(state): State<AppState>) -> HandlerResult {
    let cookie = session_cookie(&state.config().app().session.cookie_name, "", 0)?;
    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response())
}

/// Handler for GET /auth/me.
pub(crate) async fn me(current: CurrentUser) -> HandlerResult {
    respond(
        StatusCode::OK,
        MeResponse {
            user: UserResponse::from(current.user),
            employee: current.employee,
        },
    )
}
