//! Custom extractors: the authenticated principal and JSON-error path ids.

use axum::async_trait;
use axum::extract::{FromRequestParts, Path, Query, rejection::JsonRejection};
use axum::http::{HeaderMap, header, request::Parts};
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{Permission, Scope, authorize};
use crate::error::HrError;
use crate::models::{Employee, User};

use super::request::Validate;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Reads the session token from the session cookie or a bearer header.
///
/// The cookie wins when both are present.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
    })
    .filter(|token| !token.is_empty())
}

/// The logged-in user, loaded fresh from the store on every request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The account.
    pub user: User,
    /// The account's employee record, if linked.
    pub employee: Option<Employee>,
}

impl CurrentUser {
    /// Fails unless the user's role grants `permission`.
    pub fn require(&self, permission: Permission) -> Result<(), ApiErrorResponse> {
        authorize(self.user.role, permission).map_err(Into::into)
    }

    /// The employees this user may see.
    pub fn scope(&self) -> Scope {
        Scope::for_principal(self.user.role, self.employee.as_ref())
    }

    /// Fails unless `employee` is within this user's scope.
    pub fn require_in_scope(&self, employee: &Employee) -> Result<(), ApiErrorResponse> {
        if self.scope().includes(employee) {
            Ok(())
        } else {
            Err(HrError::Forbidden {
                permission: format!("employee:{}", employee.id),
            }
            .into())
        }
    }

    /// The user's own employee id, required for self-service actions.
    pub fn own_employee_id(&self) -> Result<Uuid, ApiErrorResponse> {
        self.employee
            .as_ref()
            .map(|e| e.id)
            .ok_or_else(|| {
                HrError::validation("employee_id", "account is not linked to an employee").into()
            })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie_name = &state.config().app().session.cookie_name;
        let token = session_token(&parts.headers, cookie_name).ok_or(HrError::Unauthenticated)?;
        let claims = state.tokens().verify_session(&token)?;

        // Accounts deleted or disabled after login lose access immediately
        let user = state
            .store()
            .get_user(claims.sub)
            .map_err(|_| HrError::Unauthenticated)?;
        if !user.active {
            warn!(user_id = %user.id, "Inactive account presented a session");
            return Err(HrError::Unauthenticated.into());
        }

        let employee = match user.employee_id {
            Some(employee_id) => state.store().get_employee(employee_id).ok(),
            None => None,
        };

        debug!(user_id = %user.id, role = %user.role, "Extracted current user");
        Ok(Self { user, employee })
    }
}

/// A single `:id` path segment.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
            })?;
        Ok(Self(id))
    }
}

/// Two id path segments, such as `/:employee_id/benefits/:benefit_id`.
#[derive(Debug, Clone, Copy)]
pub struct IdPairPath(pub Uuid, pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for IdPairPath
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((first, second)) = Path::<(Uuid, Uuid)>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
            })?;
        Ok(Self(first, second))
    }
}

/// Query string parsed with JSON validation errors.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
            })?;
        Ok(Self(value))
    }
}

/// Unwraps a JSON body and validates it.
///
/// Missing fields are validation errors; any other body problem is
/// `MALFORMED_JSON`, and a missing content type is `MISSING_CONTENT_TYPE`.
pub fn validated_body<T: Validate>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // The body text carries serde's message
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return Err(ApiErrorResponse::bad_request(error));
        }
    };

    request.validate().map_err(|err| {
        warn!(correlation_id = %correlation_id, error = %err, "Request validation failed");
        ApiErrorResponse::from(err)
    })?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; hr_session=abc.def.ghi"),
        );
        assert_eq!(
            session_token(&headers, "hr_session").as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_session_token_from_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers, "hr_session").as_deref(), Some("xyz"));
    }

    #[test]
    fn test_session_token_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("hr_session="));
        assert_eq!(session_token(&headers, "hr_session"), None);
    }
}
