//! Response types for the HR/payroll API.
//!
//! This module defines the error response structures, the mapping from
//! [`HrError`] to HTTP status codes, and the response bodies that must not
//! expose stored fields directly (login accounts carry password hashes).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::error::HrError;
use crate::models::{Attendance, Employee, Role, User};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// A 401 response for failed logins. Does not say which field was wrong.
    pub fn invalid_credentials() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::new("UNAUTHENTICATED", "Invalid email or password"),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<HrError> for ApiErrorResponse {
    fn from(err: HrError) -> Self {
        let message = err.to_string();
        match err {
            HrError::Validation { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details("VALIDATION_ERROR", message, field),
            },
            HrError::Duplicate { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details("DUPLICATE", message, field),
            },
            HrError::InvalidTransition { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_TRANSITION", message),
            },
            HrError::Conflict { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("CONFLICT", message),
            },
            HrError::Unauthenticated => ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::new("UNAUTHENTICATED", message),
            },
            HrError::Forbidden { permission } => ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::with_details("FORBIDDEN", message, permission),
            },
            HrError::NotFound { entity, .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details("NOT_FOUND", message, entity),
            },
            HrError::ConfigNotFound { .. }
            | HrError::ConfigParseError { .. }
            | HrError::Internal { .. } => {
                error!(error = %message, "Internal error while handling request");
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::new("INTERNAL_ERROR", "Internal server error"),
                }
            }
        }
    }
}

/// A login account without its password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    /// Account id.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Role.
    pub role: Role,
    /// Linked employee.
    pub employee_id: Option<Uuid>,
    /// Whether the account can log in.
    pub active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            employee_id: user.employee_id,
            active: user.active,
        }
    }
}

/// Body of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session token, also set as a cookie.
    pub token: String,
    /// Expiry of the session (UTC seconds since epoch).
    pub expires_at: i64,
    /// The logged-in account.
    pub user: UserResponse,
}

/// Body of `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// The logged-in account.
    pub user: UserResponse,
    /// The linked employee record, if any.
    pub employee: Option<Employee>,
}

/// Body of `GET /employees/:id/qr`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeResponse {
    /// Employee the badge identifies.
    pub employee_id: Uuid,
    /// Employee number printed on the badge.
    pub employee_no: String,
    /// Signed token to encode in the QR code.
    pub qr_token: String,
}

/// Body of a clock or scan request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockResponse {
    /// Employee's name, for kiosk confirmation.
    pub employee_name: String,
    /// Server time of the event.
    pub recorded_at: NaiveDateTime,
    /// The updated attendance record.
    pub attendance: Attendance,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: String,
    /// Crate version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (HrError::validation("name", "empty"), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (
                HrError::Duplicate {
                    entity: "employee",
                    field: "email",
                    value: "a@example.com".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "DUPLICATE",
            ),
            (
                HrError::InvalidTransition {
                    message: "already clocked in".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "INVALID_TRANSITION",
            ),
            (HrError::conflict("closed"), StatusCode::BAD_REQUEST, "CONFLICT"),
            (HrError::Unauthenticated, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            (
                HrError::Forbidden {
                    permission: "payroll:manage".to_string(),
                },
                StatusCode::UNAUTHORIZED,
                "FORBIDDEN",
            ),
            (HrError::not_found("employee", "x"), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (HrError::internal("disk full"), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ];

        for (err, status, code) in cases {
            let response: ApiErrorResponse = err.into();
            assert_eq!(response.status, status);
            assert_eq!(response.error.code, code);
        }
    }

    #[test]
    fn test_internal_error_message_hidden() {
        let response: ApiErrorResponse = HrError::internal("secret path /etc/x").into();
        assert!(!response.error.message.contains("/etc/x"));
    }

    #[test]
    fn test_user_response_omits_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Admin,
            employee_id: None,
            active: true,
        };
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("argon2"));
    }
}
