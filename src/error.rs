//! Error types for the HR/payroll service.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure a request handler, the store or a calculation can report.

use thiserror::Error;

/// The main error type for the HR/payroll service.
///
/// All fallible operations return this error type, so handlers can map
/// failures to HTTP responses in one place.
///
/// # Example
///
/// ```
/// use hr_payroll::error::HrError;
///
/// let error = HrError::ConfigNotFound {
///     path: "/missing/app.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/app.yaml");
/// ```
#[derive(Debug, Error)]
pub enum HrError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A request field failed validation.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A unique field collided with an existing record.
    #[error("{entity} with {field} '{value}' already exists")]
    Duplicate {
        /// The entity kind (e.g. "employee").
        entity: &'static str,
        /// The unique field.
        field: &'static str,
        /// The conflicting value.
        value: String,
    },

    /// A record could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The entity kind (e.g. "department").
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A clock event is not allowed in the current attendance state.
    #[error("Invalid attendance transition: {message}")]
    InvalidTransition {
        /// Why the event was rejected.
        message: String,
    },

    /// The operation conflicts with existing state (references, locked periods).
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflict.
        message: String,
    },

    /// The request carries no valid session.
    #[error("Authentication required")]
    Unauthenticated,

    /// The session's role lacks the required permission.
    #[error("Forbidden: missing permission '{permission}'")]
    Forbidden {
        /// The permission that was required.
        permission: String,
    },

    /// An unexpected internal failure (I/O, hashing, token signing).
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the failure.
        message: String,
    },
}

impl HrError {
    /// Shorthand for a [`HrError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`HrError::NotFound`] error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a [`HrError::Conflict`] error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Shorthand for a [`HrError::Internal`] error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return HrError.
pub type HrResult<T> = Result<T, HrError>;
