//! Signed session and QR badge tokens.
//!
//! Both are HS256 JWTs signed with the configured session secret. A session
//! token carries the user and role; a badge token carries only the employee
//! id and the `badge` kind, so neither can stand in for the other.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::{HrError, HrResult};
use crate::models::{Role, User};

/// The `kind` claim of badge tokens.
pub const BADGE_KIND: &str = "badge";

/// Claims of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id.
    pub sub: Uuid,
    /// Role at login time.
    pub role: Role,
    /// Issued at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Claims of a QR badge token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeClaims {
    /// Employee id.
    pub sub: Uuid,
    /// Always [`BADGE_KIND`].
    pub kind: String,
    /// Issued at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies session and badge tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    session_ttl: Duration,
    badge_ttl: Duration,
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("session_ttl", &self.session_ttl)
            .field("badge_ttl", &self.badge_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service from the session settings.
    pub fn new(config: &SessionConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            session_ttl: Duration::minutes(config.ttl_minutes),
            badge_ttl: Duration::days(config.badge_ttl_days),
        }
    }

    /// Session lifetime, used for the cookie `Max-Age`.
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Issues a session token for a user.
    pub fn issue_session(&self, user: &User) -> HrResult<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user.id,
            role: user.role,
            iat: now,
            exp: now + self.session_ttl.num_seconds(),
        };
        self.sign(&claims)
    }

    /// Verifies a session token.
    ///
    /// # Errors
    ///
    /// Returns [`HrError::Unauthenticated`] for any bad, expired or foreign token.
    pub fn verify_session(&self, token: &str) -> HrResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Session token rejected");
                HrError::Unauthenticated
            })
    }

    /// Issues a QR badge token for an employee.
    pub fn issue_badge(&self, employee_id: Uuid) -> HrResult<String> {
        let now = Utc::now().timestamp();
        let claims = BadgeClaims {
            sub: employee_id,
            kind: BADGE_KIND.to_string(),
            iat: now,
            exp: now + self.badge_ttl.num_seconds(),
        };
        self.sign(&claims)
    }

    /// Verifies a QR badge token and returns the employee id.
    ///
    /// # Errors
    ///
    /// Returns [`HrError::Validation`] on the `qr_token` field when the token
    /// is malformed, expired, or not a badge.
    pub fn verify_badge(&self, token: &str) -> HrResult<Uuid> {
        let claims = decode::<BadgeClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Badge token rejected");
                HrError::validation("qr_token", "invalid or expired badge")
            })?;

        if claims.kind != BADGE_KIND {
            return Err(HrError::validation("qr_token", "not a badge token"));
        }
        Ok(claims.sub)
    }

    fn sign<T: Serialize>(&self, claims: &T) -> HrResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| HrError::internal(format!("token signing failed: {}", e)))
    }
}
