//! Password hashing with Argon2id.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::{HrError, HrResult};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hashes a password into a PHC string with a random salt.
///
/// # Errors
///
/// Returns [`HrError::Validation`] for passwords shorter than
/// [`MIN_PASSWORD_LENGTH`] and [`HrError::Internal`] if hashing fails.
pub fn hash_password(password: &str) -> HrResult<String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(HrError::validation(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HrError::internal(format!("password hashing failed: {}", e)))
}

/// Checks a password against a stored PHC string.
///
/// A malformed stored hash verifies as false.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
