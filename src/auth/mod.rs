//! Authentication and authorization.
//!
//! Password hashing, signed session and QR badge tokens, and the role
//! policy that gates every endpoint.

mod password;
mod policy;
mod token;

pub use password::{MIN_PASSWORD_LENGTH, hash_password, verify_password};
pub use policy::{Permission, Scope, authorize, role_allows};
pub use token::{BADGE_KIND, BadgeClaims, SessionClaims, TokenService};
