//! `notekeep-auth` — pure authentication boundary.
//!
//! The identity collaborator (login UI, password handling, session issuance)
//! lives outside this codebase; what arrives here is a signed token. This
//! crate turns that token into a stable [`UserId`] and nothing more. It is
//! intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod jwt;

pub use claims::{AuthClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator, TokenError};

pub use notekeep_core::UserId;
