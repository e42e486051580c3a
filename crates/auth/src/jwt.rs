use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::claims::{AuthClaims, TokenValidationError, validate_claims};

/// Errors produced while turning a raw token into claims.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token could not be decoded or its signature did not verify.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The token decoded fine but its claims are not currently valid.
    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verification seam between the HTTP layer and the identity collaborator.
///
/// The API depends on this trait, not on a concrete algorithm, so tests and
/// deployments can swap implementations.
pub trait JwtValidator: Send + Sync {
    /// Verify `token` and return its claims, checked against `now`.
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AuthClaims, TokenError>;
}

/// HS256 validator over a shared secret.
pub struct Hs256JwtValidator {
    decoding: DecodingKey,
}

impl Hs256JwtValidator {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            decoding: DecodingKey::from_secret(&secret),
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AuthClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time-window checks run below against the caller-supplied clock so
        // they stay deterministic; decode only verifies signature and shape.
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<AuthClaims>(token, &self.decoding, &validation)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
