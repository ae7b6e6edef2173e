// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Issuance and verification of locally signed bearer tokens.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::error::AuthError;
use super::identity::{AccessClaims, AuthenticatedUser};

/// Issues and verifies HS256 bearer tokens with the configured secret.
///
/// Tokens are stateless: there is no revocation list, and expiry is the
/// only way an issued token stops working.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenService {
    /// Create a token service signing with `secret` and issuing tokens
    /// valid for `ttl_minutes`.
    pub fn new(secret: &str, ttl_minutes: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::minutes(ttl_minutes as i64),
        }
    }

    /// Issue a signed token embedding subject, subject id and expiry.
    pub fn issue(&self, user_id: u64, username: &str) -> Result<String, AuthError> {
        let claims = AccessClaims::new(user_id, username, self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(format!("failed to sign token: {e}")))
    }

    /// Verify signature and expiry, resolving the acting user.
    ///
    /// Fails closed: every defect collapses into [`AuthError::InvalidToken`].
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        let data = decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(data.claims.into())
    }
}
