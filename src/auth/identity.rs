// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer-token claims and the authenticated-identity value type.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in a locally issued bearer token.
///
/// The token is self-contained: subject (username), subject id and an
/// absolute expiry are everything a request needs to resolve its caller,
/// so no server-side session lookup exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the username at issuance time.
    pub sub: String,
    /// Numeric user id.
    pub id: u64,
    /// Expiration timestamp (Unix seconds).
    pub exp: i64,
}

impl AccessClaims {
    /// Build claims expiring `ttl` from now.
    pub fn new(user_id: u64, username: &str, ttl: chrono::Duration) -> Self {
        Self {
            sub: username.to_string(),
            id: user_id,
            exp: (Utc::now() + ttl).timestamp(),
        }
    }
}

/// Authenticated identity resolved from a verified bearer token.
///
/// This is the only representation of "the current user" that crosses
/// component boundaries: it is produced exclusively by
/// [`crate::auth::TokenService::verify`] and passed by value to every
/// ownership-scoped operation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Numeric user id.
    pub id: u64,
    /// Username at token issuance time.
    pub username: String,
}

impl From<AccessClaims> for AuthenticatedUser {
    fn from(claims: AccessClaims) -> Self {
        Self {
            id: claims.id,
            username: claims.sub,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_expire_in_the_future() {
        let claims = AccessClaims::new(7, "alice", chrono::Duration::minutes(30));
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.id, 7);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn authenticated_user_from_claims() {
        let claims = AccessClaims::new(42, "bob", chrono::Duration::minutes(1));
        let user = AuthenticatedUser::from(claims);
        assert_eq!(user.id, 42);
        assert_eq!(user.username, "bob");
    }
}
