// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Google id-token verification.
//!
//! Cryptographic verification is delegated to Google's public-key
//! infrastructure: the signing keys are fetched from the JWKS endpoint
//! over HTTPS and cached with a TTL, then the id token's signature,
//! issuer, audience and expiry are checked. On success the verified
//! `email` claim is extracted; any failure collapses into
//! [`AuthError::InvalidIdentityToken`] with the cause in the message.

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::error::AuthError;

/// Google's JWKS endpoint.
const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Issuer values Google uses in id tokens.
const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

/// JWKS cache TTL (5 minutes).
const JWKS_CACHE_TTL: Duration = Duration::from_secs(300);

/// JWKS fetch timeout.
const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Claims read out of a Google id token.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    /// Verified email address of the Google account.
    #[serde(default)]
    email: Option<String>,
    /// Audience (validated by the jsonwebtoken crate, not read directly).
    #[serde(default)]
    #[allow(dead_code)]
    aud: Option<serde_json::Value>,
}

/// JWKS cache entry.
struct CacheEntry {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// Verifier for Google-issued id tokens.
#[derive(Clone)]
pub struct GoogleVerifier {
    /// Expected audience (the OAuth client id).
    client_id: String,
    /// JWKS endpoint URL.
    jwks_url: String,
    /// Cached key set.
    cache: Arc<RwLock<Option<CacheEntry>>>,
    /// HTTP client.
    client: reqwest::Client,
}

impl GoogleVerifier {
    /// Create a verifier expecting id tokens for `client_id`.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            jwks_url: GOOGLE_JWKS_URL.to_string(),
            cache: Arc::new(RwLock::new(None)),
            client: reqwest::Client::builder()
                .timeout(JWKS_FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Override the JWKS endpoint (tests).
    #[cfg(test)]
    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }

    /// Verify an id token and extract its verified email claim.
    pub async fn verify(&self, id_token: &str) -> Result<String, AuthError> {
        let header = decode_header(id_token)
            .map_err(|e| AuthError::InvalidIdentityToken(format!("malformed token: {e}")))?;

        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidIdentityToken("token has no key id".to_string()))?;
        let decoding_key = self.get_decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation.set_audience(&[&self.client_id]);

        let data = decode::<IdTokenClaims>(id_token, &decoding_key, &validation)
            .map_err(|e| AuthError::InvalidIdentityToken(format!("verification failed: {e}")))?;

        data.claims
            .email
            .ok_or_else(|| AuthError::InvalidIdentityToken("token has no email claim".to_string()))
    }

    /// Get the decoding key for the given key id, refreshing the JWKS
    /// cache as needed.
    async fn get_decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let jwks = self.get_jwks().await?;

        let jwk = jwks
            .keys
            .iter()
            .find(|k| k.common.key_id.as_deref() == Some(kid))
            .ok_or_else(|| {
                AuthError::InvalidIdentityToken("no matching key in JWKS".to_string())
            })?;

        jwk_to_decoding_key(jwk)
    }

    /// Fetch the JWKS, serving from cache while it is fresh.
    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if entry.fetched_at.elapsed() < JWKS_CACHE_TTL {
                    return Ok(entry.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;

        {
            let mut cache = self.cache.write().await;
            *cache = Some(CacheEntry {
                jwks: jwks.clone(),
                fetched_at: Instant::now(),
            });
        }

        Ok(jwks)
    }

    /// Fetch the JWKS from the endpoint.
    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::InvalidIdentityToken(format!("JWKS fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidIdentityToken(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::InvalidIdentityToken(format!("JWKS parse failed: {e}")))
    }

    /// Check if the JWKS is currently cached and fresh.
    pub async fn is_cached(&self) -> bool {
        let cache = self.cache.read().await;
        if let Some(entry) = &*cache {
            entry.fetched_at.elapsed() < JWKS_CACHE_TTL
        } else {
            false
        }
    }
}

/// Convert a JWK to a DecodingKey. Google signs id tokens with RSA keys.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => {
            if let Some(alg) = jwk.common.key_algorithm {
                if alg != KeyAlgorithm::RS256 {
                    return Err(AuthError::InvalidIdentityToken(format!(
                        "unsupported key algorithm in JWKS: {alg:?}"
                    )));
                }
            }
            DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
                .map_err(|e| AuthError::InvalidIdentityToken(format!("bad RSA key in JWKS: {e}")))
        }
        _ => Err(AuthError::InvalidIdentityToken(
            "unsupported key type in JWKS".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifier_uses_google_jwks_by_default() {
        let verifier = GoogleVerifier::new("client-123");
        assert_eq!(verifier.jwks_url, GOOGLE_JWKS_URL);
        assert_eq!(verifier.client_id, "client-123");
    }

    #[tokio::test]
    async fn cache_initially_empty() {
        let verifier = GoogleVerifier::new("client-123");
        assert!(!verifier.is_cached().await);
    }

    #[tokio::test]
    async fn malformed_token_is_rejected_before_any_fetch() {
        // Unroutable endpoint: a fetch attempt would error, but the header
        // decode must reject the token first.
        let verifier =
            GoogleVerifier::new("client-123").with_jwks_url("http://127.0.0.1:1/certs");

        let result = verifier.verify("garbage").await;
        assert!(matches!(result, Err(AuthError::InvalidIdentityToken(_))));
    }

    #[tokio::test]
    async fn unreachable_jwks_collapses_to_invalid_identity_token() {
        let verifier =
            GoogleVerifier::new("client-123").with_jwks_url("http://127.0.0.1:1/certs");

        // Structurally valid unsigned JWT with a kid, forcing a JWKS fetch.
        let header = r#"{"alg":"RS256","typ":"JWT","kid":"k1"}"#;
        let claims = r#"{"sub":"x","exp":9999999999}"#;
        let encode = |s: &str| {
            use std::fmt::Write;
            // Minimal base64url encoding for test fixtures.
            const TABLE: &[u8] =
                b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
            let bytes = s.as_bytes();
            let mut out = String::new();
            for chunk in bytes.chunks(3) {
                let b = [
                    chunk[0],
                    chunk.get(1).copied().unwrap_or(0),
                    chunk.get(2).copied().unwrap_or(0),
                ];
                let n = u32::from(b[0]) << 16 | u32::from(b[1]) << 8 | u32::from(b[2]);
                let chars = [
                    TABLE[(n >> 18) as usize & 63],
                    TABLE[(n >> 12) as usize & 63],
                    TABLE[(n >> 6) as usize & 63],
                    TABLE[n as usize & 63],
                ];
                let keep = match chunk.len() {
                    1 => 2,
                    2 => 3,
                    _ => 4,
                };
                for c in &chars[..keep] {
                    write!(out, "{}", *c as char).unwrap();
                }
            }
            out
        };
        let token = format!("{}.{}.c2ln", encode(header), encode(claims));

        let result = verifier.verify(&token).await;
        match result {
            Err(AuthError::InvalidIdentityToken(cause)) => {
                assert!(cause.contains("JWKS fetch failed"), "cause: {cause}");
            }
            other => panic!("expected InvalidIdentityToken, got {other:?}"),
        }
    }
}
