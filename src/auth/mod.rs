// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credential handling and bearer-token authentication for the notes API.
//!
//! ## Auth Flows
//!
//! 1. **Password login**: the client registers with username + password
//!    (Argon2id hashed before storage) and exchanges the credentials at
//!    `/auth/token` for a signed HS256 bearer token.
//! 2. **Google identity login**: the client obtains an id token from Google
//!    and exchanges it at `/auth/google`; the server verifies it against
//!    Google's JWKS (signature, issuer, audience, expiry), resolves or
//!    creates the account by verified email, and issues the same local
//!    bearer token.
//! 3. Every protected request carries `Authorization: Bearer <token>`;
//!    the [`Auth`] extractor resolves it to an [`AuthenticatedUser`].
//!
//! ## Security
//!
//! - The signing secret is supplied via configuration, never compiled in
//! - Token verification fails closed: every defect (bad signature, expiry,
//!   missing claim) is reported as the same invalid-token outcome
//! - Tokens are stateless; expiry is the only revocation mechanism
//! - Google JWKS is fetched over HTTPS and cached with a TTL

pub mod error;
pub mod extractor;
pub mod google;
pub mod identity;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use extractor::Auth;
pub use google::GoogleVerifier;
pub use identity::{AccessClaims, AuthenticatedUser};
pub use token::TokenService;
