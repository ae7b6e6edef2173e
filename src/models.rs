// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`/`Deserialize` and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Auth**: registration, password login, Google identity login/signup
//! - **Notes**: note CRUD payloads; responses embed the note's bullet points
//! - **Bullet Points**: bullet-point CRUD payloads, including the optional
//!   enhancement request on creation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::providers::EnhancementKind;

// =============================================================================
// Auth Models
// =============================================================================

/// Request to register a local account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Unique username (a local handle or an email).
    pub username: String,
    /// Plaintext password; hashed before it reaches storage.
    pub password: String,
}

/// Form payload for password login.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Bearer-token response returned by every login path.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenResponse {
    /// Signed, self-contained bearer token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Request carrying a Google-issued id token.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GoogleTokenRequest {
    /// The id token as issued by Google.
    pub token: String,
}

/// Plain message response (Google signup outcome).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// Resolved identity of the authenticated caller.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct IdentityResponse {
    pub username: String,
    pub id: u64,
}

// =============================================================================
// Note Models
// =============================================================================

/// Request to create a note.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NoteCreateRequest {
    pub title: String,
}

/// Request to update a note; only provided fields are applied.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NoteUpdateRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// A note together with its bullet points.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct NoteResponse {
    pub id: u64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub bullet_points: Vec<BulletPointResponse>,
}

// =============================================================================
// Bullet Point Models
// =============================================================================

/// Request to create a bullet point under a note.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BulletPointCreateRequest {
    pub content: String,
    #[serde(default)]
    pub completed: bool,
    /// Route the content through the enhancement service before storage.
    #[serde(default)]
    pub enhance: bool,
    #[serde(default)]
    pub enhancement_type: EnhancementKind,
}

/// Request to update a bullet point. Both fields are replaced
/// unconditionally; there is no partial-update form.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BulletPointUpdateRequest {
    pub content: String,
    pub completed: bool,
}

/// A single bullet point.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct BulletPointResponse {
    pub id: u64,
    pub content: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
