// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Process-wide configuration, loaded once from the environment at startup
//! and carried immutably in [`crate::state::AppState`]. No signing secret or
//! provider credential is compiled into the binary.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding the redb database file | `/data` |
//! | `TOKEN_SECRET` | HS256 signing secret for bearer tokens | Required |
//! | `TOKEN_TTL_MINUTES` | Bearer token lifetime in minutes | `30` |
//! | `GOOGLE_CLIENT_ID` | Expected audience of Google id tokens | Optional |
//! | `GEMINI_API_KEY` | Gemini API credential for enhancement | Optional |
//! | `GEMINI_MODEL` | Gemini model used for enhancement | `gemini-2.0-flash` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |
//!
//! Google login and Gemini enhancement are optional features: when their
//! credentials are absent the corresponding routes fail closed and
//! enhancement degrades to a pass-through.

use std::env;
use std::path::PathBuf;

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the bearer-token signing secret.
pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";

/// Environment variable name for the bearer-token lifetime (minutes).
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_MINUTES";

/// Environment variable name for the Google OAuth client id.
pub const GOOGLE_CLIENT_ID_ENV: &str = "GOOGLE_CLIENT_ID";

/// Environment variable name for the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable name for the Gemini model override.
pub const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";

/// Default bearer-token lifetime.
///
/// Single documented TTL for every issuance path (password login and
/// Google identity login alike).
pub const DEFAULT_TOKEN_TTL_MINUTES: u64 = 30;

/// File name of the redb database inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "notes.redb";

/// Configuration errors raised during startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Immutable runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// Directory holding the database file.
    pub data_dir: PathBuf,
    /// HS256 signing secret for locally issued bearer tokens.
    pub token_secret: String,
    /// Bearer-token lifetime in minutes.
    pub token_ttl_minutes: u64,
    /// Expected audience of Google id tokens; `None` disables Google login.
    pub google_client_id: Option<String>,
    /// Gemini credential; `None` disables enhancement.
    pub gemini_api_key: Option<String>,
    /// Gemini model used for enhancement.
    pub gemini_model: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup(HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                var: PORT_ENV,
                value: raw,
            })?,
            None => 8080,
        };
        let data_dir = PathBuf::from(lookup(DATA_DIR_ENV).unwrap_or_else(|| "/data".to_string()));
        let token_secret = lookup(TOKEN_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingVar(TOKEN_SECRET_ENV))?;
        let token_ttl_minutes = match lookup(TOKEN_TTL_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                var: TOKEN_TTL_ENV,
                value: raw,
            })?,
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };
        let google_client_id = lookup(GOOGLE_CLIENT_ID_ENV).filter(|s| !s.is_empty());
        let gemini_api_key = lookup(GEMINI_API_KEY_ENV).filter(|s| !s.is_empty());
        let gemini_model = lookup(GEMINI_MODEL_ENV)
            .unwrap_or_else(|| crate::providers::DEFAULT_GEMINI_MODEL.to_string());

        Ok(Self {
            host,
            port,
            data_dir,
            token_secret,
            token_ttl_minutes,
            google_client_id,
            gemini_api_key,
            gemini_model,
        })
    }

    /// Path of the redb database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}
