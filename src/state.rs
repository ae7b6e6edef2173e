// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{GoogleVerifier, TokenService};
use crate::config::Config;
use crate::providers::GeminiClient;
use crate::storage::NotesDb;

/// Shared application state, cloned into every handler.
///
/// Everything here is either immutable after startup (config, services)
/// or internally synchronized (the database serializes its writers), so
/// requests share no other mutable state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<NotesDb>,
    pub config: Arc<Config>,
    pub tokens: TokenService,
    /// Google id-token verifier; `None` when `GOOGLE_CLIENT_ID` is unset.
    pub google: Option<GoogleVerifier>,
    /// Enhancement client; `None` when `GEMINI_API_KEY` is unset.
    pub enhancer: Option<GeminiClient>,
}

impl AppState {
    pub fn new(db: NotesDb, config: Config) -> Self {
        let tokens = TokenService::new(&config.token_secret, config.token_ttl_minutes);
        let google = config
            .google_client_id
            .as_deref()
            .map(GoogleVerifier::new);
        let enhancer = config
            .gemini_api_key
            .as_deref()
            .map(|key| GeminiClient::new(key, config.gemini_model.as_str()));

        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            tokens,
            google,
            enhancer,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::state_with_temp_db;

    #[test]
    fn optional_providers_absent_without_credentials() {
        let (state, _temp_dir) = state_with_temp_db();
        assert!(state.google.is_none());
        assert!(state.enhancer.is_none());
    }
}
