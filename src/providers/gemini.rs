// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gemini integration for best-effort bullet-point enhancement.
//!
//! The adapter builds a kind-specific prompt, calls the Gemini
//! `generateContent` endpoint once with a bounded timeout, and folds the
//! generated text under the original content. Every failure — network,
//! timeout, non-2xx, unparseable body — degrades to the unmodified
//! content, so bullet-point creation never fails because this service is
//! unavailable.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;
use utoipa::ToSchema;

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Upper bound on one enhancement call; a timeout is an adapter failure
/// and takes the soft-fail path.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// What kind of elaboration to ask the model for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnhancementKind {
    /// A 1-2 sentence explanation.
    #[default]
    Explain,
    /// A single short example.
    Example,
    /// A very short code snippet.
    Code,
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("Gemini request failed: {0}")]
    Request(String),

    #[error("Gemini response was invalid: {0}")]
    InvalidResponse(String),
}

/// Client for the Gemini text-generation API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_base_url: String,
    api_key: String,
    model: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            http: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Override the API base URL (tests).
    #[cfg(test)]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Enhance bullet-point content, returning it unchanged on any failure.
    ///
    /// At most one generation attempt is made per call; there are no
    /// retries.
    pub async fn enhance(&self, content: &str, kind: EnhancementKind) -> String {
        let prompt = prompt_for(kind, content);
        match self.generate(&prompt).await {
            Ok(generated) => {
                let generated = match kind {
                    EnhancementKind::Code => ensure_code_fences(generated.trim()),
                    _ => generated.trim().to_string(),
                };
                format!("**{content}**\n\n{generated}")
            }
            Err(e) => {
                warn!("enhancement failed, storing original content: {e}");
                content.to_string()
            }
        }
    }

    /// Run one generation request against the API.
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base_url, self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeminiError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeminiError::Request(format!(
                "HTTP {} from Gemini",
                response.status()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GeminiError::InvalidResponse(e.to_string()))?;

        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|text| text.to_string())
            .ok_or_else(|| GeminiError::InvalidResponse("no generated text in response".to_string()))
    }
}

/// Build the generation prompt for a given enhancement kind.
fn prompt_for(kind: EnhancementKind, content: &str) -> String {
    match kind {
        EnhancementKind::Explain => {
            format!("Explain this in 1-2 simple sentences only: {content}")
        }
        EnhancementKind::Example => {
            format!("Give just 1 short example to understand this better: {content}")
        }
        EnhancementKind::Code => format!(
            "Give only a very short code snippet (if possible) for this, and explain it in 1 sentence max: {content}"
        ),
    }
}

/// Wrap code-looking text in a fenced block when the model returned bare
/// code. Already-fenced or prose-looking responses pass through.
fn ensure_code_fences(text: &str) -> String {
    if text.contains("```") {
        return text.to_string();
    }

    let code_markers = [
        "import ", "from ", "def ", "class ", "fn ", "let ", "const ", "if ", "for ", "while ",
        " = ",
    ];
    if code_markers.iter().any(|marker| text.contains(marker)) {
        format!("```\n{text}\n```")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_are_kind_specific() {
        let explain = prompt_for(EnhancementKind::Explain, "TCP");
        let example = prompt_for(EnhancementKind::Example, "TCP");
        let code = prompt_for(EnhancementKind::Code, "TCP");

        assert!(explain.starts_with("Explain this"));
        assert!(example.starts_with("Give just 1 short example"));
        assert!(code.contains("code snippet"));
        for prompt in [&explain, &example, &code] {
            assert!(prompt.ends_with("TCP"));
        }
    }

    #[test]
    fn enhancement_kind_deserializes_lowercase() {
        assert_eq!(
            serde_json::from_str::<EnhancementKind>(r#""code""#).unwrap(),
            EnhancementKind::Code
        );
        assert_eq!(EnhancementKind::default(), EnhancementKind::Explain);
    }

    #[test]
    fn code_fences_added_only_to_code_looking_text() {
        let bare = "def add(a, b):\n    return a + b";
        assert!(ensure_code_fences(bare).starts_with("```\n"));

        let fenced = "```python\nprint(1)\n```";
        assert_eq!(ensure_code_fences(fenced), fenced);

        let prose = "Adds two numbers together.";
        assert_eq!(ensure_code_fences(prose), prose);
    }

    #[tokio::test]
    async fn enhance_falls_back_to_original_on_unreachable_service() {
        let client =
            GeminiClient::new("test-key", DEFAULT_GEMINI_MODEL).with_api_base_url("http://127.0.0.1:1");

        let result = client.enhance("milk", EnhancementKind::Explain).await;
        assert_eq!(result, "milk");
    }
}
