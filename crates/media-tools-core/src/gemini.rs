//! Client for the Gemini `generateContent` endpoint.
//!
//! Everything that talks to a generative model goes through the
//! [`TextGenerator`] trait so pipelines can be exercised with canned
//! responses. [`GeminiClient`] is the production implementation: one
//! blocking POST per prompt, no timeout and no retry.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};

/// Default API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Something that turns a prompt into free-form text.
pub trait TextGenerator {
    /// Model identifier, for logs.
    fn model(&self) -> &str;

    /// Generate a completion for `prompt`.
    fn generate(&self, prompt: &str) -> ServiceResult<String>;
}

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiSettings {
    /// API key sent as the `key` query parameter.
    pub api_key: String,
    /// Model name, e.g. `gemini-pro`.
    pub model: String,
    /// API base URL without trailing slash.
    pub endpoint: String,
}

impl GeminiSettings {
    /// Settings from config, or `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.gemini_key()?;
        Some(Self {
            api_key: api_key.to_string(),
            model: config.gemini_model.clone(),
            endpoint: config
                .gemini_endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        })
    }

    /// Full `generateContent` URL for the configured model (without the key).
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

/// Blocking Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    /// Build a client for `settings`.
    pub fn new(settings: GeminiSettings) -> Self {
        tracing::info!(model = %settings.model, "initialized Gemini model");
        Self {
            http: reqwest::blocking::Client::new(),
            settings,
        }
    }

    /// Client from config, or `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        GeminiSettings::from_config(config).map(Self::new)
    }

    /// The settings in use.
    pub const fn settings(&self) -> &GeminiSettings {
        &self.settings
    }
}

impl TextGenerator for GeminiClient {
    fn model(&self) -> &str {
        &self.settings.model
    }

    #[tracing::instrument(
        skip(self, prompt),
        fields(model = %self.settings.model, prompt_len = prompt.len())
    )]
    fn generate(&self, prompt: &str) -> ServiceResult<String> {
        let body = json!({
            "contents": [
                { "role": "user", "parts": [ { "text": prompt } ] }
            ]
        });

        let response = self
            .http
            .post(self.settings.generate_url())
            .query(&[("key", self.settings.api_key.as_str())])
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response.json()?;
        let text = response_text(&payload).ok_or(ServiceError::EmptyResponse)?;
        tracing::debug!(response_len = text.len(), "generation finished");
        Ok(text)
    }
}

/// Concatenate the text parts of the first candidate.
pub fn response_text(payload: &serde_json::Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(serde_json::Value::as_str))
        .collect();
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_require_api_key() {
        assert!(GeminiSettings::from_config(&Config::default()).is_none());
    }

    #[test]
    fn settings_use_configured_model_and_endpoint() {
        let config = Config {
            gemini_api_key: Some("key".to_string()),
            gemini_model: "gemini-1.5-pro".to_string(),
            gemini_endpoint: Some("http://localhost:9000/v1/".to_string()),
            ..Config::default()
        };
        let settings = GeminiSettings::from_config(&config).unwrap();
        assert_eq!(
            settings.generate_url(),
            "http://localhost:9000/v1/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn default_endpoint_url() {
        let config = Config {
            gemini_api_key: Some("key".to_string()),
            ..Config::default()
        };
        let settings = GeminiSettings::from_config(&config).unwrap();
        assert_eq!(
            settings.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn response_text_joins_parts() {
        let payload = json!({
            "candidates": [
                { "content": { "parts": [ { "text": "[{\"a\":" }, { "text": "1}]" } ] } }
            ]
        });
        assert_eq!(response_text(&payload).as_deref(), Some("[{\"a\":1}]"));
    }

    #[test]
    fn response_without_candidates_has_no_text() {
        assert!(response_text(&json!({ "promptFeedback": {} })).is_none());
        assert!(response_text(&json!({ "candidates": [] })).is_none());
    }

    #[test]
    fn unreachable_endpoint_is_a_request_error() {
        let client = GeminiClient::new(GeminiSettings {
            api_key: "key".to_string(),
            model: "gemini-pro".to_string(),
            endpoint: "http://127.0.0.1:1".to_string(),
        });
        let err = client.generate("hello").unwrap_err();
        assert!(matches!(err, ServiceError::Request(_)));
    }
}
