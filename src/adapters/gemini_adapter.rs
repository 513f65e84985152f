//! Gemini `generateContent` client implementing ExplainPort.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::error::BondwatchError;
use crate::ports::config_port::ConfigPort;
use crate::ports::explain_port::ExplainPort;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Clone, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Clone, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// First text part of the first candidate; empty when the service returned none.
fn first_text(body: &str) -> Result<String, BondwatchError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| BondwatchError::ExternalServiceUnavailable {
            reason: format!("malformed response: {}", e),
        })?;
    Ok(response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .unwrap_or_default())
}

pub struct GeminiAdapter {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl GeminiAdapter {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BondwatchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BondwatchError::ExternalServiceUnavailable {
                reason: format!("failed to create HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            timeout,
        })
    }

    /// Reads the `[ai]` section; the key itself comes from the environment
    /// variable named by `api_key_env`.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, BondwatchError> {
        let key_env = config
            .get_string("ai", "api_key_env")
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        let endpoint = config
            .get_string("ai", "endpoint")
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let model = config
            .get_string("ai", "model")
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_secs = config.get_int("ai", "timeout_secs", DEFAULT_TIMEOUT.as_secs() as i64);
        let timeout = Duration::from_secs(u64::try_from(timeout_secs).unwrap_or(0).max(1));
        Self::new(endpoint, model, std::env::var(&key_env).ok(), timeout)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    fn map_error(&self, err: reqwest::Error) -> BondwatchError {
        if err.is_timeout() {
            BondwatchError::ExternalTimeout {
                after: self.timeout,
            }
        } else {
            BondwatchError::ExternalServiceUnavailable {
                reason: err.to_string(),
            }
        }
    }
}

impl ExplainPort for GeminiAdapter {
    fn generate(&self, prompt: &str) -> Result<String, BondwatchError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| BondwatchError::ExternalServiceUnavailable {
                reason: "API key not configured".into(),
            })?;

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(model = %self.model, "sending generateContent request");
        let response = self
            .client
            .post(self.url())
            .query(&[("key", key)])
            .json(&request)
            .send()
            .map_err(|e| self.map_error(e))?;

        if !response.status().is_success() {
            return Err(BondwatchError::ExternalServiceUnavailable {
                reason: format!("Status: {}", response.status()),
            });
        }

        let body = response.text().map_err(|e| self.map_error(e))?;
        first_text(&body)
    }
}
