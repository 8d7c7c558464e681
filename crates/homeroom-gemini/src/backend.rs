//! HTTP backend for the Gemini `generateContent` endpoint.
//!
//! One POST per completion. No retries; the client timeout bounds each call.

use std::time::Duration;

use async_trait::async_trait;
use homeroom_core::{BackendError, CompletionBackend, CompletionRequest, HomeroomConfig};
use tracing::{debug, warn};

use crate::protocol::{error_message, GenerateContentRequest, GenerateContentResponse};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL of the API, without the `/v1beta` suffix.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Honour `HTTPS_PROXY` and friends.
    pub use_system_proxy: bool,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::from(&HomeroomConfig::default())
    }
}

impl From<&HomeroomConfig> for GeminiConfig {
    fn from(config: &HomeroomConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
            use_system_proxy: true,
        }
    }
}

/// Gemini completion backend.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a backend with its own HTTP client.
    ///
    /// # Errors
    /// - `BackendError::Transport` if the HTTP client cannot be built
    pub fn new(config: GeminiConfig) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Endpoint URL for a model.
    #[must_use]
    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn classify(&self, err: &reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout {
                secs: self.config.timeout.as_secs(),
            }
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        let url = self.endpoint(&request.model);
        debug!(model = %request.model, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &request.api_key)
            .json(&GenerateContentRequest::from_prompt(request.prompt))
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(&e))?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), %message, "generateContent returned an error");
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))?;
        parsed.into_text()
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
