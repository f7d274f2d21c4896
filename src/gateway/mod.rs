pub mod image_client;
pub mod text_client;
pub mod traits;

use crate::{
    config::GatewayConfig,
    error::{Result, SiteGenError},
    models::{ChatCompletionRequest, ChatCompletionResponse},
};
use reqwest::Client;

pub use traits::{ImageGenerator, TextGenerator};

const MAX_ERROR_BODY_CHARS: usize = 200;

/// HTTP client for the chat-completions gateway. Implements both
/// [`TextGenerator`] and [`ImageGenerator`].
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    api_key: String,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SiteGenError::ConfigError("AI gateway API key not configured".into()))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SiteGenError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        log::debug!(
            "Calling AI gateway: model={} messages={}",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| SiteGenError::RequestError(format!("AI gateway request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("AI Gateway error: {} {}", status.as_u16(), error_text);
            return Err(classify_status(status.as_u16(), &error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SiteGenError::RequestError(format!("Failed to read response: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| {
            SiteGenError::MalformedResponse(format!("gateway body is not a chat completion: {}", e))
        })
    }
}

/// Maps a non-2xx gateway status onto the crate's error kinds.
///
/// This is the only place that knows the upstream's status conventions.
pub fn classify_status(status: u16, body: &str) -> SiteGenError {
    match status {
        429 => SiteGenError::RateLimited,
        402 => SiteGenError::QuotaExhausted,
        _ => SiteGenError::UpstreamError {
            status,
            message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        },
    }
}
