use std::env;
use std::time::Duration;

pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_TEXT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "google/gemini-2.5-flash-image-preview";
pub const DEFAULT_FALLBACK_IMAGE_URL: &str =
    "https://placehold.co/1200x630/png?text=Image+unavailable";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the upstream AI gateway.
///
/// The API key is injected here and nowhere else; the gateway client never
/// reads process state on its own.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub fallback_image_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: Option<u16>,
    pub gateway: GatewayConfig,
    pub synthesize_placeholder_images: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            api_key: None,
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            fallback_image_url: DEFAULT_FALLBACK_IMAGE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_key = env::var("AI_GATEWAY_API_KEY")
            .or_else(|_| env::var("LOVABLE_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        let timeout = env::var("GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        GatewayConfig {
            api_key,
            base_url: env::var("AI_GATEWAY_URL").unwrap_or(defaults.base_url),
            text_model: env::var("AI_TEXT_MODEL").unwrap_or(defaults.text_model),
            image_model: env::var("AI_IMAGE_MODEL").unwrap_or(defaults.image_model),
            fallback_image_url: env::var("FALLBACK_IMAGE_URL")
                .unwrap_or(defaults.fallback_image_url),
            timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_models(
        mut self,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
    ) -> Self {
        self.text_model = text_model.into();
        self.image_model = image_model.into();
        self
    }

    pub fn with_fallback_image(mut self, url: impl Into<String>) -> Self {
        self.fallback_image_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: None,
            gateway: GatewayConfig::default(),
            synthesize_placeholder_images: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());
        let synthesize_placeholder_images = env::var("SYNTHESIZE_PLACEHOLDER_IMAGES")
            .ok()
            .map_or(true, |val| val != "false");

        Config {
            host,
            port,
            gateway: GatewayConfig::from_env(),
            synthesize_placeholder_images,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_gateway(mut self, config: GatewayConfig) -> Self {
        self.gateway = config;
        self
    }

    pub fn with_placeholder_images(mut self, enabled: bool) -> Self {
        self.synthesize_placeholder_images = enabled;
        self
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port.unwrap_or(8080))
    }
}
