use crate::{error::Result, models::CompiledPrompt};
use async_trait::async_trait;

/// Main generation capability: compiled prompt in, raw model text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &CompiledPrompt) -> Result<String>;
}

/// Image capability: one prompt in, one image URL (remote or data URI) out.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}
