use crate::{
    error::{Result, SiteGenError},
    gateway::{GatewayClient, ImageGenerator},
    models::{ChatCompletionRequest, ChatMessage},
};
use async_trait::async_trait;

impl GatewayClient {
    pub(crate) fn build_image_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config().image_model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            response_format: None,
            modalities: Some(vec!["image".to_string(), "text".to_string()]),
        }
    }
}

#[async_trait]
impl ImageGenerator for GatewayClient {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let request = self.build_image_request(prompt);
        log::info!("🎨 Generating image with model: {}", request.model);

        let response = self.complete(&request).await?;
        response
            .first_image_url()
            .map(str::to_string)
            .ok_or_else(|| SiteGenError::MalformedResponse("response carried no image".into()))
    }
}
