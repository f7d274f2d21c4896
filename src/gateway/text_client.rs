use crate::{
    error::{Result, SiteGenError},
    gateway::{GatewayClient, TextGenerator},
    models::{ChatCompletionRequest, CompiledPrompt, ResponseFormat},
};
use async_trait::async_trait;

impl GatewayClient {
    pub(crate) fn build_text_request(&self, prompt: &CompiledPrompt) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config().text_model.clone(),
            messages: prompt.messages(),
            response_format: Some(ResponseFormat::json_object()),
            modalities: None,
        }
    }
}

#[async_trait]
impl TextGenerator for GatewayClient {
    async fn generate_text(&self, prompt: &CompiledPrompt) -> Result<String> {
        let request = self.build_text_request(prompt);
        log::info!("🤖 Calling AI gateway with model: {}", request.model);

        let response = self.complete(&request).await?;
        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| SiteGenError::MalformedResponse("response has no message content".into()))
    }
}
