pub mod assembler;
pub mod images;
pub mod prompt;

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    config::Config,
    error::Result,
    gateway::{GatewayClient, ImageGenerator, TextGenerator},
    logger,
    models::{CodeBundle, GeneratedImage, GenerationMode, GenerationRequest},
};

pub use images::ImageSynthesizer;

/// Sequences image synthesis, prompt compilation, the main gateway call and
/// response assembly for one request. Holds no per-request state.
#[derive(Clone)]
pub struct Pipeline {
    text: Arc<dyn TextGenerator>,
    images: ImageSynthesizer,
    synthesize_placeholder_images: bool,
}

impl Pipeline {
    pub fn new(
        text: Arc<dyn TextGenerator>,
        image: Arc<dyn ImageGenerator>,
        fallback_image_url: impl Into<String>,
    ) -> Self {
        Self {
            text,
            images: ImageSynthesizer::new(image, fallback_image_url),
            synthesize_placeholder_images: true,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Arc::new(GatewayClient::new(config.gateway.clone())?);
        Ok(Self::new(
            client.clone(),
            client,
            config.gateway.fallback_image_url.clone(),
        )
        .with_placeholder_images(config.synthesize_placeholder_images))
    }

    pub fn with_placeholder_images(mut self, enabled: bool) -> Self {
        self.synthesize_placeholder_images = enabled;
        self
    }

    pub async fn run(&self, request: &GenerationRequest) -> Result<CodeBundle> {
        let request_id = Uuid::new_v4().to_string();
        let _timer = logger::timer(&format!("generation [{}]", request_id));

        let result = match request.mode() {
            GenerationMode::New => self.run_new(request, &request_id).await,
            GenerationMode::Revise(_) => self.run_revise(request, &request_id).await,
        };

        match &result {
            Ok(bundle) => log::info!(
                "✅ [{}] Bundle ready: html={}B css={}B js={}B",
                request_id,
                bundle.html.len(),
                bundle.css.len(),
                bundle.js.len()
            ),
            Err(e) => log::error!("❌ [{}] Generation failed: {}", request_id, e),
        }
        result
    }

    /// Standalone image generation; gateway errors are surfaced.
    pub async fn generate_images(&self, prompts: &[String]) -> Result<Vec<GeneratedImage>> {
        self.images.synthesize_strict(prompts).await
    }

    async fn run_new(&self, request: &GenerationRequest, request_id: &str) -> Result<CodeBundle> {
        log::info!("🆕 [{}] Generating new site", request_id);

        let hero_prompt = prompt::hero_image_prompt(&request.prompt);
        let hero = self
            .images
            .synthesize(std::slice::from_ref(&hero_prompt))
            .await
            .into_iter()
            .next();

        let compiled = prompt::compile(request, hero.as_ref());
        let raw = self.text.generate_text(&compiled).await?;
        log::info!("📥 [{}] AI response received", request_id);

        let output = assembler::parse_model_output(&raw)?;
        let images = if self.synthesize_placeholder_images && !output.image_prompts().is_empty() {
            log::info!(
                "🖼️  [{}] Generating {} placeholder images",
                request_id,
                output.image_prompts().len()
            );
            self.images.synthesize(output.image_prompts()).await
        } else {
            Vec::new()
        };

        Ok(assembler::assemble_output(output, &images))
    }

    async fn run_revise(&self, request: &GenerationRequest, request_id: &str) -> Result<CodeBundle> {
        log::info!("✏️  [{}] Revising existing site", request_id);

        let compiled = prompt::compile(request, None);
        let raw = self.text.generate_text(&compiled).await?;
        log::info!("📥 [{}] AI response received", request_id);

        assembler::assemble(&raw, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SiteGenError;
    use crate::models::ReferenceImage;
    use crate::testing::{FakeImages, FakeText, ImageOutcome};

    const FALLBACK: &str = "https://fallback/img.png";

    fn pipeline(text: &Arc<FakeText>, images: &Arc<FakeImages>) -> Pipeline {
        Pipeline::new(text.clone(), images.clone(), FALLBACK)
    }

    #[tokio::test]
    async fn test_new_site_without_placeholders_returns_upstream_fields() {
        let text = Arc::new(FakeText::returning(
            r#"{"html":"<h1>Hi</h1>","css":"h1{color:red}","js":""}"#,
        ));
        let images = Arc::new(FakeImages::new(vec![ImageOutcome::Status(500)]));

        let bundle = pipeline(&text, &images)
            .run(&GenerationRequest::new("portfolio site"))
            .await
            .unwrap();

        assert_eq!(bundle, CodeBundle::new("<h1>Hi</h1>", "h1{color:red}", ""));
        assert_eq!(images.calls(), 1);
        assert_eq!(text.prompts_seen().len(), 1);
    }

    #[tokio::test]
    async fn test_new_site_uses_hero_and_fills_placeholders() {
        let text = Arc::new(FakeText::returning(
            r#"{"html":"<img data-ai-image=\"0\"><img data-ai-image=\"1\">","css":"","js":"","imagePrompts":["team photo","abstract background"]}"#,
        ));
        let images = Arc::new(FakeImages::new(vec![
            ImageOutcome::Url("https://img/hero.png"),
            ImageOutcome::Url("https://img/team.png"),
            ImageOutcome::Status(500),
        ]));

        let bundle = pipeline(&text, &images)
            .run(&GenerationRequest::new("agency site"))
            .await
            .unwrap();

        let compiled = &text.prompts_seen()[0];
        assert!(compiled.full_text().contains("https://img/hero.png"));
        assert!(bundle.html.contains(r#"src="https://img/team.png""#));
        assert!(bundle.html.contains(&format!(r#"src="{}""#, FALLBACK)));
        assert!(!bundle.html.contains("data-ai-image"));

        let seen = images.prompts_seen();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].contains("agency site"));
        assert_eq!(seen[1], "team photo");
        assert_eq!(seen[2], "abstract background");
    }

    #[tokio::test]
    async fn test_placeholder_pass_can_be_disabled() {
        let text = Arc::new(FakeText::returning(
            r#"{"html":"<img data-ai-image=\"0\">","imagePrompts":["team photo"]}"#,
        ));
        let images = Arc::new(FakeImages::new(vec![ImageOutcome::Url("https://img/hero.png")]));

        let bundle = pipeline(&text, &images)
            .with_placeholder_images(false)
            .run(&GenerationRequest::new("agency site"))
            .await
            .unwrap();

        assert_eq!(images.calls(), 1);
        assert_eq!(bundle.html, r#"<img data-ai-image="0">"#);
    }

    #[tokio::test]
    async fn test_revise_never_runs_image_synthesis() {
        let text = Arc::new(FakeText::returning(
            r#"{"html":"<img data-ai-image=\"0\">","css":"","js":"","imagePrompts":["x"]}"#,
        ));
        let images = Arc::new(FakeImages::new(vec![ImageOutcome::Url("https://img/0.png")]));
        let existing = CodeBundle::new("<p>old</p>", "p{}", "init()");
        let request = GenerationRequest::new("add a footer")
            .with_existing_code(existing.clone())
            .with_reference_image(ReferenceImage::parse("data:image/png;base64,iVBORw0KGgo=").unwrap());

        let bundle = pipeline(&text, &images).run(&request).await.unwrap();

        assert_eq!(images.calls(), 0);
        assert_eq!(bundle.html, r#"<img data-ai-image="0">"#);
        let compiled = &text.prompts_seen()[0];
        assert!(compiled.system_instruction.contains("<p>old</p>"));
        assert!(compiled.system_instruction.contains("init()"));
        assert_eq!(existing, CodeBundle::new("<p>old</p>", "p{}", "init()"));
    }

    #[tokio::test]
    async fn test_malformed_output_fails_whole_invocation() {
        let text = Arc::new(FakeText::returning("not json"));
        let images = Arc::new(FakeImages::new(vec![]));

        let err = pipeline(&text, &images)
            .run(&GenerationRequest::new("shop"))
            .await
            .unwrap_err();

        assert!(matches!(err, SiteGenError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_gateway_errors_are_surfaced() {
        for (status, expected) in [(429, 429), (402, 402), (503, 500)] {
            let text = Arc::new(FakeText::failing(status));
            let images = Arc::new(FakeImages::new(vec![]));
            let err = pipeline(&text, &images)
                .run(&GenerationRequest::new("shop"))
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), expected);
        }
    }

    #[test]
    fn test_missing_credential_fails_at_construction() {
        let result = Pipeline::from_config(&Config::new());
        assert!(matches!(result, Err(SiteGenError::ConfigError(_))));

        let config = Config::new().with_gateway(crate::GatewayConfig::new().with_api_key("k"));
        assert!(Pipeline::from_config(&config).is_ok());
    }

    #[tokio::test]
    async fn test_generate_images_is_strict() {
        let text = Arc::new(FakeText::returning("{}"));
        let images = Arc::new(FakeImages::new(vec![ImageOutcome::Status(429)]));
        let err = pipeline(&text, &images)
            .generate_images(&["a".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, SiteGenError::RateLimited));
    }
}
