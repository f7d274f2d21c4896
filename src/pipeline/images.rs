use std::sync::Arc;

use crate::{
    error::{Result, SiteGenError},
    gateway::ImageGenerator,
    models::GeneratedImage,
};

/// Image synthesis stage. Calls run one after another and keep input order.
#[derive(Clone)]
pub struct ImageSynthesizer {
    generator: Arc<dyn ImageGenerator>,
    fallback_url: String,
}

impl ImageSynthesizer {
    pub fn new(generator: Arc<dyn ImageGenerator>, fallback_url: impl Into<String>) -> Self {
        Self {
            generator,
            fallback_url: fallback_url.into(),
        }
    }

    /// One image per prompt; failures degrade to the fallback image and never
    /// escape this call.
    pub async fn synthesize(&self, prompts: &[String]) -> Vec<GeneratedImage> {
        let mut images = Vec::with_capacity(prompts.len());

        for (index, prompt) in prompts.iter().enumerate() {
            let image = match self.generator.generate_image(prompt).await {
                Ok(url) => {
                    log::info!("✅ Image {} generated", index);
                    GeneratedImage::generated(prompt, url)
                }
                Err(e) => {
                    log::warn!("⚠️  Image {} failed, using fallback: {}", index, e);
                    GeneratedImage::fallback(prompt, &self.fallback_url)
                }
            };
            images.push(image);
        }

        images
    }

    /// Variant backing the standalone image endpoint: gateway errors
    /// propagate and prompts that yield no image are skipped.
    pub async fn synthesize_strict(&self, prompts: &[String]) -> Result<Vec<GeneratedImage>> {
        let mut images = Vec::with_capacity(prompts.len());

        for prompt in prompts {
            log::info!("🎨 Generating image: {}", prompt);
            match self.generator.generate_image(prompt).await {
                Ok(url) => images.push(GeneratedImage::generated(prompt, url)),
                Err(SiteGenError::MalformedResponse(reason)) => {
                    log::warn!("⚠️  No image returned for '{}': {}", prompt, reason);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeImages, ImageOutcome};

    const FALLBACK: &str = "https://fallback/img.png";

    fn prompts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_synthesize_preserves_order() {
        let fake = Arc::new(FakeImages::new(vec![
            ImageOutcome::Url("https://img/0.png"),
            ImageOutcome::Url("https://img/1.png"),
        ]));
        let synthesizer = ImageSynthesizer::new(fake.clone(), FALLBACK);

        let images = synthesizer.synthesize(&prompts(&["first", "second"])).await;

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].url, "https://img/0.png");
        assert_eq!(images[0].prompt_text, "first");
        assert_eq!(images[1].url, "https://img/1.png");
        assert_eq!(images[1].alt_text, "second");
        assert_eq!(fake.prompts_seen(), prompts(&["first", "second"]));
    }

    #[tokio::test]
    async fn test_failures_degrade_to_fallback() {
        let fake = Arc::new(FakeImages::new(vec![
            ImageOutcome::Status(500),
            ImageOutcome::Url("https://img/1.png"),
            ImageOutcome::NoImage,
            ImageOutcome::Status(429),
        ]));
        let synthesizer = ImageSynthesizer::new(fake, FALLBACK);

        let images = synthesizer
            .synthesize(&prompts(&["a", "b", "c", "d"]))
            .await;

        assert_eq!(images.len(), 4);
        assert_eq!(images[0].url, FALLBACK);
        assert!(images[0].is_fallback());
        assert_eq!(images[1].url, "https://img/1.png");
        assert_eq!(images[2].url, FALLBACK);
        assert_eq!(images[3].url, FALLBACK);
    }

    #[tokio::test]
    async fn test_strict_skips_missing_and_propagates_quota() {
        let fake = Arc::new(FakeImages::new(vec![
            ImageOutcome::NoImage,
            ImageOutcome::Url("https://img/1.png"),
        ]));
        let synthesizer = ImageSynthesizer::new(fake, FALLBACK);
        let images = synthesizer.synthesize_strict(&prompts(&["a", "b"])).await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].prompt_text, "b");

        let fake = Arc::new(FakeImages::new(vec![ImageOutcome::Status(402)]));
        let synthesizer = ImageSynthesizer::new(fake, FALLBACK);
        let err = synthesizer
            .synthesize_strict(&prompts(&["a"]))
            .await
            .unwrap_err();
        assert!(matches!(err, SiteGenError::QuotaExhausted));
    }
}
