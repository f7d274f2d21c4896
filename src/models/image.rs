use serde::{Deserialize, Serialize};

const MAX_ALT_TEXT_CHARS: usize = 125;

/// An image produced for one prompt, or the fallback standing in for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub prompt_text: String,
    pub url: String,
    pub alt_text: String,
    #[serde(skip)]
    pub fallback: bool,
}

impl GeneratedImage {
    pub fn generated(prompt_text: &str, url: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.to_string(),
            url: url.into(),
            alt_text: derive_alt_text(prompt_text),
            fallback: false,
        }
    }

    pub fn fallback(prompt_text: &str, fallback_url: &str) -> Self {
        Self {
            prompt_text: prompt_text.to_string(),
            url: fallback_url.to_string(),
            alt_text: derive_alt_text(prompt_text),
            fallback: true,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Collapses whitespace and cuts the prompt at a word boundary.
pub fn derive_alt_text(prompt_text: &str) -> String {
    let collapsed = prompt_text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_ALT_TEXT_CHARS {
        return collapsed;
    }

    let mut alt = String::new();
    for word in collapsed.split(' ') {
        let extra = if alt.is_empty() { 0 } else { 1 };
        if alt.chars().count() + extra + word.chars().count() > MAX_ALT_TEXT_CHARS {
            break;
        }
        if !alt.is_empty() {
            alt.push(' ');
        }
        alt.push_str(word);
    }

    if alt.is_empty() {
        collapsed.chars().take(MAX_ALT_TEXT_CHARS).collect()
    } else {
        alt
    }
}

/// Body of the standalone image endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationRequest {
    pub prompts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRecord {
    pub prompt: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ImageGenerationResponse {
    pub images: Vec<ImageRecord>,
}

impl From<Vec<GeneratedImage>> for ImageGenerationResponse {
    fn from(images: Vec<GeneratedImage>) -> Self {
        Self {
            images: images
                .into_iter()
                .map(|image| ImageRecord {
                    prompt: image.prompt_text,
                    url: image.url,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alt_text_collapses_whitespace() {
        assert_eq!(
            derive_alt_text("  modern   product\nphoto "),
            "modern product photo"
        );
    }

    #[test]
    fn test_alt_text_truncates_on_word_boundary() {
        let prompt = "word ".repeat(60);
        let alt = derive_alt_text(&prompt);
        assert!(alt.chars().count() <= MAX_ALT_TEXT_CHARS);
        assert!(alt.ends_with("word"));

        let unbroken = "x".repeat(300);
        assert_eq!(derive_alt_text(&unbroken).len(), MAX_ALT_TEXT_CHARS);
    }

    #[test]
    fn test_fallback_flag() {
        let image = GeneratedImage::fallback("hero", "https://fallback/img.png");
        assert!(image.is_fallback());
        assert_eq!(image.url, "https://fallback/img.png");
        assert_eq!(image.alt_text, "hero");
        assert!(!GeneratedImage::generated("hero", "https://img/x.png").is_fallback());
    }
}
