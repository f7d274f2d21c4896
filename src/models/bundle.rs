use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Result, SiteGenError};

/// One complete, independently renderable website snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBundle {
    pub html: String,
    pub css: String,
    pub js: String,
}

impl CodeBundle {
    pub fn new(html: impl Into<String>, css: impl Into<String>, js: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            js: js.into(),
        }
    }
}

/// Inbound request for one pipeline invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub existing_code: Option<CodeBundle>,
    #[serde(default, rename = "image", alias = "referenceImage")]
    pub reference_image: Option<ReferenceImage>,
}

/// New site vs. revision of an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode<'a> {
    New,
    Revise(&'a CodeBundle),
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            existing_code: None,
            reference_image: None,
        }
    }

    pub fn with_existing_code(mut self, code: CodeBundle) -> Self {
        self.existing_code = Some(code);
        self
    }

    pub fn with_reference_image(mut self, image: ReferenceImage) -> Self {
        self.reference_image = Some(image);
        self
    }

    pub fn mode(&self) -> GenerationMode<'_> {
        match &self.existing_code {
            Some(code) => GenerationMode::Revise(code),
            None => GenerationMode::New,
        }
    }
}

/// A `data:image/...;base64,...` URI supplied as design inspiration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferenceImage {
    uri: String,
    mime_type: String,
}

impl ReferenceImage {
    pub fn parse(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        let rest = uri.strip_prefix("data:").ok_or_else(|| {
            SiteGenError::InvalidRequest("reference image must be a data URI".into())
        })?;
        let (header, payload) = rest.split_once(',').ok_or_else(|| {
            SiteGenError::InvalidRequest("reference image data URI has no payload".into())
        })?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
            SiteGenError::InvalidRequest("reference image must be base64 encoded".into())
        })?;
        if !mime_type.starts_with("image/") {
            return Err(SiteGenError::InvalidRequest(format!(
                "unsupported reference image type: {}",
                mime_type
            )));
        }
        if payload.is_empty() {
            return Err(SiteGenError::InvalidRequest(
                "reference image payload is empty".into(),
            ));
        }
        STANDARD.decode(payload).map_err(|e| {
            SiteGenError::InvalidRequest(format!("reference image is not valid base64: {}", e))
        })?;

        Ok(Self {
            uri: uri.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    pub fn as_uri(&self) -> &str {
        &self.uri
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

impl TryFrom<String> for ReferenceImage {
    type Error = SiteGenError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ReferenceImage> for String {
    fn from(image: ReferenceImage) -> Self {
        image.uri
    }
}

/// The JSON object the model is asked to return.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelOutput {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub css: Option<String>,
    #[serde(default)]
    pub js: Option<String>,
    #[serde(default, rename = "imagePrompts", deserialize_with = "lenient_prompts")]
    pub image_prompts: Vec<String>,
}

impl ModelOutput {
    pub fn image_prompts(&self) -> &[String] {
        &self.image_prompts
    }
}

// Keeps the usable string prompts; any other shape yields none instead of failing
// the whole response.
fn lenient_prompts<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let prompts = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(prompt) => Some(prompt),
                _ => None,
            })
            .collect(),
        Value::String(prompt) => vec![prompt],
        _ => Vec::new(),
    };
    Ok(prompts
        .into_iter()
        .filter(|prompt| !prompt.trim().is_empty())
        .collect())
}
