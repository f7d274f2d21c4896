use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{Result, SiteGenError},
    models::{CodeBundle, GeneratedImage, ModelOutput},
};

pub const PLACEHOLDER_ATTRIBUTE: &str = "data-ai-image";

// Any start tag carrying data-ai-image. The index is captured whole (quoted or
// unquoted) so "1" can never match inside "10".
static PLACEHOLDER_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<(?P<tag>[A-Za-z][A-Za-z0-9-]*)\b[^>]*?\sdata-ai-image\s*=\s*(?:"\s*(?P<dq>\d+)\s*"|'\s*(?P<sq>\d+)\s*'|(?P<bare>\d+)\b)[^>]*>"#,
    )
    .expect("placeholder pattern compiles")
});

static PLACEHOLDER_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\sdata-ai-image\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>/]+)"#)
        .expect("placeholder attribute pattern compiles")
});

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Parses raw model output and splices `images` into its placeholders.
pub fn assemble(raw_model_output: &str, images: &[GeneratedImage]) -> Result<CodeBundle> {
    let output = parse_model_output(raw_model_output)?;
    Ok(assemble_output(output, images))
}

pub fn parse_model_output(raw: &str) -> Result<ModelOutput> {
    serde_json::from_str(strip_code_fence(raw)).map_err(|e| {
        log::error!("❌ Failed to parse AI response as JSON: {}", e);
        SiteGenError::MalformedResponse(e.to_string())
    })
}

pub fn assemble_output(output: ModelOutput, images: &[GeneratedImage]) -> CodeBundle {
    let html = output.html.unwrap_or_default();
    CodeBundle {
        html: substitute_placeholders(&html, images),
        css: output.css.unwrap_or_default(),
        js: output.js.unwrap_or_default(),
    }
}

/// Replaces every placeholder whose index has an image; others stay as emitted.
///
/// An empty element (`<div data-ai-image="0"></div>`) is replaced together with its
/// closing tag. An element with content keeps its tags and gets the image as its
/// first child.
pub fn substitute_placeholders(html: &str, images: &[GeneratedImage]) -> String {
    if images.is_empty() {
        return html.to_string();
    }

    let mut output = String::with_capacity(html.len());
    let mut cursor = 0;
    for caps in PLACEHOLDER_TAG.captures_iter(html) {
        let Some(tag) = caps.get(0) else { continue };
        if tag.start() < cursor {
            continue;
        }
        let image = ["dq", "sq", "bare"]
            .iter()
            .find_map(|group| caps.name(group))
            .and_then(|index| index.as_str().parse::<usize>().ok())
            .and_then(|index| images.get(index));
        let Some(image) = image else { continue };

        output.push_str(&html[cursor..tag.start()]);
        cursor = tag.end();

        let name = caps.name("tag").map_or("", |name| name.as_str());
        if tag.as_str().ends_with("/>") || is_void_element(name) {
            output.push_str(&image_tag(image));
        } else if let Some(close_len) = empty_element_close(&html[cursor..], name) {
            output.push_str(&image_tag(image));
            cursor += close_len;
        } else {
            output.push_str(&PLACEHOLDER_ATTR.replace(tag.as_str(), ""));
            output.push_str(&image_tag(image));
        }
    }
    output.push_str(&html[cursor..]);
    output
}

fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

/// Length of `rest` up to and including `</name>` when only whitespace precedes it.
fn empty_element_close(rest: &str, name: &str) -> Option<usize> {
    let after_space = rest.trim_start();
    let closing = after_space.strip_prefix("</")?;
    if !closing.get(..name.len())?.eq_ignore_ascii_case(name) {
        return None;
    }
    let remainder = closing[name.len()..].trim_start().strip_prefix('>')?;
    Some(rest.len() - remainder.len())
}

fn image_tag(image: &GeneratedImage) -> String {
    format!(
        r#"<img src="{}" alt="{}" style="width: 100%; height: auto; object-fit: cover;">"#,
        escape_attribute(&image.url),
        escape_attribute(&image.alt_text)
    )
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Language tag, with or without a newline after it.
    let body = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()).trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}
