//! Builds the system and user turns sent to the text model.

use crate::models::{
    ChatMessage, CodeBundle, CompiledPrompt, ContentPart, GeneratedImage, GenerationMode,
    GenerationRequest, ImageUrl, ReferenceImage,
};

pub const CURRENT_CODE_HEADER: &str = "Current code:";

pub const INTERACTIVITY_REQUIREMENTS: &str = "CRITICAL REQUIREMENTS:
- ALL buttons must have working onclick handlers
- ALL forms must have working submit handlers and validation
- ALL navigation links must work properly
- ALL interactive elements must be fully functional
- Include proper event listeners in the JavaScript
- Make it responsive and modern
- Use clean, semantic HTML
- No placeholder or dummy buttons
- Every interactive element must DO something";

const IMAGE_PLACEHOLDER_RULES: &str = "- In the HTML, use placeholder image tags like <img data-ai-image=\"0\" alt=\"description\"/> where images should be inserted
- The imagePrompts field should be an array of 3-5 detailed prompts for AI-generated images that would make the website look professional and alive
- The number in data-ai-image is the index of the matching entry in imagePrompts
- Images should be for: hero sections, product displays, backgrounds, feature illustrations, etc.
- Each image prompt should be detailed and specify style (e.g., \"modern product photo\", \"abstract background\", \"professional illustration\")";

pub fn compile(request: &GenerationRequest, hero_image: Option<&GeneratedImage>) -> CompiledPrompt {
    let mode = request.mode();
    let system_instruction = match mode {
        GenerationMode::New => new_site_instruction(&request.prompt),
        GenerationMode::Revise(code) => revise_instruction(code, &request.prompt),
    };

    let mut text = request.prompt.clone();

    // A fallback image is a stand-in, not something the model should design around.
    if let Some(hero) = hero_image.filter(|hero| !hero.is_fallback()) {
        text.push_str(&hero_image_instruction(hero));
    }

    let user_turn = match &request.reference_image {
        Some(image) => {
            text.push_str(&reference_image_instruction(mode));
            reference_turn(text, image)
        }
        None => ChatMessage::user(text),
    };

    CompiledPrompt {
        system_instruction,
        user_turns: vec![user_turn],
    }
}

/// Prompt used to synthesize the hero image ahead of the main call.
pub fn hero_image_prompt(description: &str) -> String {
    format!(
        "Professional, high quality hero banner image for a website: {}. Wide landscape composition, modern style, no text overlay",
        description.trim()
    )
}

fn new_site_instruction(prompt: &str) -> String {
    format!(
        "You are a web development expert. Generate a complete, fully functional website based on the user's description. \
Return a single JSON object with exactly four fields: \"html\", \"css\", \"js\", and \"imagePrompts\".

{}
{}

User's description: {}",
        INTERACTIVITY_REQUIREMENTS, IMAGE_PLACEHOLDER_RULES, prompt
    )
}

fn revise_instruction(code: &CodeBundle, prompt: &str) -> String {
    format!(
        "You are a web development expert. The user wants to modify their existing website. \
Return a single JSON object with exactly three fields: \"html\", \"css\", and \"js\".

Each field must contain the COMPLETE updated file, replacing the current one entirely. \
Do not return a diff, a patch, or only the changed fragments. Keep everything the user did not ask to change.

{}
HTML: {}
CSS: {}
JS: {}

User's modification request: {}",
        CURRENT_CODE_HEADER, code.html, code.css, code.js, prompt
    )
}

fn hero_image_instruction(hero: &GeneratedImage) -> String {
    format!(
        "\n\nUse this exact image URL as the primary hero/banner image of the page: {}\nUse this alt text for it: \"{}\"",
        hero.url, hero.alt_text
    )
}

fn reference_image_instruction(mode: GenerationMode<'_>) -> String {
    let mut text = String::from(
        "\n\nThe attached image is a design reference. Use it as inspiration for layout, colors and style only; \
do not embed or reuse the image itself as an asset.",
    );
    if let GenerationMode::Revise(_) = mode {
        text.push_str(
            " Apply the inspiration as changes to the current code, which remains the base of the result.",
        );
    }
    text
}

fn reference_turn(text: String, image: &ReferenceImage) -> ChatMessage {
    ChatMessage::user_parts(vec![
        ContentPart::Text { text },
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: image.as_uri().to_string(),
            },
        },
    ])
}
