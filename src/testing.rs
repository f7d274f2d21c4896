//! Scripted generators for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    error::{Result, SiteGenError},
    gateway::{classify_status, ImageGenerator, TextGenerator},
    models::CompiledPrompt,
};

#[derive(Debug, Clone)]
pub enum ImageOutcome {
    Url(&'static str),
    Status(u16),
    NoImage,
}

#[derive(Default)]
pub struct FakeImages {
    outcomes: Mutex<VecDeque<ImageOutcome>>,
    seen: Mutex<Vec<String>>,
}

impl FakeImages {
    pub fn new(outcomes: Vec<ImageOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts_seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageGenerator for FakeImages {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        self.seen.lock().unwrap().push(prompt.to_string());
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ImageOutcome::Status(500));

        match outcome {
            ImageOutcome::Url(url) => Ok(url.to_string()),
            ImageOutcome::Status(status) => Err(classify_status(status, "scripted failure")),
            ImageOutcome::NoImage => Err(SiteGenError::MalformedResponse(
                "response carried no image".into(),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub enum TextOutcome {
    Content(String),
    Status(u16),
}

pub struct FakeText {
    outcome: TextOutcome,
    seen: Mutex<Vec<CompiledPrompt>>,
}

impl FakeText {
    pub fn returning(content: impl Into<String>) -> Self {
        Self {
            outcome: TextOutcome::Content(content.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            outcome: TextOutcome::Status(status),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts_seen(&self) -> Vec<CompiledPrompt> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeText {
    async fn generate_text(&self, prompt: &CompiledPrompt) -> Result<String> {
        self.seen.lock().unwrap().push(prompt.clone());
        match &self.outcome {
            TextOutcome::Content(content) => Ok(content.clone()),
            TextOutcome::Status(status) => Err(classify_status(*status, "scripted failure")),
        }
    }
}
