//! Website generation pipeline.
//!
//! A prompt (plus optional reference image and optional existing site) goes in,
//! an `{html, css, js}` bundle comes out. New sites get a synthesized hero image
//! and the model's image placeholders filled; revisions reuse the site's assets.

pub mod config;
pub mod error;
pub mod gateway;
pub mod logger;
pub mod models;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Config, GatewayConfig};
pub use error::{Result, SiteGenError};
pub use gateway::{GatewayClient, ImageGenerator, TextGenerator};
pub use models::{CodeBundle, GeneratedImage, GenerationMode, GenerationRequest, ReferenceImage};
pub use pipeline::{ImageSynthesizer, Pipeline};
