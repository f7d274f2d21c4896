pub mod bundle;
pub mod image;
pub mod text;

pub use bundle::*;
pub use image::*;
pub use text::*;
