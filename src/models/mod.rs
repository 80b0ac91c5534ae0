pub mod design;
pub mod gemini;
pub mod image;

pub use design::{CycleStage, Critique, DesignResult, GeneratedVariant, Session};
pub use image::{EncodedImage, ImageContent, SourceImage};
