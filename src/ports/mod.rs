//! Port traits defining external boundaries.
//!
//! The dispatch core talks to every provider through [`ImageGenerator`].
//! Implementations live in `src/adapters/`.

pub mod image_generator;

pub use image_generator::{GeneratedImage, GenerationRequest, ImageGenerator};
