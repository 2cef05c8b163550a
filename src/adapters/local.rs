//! Generators that answer without any network traffic.

use std::path::PathBuf;
use std::time::Duration;

use image::{DynamicImage, Rgb, RgbImage};

use crate::error::GenerateError;
use crate::placeholder::render;
use crate::ports::image_generator::{
    GenerateFuture, GeneratedImage, GenerationRequest, ImageGenerator,
};
use crate::provider::Provider;

/// Fill colour of demo images.
pub const DEMO_COLOR: Rgb<u8> = Rgb([100, 150, 200]);

/// Returns a flat-colour image after a fixed delay. The prompt is ignored.
pub struct DemoGenerator {
    delay: Duration,
}

impl DemoGenerator {
    /// Create a demo generator that waits `delay` before answering.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl ImageGenerator for DemoGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let (width, height) = (request.width, request.height);
        Box::pin(async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let image = RgbImage::from_pixel(width, height, DEMO_COLOR);
            Ok(GeneratedImage { image: DynamicImage::ImageRgb8(image), provider: Provider::Demo })
        })
    }
}

/// Draws the prompt onto a gradient.
pub struct PlaceholderGenerator {
    font_path: Option<PathBuf>,
}

impl PlaceholderGenerator {
    /// Create a placeholder generator, optionally preferring a specific font file.
    #[must_use]
    pub fn new(font_path: Option<PathBuf>) -> Self {
        Self { font_path }
    }
}

impl ImageGenerator for PlaceholderGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        let font_path = self.font_path.clone();
        Box::pin(async move {
            // Font loading reads from disk and drawing is CPU-bound.
            let image = tokio::task::spawn_blocking(move || {
                render(&request.prompt, request.width, request.height, font_path.as_deref())
            })
            .await
            .map_err(|e| GenerateError::Io(std::io::Error::other(e)))?;
            Ok(GeneratedImage {
                image: DynamicImage::ImageRgb8(image),
                provider: Provider::Placeholder,
            })
        })
    }
}
