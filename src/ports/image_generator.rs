//! Image generator port shared by every provider.

use std::fmt;
use std::future::Future;
use std::io::Cursor;
use std::pin::Pin;

use image::DynamicImage;

use crate::error::GenerateError;
use crate::params::validate_dimension;
use crate::provider::Provider;

/// A request to generate one image.
#[derive(Clone)]
pub struct GenerationRequest {
    /// The text prompt, already trimmed.
    pub prompt: String,
    /// Requested width in pixels.
    pub width: u32,
    /// Requested height in pixels.
    pub height: u32,
    /// Which provider should handle the request.
    pub provider: Provider,
    /// API key passed through to the provider, if any.
    pub credential: Option<String>,
}

impl GenerationRequest {
    /// Build a validated request.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt is blank or a dimension is out of range.
    pub fn new(
        prompt: &str,
        width: u32,
        height: u32,
        provider: Provider,
        credential: Option<String>,
    ) -> Result<Self, GenerateError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerateError::InvalidArgument("Prompt must not be empty".into()));
        }
        validate_dimension("width", width).map_err(GenerateError::InvalidArgument)?;
        validate_dimension("height", height).map_err(GenerateError::InvalidArgument)?;
        Ok(Self { prompt: prompt.to_string(), width, height, provider, credential })
    }

    /// The credential, if it is present and not blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.credential.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("prompt", &self.prompt)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("provider", &self.provider)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A decoded image handed back to the caller.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// The pixels.
    pub image: DynamicImage,
    /// The provider that produced them.
    pub provider: Provider,
}

impl GeneratedImage {
    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode the image as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoder rejects the pixel layout.
    pub fn to_png(&self) -> Result<Vec<u8>, GenerateError> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, image::ImageFormat::Png)
            .map_err(|e| GenerateError::Encoding(format!("Failed to encode PNG: {e}")))?;
        Ok(buf.into_inner())
    }
}

/// Decode provider response bytes into an image.
///
/// # Errors
///
/// Returns [`GenerateError::Decoding`] if the bytes are not a supported image.
pub fn decode_image(bytes: &[u8], provider: Provider) -> Result<GeneratedImage, GenerateError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| GenerateError::Decoding(format!("Failed to decode image: {e}")))?;
    Ok(GeneratedImage { image, provider })
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GeneratedImage, GenerateError>> + Send + 'a>>;

/// Generates an image from a text prompt.
pub trait ImageGenerator: Send + Sync {
    /// Generate an image for the given request.
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_trimmed() {
        let request =
            GenerationRequest::new("  a cat  ", 512, 512, Provider::Demo, None).unwrap();
        assert_eq!(request.prompt, "a cat");
    }

    #[test]
    fn blank_prompt_rejected() {
        let err = GenerationRequest::new("   ", 512, 512, Provider::Demo, None).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidArgument(_)));
    }

    #[test]
    fn dimensions_bounded() {
        assert!(GenerationRequest::new("a cat", 32, 512, Provider::Demo, None).is_err());
        assert!(GenerationRequest::new("a cat", 512, 3000, Provider::Demo, None).is_err());
        assert!(GenerationRequest::new("a cat", 2048, 64, Provider::Demo, None).is_ok());
    }

    #[test]
    fn blank_credential_is_absent() {
        let mut request =
            GenerationRequest::new("a cat", 512, 512, Provider::OpenAi, Some("  ".into()))
                .unwrap();
        assert!(request.api_key().is_none());
        request.credential = Some("sk-test".into());
        assert_eq!(request.api_key(), Some("sk-test"));
    }

    #[test]
    fn debug_redacts_credential() {
        let request =
            GenerationRequest::new("a cat", 512, 512, Provider::OpenAi, Some("sk-secret".into()))
                .unwrap();
        let debug = format!("{request:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn decode_garbage_fails() {
        let err = decode_image(b"not an image", Provider::HuggingFace).unwrap_err();
        assert!(matches!(err, GenerateError::Decoding(_)));
    }

    #[test]
    fn decode_png() {
        let original = GeneratedImage {
            image: DynamicImage::new_rgb8(3, 2),
            provider: Provider::Demo,
        };
        let png = original.to_png().unwrap();
        let decoded = decode_image(&png, Provider::Demo).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }
}
