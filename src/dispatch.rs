//! Selects and invokes the generator for a request.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::adapters::live::huggingface::{HuggingFaceGenerator, HUGGINGFACE_API_BASE};
#[cfg(feature = "openai")]
use crate::adapters::live::openai::{OpenAiGenerator, OPENAI_API_BASE};
use crate::adapters::live::stability::{StabilityGenerator, STABILITY_API_BASE};
use crate::adapters::local::{DemoGenerator, PlaceholderGenerator};
use crate::error::GenerateError;
use crate::ports::{GeneratedImage, GenerationRequest, ImageGenerator};
use crate::provider::Provider;

#[cfg(not(feature = "openai"))]
const OPENAI_API_BASE: &str = "https://api.openai.com";

/// Base URLs of the live providers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Hugging Face Inference API host.
    pub huggingface: String,
    /// `OpenAI` API host.
    pub openai: String,
    /// Stability AI host.
    pub stability: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            huggingface: HUGGINGFACE_API_BASE.to_string(),
            openai: OPENAI_API_BASE.to_string(),
            stability: STABILITY_API_BASE.to_string(),
        }
    }
}

/// Knobs the dispatcher passes on to the generators it builds.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Where the live providers are reached.
    pub endpoints: Endpoints,
    /// Simulated latency of the demo provider.
    pub demo_delay: Duration,
    /// Preferred caption font for the placeholder provider.
    pub font_path: Option<PathBuf>,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self { endpoints: Endpoints::default(), demo_delay: Duration::from_secs(1), font_path: None }
    }
}

/// Build the generator that handles `request`.
///
/// # Errors
///
/// Returns [`GenerateError::MissingCredential`] if a live provider has no
/// usable API key, or [`GenerateError::LibraryUnavailable`] if its client was
/// compiled out.
pub fn generator_for(
    request: &GenerationRequest,
    settings: &DispatchSettings,
) -> Result<Box<dyn ImageGenerator>, GenerateError> {
    let generator: Box<dyn ImageGenerator> = match request.provider {
        Provider::Demo => Box::new(DemoGenerator::new(settings.demo_delay)),
        Provider::Placeholder => Box::new(PlaceholderGenerator::new(settings.font_path.clone())),
        Provider::HuggingFace => {
            let key = require_key(request)?;
            Box::new(
                HuggingFaceGenerator::new(key).with_base_url(&settings.endpoints.huggingface),
            )
        }
        Provider::OpenAi => {
            let key = require_key(request)?;
            openai_generator(key, &settings.endpoints.openai)?
        }
        Provider::Stability => {
            let key = require_key(request)?;
            Box::new(StabilityGenerator::new(key).with_base_url(&settings.endpoints.stability))
        }
    };
    Ok(generator)
}

/// Generate one image for `request`.
///
/// Makes at most one attempt. Live providers without a key fail before any
/// network traffic; everything else is the adapter's result, unchanged.
///
/// # Errors
///
/// Returns whatever [`generator_for`] or the selected adapter returns.
pub async fn dispatch(
    request: &GenerationRequest,
    settings: &DispatchSettings,
) -> Result<GeneratedImage, GenerateError> {
    let generator = generator_for(request, settings)?;

    tracing::info!(
        "Generating {}x{} image with {}",
        request.width,
        request.height,
        request.provider
    );
    let result = generator.generate(request).await;

    match &result {
        Ok(image) => {
            tracing::debug!("{} returned {}x{}", image.provider, image.width(), image.height());
        }
        Err(e) => tracing::warn!("{} generation failed: {}", request.provider, e.underlying()),
    }
    result
}

fn require_key(request: &GenerationRequest) -> Result<String, GenerateError> {
    request.api_key().map(str::to_string).ok_or_else(|| {
        tracing::debug!("No API key for {}, skipping request", request.provider);
        GenerateError::MissingCredential {
            provider: request.provider,
            env_var: request.provider.env_var().unwrap_or_default(),
        }
    })
}

#[cfg(feature = "openai")]
#[allow(clippy::unnecessary_wraps)]
fn openai_generator(key: String, base_url: &str) -> Result<Box<dyn ImageGenerator>, GenerateError> {
    Ok(Box::new(OpenAiGenerator::new(key).with_base_url(base_url)))
}

#[cfg(not(feature = "openai"))]
fn openai_generator(_key: String, _base_url: &str) -> Result<Box<dyn ImageGenerator>, GenerateError> {
    Err(GenerateError::LibraryUnavailable(Provider::OpenAi))
}
