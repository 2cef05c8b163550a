//! Live adapter for the `OpenAI` DALL-E 3 image API.

use base64::Engine;
use image::imageops::FilterType;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::{GenerateError, Guidance};
use crate::params::nearest_openai_size;
use crate::ports::image_generator::{
    decode_image, GenerateFuture, GeneratedImage, GenerationRequest, ImageGenerator,
};
use crate::provider::Provider;

/// Public `OpenAI` API host.
pub const OPENAI_API_BASE: &str = "https://api.openai.com";

const OPENAI_MODEL: &str = "dall-e-3";

/// Live `OpenAI` generator.
///
/// DALL-E 3 only renders three sizes, so the closest one is requested and
/// the download is resampled to the exact dimensions asked for.
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiGenerator {
    /// Create a new `OpenAI` generator with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key, base_url: OPENAI_API_BASE.to_string() }
    }

    /// Send requests to another host, e.g. a proxy or a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn create_and_fetch(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedImage, GenerateError> {
        let size = nearest_openai_size(request.width, request.height);
        let body = serde_json::json!({
            "model": OPENAI_MODEL,
            "prompt": request.prompt,
            "size": size,
            "quality": "standard",
            "n": 1,
        });

        tracing::debug!("Requesting {size} image from OpenAI");
        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(GenerateError::Api {
                provider: Provider::OpenAi,
                status: status.as_u16(),
                body: response_text,
            });
        }

        let parsed: OpenAiResponse = serde_json::from_str(&response_text)
            .map_err(|e| GenerateError::Decoding(format!("Failed to parse response: {e}")))?;
        let item = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| GenerateError::Decoding("No images in response".into()))?;

        let bytes = match (item.url, item.b64_json) {
            (Some(url), _) => self.download(&url).await?,
            (None, Some(b64)) => base64::engine::general_purpose::STANDARD
                .decode(&b64)
                .map_err(|e| GenerateError::Decoding(format!("Failed to decode base64: {e}")))?,
            (None, None) => {
                return Err(GenerateError::Decoding(
                    "No image data (neither URL nor base64) in response".into(),
                ));
            }
        };

        let mut generated = decode_image(&bytes, Provider::OpenAi)?;
        if (generated.width(), generated.height()) != (request.width, request.height) {
            tracing::debug!(
                "Resizing {}x{} to {}x{}",
                generated.width(),
                generated.height(),
                request.width,
                request.height
            );
            generated.image =
                generated.image.resize_exact(request.width, request.height, FilterType::Lanczos3);
        }
        Ok(generated)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, GenerateError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let source =
                GenerateError::Api { provider: Provider::OpenAi, status: status.as_u16(), body };
            return Err(classify_failure(
                source,
                format!("Failed to download image: {}", status.as_u16()),
            ));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

impl ImageGenerator for OpenAiGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            self.create_and_fetch(&request).await.map_err(|e| {
                tracing::error!("OpenAI request failed: {}", e.underlying());
                if matches!(e, GenerateError::OpenAi { .. }) {
                    return e;
                }
                let message = match &e {
                    GenerateError::Api { status, body, .. } => {
                        format!("Error code: {status} - {body}")
                    }
                    other => other.to_string(),
                };
                classify_failure(e, message)
            })
        })
    }
}

/// Wrap a failure with the guidance derived from `message`. An API error is
/// classified on its response body only.
fn classify_failure(source: GenerateError, message: String) -> GenerateError {
    let guidance = match &source {
        GenerateError::Api { body, .. } => Guidance::classify(body),
        _ => Guidance::classify(&message),
    };
    GenerateError::OpenAi { guidance, message, source: Box::new(source) }
}

// --- OpenAI API response types ---

#[derive(Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiImageData>,
}

#[derive(Deserialize)]
struct OpenAiImageData {
    url: Option<String>,
    b64_json: Option<String>,
}
