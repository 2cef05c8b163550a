//! Live adapter for the Stability AI REST API.

use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::GenerateError;
use crate::ports::image_generator::{
    decode_image, GenerateFuture, GenerationRequest, ImageGenerator,
};
use crate::provider::Provider;

/// Public Stability AI host.
pub const STABILITY_API_BASE: &str = "https://api.stability.ai";

const STABILITY_ENGINE: &str = "stable-diffusion-xl-1024-v1-0";

/// Live Stability AI generator. Images come back base64-encoded in JSON.
pub struct StabilityGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl StabilityGenerator {
    /// Create a new Stability generator with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key, base_url: STABILITY_API_BASE.to_string() }
    }

    /// Send requests to another host, e.g. a proxy or a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl ImageGenerator for StabilityGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url =
                format!("{}/v1/generation/{STABILITY_ENGINE}/text-to-image", self.base_url);

            let body = serde_json::json!({
                "text_prompts": [{ "text": request.prompt }],
                "cfg_scale": 7,
                "width": request.width,
                "height": request.height,
                "steps": 20,
                "samples": 1,
            });

            tracing::debug!("Sending image request to Stability AI");
            let response = self
                .client
                .post(&url)
                .header("Accept", "application/json")
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if status != StatusCode::OK {
                tracing::error!("Stability AI error (status {status}): {response_text}");
                return Err(GenerateError::Api {
                    provider: Provider::Stability,
                    status: status.as_u16(),
                    body: response_text,
                });
            }

            let parsed: StabilityResponse = serde_json::from_str(&response_text)
                .map_err(|e| GenerateError::Decoding(format!("Failed to parse response: {e}")))?;
            let artifact = parsed
                .artifacts
                .first()
                .ok_or_else(|| GenerateError::Decoding("No artifacts in response".into()))?;
            let data = base64::engine::general_purpose::STANDARD
                .decode(&artifact.base64)
                .map_err(|e| GenerateError::Decoding(format!("Failed to decode base64: {e}")))?;

            decode_image(&data, Provider::Stability)
        })
    }
}

// --- Stability API response types ---

#[derive(Deserialize)]
struct StabilityResponse {
    artifacts: Vec<StabilityArtifact>,
}

#[derive(Deserialize)]
struct StabilityArtifact {
    base64: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image";

    fn png_base64(width: u32, height: u32) -> String {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([1, 2, 3]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png).unwrap();
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("a misty forest", 1024, 1024, Provider::Stability, None).unwrap()
    }

    #[tokio::test]
    async fn decodes_first_artifact() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("Accept", "application/json"))
            .and(header("Authorization", "Bearer sk-stab"))
            .and(body_partial_json(serde_json::json!({
                "text_prompts": [{ "text": "a misty forest" }],
                "cfg_scale": 7,
                "width": 1024,
                "height": 1024,
                "steps": 20,
                "samples": 1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "artifacts": [
                    { "base64": png_base64(64, 64), "seed": 1, "finishReason": "SUCCESS" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = StabilityGenerator::new("sk-stab".into()).with_base_url(server.uri());
        let image = generator.generate(&request()).await.unwrap();

        assert_eq!((image.width(), image.height()), (64, 64));
        assert_eq!(image.image.to_rgb8().get_pixel(5, 5).0, [1, 2, 3]);
    }

    #[tokio::test]
    async fn error_status_carries_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(401).set_body_string("{\"message\":\"Invalid API key\"}"))
            .mount(&server)
            .await;

        let generator = StabilityGenerator::new("bad".into()).with_base_url(server.uri());
        let err = generator.generate(&request()).await.unwrap_err();

        assert!(matches!(err, GenerateError::Api { status: 401, ref body, .. } if body.contains("Invalid API key")));
    }

    #[tokio::test]
    async fn missing_artifacts_is_decoding_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "artifacts": [] })))
            .mount(&server)
            .await;

        let generator = StabilityGenerator::new("sk-stab".into()).with_base_url(server.uri());
        let err = generator.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerateError::Decoding(_)));
    }

    #[tokio::test]
    async fn bad_base64_is_decoding_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "artifacts": [{ "base64": "%%% not base64 %%%" }]
            })))
            .mount(&server)
            .await;

        let generator = StabilityGenerator::new("sk-stab".into()).with_base_url(server.uri());
        let err = generator.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerateError::Decoding(_)));
    }
}
