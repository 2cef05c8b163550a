//! Live adapter for the Hugging Face Inference API.

use reqwest::{Client, StatusCode};

use crate::error::GenerateError;
use crate::ports::image_generator::{
    decode_image, GenerateFuture, GenerationRequest, ImageGenerator,
};
use crate::provider::Provider;

/// Public Inference API host.
pub const HUGGINGFACE_API_BASE: &str = "https://api-inference.huggingface.co";

const HUGGINGFACE_MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";
const INFERENCE_STEPS: u32 = 20;

/// Live Hugging Face generator. The response body is the image itself.
pub struct HuggingFaceGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl HuggingFaceGenerator {
    /// Create a new Hugging Face generator with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key, base_url: HUGGINGFACE_API_BASE.to_string() }
    }

    /// Send requests to another host, e.g. a proxy or a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl ImageGenerator for HuggingFaceGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = format!("{}/models/{HUGGINGFACE_MODEL}", self.base_url);

            let body = serde_json::json!({
                "inputs": request.prompt,
                "parameters": {
                    "width": request.width,
                    "height": request.height,
                    "num_inference_steps": INFERENCE_STEPS,
                }
            });

            tracing::debug!("Sending image request to Hugging Face");
            let response = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if status != StatusCode::OK {
                let body = response.text().await?;
                tracing::error!("Hugging Face API error (status {status}): {body}");
                return Err(GenerateError::Api {
                    provider: Provider::HuggingFace,
                    status: status.as_u16(),
                    body,
                });
            }

            let bytes = response.bytes().await?;
            decode_image(&bytes, Provider::HuggingFace)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png).unwrap();
        bytes
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("a lighthouse", 640, 384, Provider::HuggingFace, None).unwrap()
    }

    #[tokio::test]
    async fn returns_decoded_image() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/stabilityai/stable-diffusion-xl-base-1.0"))
            .and(header("Authorization", "Bearer hf-key"))
            .and(body_partial_json(serde_json::json!({
                "inputs": "a lighthouse",
                "parameters": { "width": 640, "height": 384, "num_inference_steps": 20 }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(png_bytes(640, 384)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let generator = HuggingFaceGenerator::new("hf-key".into()).with_base_url(server.uri());
        let image = generator.generate(&request()).await.unwrap();

        assert_eq!((image.width(), image.height()), (640, 384));
        assert_eq!(image.provider, Provider::HuggingFace);
    }

    #[tokio::test]
    async fn non_200_carries_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Model is loading"))
            .mount(&server)
            .await;

        let generator = HuggingFaceGenerator::new("hf-key".into()).with_base_url(server.uri());
        let err = generator.generate(&request()).await.unwrap_err();

        match err {
            GenerateError::Api { provider, status, body } => {
                assert_eq!(provider, Provider::HuggingFace);
                assert_eq!(status, 503);
                assert_eq!(body, "Model is loading");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn other_success_codes_are_failures() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202).set_body_string("queued"))
            .mount(&server)
            .await;

        let generator = HuggingFaceGenerator::new("hf-key".into()).with_base_url(server.uri());
        let err = generator.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerateError::Api { status: 202, .. }));
    }

    #[tokio::test]
    async fn garbage_body_is_decoding_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"{\"not\":\"png\"}".to_vec()))
            .mount(&server)
            .await;

        let generator = HuggingFaceGenerator::new("hf-key".into()).with_base_url(server.uri());
        let err = generator.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerateError::Decoding(_)));
    }
}
