//! Gemini client
//!
//! Each `generate` call is exactly one HTTP attempt. Deadlines and retries are
//! applied by the caller, so the reqwest client carries only a connect timeout.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use tracing::debug;

use super::error::GeminiErrorMapper;
use super::models::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
};
use crate::config::ProviderConfig;
use crate::core::providers::remote::{
    RemoteCall, RemoteFailure, RemoteGenerator, RemotePart, RemotePayload, ResponseModality,
};
use crate::utils::error::{GatewayError, Result};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: ProviderConfig,
    http_client: Client,
}

impl GeminiClient {
    /// Create a client; fails without an API key
    pub fn new(config: ProviderConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GatewayError::config(
                "Gemini API key is not set (GEMINI_API_KEY or provider.api_key)",
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| GatewayError::config(format!("Invalid API key format: {}", e)))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let http_client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn model_for(&self, modality: ResponseModality) -> &str {
        match modality {
            ResponseModality::Text => &self.config.text_model,
            ResponseModality::Image => &self.config.image_model,
        }
    }

    /// Endpoint URL for a model
    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Request body for a call
    pub fn build_request_body(call: &RemoteCall) -> GenerateContentRequest {
        let parts = call
            .parts
            .iter()
            .map(|part| match part {
                RemotePart::Text(text) => Part {
                    text: Some(text.clone()),
                    ..Default::default()
                },
                RemotePart::InlineData { mime_type, data } => Part {
                    inline_data: Some(InlineData {
                        mime_type: mime_type.clone(),
                        data: BASE64.encode(data),
                    }),
                    ..Default::default()
                },
            })
            .collect();

        let response_modalities = match call.modality {
            ResponseModality::Text => vec!["TEXT".to_string()],
            ResponseModality::Image => vec!["IMAGE".to_string(), "TEXT".to_string()],
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfig {
                response_modalities,
            },
        }
    }

    /// Extract the artifact from a successful response body
    pub fn parse_response(
        modality: ResponseModality,
        body: &str,
    ) -> std::result::Result<RemotePayload, RemoteFailure> {
        let response: GenerateContentResponse = serde_json::from_str(body)
            .map_err(|e| RemoteFailure::protocol(format!("Invalid response JSON: {}", e)))?;

        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return Err(GeminiErrorMapper::blocked_prompt(reason));
        }

        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| RemoteFailure::protocol("Response contained no candidates"))?;

        let parts: &[Part] = candidate
            .content
            .as_ref()
            .map(|content| content.parts.as_slice())
            .unwrap_or_default();

        let payload = match modality {
            ResponseModality::Image => Self::first_image(parts)?,
            ResponseModality::Text => Self::joined_text(parts),
        };

        match payload {
            Some(payload) => Ok(payload),
            None => {
                if let Some(refusal) = candidate
                    .finish_reason
                    .as_deref()
                    .and_then(GeminiErrorMapper::refusal)
                {
                    return Err(refusal);
                }
                Err(RemoteFailure::protocol(match modality {
                    ResponseModality::Image => "Response contained no image data",
                    ResponseModality::Text => "Response contained no text",
                }))
            }
        }
    }

    fn first_image(parts: &[Part]) -> std::result::Result<Option<RemotePayload>, RemoteFailure> {
        let Some(inline) = parts
            .iter()
            .filter_map(|part| part.inline_data.as_ref())
            .find(|inline| inline.mime_type.starts_with("image/"))
        else {
            return Ok(None);
        };

        let bytes = BASE64
            .decode(inline.data.as_bytes())
            .map_err(|e| RemoteFailure::protocol(format!("Invalid base64 image data: {}", e)))?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(RemotePayload::image(bytes, inline.mime_type.clone())))
    }

    fn joined_text(parts: &[Part]) -> Option<RemotePayload> {
        let text: String = parts
            .iter()
            .filter(|part| part.thought != Some(true))
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then(|| RemotePayload::text(text))
    }
}

#[async_trait]
impl RemoteGenerator for GeminiClient {
    async fn generate(&self, call: &RemoteCall) -> std::result::Result<RemotePayload, RemoteFailure> {
        let model = self.model_for(call.modality);
        let url = self.endpoint(model);
        let body = Self::build_request_body(call);

        debug!(
            model,
            parts = call.parts.len(),
            inline = call.inline_parts(),
            "Sending Gemini request"
        );

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeminiErrorMapper::from_transport(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GeminiErrorMapper::from_transport(&e))?;

        debug!(model, status = status.as_u16(), bytes = text.len(), "Gemini response received");

        if !status.is_success() {
            return Err(GeminiErrorMapper::from_http_status(status.as_u16(), &text));
        }

        Self::parse_response(call.modality, &text)
    }
}
