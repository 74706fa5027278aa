//! Gemini generateContent client.
//!
//! Encodes an image and a prompt into the vendor request envelope, performs
//! one HTTP POST per analysis, and extracts the first generated text segment
//! from the first candidate. Transport failures, non-2xx statuses, and
//! malformed JSON all surface as `PictagError::Backend`; a well-formed
//! response with no usable candidate surfaces as `PictagError::EmptyResponse`.
//! Retries, if any, are the caller's decision.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use pictag_core::config::GeminiConfig;
use pictag_core::error::PictagError;

use crate::{PromptKind, VisionService};

/// Vision client for the generative language REST API.
#[derive(Debug, Clone)]
pub struct GeminiVisionService {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl GeminiVisionService {
    /// Build a client from configuration.
    ///
    /// The request timeout comes from config and is finite; its expiry is
    /// reported as a backend error like any other transport failure.
    pub fn new(config: &GeminiConfig) -> Result<Self, PictagError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| PictagError::Backend(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.resolved_api_key(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.api_base, self.model)
    }
}

impl VisionService for GeminiVisionService {
    async fn analyze(
        &self,
        image: &[u8],
        mime_type: &str,
        kind: PromptKind,
    ) -> Result<String, PictagError> {
        let payload = build_request(image, mime_type, kind.prompt());
        let endpoint = self.endpoint();
        debug!(endpoint = %endpoint, kind = ?kind, image_size = image.len(), "Calling Gemini");

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| PictagError::Backend(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PictagError::Backend(format!(
                "Gemini returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PictagError::Backend(format!("Gemini response was not valid JSON: {}", e)))?;

        extract_text(&parsed)
    }
}

// =============================================================================
// Request/response envelope
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    // The API emits camelCase but accepts either; requests use snake_case.
    #[serde(
        rename = "inline_data",
        alias = "inlineData",
        skip_serializing_if = "Option::is_none"
    )]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct InlineData {
    #[serde(rename = "mime_type", alias = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    content: Option<Content>,
}

/// Build the multi-part request payload: inline image data first, then the
/// prompt text, in a single content entry.
pub(crate) fn build_request(image: &[u8], mime_type: &str, prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: mime_type.to_string(),
                        data: BASE64.encode(image),
                    }),
                },
                Part {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                },
            ],
        }],
    }
}

/// Extract the first text segment of the first candidate, trimmed.
pub(crate) fn extract_text(response: &GenerateContentResponse) -> Result<String, PictagError> {
    let text = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| content.parts.iter().find_map(|part| part.text.as_deref()));

    match text {
        Some(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
        _ => Err(PictagError::EmptyResponse),
    }
}
