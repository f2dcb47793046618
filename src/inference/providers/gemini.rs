//! Gemini provider implementation using the `generateContent` REST endpoint.
//!
//! This module uses Gemini API terminology:
//! - "contents" (array of turns), each with "parts"
//! - "inlineData" for base64 media
//! - "candidates" in the response, each with a "finishReason"

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::config::DEFAULT_GEMINI_BASE_URL;
use crate::core::payload::{Part, Payload};
use crate::core::state::InlineData;
use crate::inference::{GenerativeModel, ModelResponse, ProviderError};

// ============================================================================
// Gemini API Types
// ============================================================================

/// One part of a turn: text or inline media.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
struct ApiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ApiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ApiPart>,
}

/// The request body for `models/{model}:generateContent`
#[derive(Serialize, Debug)]
struct GenerateContentRequest {
    contents: Vec<ApiContent>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ApiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
}

/// Finish reasons that mean the candidate carries no usable answer.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
    "LANGUAGE",
    "OTHER",
];

// ============================================================================
// Translation Layer
// ============================================================================

/// Converts a payload into a single user turn.
fn payload_to_contents(payload: &Payload) -> Vec<ApiContent> {
    let parts = payload
        .parts()
        .into_iter()
        .map(|part| match part {
            Part::Text(text) => ApiPart {
                text: Some(text),
                ..Default::default()
            },
            Part::Image(image) => ApiPart {
                inline_data: Some(image.inline_data),
                ..Default::default()
            },
        })
        .collect();

    vec![ApiContent {
        role: Some("user".to_string()),
        parts,
    }]
}

/// Pulls the answer out of a response, mirroring how the official SDKs
/// expose `response.text()`: the first candidate's text parts, joined.
fn extract_response(response: GenerateContentResponse) -> Result<ModelResponse, ProviderError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ProviderError::Blocked(reason));
        }
        return Ok(ModelResponse::default());
    };

    if let Some(reason) = candidate.finish_reason.as_deref()
        && BLOCKING_FINISH_REASONS.contains(&reason)
    {
        return Err(ProviderError::Blocked(reason.to_string()));
    }

    let parts = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    Ok(ModelResponse { parts })
}

/// Best-effort extraction of the API's error message from a failed response body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Gemini API provider
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String, base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            api_key,
            model,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model())
    }
}

#[async_trait]
impl GenerativeModel for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_content(&self, payload: &Payload) -> Result<ModelResponse, ProviderError> {
        let request = GenerateContentRequest {
            contents: payload_to_contents(payload),
        };

        info!(
            "Gemini request: model={}, parts={}, image={}",
            self.model(),
            request.contents.iter().map(|c| c.parts.len()).sum::<usize>(),
            payload.has_image()
        );

        let url = reqwest::Url::parse(&self.endpoint())
            .map_err(|e| ProviderError::Config(format!("invalid base URL: {e}")))?;

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("Gemini response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Gemini API error: {} - {}", status, err_body);
            return Err(ProviderError::Api {
                status,
                message: error_message(&err_body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))?;

        let result = extract_response(parsed);
        match &result {
            Ok(answer) => info!("Gemini answered with {} text parts", answer.parts.len()),
            Err(e) => warn!("Gemini answer unusable: {}", e),
        }
        result
    }
}
