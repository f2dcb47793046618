use std::fmt;

use async_trait::async_trait;

use crate::core::payload::Payload;

/// Errors that can occur during provider operations.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider misconfigured (bad URL). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned an error response.
    Api { status: u16, message: String },
    /// Failed to parse the provider's response.
    Parse(String),
    /// The model refused to answer (safety filters, recitation, ...).
    Blocked(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
            ProviderError::Blocked(reason) => write!(f, "response blocked: {reason}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// A completed model answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    /// Text fragments of the answer, in order.
    pub parts: Vec<String>,
}

impl ModelResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![text.into()],
        }
    }

    /// The full answer text; empty when the model produced none.
    pub fn text(&self) -> String {
        self.parts.concat()
    }
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Sends one payload and waits for the complete answer.
    async fn generate_content(&self, payload: &Payload) -> Result<ModelResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_concatenates_parts() {
        let response = ModelResponse {
            parts: vec!["Hi".to_string(), " there".to_string()],
        };
        assert_eq!(response.text(), "Hi there");
        assert_eq!(ModelResponse::default().text(), "");
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::Api {
            status: 403,
            message: "API key not valid".to_string(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 403): API key not valid");
        assert_eq!(
            ProviderError::Blocked("SAFETY".to_string()).to_string(),
            "response blocked: SAFETY"
        );
    }
}
