//! Error types for the Pulse SDK.

use serde::{Deserialize, Serialize};

/// Result type for SDK operations.
pub type PulseResult<T> = Result<T, PulseError>;

/// Error types that can occur when talking to the PulseMCP API.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    /// HTTP request failed before a usable response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl PulseError {
    /// Create an API error from a status code and response body.
    ///
    /// Bodies shaped like `{"error": {"message": "..."}}` contribute their
    /// message; anything else falls back to a generic status description.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("Request failed with status code {}", status));
        Self::Api { status, message }
    }

    /// Text suitable for showing to a caller: the API's own message when it
    /// sent one, otherwise the transport-level description including its
    /// source chain.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(e) => error_chain(e),
            other => other.to_string(),
        }
    }
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        // hyper and reqwest often repeat the same text one level down
        if !message.ends_with(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

/// Error body returned by the PulseMCP API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_uses_remote_message() {
        let err = PulseError::from_response(500, r#"{"error":{"message":"rate limited"}}"#);
        match &err {
            PulseError::Api { status, message } => {
                assert_eq!(*status, 500);
                assert_eq!(message, "rate limited");
            }
            _ => panic!("Expected Api error"),
        }
        assert_eq!(err.user_message(), "rate limited");
    }

    #[test]
    fn test_from_response_without_structured_message() {
        let err = PulseError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.user_message(), "Request failed with status code 502");

        let err = PulseError::from_response(404, r#"{"error":{}}"#);
        assert_eq!(err.user_message(), "Request failed with status code 404");

        let err = PulseError::from_response(400, r#"{"error":"plain string"}"#);
        assert_eq!(err.user_message(), "Request failed with status code 400");
    }

    #[test]
    fn test_display() {
        let err = PulseError::from_response(500, r#"{"error":{"message":"boom"}}"#);
        assert_eq!(err.to_string(), "API error (status 500): boom");
    }
}
