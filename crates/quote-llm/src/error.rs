//! Errors returned by chat-completion providers
//!
//! HTTP failures are classified by the status codes DeepSeek documents at
//! https://api-docs.deepseek.com/quick_start/error_codes; other
//! OpenAI-compatible servers use the same codes.

use serde::Deserialize;
use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

#[derive(Error, Debug)]
pub enum LLMError {
    /// 400 invalid format or 422 invalid parameters
    #[error("Request rejected (HTTP {status}): {message}")]
    InvalidRequest { status: u16, message: String },

    /// 401, wrong or revoked API key
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// 402, the account has run out of credit
    #[error("Insufficient account balance: {0}")]
    InsufficientBalance(String),

    /// 429, too many requests
    #[error("Rate limit reached: {0}")]
    RateLimited(String),

    /// 500 server error or 503 server overloaded
    #[error("Service unavailable (HTTP {status}): {message}")]
    ServiceUnavailable { status: u16, message: String },

    /// Any other non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection, timeout or body read failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Success status but the body was not a chat completion
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Missing or invalid provider settings
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl LLMError {
    /// Classify a non-success response
    ///
    /// The `error.message` field of an OpenAI-style error body is used when
    /// present, the raw body otherwise.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            400 | 422 => Self::InvalidRequest { status, message },
            401 => Self::AuthenticationFailed(message),
            402 => Self::InsufficientBalance(message),
            429 => Self::RateLimited(message),
            500 | 503 => Self::ServiceUnavailable { status, message },
            _ => Self::Status { status, message },
        }
    }

    /// Whether the same request may succeed later without changes
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::ServiceUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            LLMError::from_status(402, "{}"),
            LLMError::InsufficientBalance(_)
        ));
        assert!(matches!(
            LLMError::from_status(422, "bad temperature"),
            LLMError::InvalidRequest { status: 422, .. }
        ));
        assert!(matches!(
            LLMError::from_status(503, ""),
            LLMError::ServiceUnavailable { status: 503, .. }
        ));
        assert!(matches!(
            LLMError::from_status(401, ""),
            LLMError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            LLMError::from_status(404, "no route"),
            LLMError::Status { status: 404, .. }
        ));
    }

    #[test]
    fn test_error_body_message_extracted() {
        let body = r#"{"error": {"message": "Insufficient Balance", "type": "unknown_error", "param": null, "code": "invalid_request_error"}}"#;
        let err = LLMError::from_status(402, body);
        assert_eq!(
            err.to_string(),
            "Insufficient account balance: Insufficient Balance"
        );

        let err = LLMError::from_status(500, " upstream crashed \n");
        assert_eq!(
            err.to_string(),
            "Service unavailable (HTTP 500): upstream crashed"
        );
    }

    #[test]
    fn test_transient_errors() {
        assert!(LLMError::from_status(429, "slow down").is_transient());
        assert!(LLMError::from_status(503, "busy").is_transient());
        assert!(!LLMError::from_status(402, "").is_transient());
        assert!(!LLMError::ConfigurationError("x".into()).is_transient());
    }
}
