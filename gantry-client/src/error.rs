//! Error types for the Gantry client

use thiserror::Error;

use gantry_core::dto::credential::ProviderError;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Gantry client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    /// Decode a structured provider error from an API error body
    ///
    /// Failed submissions wrap provider errors as `{ "detail": "<json>" }`
    /// where the inner payload tags itself with `type = "model_provider_error"`.
    /// Returns `None` for transport errors, non-JSON bodies, and details of
    /// any other kind.
    pub fn provider_error(&self) -> Option<ProviderError> {
        let ClientError::ApiError { message, .. } = self else {
            return None;
        };

        #[derive(serde::Deserialize)]
        struct ErrorBody {
            detail: String,
        }

        let body: ErrorBody = serde_json::from_str(message).ok()?;
        let error: ProviderError = serde_json::from_str(&body.detail).ok()?;
        error.is_model_provider_error().then_some(error)
    }
}
