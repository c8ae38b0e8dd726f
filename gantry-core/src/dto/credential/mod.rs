//! Credential DTOs for the engine API

use serde::{Deserialize, Serialize};

use crate::domain::alert::AlertSeverity;

/// Result of the provider credential pre-flight check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialCheck {
    pub is_valid: bool,
}

/// Structured submission error raised by a model provider.
///
/// The engine wraps these in a `detail` envelope on failed submissions;
/// `kind` is the wire tag distinguishing them from other error details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderError {
    #[serde(rename = "type")]
    pub kind: String,
    pub error_type: String,
    pub provider: String,
    pub message: String,
}

/// Wire tag carried by provider errors.
pub const MODEL_PROVIDER_ERROR: &str = "model_provider_error";

impl ProviderError {
    /// True when this detail is a model provider error.
    pub fn is_model_provider_error(&self) -> bool {
        self.kind == MODEL_PROVIDER_ERROR
    }

    /// Alert severity for this class of provider failure.
    ///
    /// Transient conditions surface as warnings; everything else,
    /// including unrecognized error types, is reported as danger.
    pub fn severity(&self) -> AlertSeverity {
        match self.error_type.as_str() {
            "overloaded" | "rate_limit" | "service_unavailable" => AlertSeverity::Warning,
            "context_length" | "auth" => AlertSeverity::Danger,
            _ => AlertSeverity::Danger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_error(error_type: &str) -> ProviderError {
        ProviderError {
            kind: MODEL_PROVIDER_ERROR.to_string(),
            error_type: error_type.to_string(),
            provider: "openai".to_string(),
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_transient_errors_map_to_warning() {
        for error_type in ["overloaded", "rate_limit", "service_unavailable"] {
            assert_eq!(
                provider_error(error_type).severity(),
                AlertSeverity::Warning,
                "{error_type}"
            );
        }
    }

    #[test]
    fn test_fatal_errors_map_to_danger() {
        for error_type in ["context_length", "auth", "unknown", "something_new"] {
            assert_eq!(
                provider_error(error_type).severity(),
                AlertSeverity::Danger,
                "{error_type}"
            );
        }
    }
}
