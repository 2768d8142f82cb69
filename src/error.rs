//! Unified error handling for the coach-metrics library.
//!
//! Missing data is not an error here: calculators return `Option` and the
//! orchestrator degrades to a partial report. These variants cover contract
//! violations in the core and failures in the optional I/O layers.

use thiserror::Error;

/// Unified error type for coach-metrics operations.
#[derive(Debug, Error)]
pub enum CoachError {
    /// Caller handed the core something it cannot work with at all
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Missing or unreadable configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// intervals.icu rejected the credentials
    #[error("Authentication failed. Please check your API key and athlete ID.")]
    Authentication,

    /// Activity or athlete does not exist
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Still throttled after all retries
    #[error("Rate limit exceeded after {retries} retries")]
    RateLimited { retries: u32 },

    /// Any other HTTP/API failure
    #[error("{}", http_message(.message, .status_code))]
    Http {
        message: String,
        status_code: Option<u16>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn http_message(message: &str, status_code: &Option<u16>) -> String {
    match status_code {
        Some(code) => format!("HTTP error ({}): {}", code, message),
        None => format!("HTTP error: {}", message),
    }
}

/// Result type alias for coach-metrics operations.
pub type Result<T> = std::result::Result<T, CoachError>;

/// Extension trait for converting Option to CoachError.
pub trait OptionExt<T> {
    /// Convert Option to Result with an invalid-input error.
    fn ok_or_invalid(self, message: &str) -> Result<T>;

    /// Convert Option to Result with a configuration error.
    fn ok_or_config(self, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_invalid(self, message: &str) -> Result<T> {
        self.ok_or_else(|| CoachError::InvalidInput {
            message: message.to_string(),
        })
    }

    fn ok_or_config(self, message: &str) -> Result<T> {
        self.ok_or_else(|| CoachError::Config {
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoachError::Http {
            message: "bad gateway".to_string(),
            status_code: Some(502),
        };
        assert_eq!(err.to_string(), "HTTP error (502): bad gateway");

        let err = CoachError::Http {
            message: "connection reset".to_string(),
            status_code: None,
        };
        assert_eq!(err.to_string(), "HTTP error: connection reset");
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        let result = none.ok_or_invalid("activity is required");
        assert!(matches!(result, Err(CoachError::InvalidInput { .. })));

        let some = Some(3).ok_or_config("unused");
        assert_eq!(some.unwrap(), 3);
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: CoachError = parse.unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
