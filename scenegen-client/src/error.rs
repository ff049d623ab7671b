//! Error types for the scenegen client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the generation backend
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend returned an error status code
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the backend
        message: String,
    },

    /// Failed to parse a response body
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Backend reported a status token outside the known set
    #[error("Unrecognized job status token: `{0}`")]
    UnrecognizedStatus(String),

    /// Backend reported no successful result for the job
    #[error("No generation result available")]
    ResultUnavailable,
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_classification() {
        let err = ClientError::api_error(404, "missing");
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = ClientError::api_error(503, "unavailable");
        assert!(err.is_server_error());
        assert!(!err.is_client_error());

        assert!(!ClientError::ResultUnavailable.is_client_error());
    }
}
