//! Error types for service clients.

use thiserror::Error;

/// Errors that can occur when talking to external services.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client construction or environment problem.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("api error {status}: {body}")]
    Api {
        /// HTTP status code.
        status: reqwest::StatusCode,
        /// Response body, as returned.
        body: String,
    },

    /// The token stream broke mid-iteration.
    #[error("stream failed: {0}")]
    Stream(String),

    /// The model returned no output text. Distinguishable by contract:
    /// generation must never silently produce an empty reply.
    #[error("model returned no output text")]
    EmptyResponse,

    /// Caller passed empty input where text is required.
    #[error("empty input text")]
    EmptyInput,

    /// Serialization failure on a request or response payload.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::Configuration("missing OPENAI_API_KEY".into());
        assert_eq!(err.to_string(), "configuration error: missing OPENAI_API_KEY");

        let err = ClientError::EmptyResponse;
        assert_eq!(err.to_string(), "model returned no output text");
    }
}
