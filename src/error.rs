//! # Error Types
//!
//! Error taxonomy for the probe. Transport failures are classified from
//! the underlying HTTP client error; malformed streaming payloads are
//! never surfaced here (the decoder recovers from them locally).

use thiserror::Error;

/// Errors a probe run can surface to the caller.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The endpoint did not respond within the check's time budget.
    #[error("request timed out - endpoint did not respond in time")]
    Timeout,

    /// TCP/TLS connection to the endpoint could not be established.
    #[error("connection failed - unable to reach endpoint")]
    Connect,

    /// The endpoint answered with a non-success status code.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Any other transport-level failure (reset, protocol error, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// A non-streamed response body could not be decoded.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ProbeError {
    /// Classify HTTP client errors by their underlying cause, so the
    /// report can tell an unreachable endpoint from a slow one.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout
        } else if err.is_connect() {
            ProbeError::Connect
        } else if let Some(status) = err.status() {
            ProbeError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ProbeError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ProbeError {
    fn from(err: url::ParseError) -> Self {
        ProbeError::Config(format!("invalid URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ProbeError::Status {
            status: 401,
            body: "{\"error\":\"unauthorized\"}".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 401: {\"error\":\"unauthorized\"}");
    }

    #[test]
    fn test_json_error_converts_to_decode() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let err = ProbeError::from(parse_err);
        assert!(matches!(err, ProbeError::Decode(_)));
    }
}
