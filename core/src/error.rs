//! Error types for the dev.to API client.
//!
//! # Design
//! `Remote` wraps the `{"error", "status"}` body the service sends with any
//! status of 400 or above. Everything else describes a local failure at one
//! step of the request pipeline, so callers can tell a network problem from
//! a rejected request by matching on the variant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when an error response body is not the documented shape.
pub const UNPARSEABLE_ERROR_BODY: &str = "error unmarshalling the JSON response";

const BODY_ALREADY_TAKEN: &str = "body markdown has already been taken";

/// Error reported by the service itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    #[serde(rename = "error")]
    pub message: String,
    pub status: u16,
}

impl RemoteError {
    /// True when the service refused an article whose markdown body is
    /// already used by another article.
    pub fn is_duplicate_body(&self) -> bool {
        self.message.eq_ignore_ascii_case(BODY_ALREADY_TAKEN)
    }
}

/// Errors returned by `Client` construction and every API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Construction rejected the API key or one of the configured overrides.
    #[error("configuration error: {0}")]
    Config(String),

    /// The method/URL pair could not be turned into a request.
    #[error("error making request: {0}")]
    InvalidRequest(String),

    /// The request never produced a response (connection, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The response body could not be read.
    #[error("could not read response body: {0}")]
    Io(String),

    /// The outgoing payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The service answered with a status of 400 or above.
    #[error("HTTP status {}: {}", .0.status, .0.message)]
    Remote(#[from] RemoteError),
}

impl ApiError {
    /// HTTP status of a `Remote` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote(remote) => Some(remote.status),
            _ => None,
        }
    }

    /// The service's error body, if this is a `Remote` error.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            ApiError::Remote(remote) => Some(remote),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_decodes_service_body() {
        let err: RemoteError =
            serde_json::from_str(r#"{"error":"Body markdown has already been taken","status":422}"#).unwrap();
        assert_eq!(err.message, "Body markdown has already been taken");
        assert_eq!(err.status, 422);
        assert!(err.is_duplicate_body());
        assert_eq!(err.to_string(), "Body markdown has already been taken");
    }

    #[test]
    fn remote_error_display_includes_status() {
        let err = ApiError::from(RemoteError {
            message: "this is the error message".to_string(),
            status: 422,
        });
        assert_eq!(err.to_string(), "HTTP status 422: this is the error message");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn local_errors_have_no_status() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert!(err.remote().is_none());
    }
}
