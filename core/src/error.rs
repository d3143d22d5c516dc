//! Error types for the todo client and store.
//!
//! # Design
//! `ApiError` carries the detail of a single failed round-trip. `NotFound`
//! gets a dedicated variant because callers frequently distinguish "the
//! resource does not exist" from "the server returned an unexpected status."
//! The store reports every failure as one kind, `StoreError::RequestFailed`,
//! wrapping the `ApiError` as its source.

use thiserror::Error;

/// Errors produced while building, executing, or parsing a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response (connection, DNS, TLS...).
    #[error("transport failed: {0}")]
    TransportError(String),
}

/// Errors surfaced by `Store` actions.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    RequestFailed(#[from] ApiError),
}

impl StoreError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::RequestFailed(ApiError::NotFound) => Some(404),
            StoreError::RequestFailed(ApiError::HttpError { status, .. }) => Some(*status),
            StoreError::RequestFailed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_exposes_status() {
        let err = StoreError::from(ApiError::HttpError {
            status: 401,
            body: "invalid credentials".to_string(),
        });
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "request failed: HTTP 401: invalid credentials");
    }

    #[test]
    fn transport_failure_has_no_status() {
        let err = StoreError::from(ApiError::TransportError("connection refused".to_string()));
        assert_eq!(err.status(), None);
    }
}
