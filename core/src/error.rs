//! Error types for the admin API engine.
//!
//! # Design
//! Parameter problems (`MissingParameter`, `InvalidTemplate`, `InvalidInput`)
//! are raised before any network I/O. Every non-2xx response that is not a
//! suppressed not-found lands in `Remote` with the status, the error body the
//! server sent and the descriptor that produced the call. A failed prior
//! fetch during an update is wrapped in `UpdateFetchFailed` so callers can
//! tell that no `PUT` was attempted.

use serde_json::Value;
use thiserror::Error;

use crate::http::HttpMethod;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A URL placeholder had no value, or the value was empty.
    #[error("missing URL parameter `{name}` for {template}")]
    MissingParameter { name: String, template: String },

    /// A path template could not be parsed.
    #[error("invalid path template {template}: {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// The call input could not be routed into a URL, query or body.
    #[error("invalid call input: {0}")]
    InvalidInput(String),

    /// The server answered with a non-2xx status.
    #[error("{method} {path} failed with HTTP {status}")]
    Remote {
        status: u16,
        method: HttpMethod,
        path: String,
        body: Option<Value>,
    },

    /// The fetch preceding a replace-semantics update failed; no `PUT` was sent.
    #[error("update aborted, fetching the current representation failed: {source}")]
    UpdateFetchFailed {
        #[source]
        source: Box<ApiError>,
    },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The transport could not complete the round-trip.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// HTTP status of the failed call, looking through `UpdateFetchFailed`.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            ApiError::UpdateFetchFailed { source } => source.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(status: u16) -> ApiError {
        ApiError::Remote {
            status,
            method: HttpMethod::Get,
            path: "/admin/realms/{realm}/clients/{id}".to_string(),
            body: None,
        }
    }

    #[test]
    fn status_looks_through_update_fetch_failure() {
        let err = ApiError::UpdateFetchFailed {
            source: Box::new(remote(404)),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
    }

    #[test]
    fn remote_display_names_the_descriptor() {
        let msg = remote(409).to_string();
        assert_eq!(msg, "GET /admin/realms/{realm}/clients/{id} failed with HTTP 409");
    }

    #[test]
    fn local_errors_have_no_status() {
        let err = ApiError::MissingParameter {
            name: "id".to_string(),
            template: "/{id}".to_string(),
        };
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());
    }
}
