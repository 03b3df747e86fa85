//! Typed REST client for the storefront backend.
//!
//! # Architecture
//!
//! - JSON over HTTP via `reqwest` - the backend is the source of truth,
//!   no local caching or retry
//! - Every request attaches the session's bearer token when one is
//!   present; anonymous endpoints simply go without
//! - A 401 from any endpoint tears the session down globally (durable
//!   storage cleared, [`SessionEvent::Expired`](crate::session::SessionEvent)
//!   published) before the error is returned to the caller
//!
//! # Endpoints
//!
//! One method per backend endpoint, grouped by resource: authentication,
//! categories, products, cart, orders.

mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failed (connection, timeout, malformed response stream).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request with a non-success status.
    /// `message` is the backend's structured `detail` when it sent one,
    /// else a generic fallback.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// User-facing message.
        message: String,
    },

    /// The backend rejected the credential; the session has already been
    /// torn down by the time this is returned.
    #[error("authentication rejected: {message}")]
    Unauthorized {
        /// The backend's `detail` message, or a generic fallback.
        message: String,
    },

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The message to surface to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::Unauthorized { message } => message.clone(),
            Self::Http(_) | Self::Parse(_) => "Could not reach the store, try again".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 400,
            message: "Insufficient stock".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 400: Insufficient stock");
        assert_eq!(err.user_message(), "Insufficient stock");
    }

    #[test]
    fn test_unauthorized_carries_backend_message() {
        let err = ApiError::Unauthorized {
            message: "Incorrect username or password".to_string(),
        };
        assert_eq!(err.user_message(), "Incorrect username or password");
    }
}
