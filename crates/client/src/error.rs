//! Unified error handling for the storefront client.
//!
//! All client operations return `Result<T, Error>`. The taxonomy follows
//! how failures are surfaced to the user:
//!
//! - [`Error::Validation`] - rejected locally before any remote call
//!   (anonymous cart mutation, blank required field); no state changed
//! - [`Error::Api`] - rejected remotely or the transport failed; the
//!   message is the backend's own when it sent one
//! - [`Error::Storage`] / [`Error::Config`] - the ambient layers

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Client-level error type for the storefront.
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected locally; no remote call was made.
    #[error("{0}")]
    Validation(String),

    /// Remote API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Durable session storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// The message to show the user for this failure.
    ///
    /// Remote rejections carry the backend's own message when it sent a
    /// structured one; everything else falls back to the error display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = Error::Validation("shipping address is required".to_string());
        assert_eq!(err.to_string(), "shipping address is required");
        assert_eq!(err.user_message(), "shipping address is required");
    }

    #[test]
    fn test_api_error_message_passthrough() {
        let err = Error::Api(ApiError::Status {
            status: 400,
            message: "Insufficient stock".to_string(),
        });
        assert_eq!(err.user_message(), "Insufficient stock");
    }
}
