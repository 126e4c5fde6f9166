//! Error types for the dashboard-api crate.

use thiserror::Error;

/// Errors that can occur when talking to the dashboard backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The configured base URL cannot carry API paths.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// Request could not be sent or the response body could not be read.
    #[error("Network error: {0}")]
    Network(String),

    /// Server returned a 5xx status.
    #[error("Server error: HTTP {0}")]
    Server(u16),

    /// Server returned a status other than 2xx or 5xx.
    #[error("Unexpected HTTP status: {0}")]
    Unexpected(u16),

    /// Response body did not match the expected JSON shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Backend answered with `success: false`.
    #[error("Request rejected by server: {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        /// Message reported by the backend, if any.
        message: Option<String>,
    },
}
