//! Wavius client error types.

use std::time::Duration;
use thiserror::Error;

/// Result type for Wavius client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure before any HTTP response was obtained.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The attempt exceeded its timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The connection could not be established or was dropped.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request itself could not be sent (malformed body, bad header, ...).
    #[error("Request error: {0}")]
    Request(String),
}

impl TransportError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connection(_))
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Classify a reqwest failure.
    pub(crate) fn from_reqwest(error: &reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout)
        } else if error.is_connect() || error.is_request() || error.is_body() {
            Self::Connection(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// The remote service answered with status >= 400.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Wavius API error: {status} - {message}")]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Provider message, or the raw body when none was given.
    pub message: String,
}

/// A successful (< 400) response whose body is not valid JSON.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to decode response with status {status}: {message}")]
pub struct DecodeError {
    /// HTTP status code.
    pub status: u16,
    /// Parser message.
    pub message: String,
}

/// Wavius client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Network or timeout failure, after retries.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Error status returned by the API.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Unparseable success body.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Request building error.
    #[error("Failed to build request: {0}")]
    RequestBuild(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// I/O error (reading an upload).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings failed validation.
    #[error(transparent)]
    Config(#[from] wavius_config::ConfigError),
}

impl Error {
    /// Get the HTTP status code if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status),
            Self::Decode(e) => Some(e.status),
            _ => None,
        }
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Check if the API rejected the request.
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api(_))
    }
}
