//! Error types for Wavius service operations

use thiserror::Error;

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors raised by [`WaviusService`](crate::WaviusService) and its helpers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request building, transport, API or decode failure
    #[error(transparent)]
    Http(#[from] wavius_http::Error),

    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] wavius_config::ConfigError),

    /// A path template placeholder was not supplied
    #[error("Missing path parameter '{param}' for endpoint {endpoint}")]
    MissingParam {
        endpoint: &'static str,
        param: String,
    },

    /// A path parameter was supplied that the template does not use
    #[error("Unknown path parameter '{param}' for endpoint {endpoint}")]
    UnknownParam {
        endpoint: &'static str,
        param: String,
    },

    /// No endpoint with this name exists
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// The file failed the media policy
    #[error("Media rejected: {0}")]
    MediaRejected(String),

    /// Webhook verification or parsing failed
    #[error("Webhook error: {0}")]
    Webhook(String),

    /// Local file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// HTTP status of an API error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status_code(),
            _ => None,
        }
    }

    /// Check if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Webhook(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavius_http::ApiError;

    #[test]
    fn test_status_code_passthrough() {
        let err: ServiceError = wavius_http::Error::from(ApiError {
            status: 401,
            message: "unauthorized".into(),
        })
        .into();
        assert_eq!(err.status_code(), Some(401));
        assert_eq!(err.to_string(), "Wavius API error: 401 - unauthorized");
    }

    #[test]
    fn test_param_errors_display() {
        let err = ServiceError::MissingParam {
            endpoint: "archive_chat",
            param: "chat_id".into(),
        };
        assert_eq!(
            err.to_string(),
            "Missing path parameter 'chat_id' for endpoint archive_chat"
        );
        assert_eq!(err.status_code(), None);
        assert!(!err.is_timeout());
    }
}
