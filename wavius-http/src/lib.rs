//! # Wavius HTTP
//!
//! Configuration-driven REST client core for the Wavius WhatsApp API.
//!
//! A call flows through four pieces:
//!
//! - **[`RequestBuilder`]**: resolves `{base_url}/{version}{/instances/id}{path}`,
//!   auth and content headers, JSON or multipart body
//! - **[`Session`]**: current bearer token and instance id
//! - **[`TransportClient`]**: timeout plus fixed-delay retry on transport failures
//! - **[`ResponseDecoder`]**: JSON body, or [`ApiError`] / [`DecodeError`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wavius_http::{ClientConfig, WaviusClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .token("my-api-token")
//!         .instance_id("my-instance")
//!         .build();
//!     let client = WaviusClient::new(config)?;
//!
//!     let sent = client
//!         .post("/messages/chat", &serde_json::json!({"to": "15551234567", "message": "hi"}))
//!         .await?;
//!
//!     println!("{}", sent);
//!     Ok(())
//! }
//! ```
//!
//! ## Uploads
//!
//! ```rust,no_run
//! use wavius_http::{ClientConfig, WaviusClient};
//!
//! # async fn run() -> wavius_http::Result<()> {
//! let client = WaviusClient::new(ClientConfig::default())?;
//! client
//!     .upload("/media/upload", "./photo.jpg", &serde_json::json!({"caption": "hi"}))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod multipart;
mod request;
mod response;
mod retry;
mod session;
mod transport;

pub use client::WaviusClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ApiError, DecodeError, Error, Result, TransportError};
pub use multipart::{FieldValue, FileAttachment, MultipartField};
pub use request::{
    PATH_SEGMENT, RequestBody, RequestBuilder, RequestSpec, ResolvedRequest, instance_scoped_path,
};
pub use response::{ApiResponse, ResponseDecoder};
pub use retry::RetryPolicy;
pub use session::Session;
pub use transport::{ReqwestTransport, Transport, TransportClient};

// Re-export common types
pub use bytes::Bytes;
pub use http::{HeaderMap, Method, StatusCode};
pub use url::Url;

/// Prelude for common imports.
///
/// ```
/// use wavius_http::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::WaviusClient;
    pub use crate::config::{ClientConfig, ClientConfigBuilder};
    pub use crate::error::{ApiError, DecodeError, Error, Result, TransportError};
    pub use crate::multipart::FileAttachment;
    pub use crate::request::RequestSpec;
    pub use crate::response::{ApiResponse, ResponseDecoder};
    pub use crate::session::Session;
    pub use crate::transport::Transport;
    pub use http::{Method, StatusCode};
}
