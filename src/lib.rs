// Wavius - Rust SDK for the Wavius WhatsApp API
//
// This library bundles settings loading, the instance-scoped REST client
// and the typed WhatsApp operations behind one dependency.

// Re-export configuration
pub use wavius_config::{
    ConfigError, EnvLoader, Validate, WaviusConfig, load as load_config,
};

// Re-export the HTTP core
pub use wavius_http::{
    ApiError, ApiResponse, ClientConfig, ClientConfigBuilder, DecodeError, Error, FileAttachment,
    RequestBuilder, RequestSpec, ResolvedRequest, ResponseDecoder, RetryPolicy, Session,
    Transport, TransportClient, TransportError, WaviusClient,
};

// Re-export sub-crates
pub use wavius_config;
pub use wavius_http;

#[cfg(feature = "whatsapp")]
pub use wavius_whatsapp;

#[cfg(feature = "whatsapp")]
pub use wavius_whatsapp::{
    Call, Endpoint, OutgoingMessage, ServiceError, WaviusService, WebhookEvent, WebhookVerifier,
};

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ApiError, ClientConfig, Error, RequestSpec, Session, TransportError, WaviusClient,
        WaviusConfig,
    };

    #[cfg(feature = "whatsapp")]
    pub use crate::{
        Call, Endpoint, OutgoingMessage, ServiceError, WaviusService, WebhookEvent,
        WebhookVerifier,
    };
}
