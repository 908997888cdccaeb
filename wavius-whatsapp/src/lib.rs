//! # Wavius WhatsApp
//!
//! Typed operations for the Wavius WhatsApp API on top of [`wavius_http`].
//!
//! Every provider operation is an [`Endpoint`] in a static routing table;
//! [`WaviusService::call`] resolves the route, fills path parameters and sends
//! the payload. Messages, media uploads and webhooks get typed helpers.
//!
//! ```rust,no_run
//! use wavius_whatsapp::{Call, Endpoint, OutgoingMessage, WaviusService};
//!
//! # async fn run() -> wavius_whatsapp::Result<()> {
//! let service = WaviusService::from_env()?;
//! service.bootstrap().await?;
//!
//! service
//!     .send(&OutgoingMessage::text("15551234567", "Hello!"), None)
//!     .await?;
//!
//! let chats = service
//!     .call(Call::new(Endpoint::GetChats).field("limit", 20))
//!     .await?;
//! println!("{}", chats);
//!
//! service
//!     .call(Call::new(Endpoint::ArchiveChat).param("chat_id", "15551234567@c.us"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod call;
mod error;
mod logging;
mod media;
mod messages;
mod routes;
mod service;
mod webhook;

pub use call::Call;
pub use error::{Result, ServiceError};
pub use logging::{ExchangeLogger, parse_level};
pub use media::MediaPolicy;
pub use messages::OutgoingMessage;
pub use routes::{Endpoint, Route};
pub use service::WaviusService;
pub use webhook::{WebhookEvent, WebhookVerifier};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::call::Call;
    pub use crate::error::{Result, ServiceError};
    pub use crate::messages::OutgoingMessage;
    pub use crate::routes::Endpoint;
    pub use crate::service::WaviusService;
    pub use crate::webhook::{WebhookEvent, WebhookVerifier};
}
