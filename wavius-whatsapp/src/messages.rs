//! Typed outgoing messages.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::Endpoint;

/// A message to send through one of the `/messages/*` endpoints.
///
/// Media variants carry a URL or provider-side path, not file content; use
/// [`WaviusService::upload_media`](crate::WaviusService::upload_media) first
/// for local files. Blank optional fields are left out of the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutgoingMessage {
    Text {
        to: String,
        message: String,
    },
    Image {
        to: String,
        image: String,
        #[serde(skip_serializing_if = "is_blank")]
        caption: Option<String>,
    },
    Document {
        to: String,
        document: String,
        #[serde(skip_serializing_if = "is_blank")]
        caption: Option<String>,
    },
    Audio {
        to: String,
        audio: String,
    },
    Video {
        to: String,
        video: String,
        #[serde(skip_serializing_if = "is_blank")]
        caption: Option<String>,
    },
    Location {
        to: String,
        latitude: f64,
        longitude: f64,
        #[serde(skip_serializing_if = "is_blank")]
        name: Option<String>,
        #[serde(skip_serializing_if = "is_blank")]
        address: Option<String>,
    },
    Contact {
        to: String,
        contact: Map<String, Value>,
    },
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

impl OutgoingMessage {
    pub fn text(to: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Text {
            to: to.into(),
            message: message.into(),
        }
    }

    pub fn image(to: impl Into<String>, image: impl Into<String>) -> Self {
        Self::Image {
            to: to.into(),
            image: image.into(),
            caption: None,
        }
    }

    pub fn document(to: impl Into<String>, document: impl Into<String>) -> Self {
        Self::Document {
            to: to.into(),
            document: document.into(),
            caption: None,
        }
    }

    pub fn audio(to: impl Into<String>, audio: impl Into<String>) -> Self {
        Self::Audio {
            to: to.into(),
            audio: audio.into(),
        }
    }

    pub fn video(to: impl Into<String>, video: impl Into<String>) -> Self {
        Self::Video {
            to: to.into(),
            video: video.into(),
            caption: None,
        }
    }

    pub fn location(to: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self::Location {
            to: to.into(),
            latitude,
            longitude,
            name: None,
            address: None,
        }
    }

    pub fn contact(to: impl Into<String>, contact: Map<String, Value>) -> Self {
        Self::Contact {
            to: to.into(),
            contact,
        }
    }

    /// Set the caption on image, document and video messages; ignored otherwise.
    pub fn with_caption(mut self, text: impl Into<String>) -> Self {
        if let Self::Image { caption, .. }
        | Self::Document { caption, .. }
        | Self::Video { caption, .. } = &mut self
        {
            *caption = Some(text.into());
        }
        self
    }

    /// Set the place name on location messages; ignored otherwise.
    pub fn with_name(mut self, place: impl Into<String>) -> Self {
        if let Self::Location { name, .. } = &mut self {
            *name = Some(place.into());
        }
        self
    }

    /// Set the street address on location messages; ignored otherwise.
    pub fn with_address(mut self, street: impl Into<String>) -> Self {
        if let Self::Location { address, .. } = &mut self {
            *address = Some(street.into());
        }
        self
    }

    /// Endpoint that accepts this message.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Text { .. } => Endpoint::SendMessage,
            Self::Image { .. } => Endpoint::SendImage,
            Self::Document { .. } => Endpoint::SendDocument,
            Self::Audio { .. } => Endpoint::SendAudio,
            Self::Video { .. } => Endpoint::SendVideo,
            Self::Location { .. } => Endpoint::SendLocation,
            Self::Contact { .. } => Endpoint::SendContact,
        }
    }

    /// Recipient phone number or chat id.
    pub fn recipient(&self) -> &str {
        match self {
            Self::Text { to, .. }
            | Self::Image { to, .. }
            | Self::Document { to, .. }
            | Self::Audio { to, .. }
            | Self::Video { to, .. }
            | Self::Location { to, .. }
            | Self::Contact { to, .. } => to,
        }
    }
}
