//! API response and decoding.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{ApiError, DecodeError, Result, TransportError};

/// Raw API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    /// Create a response from its parts.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Attach headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Create a response from a reqwest response, reading the whole body.
    pub(crate) async fn from_reqwest(
        response: reqwest::Response,
    ) -> std::result::Result<Self, TransportError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Connection(format!("failed to read body: {}", e)))?;

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Check if the response was successful (< 400).
    pub fn is_success(&self) -> bool {
        self.status.as_u16() < 400
    }

    /// Get the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the response body as bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Get the response body as text (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body. See [`ResponseDecoder::decode`].
    pub fn decode(&self) -> Result<Value> {
        ResponseDecoder::decode(self)
    }
}

/// Turns an [`ApiResponse`] into decoded JSON or a typed error.
pub struct ResponseDecoder;

impl ResponseDecoder {
    /// Decode a response.
    ///
    /// - status >= 400: [`ApiError`] with the JSON `message` field, or the raw body.
    /// - empty success body: an empty JSON object.
    /// - unparseable success body: [`DecodeError`].
    pub fn decode(response: &ApiResponse) -> Result<Value> {
        let status = response.status().as_u16();
        let body = response.text();
        let trimmed = body.trim();

        if status >= 400 {
            let parsed = serde_json::from_str::<Value>(trimmed).ok();
            return Err(ApiError {
                status,
                message: error_message(&body, parsed.as_ref()),
            }
            .into());
        }

        if trimmed.is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        serde_json::from_str(trimmed).map_err(|e| {
            DecodeError {
                status,
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Decode a response into a caller type.
    pub fn decode_as<T: DeserializeOwned>(response: &ApiResponse) -> Result<T> {
        let value = Self::decode(response)?;
        serde_json::from_value(value).map_err(|e| {
            DecodeError {
                status: response.status().as_u16(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

fn error_message(body: &str, parsed: Option<&Value>) -> String {
    match parsed.and_then(|v| v.get("message")) {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Null) | None => body.to_string(),
        Some(other) => other.to_string(),
    }
}
