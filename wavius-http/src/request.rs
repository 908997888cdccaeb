//! Request specification and resolution.

use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::multipart::{FileAttachment, MultipartField, form_text};
use crate::{ClientConfig, Error, Result, Session};

const INSTANCES_SEGMENT: &str = "/instances/";

/// Everything outside the RFC 3986 unreserved set, `/` included.
pub const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// One logical API call, before URL and header resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path relative to the API root, e.g. `/messages/chat`.
    pub path: String,
    /// Query parameters for GET, JSON body otherwise, extra fields for uploads.
    pub payload: Option<Map<String, Value>>,
    pub attachment: Option<FileAttachment>,
    /// Instance for this call only; the session is left untouched.
    pub instance_id: Option<String>,
    /// Timeout for this call only.
    pub timeout: Option<Duration>,
}

impl RequestSpec {
    /// Create a new request specification.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: None,
            attachment: None,
            instance_id: None,
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set the payload from any serializable map-like value.
    ///
    /// `null` clears the payload; anything other than an object is rejected.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self> {
        let value =
            serde_json::to_value(payload).map_err(|e| Error::RequestBuild(e.to_string()))?;
        self.payload = match value {
            Value::Null => None,
            Value::Object(map) => Some(map),
            other => {
                return Err(Error::RequestBuild(format!(
                    "payload must be a JSON object, got {}",
                    other
                )));
            }
        };
        Ok(self)
    }

    /// Add a single payload field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach a file; the request is sent as multipart.
    pub fn attach(mut self, attachment: FileAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Scope this call to an instance without touching the session.
    pub fn instance(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    /// Set a custom timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Body of a resolved request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Bytes),
    Multipart(Vec<MultipartField>),
}

/// A request ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: RequestBody,
    pub timeout: Option<Duration>,
}

impl ResolvedRequest {
    /// Get a header value as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Multipart fields, if this is an upload.
    pub fn multipart_fields(&self) -> Option<&[MultipartField]> {
        match &self.body {
            RequestBody::Multipart(fields) => Some(fields),
            _ => None,
        }
    }

    /// First multipart field with the given name.
    pub fn multipart_field(&self, name: &str) -> Option<&MultipartField> {
        self.multipart_fields()?.iter().find(|f| f.name == name)
    }
}

/// Prefix `path` with `/instances/{id}` unless it is already instance-scoped.
///
/// The id is percent-encoded as a single path segment. Applying this twice gives the same result as applying it once.
pub fn instance_scoped_path(path: &str, instance_id: Option<&str>) -> String {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    match instance_id.filter(|id| !id.is_empty()) {
        Some(id) if !path.contains(INSTANCES_SEGMENT) => {
            format!("/instances/{}{}", utf8_percent_encode(id, PATH_SEGMENT), path)
        }
        _ => path,
    }
}

/// Resolves a [`RequestSpec`] into a [`ResolvedRequest`].
///
/// Pure: depends only on the request, the session and the configuration.
pub struct RequestBuilder<'a> {
    config: &'a ClientConfig,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    /// Build the request.
    pub fn build(&self, spec: &RequestSpec, session: &Session) -> Result<ResolvedRequest> {
        let session = session.scoped(spec.instance_id.as_deref());
        let url = self.build_url(spec, &session)?;
        let body = self.build_body(spec);
        let headers = self.build_headers(&session, &body)?;

        Ok(ResolvedRequest {
            method: spec.method.clone(),
            url,
            headers,
            body,
            timeout: spec.timeout,
        })
    }

    fn build_url(&self, spec: &RequestSpec, session: &Session) -> Result<Url> {
        let path = instance_scoped_path(&spec.path, session.instance_id());
        let raw = format!("{}{}", self.config.api_root(), path);
        let mut url = Url::parse(&raw).map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))?;

        if spec.method == Method::GET
            && spec.attachment.is_none()
            && let Some(payload) = &spec.payload
            && !payload.is_empty()
        {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in payload {
                if let Some(text) = form_text(value) {
                    query_pairs.append_pair(key, &text);
                }
            }
        }

        Ok(url)
    }

    fn build_body(&self, spec: &RequestSpec) -> RequestBody {
        if let Some(attachment) = &spec.attachment {
            let mut fields = vec![MultipartField::file("file", attachment.clone())];
            if let Some(payload) = &spec.payload {
                fields.extend(payload.iter().filter_map(|(key, value)| {
                    form_text(value).map(|text| MultipartField::text(key.clone(), text))
                }));
            }
            return RequestBody::Multipart(fields);
        }

        match &spec.payload {
            Some(payload) if spec.method != Method::GET => {
                // A map of JSON values always serializes.
                let bytes = serde_json::to_vec(payload).unwrap_or_default();
                RequestBody::Json(Bytes::from(bytes))
            }
            _ => RequestBody::Empty,
        }
    }

    fn build_headers(&self, session: &Session, body: &RequestBody) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if !matches!(body, RequestBody::Multipart(_)) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.config.user_agent)
                .map_err(|e| Error::RequestBuild(format!("invalid user agent: {}", e)))?,
        );

        if let Some(token) = session.token() {
            let name = HeaderName::from_bytes(self.config.token_header.as_bytes())
                .map_err(|e| Error::RequestBuild(format!("invalid token header: {}", e)))?;
            let value = if self.config.token_prefix.is_empty() {
                token.to_string()
            } else {
                format!("{} {}", self.config.token_prefix, token)
            };
            let mut value = HeaderValue::from_str(&value)
                .map_err(|e| Error::RequestBuild(format!("invalid token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        Ok(headers)
    }
}
