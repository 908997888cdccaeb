//! Endpoint calls.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use wavius_http::{FileAttachment, RequestSpec};

use crate::{Endpoint, Result};

/// One invocation of an [`Endpoint`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: Endpoint,
    /// Values for the route's `{param}` placeholders.
    pub params: BTreeMap<String, String>,
    /// Query parameters for GET, JSON body otherwise.
    pub payload: Option<Map<String, Value>>,
    pub attachment: Option<FileAttachment>,
    /// Instance for this call only.
    pub instance_id: Option<String>,
    pub timeout: Option<Duration>,
}

impl Call {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: BTreeMap::new(),
            payload: None,
            attachment: None,
            instance_id: None,
            timeout: None,
        }
    }

    /// Set a path parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Replace the payload with a serializable object.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self> {
        let spec = RequestSpec::new(self.endpoint.route().method, "").json(payload)?;
        self.payload = spec.payload;
        Ok(self)
    }

    /// Add a single payload field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn attach(mut self, attachment: FileAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Scope to `instance_id` when given; `None` keeps the session's instance.
    pub fn instance<S: Into<String>>(mut self, instance_id: Option<S>) -> Self {
        self.instance_id = instance_id.map(Into::into).filter(|id| !id.is_empty());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolve the route into a request specification.
    pub fn to_request(&self) -> Result<RequestSpec> {
        let route = self.endpoint.route();
        let path = route.render(&self.params)?;
        let mut spec = RequestSpec::new(route.method.clone(), path);
        spec.payload = self.payload.clone();
        spec.attachment = self.attachment.clone();
        spec.instance_id = self.instance_id.clone();
        spec.timeout = self.timeout;
        Ok(spec)
    }
}

impl From<Endpoint> for Call {
    fn from(endpoint: Endpoint) -> Self {
        Self::new(endpoint)
    }
}
