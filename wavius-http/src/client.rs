//! Wavius API client.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use wavius_config::{Validate, WaviusConfig};

use crate::{
    ApiResponse, ClientConfig, FileAttachment, ReqwestTransport, RequestBuilder, RequestSpec,
    ResolvedRequest, ResponseDecoder, Result, Session, Transport, TransportClient,
};

/// Client for the Wavius REST API.
///
/// Owns one [`Session`]; changing the token or instance id needs `&mut self`,
/// so a client shared between tasks has to sit behind a lock.
#[derive(Clone)]
pub struct WaviusClient {
    config: Arc<ClientConfig>,
    session: Session,
    transport: TransportClient,
}

impl WaviusClient {
    /// Create a client backed by reqwest.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Validate loaded SDK settings and create a client from them.
    pub fn from_settings(settings: &WaviusConfig) -> Result<Self> {
        settings.validate()?;
        Self::new(ClientConfig::from(settings))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let session = Session::seeded(&config);
        let transport = TransportClient::from_config(transport, &config);
        Self {
            config: Arc::new(config),
            session,
            transport,
        }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Set the bearer token for subsequent requests.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.session.set_token(token);
    }

    /// Get the current bearer token.
    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    /// Stop sending a bearer token.
    pub fn clear_token(&mut self) {
        self.session.clear_token();
    }

    /// Set the instance id for subsequent requests.
    pub fn set_instance_id(&mut self, instance_id: impl Into<String>) {
        self.session.set_instance_id(instance_id);
    }

    /// Get the current instance id.
    pub fn instance_id(&self) -> Option<&str> {
        self.session.instance_id()
    }

    /// Stop scoping paths to an instance.
    pub fn clear_instance_id(&mut self) {
        self.session.clear_instance_id();
    }

    /// Resolve a request without sending it.
    pub fn resolve(&self, spec: &RequestSpec) -> Result<ResolvedRequest> {
        RequestBuilder::new(&self.config).build(spec, &self.session)
    }

    /// Send a request and return the undecoded response.
    pub async fn send_raw(&self, spec: &RequestSpec) -> Result<ApiResponse> {
        let request = self.resolve(spec)?;
        debug!(
            method = %request.method,
            url = %request.url,
            "Sending Wavius API request"
        );

        let response = self.transport.execute(&request).await?;
        debug!(
            status = %response.status(),
            url = %request.url,
            "Received Wavius API response"
        );
        Ok(response)
    }

    /// Send a request and decode the response.
    pub async fn send(&self, spec: &RequestSpec) -> Result<Value> {
        let response = self.send_raw(spec).await?;
        ResponseDecoder::decode(&response)
    }

    /// GET without parameters.
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.send(&RequestSpec::get(path)).await
    }

    /// GET with query parameters.
    pub async fn get_with_query<T: Serialize + ?Sized>(&self, path: &str, query: &T) -> Result<Value> {
        self.send(&RequestSpec::get(path).json(query)?).await
    }

    /// POST with a JSON body.
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value> {
        self.send(&RequestSpec::post(path).json(body)?).await
    }

    /// PUT with a JSON body.
    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value> {
        self.send(&RequestSpec::put(path).json(body)?).await
    }

    /// DELETE without a body.
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.send(&RequestSpec::delete(path)).await
    }

    /// DELETE with a JSON body.
    pub async fn delete_with_body<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Value> {
        self.send(&RequestSpec::delete(path).json(body)?).await
    }

    /// Upload a file from disk as multipart, with extra form fields.
    pub async fn upload<T: Serialize + ?Sized>(
        &self,
        path: &str,
        file_path: impl AsRef<Path>,
        fields: &T,
    ) -> Result<Value> {
        let attachment = FileAttachment::from_path(file_path).await?;
        let spec = RequestSpec::post(path).json(fields)?.attach(attachment);
        self.send(&spec).await
    }
}

impl std::fmt::Debug for WaviusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaviusClient")
            .field("api_root", &self.config.api_root())
            .field("instance_id", &self.session.instance_id())
            .field("has_token", &self.session.token().is_some())
            .finish()
    }
}
