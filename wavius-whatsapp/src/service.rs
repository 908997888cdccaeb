//! High-level Wavius service.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};
use wavius_config::{Validate, WaviusConfig};
use wavius_http::{FileAttachment, ResponseDecoder, WaviusClient};

use crate::{
    Call, Endpoint, ExchangeLogger, MediaPolicy, OutgoingMessage, Result, WebhookVerifier,
};

/// Typed access to every Wavius endpoint over one [`WaviusClient`].
#[derive(Debug, Clone)]
pub struct WaviusService {
    client: WaviusClient,
    config: WaviusConfig,
    logger: ExchangeLogger,
    media: MediaPolicy,
}

impl WaviusService {
    /// Wrap an existing client.
    pub fn new(client: WaviusClient, config: WaviusConfig) -> Self {
        let logger = ExchangeLogger::new(&config.logging);
        let media = MediaPolicy::from(&config.media);
        Self {
            client,
            config,
            logger,
            media,
        }
    }

    /// Validate the settings and build the client from them as well.
    pub fn from_config(config: WaviusConfig) -> Result<Self> {
        config.validate()?;
        let client = WaviusClient::from_settings(&config)?;
        Ok(Self::new(client, config))
    }

    /// Load settings from the environment (and `.env`), validate them and build the service.
    pub fn from_env() -> Result<Self> {
        Self::from_config(wavius_config::load()?)
    }

    pub fn client(&self) -> &WaviusClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut WaviusClient {
        &mut self.client
    }

    pub fn config(&self) -> &WaviusConfig {
        &self.config
    }

    pub fn media_policy(&self) -> &MediaPolicy {
        &self.media
    }

    /// Verifier for incoming webhooks, from the webhook settings.
    pub fn webhook_verifier(&self) -> WebhookVerifier {
        WebhookVerifier::from_settings(&self.config.webhook)
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.client.set_token(token);
    }

    pub fn token(&self) -> Option<&str> {
        self.client.token()
    }

    pub fn set_instance_id(&mut self, instance_id: impl Into<String>) {
        self.client.set_instance_id(instance_id);
    }

    pub fn instance_id(&self) -> Option<&str> {
        self.client.instance_id()
    }

    pub fn clear_instance_id(&mut self) {
        self.client.clear_instance_id();
    }

    /// Execute a call and decode the response.
    pub async fn call(&self, call: Call) -> Result<Value> {
        let spec = call.to_request()?;
        let operation = call.endpoint.name();

        self.logger.request(
            operation,
            spec.payload.as_ref(),
            spec.instance_id.as_deref().or(self.client.instance_id()),
        );

        let response = self.client.send_raw(&spec).await?;
        self.logger.response(operation, &response);

        Ok(ResponseDecoder::decode(&response)?)
    }

    /// Send a message, optionally on another instance.
    pub async fn send(
        &self,
        message: &OutgoingMessage,
        instance_id: Option<&str>,
    ) -> Result<Value> {
        debug!(
            endpoint = %message.endpoint(),
            to = message.recipient(),
            "Sending WhatsApp message"
        );

        let call = Call::new(message.endpoint())
            .json(message)?
            .instance(instance_id);
        self.call(call).await
    }

    /// Upload a local file after checking it against the media policy.
    pub async fn upload_media(
        &self,
        path: impl AsRef<Path>,
        instance_id: Option<&str>,
    ) -> Result<Value> {
        let path = path.as_ref();
        let size = tokio::fs::metadata(path).await?.len();
        let content_type = self.media.check(path, size)?;

        let attachment = FileAttachment::from_path(path)
            .await?
            .with_content_type(content_type);

        let call = Call::new(Endpoint::UploadMedia)
            .attach(attachment)
            .instance(instance_id);
        self.call(call).await
    }

    /// Connect the configured instance when auto-connect is on.
    ///
    /// Returns `None` when nothing was sent.
    pub async fn bootstrap(&self) -> Result<Option<Value>> {
        if !self.config.instance.auto_connect {
            return Ok(None);
        }

        let Some(instance_id) = self.client.instance_id() else {
            debug!("Auto-connect enabled but no instance id set");
            return Ok(None);
        };

        info!(instance_id, "Auto-connecting Wavius instance");
        let call = Call::new(Endpoint::ConnectInstance)
            .timeout(self.config.instance.connection_timeout());
        self.call(call).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(config: WaviusConfig) -> WaviusService {
        WaviusService::from_config(config).unwrap()
    }

    #[test]
    fn test_service_seeds_from_config() {
        let mut config = WaviusConfig::default();
        config.auth.token = Some("tok".into());
        config.instance.default_id = Some("inst-1".into());

        let mut service = service(config);
        assert_eq!(service.token(), Some("tok"));
        assert_eq!(service.instance_id(), Some("inst-1"));

        service.set_instance_id("inst-2");
        service.set_token("tok-2");
        assert_eq!(service.client().instance_id(), Some("inst-2"));
        assert_eq!(service.client().token(), Some("tok-2"));

        service.clear_instance_id();
        assert_eq!(service.instance_id(), None);
    }

    #[test]
    fn test_policy_and_verifier_follow_config() {
        let mut config = WaviusConfig::default();
        config.media.max_file_size = 42;
        config.webhook.verify_signature = false;

        let service = service(config);
        assert_eq!(service.media_policy().max_file_size(), 42);
        assert!(!service.webhook_verifier().is_enforcing());
    }

    #[tokio::test]
    async fn test_bootstrap_noop_without_auto_connect() {
        let mut config = WaviusConfig::default();
        config.instance.default_id = Some("inst-1".into());

        assert!(service(config).bootstrap().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_noop_without_instance() {
        let mut config = WaviusConfig::default();
        config.instance.auto_connect = true;

        assert!(service(config).bootstrap().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upload_rejected_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("script.sh");
        std::fs::write(&file, b"echo hi").unwrap();

        let err = service(WaviusConfig::default())
            .upload_media(&file, None)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::ServiceError::MediaRejected(_)));
    }

    #[test]
    fn test_from_config_rejects_invalid_settings() {
        let mut config = WaviusConfig::default();
        config.api.timeout = 0;

        let err = WaviusService::from_config(config).unwrap_err();
        assert!(matches!(err, crate::ServiceError::Config(_)));
    }

    #[test]
    fn test_debug_hides_token() {
        let mut config = WaviusConfig::default();
        config.auth.token = Some("tok-secret-123".into());
        config.webhook.secret = Some("whsec-456".into());

        let debug = format!("{:?}", service(config));
        assert!(!debug.contains("tok-secret-123"));
        assert!(!debug.contains("whsec-456"));
    }
}
