//! Client configuration.

use std::time::Duration;

use wavius_config::WaviusConfig;

use crate::retry::RetryPolicy;

/// Immutable client configuration, shared read-only by every request.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Provider base URL, without the API version.
    pub base_url: String,
    /// API version segment, e.g. `v1`.
    pub api_version: String,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Total attempts per request on transport failure.
    pub retry_attempts: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
    /// Token seeded into new sessions.
    pub token: Option<String>,
    /// Instance id seeded into new sessions.
    pub instance_id: Option<String>,
    /// Name of the auth header.
    pub token_header: String,
    /// Scheme placed before the token. Empty sends the bare token.
    pub token_prefix: String,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.wavius.co".to_string(),
            api_version: "v1".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            retry_attempts: 3,
            retry_delay: Duration::from_millis(1000),
            token: None,
            instance_id: None,
            token_header: "Authorization".to_string(),
            token_prefix: "Bearer".to_string(),
            user_agent: format!("wavius-rust-sdk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// `{base_url}/{api_version}`.
    pub fn api_root(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }

    /// Retry policy derived from the attempt count and delay.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.retry_attempts, self.retry_delay)
    }
}

impl From<&WaviusConfig> for ClientConfig {
    fn from(settings: &WaviusConfig) -> Self {
        Self {
            base_url: settings.api.base_url.clone(),
            api_version: settings.api.version.clone(),
            timeout: settings.api.timeout(),
            retry_attempts: settings.api.retry_attempts,
            retry_delay: settings.api.retry_delay(),
            token: settings.auth.token.clone(),
            instance_id: settings.instance.default_id.clone(),
            token_header: settings.auth.token_header.clone(),
            token_prefix: settings.auth.token_prefix.clone(),
            ..Self::default()
        }
    }
}

/// Builder for client configuration.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the provider base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the API version segment.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    /// Set the per-attempt request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the total attempt count.
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.config.retry_attempts = attempts;
        self
    }

    /// Set the delay between attempts.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    /// Set the default bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    /// Set the default instance id.
    pub fn instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.config.instance_id = Some(instance_id.into());
        self
    }

    /// Set the auth header name.
    pub fn token_header(mut self, header: impl Into<String>) -> Self {
        self.config.token_header = header.into();
        self
    }

    /// Set the token prefix.
    pub fn token_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.token_prefix = prefix.into();
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
