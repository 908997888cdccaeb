// Settings schema for the Wavius SDK

use crate::env::EnvLoader;
use crate::loader::{ConfigLoader, FileFormat, env_map};
use crate::validation::{ConfigValidator, Validate};
use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Prefix of every environment variable the SDK reads.
pub const ENV_PREFIX: &str = "WAVIUS";

/// Log levels accepted in `logging.level`.
pub const LOG_LEVELS: &[&str] = &[
    "trace",
    "debug",
    "info",
    "notice",
    "warn",
    "warning",
    "error",
    "critical",
    "alert",
    "emergency",
];

/// Media types accepted by the provider's upload endpoint.
pub const DEFAULT_ALLOWED_MEDIA_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "video/mp4",
    "video/3gpp",
    "audio/mp3",
    "audio/mpeg",
    "audio/ogg",
    "audio/wav",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Complete SDK settings.
///
/// Every field has a default, so a partial JSON/TOML document or an empty
/// environment still yields a usable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaviusConfig {
    pub api: ApiSettings,
    pub auth: AuthSettings,
    pub instance: InstanceSettings,
    pub webhook: WebhookSettings,
    pub logging: LoggingSettings,
    pub media: MediaSettings,
}

/// Remote API endpoint and transport policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub version: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Total attempts per request, including the first.
    pub retry_attempts: u32,
    /// Fixed delay between attempts in milliseconds.
    pub retry_delay: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.wavius.co".to_string(),
            version: "v1".to_string(),
            timeout: 30,
            retry_attempts: 3,
            retry_delay: 1000,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay)
    }
}

/// Credential settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub token: Option<String>,
    pub token_header: String,
    pub token_prefix: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token: None,
            token_header: "Authorization".to_string(),
            token_prefix: "Bearer".to_string(),
        }
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("has_token", &self.token.is_some())
            .field("token_header", &self.token_header)
            .field("token_prefix", &self.token_prefix)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceSettings {
    pub default_id: Option<String>,
    pub auto_connect: bool,
    /// Timeout for the connect call in seconds.
    pub connection_timeout: u64,
}

impl Default for InstanceSettings {
    fn default() -> Self {
        Self {
            default_id: None,
            auto_connect: false,
            connection_timeout: 60,
        }
    }
}

impl InstanceSettings {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }
}

/// Inbound webhook settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    pub enabled: bool,
    pub secret: Option<String>,
    pub endpoint: String,
    pub verify_signature: bool,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            secret: None,
            endpoint: "/webhooks/wavius".to_string(),
            verify_signature: true,
        }
    }
}

impl std::fmt::Debug for WebhookSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSettings")
            .field("enabled", &self.enabled)
            .field("has_secret", &self.secret.is_some())
            .field("endpoint", &self.endpoint)
            .field("verify_signature", &self.verify_signature)
            .finish()
    }
}

/// Request/response logging switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub enabled: bool,
    pub level: String,
    pub log_requests: bool,
    pub log_responses: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            log_requests: false,
            log_responses: false,
        }
    }
}

/// Upload limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    /// Maximum upload size in bytes.
    pub max_file_size: u64,
    pub allowed_types: Vec<String>,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            max_file_size: 16 * 1024 * 1024,
            allowed_types: DEFAULT_ALLOWED_MEDIA_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl WaviusConfig {
    /// Read settings from `WAVIUS_*` process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_env_loader(&EnvLoader::new(Some(ENV_PREFIX.to_string())))
    }

    /// Load a `.env` file into the process environment, then read it.
    ///
    /// With no path, a missing `.env` in the working directory is ignored.
    pub fn from_dotenv(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Self::from_env()
    }

    /// Read settings from a JSON, TOML or `.env` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let loader = ConfigLoader::auto(path)?;
        let value = loader.load_file(path)?;

        if loader.format() == FileFormat::Env {
            let env = EnvLoader::from_map(Some(ENV_PREFIX.to_string()), env_map(&value));
            return Self::from_env_loader(&env);
        }

        serde_json::from_value(value).map_err(|e| ConfigError::DeserializationError(e.to_string()))
    }

    /// Overlay environment variables on the defaults.
    pub fn from_env_loader(env: &EnvLoader) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = env.get("API_BASE_URL") {
            config.api.base_url = v;
        }
        if let Some(v) = env.get("API_VERSION") {
            config.api.version = v;
        }
        if let Some(v) = env.get_parsed("API_TIMEOUT")? {
            config.api.timeout = v;
        }
        if let Some(v) = env.get_parsed("API_RETRY_ATTEMPTS")? {
            config.api.retry_attempts = v;
        }
        if let Some(v) = env.get_parsed("API_RETRY_DELAY")? {
            config.api.retry_delay = v;
        }

        config.auth.token = env.get("API_TOKEN");
        if let Some(v) = env.get("TOKEN_HEADER") {
            config.auth.token_header = v;
        }
        // An explicitly empty prefix means "send the bare token".
        if let Ok(v) = env.load_var("TOKEN_PREFIX") {
            config.auth.token_prefix = v.trim().to_string();
        }

        config.instance.default_id = env.get("DEFAULT_INSTANCE_ID");
        if let Some(v) = env.get_bool("AUTO_CONNECT")? {
            config.instance.auto_connect = v;
        }
        if let Some(v) = env.get_parsed("CONNECTION_TIMEOUT")? {
            config.instance.connection_timeout = v;
        }

        if let Some(v) = env.get_bool("WEBHOOK_ENABLED")? {
            config.webhook.enabled = v;
        }
        config.webhook.secret = env.get("WEBHOOK_SECRET");
        if let Some(v) = env.get("WEBHOOK_ENDPOINT") {
            config.webhook.endpoint = v;
        }
        if let Some(v) = env.get_bool("VERIFY_WEBHOOK_SIGNATURE")? {
            config.webhook.verify_signature = v;
        }

        if let Some(v) = env.get_bool("LOGGING_ENABLED")? {
            config.logging.enabled = v;
        }
        if let Some(v) = env.get("LOG_LEVEL") {
            config.logging.level = v.to_lowercase();
        }
        if let Some(v) = env.get_bool("LOG_REQUESTS")? {
            config.logging.log_requests = v;
        }
        if let Some(v) = env.get_bool("LOG_RESPONSES")? {
            config.logging.log_responses = v;
        }

        if let Some(v) = env.get_parsed("MAX_FILE_SIZE")? {
            config.media.max_file_size = v;
        }

        Ok(config)
    }

    /// Root of every API path: `{base_url}/{version}`.
    pub fn api_root(&self) -> String {
        format!(
            "{}/{}",
            self.api.base_url.trim_end_matches('/'),
            self.api.version.trim_matches('/')
        )
    }
}

impl Validate for WaviusConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::is_url(&self.api.base_url, "api.base_url")?;
        ConfigValidator::not_empty(&self.api.version, "api.version")?;
        ConfigValidator::in_range(self.api.retry_attempts, 1, 10, "api.retry_attempts")?;
        ConfigValidator::in_range(self.api.timeout, 1, 600, "api.timeout")?;
        ConfigValidator::not_empty(&self.auth.token_header, "auth.token_header")?;
        ConfigValidator::is_absolute_path(&self.webhook.endpoint, "webhook.endpoint")?;
        ConfigValidator::one_of(
            &self.logging.level.as_str(),
            LOG_LEVELS,
            "logging.level",
        )?;
        Ok(())
    }
}
