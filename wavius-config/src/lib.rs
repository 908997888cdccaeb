// Settings management for the Wavius SDK
//
// Settings come from `WAVIUS_*` environment variables (optionally seeded
// from a `.env` file) or from a JSON/TOML document. The result is a single
// `WaviusConfig` value built at startup and passed down explicitly.

pub mod env;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use env::{EnvLoader, parse_bool};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use settings::{
    ApiSettings, AuthSettings, DEFAULT_ALLOWED_MEDIA_TYPES, ENV_PREFIX, InstanceSettings,
    LOG_LEVELS, LoggingSettings, MediaSettings, WaviusConfig, WebhookSettings,
};
pub use validation::{ConfigValidator, Validate};

/// Load settings from the environment and validate them.
pub fn load() -> Result<WaviusConfig> {
    let config = WaviusConfig::from_dotenv(None)?;
    config.validate()?;
    Ok(config)
}
