//! Request and response logging for service calls.

use serde_json::{Map, Value};
use tracing::Level;
use wavius_config::LoggingSettings;
use wavius_http::ApiResponse;

/// Emit an event at a level chosen at runtime.
macro_rules! event_at {
    ($level:expr, $($arg:tt)+) => {
        match $level {
            Level::TRACE => tracing::trace!($($arg)+),
            Level::DEBUG => tracing::debug!($($arg)+),
            Level::INFO => tracing::info!($($arg)+),
            Level::WARN => tracing::warn!($($arg)+),
            _ => tracing::error!($($arg)+),
        }
    };
}

/// Map a configured level name onto a tracing level.
///
/// Syslog-style names collapse onto the nearest tracing level; unknown
/// names fall back to `INFO`.
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" | "critical" | "alert" | "emergency" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Logs API exchanges according to the logging settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeLogger {
    level: Level,
    log_requests: bool,
    log_responses: bool,
}

impl ExchangeLogger {
    pub fn new(settings: &LoggingSettings) -> Self {
        Self {
            level: parse_level(&settings.level),
            log_requests: settings.enabled && settings.log_requests,
            log_responses: settings.enabled && settings.log_responses,
        }
    }

    /// A logger that never emits.
    pub fn disabled() -> Self {
        Self {
            level: Level::INFO,
            log_requests: false,
            log_responses: false,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn logs_requests(&self) -> bool {
        self.log_requests
    }

    pub fn logs_responses(&self) -> bool {
        self.log_responses
    }

    pub fn request(
        &self,
        operation: &str,
        payload: Option<&Map<String, Value>>,
        instance_id: Option<&str>,
    ) {
        if !self.log_requests {
            return;
        }

        let data = payload.map(|p| Value::Object(p.clone())).unwrap_or(Value::Null);
        event_at!(
            self.level,
            operation,
            data = %data,
            instance_id = instance_id.unwrap_or_default(),
            "Wavius API request"
        );
    }

    pub fn response(&self, operation: &str, response: &ApiResponse) {
        if !self.log_responses {
            return;
        }

        event_at!(
            self.level,
            operation,
            status_code = response.status().as_u16(),
            body = %response.text(),
            "Wavius API response"
        );
    }
}

impl Default for ExchangeLogger {
    fn default() -> Self {
        Self::new(&LoggingSettings::default())
    }
}
