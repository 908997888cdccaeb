// Environment variable loading

use crate::{ConfigError, Result};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;

/// Where variables are read from.
#[derive(Debug, Clone)]
enum Source {
    Process,
    Map(HashMap<String, String>),
}

/// Environment variable loader
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: Option<String>,
    source: Source,
}

impl EnvLoader {
    /// Create a loader over the process environment
    pub fn new(prefix: Option<String>) -> Self {
        Self {
            prefix,
            source: Source::Process,
        }
    }

    /// Create a loader over a fixed set of variables (e.g. a parsed `.env` file)
    pub fn from_map(prefix: Option<String>, vars: HashMap<String, String>) -> Self {
        Self {
            prefix,
            source: Source::Map(vars),
        }
    }

    fn full_key(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }

    fn raw(&self, full_key: &str) -> Result<String> {
        match &self.source {
            Source::Process => env::var(full_key).map_err(ConfigError::EnvError),
            Source::Map(vars) => vars
                .get(full_key)
                .cloned()
                .ok_or(ConfigError::EnvError(env::VarError::NotPresent)),
        }
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        self.raw(&self.full_key(key))
    }

    /// Load a variable, treating unset and blank values as absent
    pub fn get(&self, key: &str) -> Option<String> {
        self.load_var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Load and parse a variable
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(value) => value
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidValue {
                    key: self.full_key(key),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Load a boolean flag
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            Some(value) => parse_bool(&value)
                .map(Some)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: self.full_key(key),
                    message: format!("expected a boolean, got '{}'", value),
                }),
            None => Ok(None),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Parse the boolean spellings accepted in `.env` files.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
