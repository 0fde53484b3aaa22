// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration file types (TOML or JSON).
//!
//! ```toml
//! [retry]
//! max_attempts = 3
//! delay_ms = 500
//!
//! [messages]
//! "message.failed-command-output-header" = "Output of failed command:"
//! ```

use crate::catalog::{
    default_bundle, CatalogError, FileProvider, LayeredProvider, MapProvider, StringCatalog,
};
use crate::executor::{DEFAULT_DELAY, DEFAULT_MAX_ATTEMPTS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY.as_millis() as u64
}

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutcheckConfig {
    #[serde(default)]
    pub retry: RetryConfig,

    /// Template overrides layered above the default bundle
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

/// Retry loop settings
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl OutcheckConfig {
    /// Load from a TOML file, or JSON when the extension is `.json`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: OutcheckConfig = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.retry.validate()?;
        if let Some(key) = self.messages.keys().find(|k| k.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "Invalid message key '{}': must not be empty",
                key
            )));
        }
        Ok(())
    }

    /// Catalog with lookups in this order: `messages` overrides, the
    /// optional catalog file, the default bundle
    pub fn catalog(&self, catalog_file: Option<&Path>) -> Result<StringCatalog, CatalogError> {
        let overrides: MapProvider = self
            .messages
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let mut layers = LayeredProvider::new().layer(overrides);
        if let Some(path) = catalog_file {
            layers = layers.layer(FileProvider::new(path));
        }
        Ok(StringCatalog::new(layers.layer(default_bundle()?)))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
