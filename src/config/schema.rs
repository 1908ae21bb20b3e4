//! Config schema and deserialization

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8765;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_LOG_FILTER: &str = "greenlane=info,greenlane_server=info";

pub const ENV_PORT: &str = "GREENLANE_PORT";
pub const ENV_HOST: &str = "GREENLANE_HOST";
pub const ENV_MODEL: &str = "GREENLANE_MODEL";

/// Root config structure for .greenlanerc.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Port to listen on. Default: 8765
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Interface to bind. Default: all interfaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Model file; absent means mock mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,

    /// Serve from the mock backend when the model fails to load. Default: true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_to_mock: Option<bool>,

    /// tracing-subscriber filter directive, used when RUST_LOG is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Config {
    /// Apply environment overrides. `lookup` is `std::env::var` outside tests.
    pub fn merge_with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT) {
            let port = port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid {}: {}", ENV_PORT, port))?;
            self.port = Some(port);
        }
        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            self.host = Some(host);
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|m| !m.trim().is_empty()) {
            self.model = Some(PathBuf::from(model));
        }
        Ok(self)
    }

    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(
        mut self,
        cli_port: Option<u16>,
        cli_host: Option<String>,
        cli_model: Option<PathBuf>,
    ) -> Self {
        if cli_port.is_some() {
            self.port = cli_port;
        }
        if cli_host.is_some() {
            self.host = cli_host;
        }
        if cli_model.is_some() {
            self.model = cli_model;
        }
        self
    }

    /// Fill defaults for anything left unset
    pub fn effective(&self) -> EffectiveConfig {
        EffectiveConfig {
            port: self.port.unwrap_or(DEFAULT_PORT),
            host: self
                .host
                .clone()
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            model: self.model.clone(),
            fallback_to_mock: self.fallback_to_mock.unwrap_or(true),
            log_filter: self
                .log_filter
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

/// Effective configuration after defaults are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub port: u16,
    pub host: String,
    pub model: Option<PathBuf>,
    pub fallback_to_mock: bool,
    pub log_filter: String,
}

impl EffectiveConfig {
    /// Socket address string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Model path as passed to the engine; empty means mock mode
    pub fn model_arg(&self) -> String {
        self.model
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
