//! Configuration loading, validation, and management for SiteChat.
//!
//! Loads configuration from `~/.sitechat/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound for the simulated reply latency.
const MAX_RESPONSE_DELAY_MS: u64 = 60_000;

/// The root configuration structure.
///
/// Maps directly to `~/.sitechat/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Default bot configuration
    #[serde(default)]
    pub bot: BotConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub allow_public_bind: bool,

    /// When set, every /v1 route requires `Authorization: Bearer <api_key>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: usize,
}

fn default_port() -> u16 {
    42618
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:8080".into()]
}
fn default_rate_limit() -> usize {
    60
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allow_public_bind: false,
            api_key: None,
            cors_origins: default_cors_origins(),
            rate_limit_per_minute: default_rate_limit(),
        }
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("port", &self.port)
            .field("host", &self.host)
            .field("allow_public_bind", &self.allow_public_bind)
            .field("api_key", &redact(&self.api_key))
            .field("cors_origins", &self.cors_origins)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}

/// Settings for the bot that is created at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Where the knowledge came from (usually a domain or URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_label: Option<String>,

    /// Plain-text file with one knowledge snippet per line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_file: Option<PathBuf>,

    /// Simulated latency before each reply
    #[serde(default)]
    pub response_delay_ms: u64,
}

fn default_bot_name() -> String {
    "Support Bot".into()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            source_label: None,
            knowledge_file: None,
            response_delay_ms: 0,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.sitechat/config.toml).
    ///
    /// Environment variables override the file:
    /// - `SITECHAT_API_KEY`
    /// - `SITECHAT_PORT`
    /// - `SITECHAT_SOURCE_LABEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production, a map in tests).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("SITECHAT_API_KEY") {
            self.gateway.api_key = Some(key);
        }

        if let Some(port) = lookup("SITECHAT_PORT") {
            self.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("SITECHAT_PORT is not a valid port: {port}"))
            })?;
        }

        if let Some(label) = lookup("SITECHAT_SOURCE_LABEL") {
            self.bot.source_label = Some(label);
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".sitechat")
    }

    /// Get the directory where knowledge files are kept by default.
    pub fn knowledge_dir() -> PathBuf {
        Self::config_dir().join("knowledge")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.port == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.port must be non-zero".into(),
            ));
        }

        if self.gateway.rate_limit_per_minute == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.rate_limit_per_minute must be > 0".into(),
            ));
        }

        if self.gateway.host == "0.0.0.0" && !self.gateway.allow_public_bind {
            return Err(ConfigError::ValidationError(
                "binding to 0.0.0.0 requires gateway.allow_public_bind = true".into(),
            ));
        }

        if self.bot.response_delay_ms > MAX_RESPONSE_DELAY_MS {
            return Err(ConfigError::ValidationError(format!(
                "bot.response_delay_ms must be <= {MAX_RESPONSE_DELAY_MS}"
            )));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
