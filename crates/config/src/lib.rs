//! Configuration management for the travel desk assistant
//!
//! Supports loading configuration from:
//! - TOML/YAML files under `config/`
//! - Environment variables (TRAVEL_DESK_ prefix, `__` separator)
//!
//! The resulting [`Settings`] is immutable once loaded and is handed to
//! constructors by reference.

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, load_settings_from, AgentSettings, AuthConfig, BridgeSettings, CatalogConfig,
    CatalogProvider, HistoryConfig, LlmSettings, ObservabilityConfig, PersistenceConfig,
    RuntimeEnvironment, ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
