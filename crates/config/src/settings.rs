//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{self, bridge, catalog, endpoints, history, llm};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - missing keys are warnings
    #[default]
    Development,
    /// Staging mode
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub catalog: CatalogConfig,

    /// WhatsApp bridge used for outbound delivery
    #[serde(default)]
    pub bridge: BridgeSettings,

    #[serde(default)]
    pub persistence: PersistenceConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub agent: AgentSettings,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_llm()?;
        self.validate_catalog()?;
        self.validate_bridge()?;
        self.validate_history()?;
        self.validate_agent()?;
        Ok(())
    }

    /// Key the bridge expects; falls back to the internal API key
    pub fn bridge_api_key(&self) -> Option<&str> {
        self.bridge
            .api_key
            .as_deref()
            .or(self.server.auth.internal_api_key.as_deref())
            .filter(|k| !k.is_empty())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        let keys = [
            ("server.auth.internal_api_key", &server.auth.internal_api_key),
            ("server.auth.admin_api_key", &server.auth.admin_api_key),
        ];
        for (field, key) in keys {
            let missing = key.as_deref().map(str::is_empty).unwrap_or(true);
            if !missing {
                continue;
            }
            if self.environment.is_production() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "API key must be set in production".to_string(),
                });
            }
            tracing::warn!("{} not configured, its routes will reject every request", field);
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 This may block legitimate requests."
            );
        }

        Ok(())
    }

    fn validate_llm(&self) -> Result<(), ConfigError> {
        let llm = &self.llm;

        if !(0.0..=2.0).contains(&llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", llm.temperature),
            });
        }

        if llm.context_messages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.context_messages".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if llm.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.max_tokens".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if llm.api_key.as_deref().map(str::is_empty).unwrap_or(true)
            && !llm.endpoint.starts_with("http://localhost")
        {
            if self.environment.is_production() {
                return Err(ConfigError::InvalidValue {
                    field: "llm.api_key".to_string(),
                    message: "API key is required for remote endpoints in production".to_string(),
                });
            }
            tracing::warn!(endpoint = %llm.endpoint, "llm.api_key not configured");
        }

        Ok(())
    }

    fn validate_catalog(&self) -> Result<(), ConfigError> {
        let catalog = &self.catalog;

        match catalog.provider {
            CatalogProvider::Sheets => {
                if catalog.spreadsheet_id.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "catalog.spreadsheet_id".to_string(),
                        message: "Required when catalog.provider = sheets".to_string(),
                    });
                }
                if catalog.api_key.as_deref().map(str::is_empty).unwrap_or(true)
                    && self.environment.is_production()
                {
                    return Err(ConfigError::InvalidValue {
                        field: "catalog.api_key".to_string(),
                        message: "API key must be set in production".to_string(),
                    });
                }
            }
            CatalogProvider::Static => {
                if let Some(path) = &catalog.fixture_path {
                    if !Path::new(path).is_file() {
                        if self.environment.is_strict() {
                            return Err(ConfigError::FileNotFound(path.clone()));
                        }
                        tracing::warn!("Catalog fixture not found: {}", path);
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_bridge(&self) -> Result<(), ConfigError> {
        let bridge = &self.bridge;

        if bridge.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "bridge.max_attempts".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if bridge.min_backoff_secs > bridge.max_backoff_secs {
            return Err(ConfigError::InvalidValue {
                field: "bridge.min_backoff_secs".to_string(),
                message: format!(
                    "Cannot be larger than max_backoff_secs ({})",
                    bridge.max_backoff_secs
                ),
            });
        }

        if self.environment.is_production() && self.bridge_api_key().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "bridge.api_key".to_string(),
                message: "No bridge key and no internal key to fall back to".to_string(),
            });
        }

        Ok(())
    }

    fn validate_history(&self) -> Result<(), ConfigError> {
        if self.history.ttl_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history.ttl_days".to_string(),
                message: "Must be at least 1 day".to_string(),
            });
        }

        if self.history.cleanup_interval_hours == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history.cleanup_interval_hours".to_string(),
                message: "Must be at least 1 hour".to_string(),
            });
        }

        Ok(())
    }

    fn validate_agent(&self) -> Result<(), ConfigError> {
        if self.agent.system_prompt.trim().is_empty() {
            return Err(ConfigError::MissingField("agent.system_prompt".to_string()));
        }

        if self.agent.employee_number.is_none() {
            tracing::warn!("agent.employee_number not set, handoff alerts will be skipped");
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
            auth: AuthConfig::default(),
        }
    }
}

/// API keys guarding the HTTP surface
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// `X-API-Key` for the webhook and the pause/resume actions
    #[serde(default)]
    pub internal_api_key: Option<String>,

    /// `X-Admin-Api-Key` for the admin listing
    #[serde(default)]
    pub admin_api_key: Option<String>,
}

/// OpenAI-compatible chat model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Token cap for the tool-selection call
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for the tool-selection call
    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_llm_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_llm_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// History entries sent as conversation context
    #[serde(default = "default_context_messages")]
    pub context_messages: usize,
}

fn default_llm_endpoint() -> String {
    std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| endpoints::OPENAI_DEFAULT.to_string())
}

fn default_llm_model() -> String {
    llm::DEFAULT_MODEL.to_string()
}

fn default_llm_max_tokens() -> u32 {
    llm::DEFAULT_MAX_TOKENS
}

fn default_llm_timeout() -> u64 {
    llm::DEFAULT_TIMEOUT_SECS
}

fn default_llm_max_retries() -> u32 {
    llm::DEFAULT_MAX_RETRIES
}

fn default_llm_initial_backoff() -> u64 {
    llm::DEFAULT_INITIAL_BACKOFF_MS
}

fn default_context_messages() -> usize {
    llm::DEFAULT_CONTEXT_MESSAGES
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: None,
            model: default_llm_model(),
            max_tokens: default_llm_max_tokens(),
            temperature: 0.0,
            timeout_secs: default_llm_timeout(),
            max_retries: default_llm_max_retries(),
            initial_backoff_ms: default_llm_initial_backoff(),
            context_messages: default_context_messages(),
        }
    }
}

/// Where catalog rows come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogProvider {
    /// Google Sheets values API
    Sheets,
    /// In-memory or JSON fixture
    #[default]
    Static,
}

/// Catalog source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub provider: CatalogProvider,

    #[serde(default = "default_sheets_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub spreadsheet_id: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-category freshness window
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// JSON file of `{category: [record, ...]}` for the static provider
    #[serde(default)]
    pub fixture_path: Option<String>,

    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

fn default_sheets_base_url() -> String {
    endpoints::SHEETS_DEFAULT.to_string()
}

fn default_cache_ttl() -> u64 {
    catalog::DEFAULT_CACHE_TTL_SECS
}

fn default_catalog_timeout() -> u64 {
    catalog::DEFAULT_TIMEOUT_SECS
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            provider: CatalogProvider::default(),
            base_url: default_sheets_base_url(),
            spreadsheet_id: String::new(),
            api_key: None,
            cache_ttl_secs: default_cache_ttl(),
            fixture_path: None,
            timeout_secs: default_catalog_timeout(),
        }
    }
}

/// WhatsApp bridge client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeSettings {
    #[serde(default = "default_bridge_url")]
    pub url: String,

    /// Sent as `X-API-Key`; defaults to the internal API key when unset
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_bridge_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_bridge_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_min_backoff")]
    pub min_backoff_secs: u64,

    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_bridge_url() -> String {
    std::env::var("WHATSAPP_BRIDGE_URL").unwrap_or_else(|_| endpoints::BRIDGE_DEFAULT.to_string())
}

fn default_bridge_timeout() -> u64 {
    bridge::DEFAULT_TIMEOUT_SECS
}

fn default_bridge_attempts() -> u32 {
    bridge::DEFAULT_MAX_ATTEMPTS
}

fn default_min_backoff() -> u64 {
    bridge::DEFAULT_MIN_BACKOFF_SECS
}

fn default_max_backoff() -> u64 {
    bridge::DEFAULT_MAX_BACKOFF_SECS
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            url: default_bridge_url(),
            api_key: None,
            timeout_secs: default_bridge_timeout(),
            max_attempts: default_bridge_attempts(),
            min_backoff_secs: default_min_backoff(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

/// Persistence configuration for ScyllaDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Enable ScyllaDB persistence (false = in-memory only)
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_scylla_hosts")]
    pub scylla_hosts: Vec<String>,

    #[serde(default = "default_scylla_keyspace")]
    pub keyspace: String,

    #[serde(default = "default_replication_factor")]
    pub replication_factor: u8,
}

fn default_scylla_hosts() -> Vec<String> {
    std::env::var("SCYLLA_HOSTS")
        .map(|s| s.split(',').map(|h| h.trim().to_string()).collect())
        .unwrap_or_else(|_| vec![endpoints::SCYLLA_DEFAULT.to_string()])
}

fn default_scylla_keyspace() -> String {
    std::env::var("SCYLLA_KEYSPACE").unwrap_or_else(|_| "travel_desk".to_string())
}

fn default_replication_factor() -> u8 {
    1
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scylla_hosts: default_scylla_hosts(),
            keyspace: default_scylla_keyspace(),
            replication_factor: default_replication_factor(),
        }
    }
}

/// Conversation history retention
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u32,

    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_hours: u64,
}

fn default_ttl_days() -> u32 {
    history::DEFAULT_TTL_DAYS
}

fn default_cleanup_interval() -> u64 {
    history::DEFAULT_CLEANUP_INTERVAL_HOURS
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            ttl_days: default_ttl_days(),
            cleanup_interval_hours: default_cleanup_interval(),
        }
    }
}

/// Dialogue engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "default_company_name")]
    pub company_name: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Operator address notified on handoff
    #[serde(default)]
    pub employee_number: Option<String>,

    /// Serialize turns of the same sender
    #[serde(default)]
    pub serialize_per_sender: bool,
}

fn default_company_name() -> String {
    constants::DEFAULT_COMPANY_NAME.to_string()
}

fn default_system_prompt() -> String {
    constants::DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            system_prompt: default_system_prompt(),
            employee_number: None,
            serialize_per_sender: false,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (json or pretty)
    #[serde(default)]
    pub log_json: bool,

    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from `config/` in the working directory
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from("config", env)
}

/// Load settings from a specific config directory
pub fn load_settings_from(dir: impl AsRef<Path>, env: Option<&str>) -> Result<Settings, ConfigError> {
    let dir = dir.as_ref();
    let mut builder = Config::builder();

    // Load default config
    let default_path = dir.join("default");
    builder = builder.add_source(File::with_name(&default_path.to_string_lossy()).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        let env_path = dir.join(env_name);
        builder = builder.add_source(File::with_name(&env_path.to_string_lossy()).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("TRAVEL_DESK")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.llm.max_tokens, 400);
        assert_eq!(settings.llm.context_messages, 10);
        assert_eq!(settings.catalog.cache_ttl_secs, 300);
        assert_eq!(settings.bridge.max_attempts, 3);
        assert!(!settings.agent.serialize_per_sender);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.history.ttl_days = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.history.cleanup_interval_hours = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.llm.context_messages = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.llm.temperature = 3.5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.bridge.max_attempts = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.bridge.min_backoff_secs = 20;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_production_requires_keys() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Production;
        settings.llm.api_key = Some("sk".to_string());
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("server.auth.internal_api_key"));

        settings.server.auth.internal_api_key = Some("internal".to_string());
        settings.server.auth.admin_api_key = Some("admin".to_string());
        assert!(settings.validate().is_ok());
        assert_eq!(settings.bridge_api_key(), Some("internal"));
    }

    #[test]
    fn test_sheets_provider_requires_spreadsheet() {
        let mut settings = Settings::default();
        settings.catalog.provider = CatalogProvider::Sheets;
        assert!(settings.validate().is_err());

        settings.catalog.spreadsheet_id = "sheet-id".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_bridge_key_prefers_explicit() {
        let mut settings = Settings::default();
        assert_eq!(settings.bridge_api_key(), None);

        settings.server.auth.internal_api_key = Some("internal".to_string());
        settings.bridge.api_key = Some("bridge".to_string());
        assert_eq!(settings.bridge_api_key(), Some("bridge"));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
[server]
port = 9090

[llm]
model = "gpt-4o"
context_messages = 6

[agent]
employee_number = "963900000000@c.us"
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            r#"
environment = "staging"

[history]
ttl_days = 7
"#,
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.environment, RuntimeEnvironment::Staging);
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.llm.model, "gpt-4o");
        assert_eq!(settings.llm.context_messages, 6);
        assert_eq!(settings.history.ttl_days, 7);
        assert_eq!(
            settings.agent.employee_number.as_deref(),
            Some("963900000000@c.us")
        );
        assert_eq!(settings.agent.company_name, constants::DEFAULT_COMPANY_NAME);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[history]\nttl_days = 0\n").unwrap();
        assert!(load_settings_from(dir.path(), None).is_err());
    }
}
