//! Configuration for the Hedera agent plugin
//!
//! Configuration comes from three places, highest priority first:
//! 1. Agent runtime settings / environment variables (`HEDERA_*`, `OPENAI_*`)
//! 2. Configuration files (YAML/JSON)
//! 3. Default values
//!
//! The operator credentials live in [`HederaSettings`], which keeps the raw
//! strings exactly as the runtime supplied them. [`HederaSettings::resolve`]
//! turns them into typed [`HederaCredentials`].
//!
//! # Example
//!
//! ```no_run
//! use hedera_agent_core::config::{PluginConfig, HederaSettings};
//!
//! let config = PluginConfig::builder()
//!     .with_account_id("0.0.5423981")
//!     .with_network("testnet")
//!     .with_mirror_timeout(10)
//!     .build();
//!
//! // Load from file, then let the environment override it
//! let config = PluginConfig::from_file("config.yaml")?.with_settings(|key| std::env::var(key).ok());
//! let credentials = config.hedera.resolve()?;
//! # Ok::<(), hedera_agent_core::Error>(())
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::keypair::PrivateKey;
use crate::types::{AccountId, KeyType, NetworkType};

/// Setting keys recognized by the plugin
pub mod keys {
    /// Operator account id (`0.0.x`)
    pub const ACCOUNT_ID: &str = "HEDERA_ACCOUNT_ID";
    /// Operator private key, hex or DER hex
    pub const PRIVATE_KEY: &str = "HEDERA_PRIVATE_KEY";
    /// `ECDSA` or `ED25519`
    pub const KEY_TYPE: &str = "HEDERA_KEY_TYPE";
    /// Operator public key, informational
    pub const PUBLIC_KEY: &str = "HEDERA_PUBLIC_KEY";
    /// `mainnet`, `testnet` or `previewnet`
    pub const NETWORK_TYPE: &str = "HEDERA_NETWORK_TYPE";
    /// Mirror node base URL override
    pub const MIRROR_NODE_URL: &str = "HEDERA_MIRROR_NODE_URL";
    /// Chat completion API key
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// Chat completion base URL
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    /// Chat completion model
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";

    /// Keys that must be present for any action to be available
    pub const REQUIRED: [&str; 3] = [PRIVATE_KEY, ACCOUNT_ID, NETWORK_TYPE];
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Operator credentials
    pub hedera: HederaSettings,
    /// Mirror node access
    pub mirror: MirrorConfig,
    /// Language model access
    pub llm: LlmConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Raw operator settings, as supplied by the runtime
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HederaSettings {
    /// `HEDERA_ACCOUNT_ID`
    pub account_id: Option<String>,
    /// `HEDERA_PRIVATE_KEY`
    pub private_key: Option<String>,
    /// `HEDERA_KEY_TYPE`
    pub key_type: Option<String>,
    /// `HEDERA_PUBLIC_KEY`
    pub public_key: Option<String>,
    /// `HEDERA_NETWORK_TYPE`
    pub network: Option<String>,
}

/// Validated operator credentials
#[derive(Debug, Clone)]
pub struct HederaCredentials {
    /// Operator account
    pub account_id: AccountId,
    /// Decoded private key
    pub private_key: PrivateKey,
    /// Operator public key, if configured
    pub public_key: Option<String>,
    /// Target network
    pub network: NetworkType,
}

/// Mirror node settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Base URL override, the public mirror for the network otherwise
    pub url: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Page size for list endpoints
    pub page_limit: u32,
}

/// Chat completion settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API base, including `/v1`
    pub api_base: String,
    /// Bearer token
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: LogLevel,
    /// Log format (text, json)
    pub format: LogFormat,
}

/// Log level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

/// Log format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain text format
    Text,
    /// JSON format
    Json,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_seconds: 30,
            page_limit: 100,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            timeout_seconds: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl HederaSettings {
    /// Read the operator settings through a key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            account_id: non_empty(lookup(keys::ACCOUNT_ID)),
            private_key: non_empty(lookup(keys::PRIVATE_KEY)),
            key_type: non_empty(lookup(keys::KEY_TYPE)),
            public_key: non_empty(lookup(keys::PUBLIC_KEY)),
            network: non_empty(lookup(keys::NETWORK_TYPE)),
        }
    }

    /// Read the operator settings from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Fill fields that are unset here from `other`
    pub fn or(self, other: HederaSettings) -> Self {
        Self {
            account_id: self.account_id.or(other.account_id),
            private_key: self.private_key.or(other.private_key),
            key_type: self.key_type.or(other.key_type),
            public_key: self.public_key.or(other.public_key),
            network: self.network.or(other.network),
        }
    }

    /// Keys from [`keys::REQUIRED`] that are missing
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.private_key.is_none() {
            missing.push(keys::PRIVATE_KEY);
        }
        if self.account_id.is_none() {
            missing.push(keys::ACCOUNT_ID);
        }
        if self.network.is_none() {
            missing.push(keys::NETWORK_TYPE);
        }
        missing
    }

    /// Whether the three required credentials are present
    pub fn is_complete(&self) -> bool {
        self.missing_keys().is_empty()
    }

    /// Parse the network setting
    pub fn network_type(&self) -> Result<NetworkType> {
        self.network
            .as_deref()
            .ok_or_else(|| Error::config(format!("{} is not set", keys::NETWORK_TYPE)))?
            .parse()
    }

    /// Validate and type the settings
    pub fn resolve(&self) -> Result<HederaCredentials> {
        let missing = self.missing_keys();
        if !missing.is_empty() {
            return Err(Error::config(format!(
                "Missing required settings: {}",
                missing.join(", ")
            )));
        }

        let key_type = self
            .key_type
            .as_deref()
            .ok_or_else(|| Error::UnsupportedKeyType(String::new()))?
            .parse::<KeyType>()?;
        let account_id = self
            .account_id
            .as_deref()
            .unwrap_or_default()
            .parse::<AccountId>()?;
        let private_key =
            PrivateKey::from_str_with_type(self.private_key.as_deref().unwrap_or_default(), key_type)?;

        Ok(HederaCredentials {
            account_id,
            private_key,
            public_key: self.public_key.clone(),
            network: self.network_type()?,
        })
    }
}

impl fmt::Debug for HederaSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HederaSettings")
            .field("account_id", &self.account_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("key_type", &self.key_type)
            .field("public_key", &self.public_key)
            .field("network", &self.network)
            .finish()
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl MirrorConfig {
    /// Mirror base URL for `network`, honouring the override
    pub fn base_url(&self, network: NetworkType) -> String {
        self.url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| network.mirror_node_url().to_string())
    }

    /// Request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl LlmConfig {
    /// Request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl PluginConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder
    pub fn builder() -> PluginConfigBuilder {
        PluginConfigBuilder::new()
    }

    /// Default configuration file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hedera-agent")
            .join("config.yaml")
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse YAML config: {}", e)))
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse JSON config: {}", e)))
    }

    /// Load configuration from a file (auto-detects format by extension)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_file(path),
            "json" => Self::from_json_file(path),
            _ => Err(Error::config(format!(
                "Unsupported config file format: {}. Supported: .yaml, .yml, .json",
                extension
            ))),
        }
    }

    /// Load from `path` (with `~` expansion) when it exists, defaults otherwise
    pub fn load_or_default(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::config(format!("Failed to serialize config to YAML: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| Error::config(format!("Failed to write config file: {}", e)))
    }

    /// Save configuration to a JSON file
    pub fn save_to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config to JSON: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| Error::config(format!("Failed to write config file: {}", e)))
    }

    /// Overlay runtime settings on top of the file values
    pub fn with_settings<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.hedera = HederaSettings::from_lookup(&lookup).or(self.hedera);

        if let Some(url) = non_empty(lookup(keys::MIRROR_NODE_URL)) {
            self.mirror.url = Some(url);
        }
        if let Some(api_key) = non_empty(lookup(keys::OPENAI_API_KEY)) {
            self.llm.api_key = Some(api_key);
        }
        if let Some(api_base) = non_empty(lookup(keys::OPENAI_BASE_URL)) {
            self.llm.api_base = api_base;
        }
        if let Some(model) = non_empty(lookup(keys::OPENAI_MODEL)) {
            self.llm.model = model;
        }
        self
    }

    /// Look up a runtime setting key in this configuration
    pub fn setting(&self, key: &str) -> Option<String> {
        match key {
            keys::ACCOUNT_ID => self.hedera.account_id.clone(),
            keys::PRIVATE_KEY => self.hedera.private_key.clone(),
            keys::KEY_TYPE => self.hedera.key_type.clone(),
            keys::PUBLIC_KEY => self.hedera.public_key.clone(),
            keys::NETWORK_TYPE => self.hedera.network.clone(),
            keys::MIRROR_NODE_URL => self.mirror.url.clone(),
            keys::OPENAI_API_KEY => self.llm.api_key.clone(),
            keys::OPENAI_BASE_URL => Some(self.llm.api_base.clone()),
            keys::OPENAI_MODEL => Some(self.llm.model.clone()),
            _ => None,
        }
    }

    /// Validate the operator credentials
    pub fn validate(&self) -> Result<HederaCredentials> {
        self.hedera.resolve()
    }
}

impl LogLevel {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Builder for PluginConfig with fluent interface
pub struct PluginConfigBuilder {
    config: PluginConfig,
}

impl PluginConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: PluginConfig::default(),
        }
    }

    /// Set the operator account id
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.config.hedera.account_id = Some(account_id.into());
        self
    }

    /// Set the operator private key
    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.config.hedera.private_key = Some(private_key.into());
        self
    }

    /// Set the key type
    pub fn with_key_type(mut self, key_type: KeyType) -> Self {
        self.config.hedera.key_type = Some(key_type.to_string());
        self
    }

    /// Set the network
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.config.hedera.network = Some(network.into());
        self
    }

    /// Set the mirror node URL
    pub fn with_mirror_url(mut self, url: impl Into<String>) -> Self {
        self.config.mirror.url = Some(url.into());
        self
    }

    /// Set the mirror node timeout in seconds
    pub fn with_mirror_timeout(mut self, seconds: u64) -> Self {
        self.config.mirror.timeout_seconds = seconds;
        self
    }

    /// Set the chat completion API base
    pub fn with_llm_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.config.llm.api_base = api_base.into();
        self
    }

    /// Set the chat completion API key
    pub fn with_llm_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.llm.api_key = Some(api_key.into());
        self
    }

    /// Set the chat completion model
    pub fn with_llm_model(mut self, model: impl Into<String>) -> Self {
        self.config.llm.model = model.into();
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set log format
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> PluginConfig {
        self.config
    }
}

impl Default for PluginConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    const KEY: &str = "302e020100300506032b657004220420b3d2f7a5bb4e2c8f5d1e7c3a9b6f0e2d4c8a1b3e5f7d9c0a2b4e6f8a1c3d5e7f";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = PluginConfig::default();

        assert_eq!(config.mirror.timeout_seconds, 30);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.llm.api_base, "https://api.openai.com/v1");
        assert!(!config.hedera.is_complete());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PluginConfig::builder()
            .with_account_id("0.0.1001")
            .with_private_key(KEY)
            .with_key_type(KeyType::Ed25519)
            .with_network("testnet")
            .with_mirror_url("http://localhost:5551/")
            .with_log_level(LogLevel::Debug)
            .build();

        assert!(config.hedera.is_complete());
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(
            config.mirror.base_url(NetworkType::Testnet),
            "http://localhost:5551"
        );
    }

    #[test]
    fn test_settings_lookup_and_missing_keys() {
        let settings = HederaSettings::from_lookup(lookup(&[
            (keys::ACCOUNT_ID, "0.0.1001"),
            (keys::NETWORK_TYPE, "  "),
        ]));

        assert_eq!(settings.account_id.as_deref(), Some("0.0.1001"));
        assert_eq!(settings.network, None);
        assert_eq!(
            settings.missing_keys(),
            vec![keys::PRIVATE_KEY, keys::NETWORK_TYPE]
        );
    }

    #[test]
    fn test_resolve_credentials() -> Result<()> {
        let settings = HederaSettings::from_lookup(lookup(&[
            (keys::ACCOUNT_ID, "0.0.1001"),
            (keys::PRIVATE_KEY, KEY),
            (keys::KEY_TYPE, "ED25519"),
            (keys::NETWORK_TYPE, "mainnet"),
        ]));

        let credentials = settings.resolve()?;
        assert_eq!(credentials.account_id, AccountId::new(0, 0, 1001));
        assert_eq!(credentials.network, NetworkType::Mainnet);
        assert_eq!(credentials.private_key.key_type(), KeyType::Ed25519);
        Ok(())
    }

    #[test]
    fn test_resolve_rejects_bad_key_type() {
        let settings = HederaSettings::from_lookup(lookup(&[
            (keys::ACCOUNT_ID, "0.0.1001"),
            (keys::PRIVATE_KEY, KEY),
            (keys::KEY_TYPE, "RSA"),
            (keys::NETWORK_TYPE, "testnet"),
        ]));

        let err = settings.resolve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported key type. Must be 'ECDSA' or 'ED25519'."
        );
    }

    #[test]
    fn test_resolve_requires_key_type() {
        let settings = HederaSettings::from_lookup(lookup(&[
            (keys::ACCOUNT_ID, "0.0.1001"),
            (keys::PRIVATE_KEY, KEY),
            (keys::NETWORK_TYPE, "testnet"),
        ]));

        let err = settings.resolve().unwrap_err();
        assert!(matches!(err, Error::UnsupportedKeyType(_)));
        assert_eq!(
            err.to_string(),
            "Unsupported key type. Must be 'ECDSA' or 'ED25519'."
        );
    }

    #[test]
    fn test_settings_overlay() {
        let config = PluginConfig::builder()
            .with_account_id("0.0.1")
            .with_network("testnet")
            .build()
            .with_settings(lookup(&[
                (keys::ACCOUNT_ID, "0.0.2"),
                (keys::OPENAI_MODEL, "local-model"),
            ]));

        assert_eq!(config.hedera.account_id.as_deref(), Some("0.0.2"));
        assert_eq!(config.hedera.network.as_deref(), Some("testnet"));
        assert_eq!(config.llm.model, "local-model");
        assert_eq!(config.setting(keys::ACCOUNT_ID).as_deref(), Some("0.0.2"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = PluginConfig::builder()
            .with_private_key(KEY)
            .with_llm_api_key("sk-secret")
            .build();

        let debug = format!("{:?}", config);
        assert!(!debug.contains(KEY));
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn test_config_file_io() -> Result<()> {
        let temp_dir = tempdir()?;
        let yaml_path = temp_dir.path().join("config.yaml");
        let json_path = temp_dir.path().join("config.json");

        let original = PluginConfig::builder()
            .with_account_id("0.0.77")
            .with_mirror_timeout(5)
            .build();

        original.save_to_yaml_file(&yaml_path)?;
        original.save_to_json_file(&json_path)?;

        let from_yaml = PluginConfig::from_file(&yaml_path)?;
        let from_json = PluginConfig::from_file(&json_path)?;
        assert_eq!(from_yaml.hedera.account_id.as_deref(), Some("0.0.77"));
        assert_eq!(from_json.mirror.timeout_seconds, 5);

        assert!(PluginConfig::from_file(temp_dir.path().join("config.toml")).is_err());
        Ok(())
    }

    #[test]
    fn test_partial_yaml_uses_defaults() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("partial.yml");
        std::fs::write(&path, "hedera:\n  network: previewnet\nlogging:\n  format: json\n")?;

        let config = PluginConfig::from_file(&path)?;
        assert_eq!(config.hedera.network.as_deref(), Some("previewnet"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.mirror.page_limit, 100);
        Ok(())
    }

    #[test]
    fn test_load_or_default_missing_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let missing = temp_dir.path().join("absent.yaml");
        let config = PluginConfig::load_or_default(&missing.to_string_lossy())?;
        assert!(config.hedera.account_id.is_none());
        Ok(())
    }
}
