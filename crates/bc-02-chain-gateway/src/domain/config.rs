//! Gateway configuration with validation.
//!
//! Loaded from TOML; every section and field is optional and falls back to
//! its default. Durations use humantime notation (`"5m"`, `"500ms"`).

use crate::domain::registration::{RegistrationMode, DEFAULT_ROLE};
use bc_01_voting_ledger::ContractConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Main gateway configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Ledger routing and deadlines
    pub ledger: LedgerConfig,
    /// Query cache
    pub cache: CacheConfig,
    /// Registration proxy
    pub registration: RegistrationConfig,
    /// Chaincode options for the in-process ledger
    pub contract: ContractConfig,
}

impl GatewayConfig {
    /// Parse a TOML document.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&contents)
    }

    /// Apply `BC_*` environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Same as [`apply_env_overrides`](Self::apply_env_overrides) with an
    /// injectable variable source.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `BC_CHANNEL` | `ledger.channel` |
    /// | `BC_CONTRACT` | `ledger.contract` |
    /// | `BC_CACHE_TTL_SECS` | `cache.ttl` |
    /// | `BC_CACHE_ENABLED` | `cache.enabled` |
    /// | `BC_REGISTRATION_MODE` | `registration.mode` |
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(channel) = lookup("BC_CHANNEL") {
            self.ledger.channel = channel;
        }
        if let Some(contract) = lookup("BC_CONTRACT") {
            self.ledger.contract = contract;
        }
        if let Some(value) = lookup("BC_CACHE_TTL_SECS") {
            let secs: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "BC_CACHE_TTL_SECS",
                value: value.clone(),
            })?;
            self.cache.ttl = Duration::from_secs(secs);
        }
        if let Some(value) = lookup("BC_CACHE_ENABLED") {
            self.cache.enabled = match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: "BC_CACHE_ENABLED",
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup("BC_REGISTRATION_MODE") {
            self.registration.mode = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "BC_REGISTRATION_MODE",
                value: value.clone(),
            })?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger.channel.trim().is_empty() {
            return Err(ConfigError::Invalid("ledger.channel cannot be empty".into()));
        }
        if self.ledger.contract.trim().is_empty() {
            return Err(ConfigError::Invalid("ledger.contract cannot be empty".into()));
        }

        if self.ledger.submit_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "ledger.submit_timeout cannot be 0".into(),
            ));
        }
        if self.ledger.evaluate_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "ledger.evaluate_timeout cannot be 0".into(),
            ));
        }

        if self.cache.enabled {
            if self.cache.ttl.is_zero() {
                return Err(ConfigError::InvalidCache("cache.ttl cannot be 0".into()));
            }
            if self.cache.operation_timeout.is_zero() {
                return Err(ConfigError::InvalidTimeout(
                    "cache.operation_timeout cannot be 0".into(),
                ));
            }
        }

        if self.registration.role.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "registration.role cannot be empty".into(),
            ));
        }

        Ok(())
    }

    /// Chaincode options with the name the ledger routes on.
    pub fn contract_config(&self) -> ContractConfig {
        ContractConfig {
            name: self.ledger.contract.clone(),
            ..self.contract.clone()
        }
    }
}

/// Ledger routing and deadlines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Channel every invocation is sent to
    pub channel: String,
    /// Deployed contract name
    pub contract: String,
    /// Deadline for a submitted transaction
    #[serde(with = "humantime_serde")]
    pub submit_timeout: Duration,
    /// Deadline for an evaluated query
    #[serde(with = "humantime_serde")]
    pub evaluate_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            channel: "mychannel".to_string(),
            contract: "basic".to_string(),
            submit_timeout: Duration::from_secs(30),
            evaluate_timeout: Duration::from_secs(10),
        }
    }
}

/// Query cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Wrap the query executor in the cache decorator
    pub enabled: bool,
    /// Lifetime of a cached query result
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    /// Deadline for one cache get or set; elapsed means miss
    #[serde(with = "humantime_serde")]
    pub operation_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(5 * 60),
            operation_timeout: Duration::from_millis(500),
        }
    }
}

/// Registration proxy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    pub mode: RegistrationMode,
    /// Role stamped on new local records
    pub role: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            mode: RegistrationMode::default(),
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },
    /// The TOML document is malformed or has wrongly typed fields
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// An environment override has an unusable value
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Invalid cache setting
    #[error("invalid cache setting: {0}")]
    InvalidCache(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
