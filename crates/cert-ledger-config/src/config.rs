// crates/cert-ledger-config/src/config.rs
// ============================================================================
// Module: Cert Ledger Configuration
// Description: Configuration loading and validation for the cert ledger.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: cert-ledger-store-sqlite, cert-ledger-store-postgres, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed; a store section that does
//! not match the selected backend type is rejected rather than ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use cert_ledger_store_postgres::PostgresStoreConfig;
use cert_ledger_store_sqlite::SqliteStoreConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "cert-ledger.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CERT_LEDGER_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level cert ledger configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertLedgerConfig {
    /// Certificate record store settings.
    #[serde(default)]
    pub store: StoreConfig,
}

impl CertLedgerConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path is `path` when given, else the `CERT_LEDGER_CONFIG`
    /// environment variable, else `cert-ledger.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()
    }
}

/// Certificate record store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Use the `SQLite`-backed store.
    #[default]
    Sqlite,
    /// Use the Postgres-backed store.
    Postgres,
}

impl StoreType {
    /// Returns the config label for this backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        }
    }
}

/// Certificate record store configuration.
///
/// # Invariants
/// - Exactly the backend section named by `store_type` is present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// `SQLite` backend settings.
    #[serde(default)]
    pub sqlite: Option<SqliteStoreConfig>,
    /// Postgres backend settings.
    #[serde(default)]
    pub postgres: Option<PostgresStoreConfig>,
}

impl StoreConfig {
    /// Validates store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            StoreType::Sqlite => {
                if self.postgres.is_some() {
                    return Err(ConfigError::Invalid(
                        "sqlite store must not set [store.postgres]".to_string(),
                    ));
                }
                let sqlite = self.sqlite.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires [store.sqlite]".to_string())
                })?;
                sqlite.validate().map_err(|err| ConfigError::Invalid(err.to_string()))
            }
            StoreType::Postgres => {
                if self.sqlite.is_some() {
                    return Err(ConfigError::Invalid(
                        "postgres store must not set [store.sqlite]".to_string(),
                    ));
                }
                let postgres = self.postgres.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("postgres store requires [store.postgres]".to_string())
                })?;
                postgres.validate().map_err(|err| ConfigError::Invalid(err.to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading, validation, or store construction errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// The configured store could not be opened.
    #[error("config store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
