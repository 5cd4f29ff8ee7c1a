// crates/cert-ledger-config/src/builder.rs
// ============================================================================
// Module: Cert Ledger Store Builder
// Description: Builds the configured certificate record store backend.
// Purpose: Turn a validated config into a shared store handle.
// Dependencies: cert-ledger-core, cert-ledger-store-*, tracing
// ============================================================================

//! ## Overview
//! [`build_store`] validates the config again and opens the selected backend,
//! returning it behind [`SharedCertRecordStore`] so callers never name a
//! concrete backend type.

// ============================================================================
// SECTION: Imports
// ============================================================================

use cert_ledger_core::SharedCertRecordStore;
use cert_ledger_store_postgres::shared_postgres_store;
use cert_ledger_store_sqlite::SqliteCertRecordStore;
use tracing::info;

use crate::config::CertLedgerConfig;
use crate::config::ConfigError;
use crate::config::StoreType;

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Opens the store selected by `config`.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the config does not validate and
/// [`ConfigError::Store`] when the backend cannot be opened.
pub fn build_store(config: &CertLedgerConfig) -> Result<SharedCertRecordStore, ConfigError> {
    config.validate()?;
    let store = &config.store;
    info!(backend = store.store_type.as_str(), "building cert record store");
    match store.store_type {
        StoreType::Sqlite => {
            let sqlite = store.sqlite.as_ref().ok_or_else(|| {
                ConfigError::Invalid("sqlite store requires [store.sqlite]".to_string())
            })?;
            let opened = SqliteCertRecordStore::new(sqlite)
                .map_err(|err| ConfigError::Store(err.to_string()))?;
            Ok(SharedCertRecordStore::from_store(opened))
        }
        StoreType::Postgres => {
            let postgres = store.postgres.as_ref().ok_or_else(|| {
                ConfigError::Invalid("postgres store requires [store.postgres]".to_string())
            })?;
            shared_postgres_store(postgres).map_err(|err| ConfigError::Store(err.to_string()))
        }
    }
}
