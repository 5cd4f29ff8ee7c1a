// crates/cert-ledger-store-sqlite/tests/common/mod.rs
// =============================================================================
// Module: SQLite Store Test Helpers
// Description: Shared fixtures for SQLite certificate store suites.
// Purpose: Reduce duplication across integration tests.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]
#![allow(clippy::expect_used, reason = "Test helpers use expect for setup clarity.")]

use cert_ledger_core::CertRecord;
use cert_ledger_core::Timestamp;
use cert_ledger_store_sqlite::SqliteCertRecordStore;
use cert_ledger_store_sqlite::SqliteStoreConfig;
use tempfile::TempDir;

/// Returns a config for a fresh database inside `dir` with the table created.
pub fn config_in(dir: &TempDir) -> SqliteStoreConfig {
    let mut config = SqliteStoreConfig::for_path(dir.path().join("certs.db"));
    config.busy_timeout_ms = 2_000;
    config.max_connections = 4;
    config.checkout_timeout_ms = 2_000;
    config.initialize_schema = true;
    config
}

/// Opens a store over a fresh database inside `dir`.
pub fn store_in(dir: &TempDir) -> SqliteCertRecordStore {
    SqliteCertRecordStore::new(&config_in(dir)).expect("store init")
}

/// Returns the lineage record used by the basic scenarios.
pub fn sample_record(instance_id: &str) -> CertRecord {
    let t0 = Timestamp::from_unix_millis(1_717_171_717_171);
    CertRecord {
        instance_id: instance_id.to_string(),
        common_name: "cn".to_string(),
        current_serial: "s1".to_string(),
        current_ip: "1.2.3.4".to_string(),
        current_time: t0,
        prev_serial: "s0".to_string(),
        prev_ip: "1.2.3.3".to_string(),
        prev_time: t0,
    }
}
