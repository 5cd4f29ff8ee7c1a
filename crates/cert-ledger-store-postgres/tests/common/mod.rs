// crates/cert-ledger-store-postgres/tests/common/mod.rs
// =============================================================================
// Module: Postgres Store Test Helpers
// Description: Live database fixture for Postgres certificate store suites.
// Purpose: Give each test its own table on a shared server and drop it after.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]
#![allow(clippy::print_stderr, reason = "Skipped live suites report why on stderr.")]

use cert_ledger_core::CertRecord;
use cert_ledger_core::Timestamp;
use cert_ledger_store_postgres::PostgresCertRecordStore;
use cert_ledger_store_postgres::PostgresStoreConfig;

/// Environment variable naming the server the live suites run against.
pub const PG_URL_ENV: &str = "CERT_LEDGER_TEST_PG_URL";

/// Boxed error returned by live tests.
pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A store bound to a table owned by one test.
pub struct PostgresFixture {
    /// Connection string for raw checks.
    pub url: String,
    /// Per-test table name.
    pub table: String,
    /// Store under test.
    pub store: PostgresCertRecordStore,
}

impl PostgresFixture {
    /// Opens a store over a fresh table, or returns `None` when no server is
    /// configured.
    pub fn start(name: &str) -> Result<Option<Self>, Box<dyn std::error::Error>> {
        let Ok(url) = std::env::var(PG_URL_ENV) else {
            eprintln!("skipping live postgres test {name}: {PG_URL_ENV} is not set");
            return Ok(None);
        };
        let table = format!("certs_{name}_{}", std::process::id());
        let mut client = postgres::Client::connect(&url, postgres::NoTls)?;
        client.batch_execute(&format!("DROP TABLE IF EXISTS {table}"))?;
        let config = PostgresStoreConfig {
            connection: url.clone(),
            table: table.clone(),
            max_connections: 4,
            checkout_timeout_ms: 2_000,
            initialize_schema: true,
            ..PostgresStoreConfig::default()
        };
        let store = PostgresCertRecordStore::new(&config)?;
        Ok(Some(Self { url, table, store }))
    }

    /// Opens a raw client for checks that bypass the store.
    pub fn raw_client(&self) -> Result<postgres::Client, postgres::Error> {
        postgres::Client::connect(&self.url, postgres::NoTls)
    }
}

impl Drop for PostgresFixture {
    fn drop(&mut self) {
        if let Ok(mut client) = self.raw_client() {
            let _ = client.batch_execute(&format!("DROP TABLE IF EXISTS {}", self.table));
        }
    }
}

/// Returns the lineage record used by the basic scenarios.
pub fn sample_record(instance_id: &str) -> CertRecord {
    let t0 = Timestamp::from_unix_millis(1_717_171_717_171);
    CertRecord {
        instance_id: instance_id.to_string(),
        common_name: "svc.example.com".to_string(),
        current_serial: "s1".to_string(),
        current_ip: "10.0.0.1".to_string(),
        current_time: t0,
        prev_serial: "s0".to_string(),
        prev_ip: "10.0.0.0".to_string(),
        prev_time: Timestamp::from_unix_millis(1_717_000_000_000),
    }
}
