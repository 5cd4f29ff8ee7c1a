// crates/cert-ledger-store-postgres/tests/postgres_store.rs
// ============================================================================
// Module: Postgres Store Tests
// Description: Unit tests for Postgres store configuration and helpers.
// Purpose: Validate configuration and error handling without a live database.
// ============================================================================

//! Postgres store unit tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

use cert_ledger_core::CertRecordStatements;
use cert_ledger_core::CertStoreError;
use cert_ledger_core::PlaceholderStyle;
use cert_ledger_store_postgres::PostgresCertRecordStore;
use cert_ledger_store_postgres::PostgresStoreConfig;
use cert_ledger_store_postgres::PostgresStoreError;
use cert_ledger_store_postgres::shared_postgres_store;

// ============================================================================
// SECTION: Config
// ============================================================================

#[test]
fn postgres_store_default_config_is_valid() {
    let config = PostgresStoreConfig::default();
    assert!(!config.connection.is_empty());
    assert_eq!(config.table, "certificates");
    assert!(config.max_connections > 0);
    assert!(config.connect_timeout_ms > 0);
    assert!(config.statement_timeout_ms > 0);
    assert!(config.checkout_timeout_ms > 0);
    assert!(!config.initialize_schema);
    config.validate().expect("default config validates");
}

#[test]
fn postgres_store_invalid_connection_string_fails() {
    let config = PostgresStoreConfig {
        connection: "not-a-url".to_string(),
        max_connections: 1,
        connect_timeout_ms: 1,
        statement_timeout_ms: 1,
        checkout_timeout_ms: 1,
        ..PostgresStoreConfig::default()
    };
    assert!(matches!(config.validate(), Err(PostgresStoreError::Invalid(_))));
    assert!(matches!(PostgresCertRecordStore::new(&config), Err(PostgresStoreError::Invalid(_))));
    assert!(shared_postgres_store(&config).is_err());
}

#[test]
fn postgres_store_rejects_empty_connection_string() {
    let config = PostgresStoreConfig {
        connection: "  ".to_string(),
        ..PostgresStoreConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("connection string"), "{err}");
}

#[test]
fn postgres_store_rejects_unsafe_table_name() {
    let config = PostgresStoreConfig {
        table: "certs; DROP TABLE certs".to_string(),
        ..PostgresStoreConfig::default()
    };
    assert!(matches!(config.validate(), Err(PostgresStoreError::Invalid(_))));
}

#[test]
fn postgres_store_rejects_zero_limits() {
    let cases: [fn(&mut PostgresStoreConfig); 4] = [
        |config| config.max_connections = 0,
        |config| config.connect_timeout_ms = 0,
        |config| config.statement_timeout_ms = 0,
        |config| config.checkout_timeout_ms = 0,
    ];
    for apply in cases {
        let mut config = PostgresStoreConfig::default();
        apply(&mut config);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("greater than zero"), "{err}");
    }
}

#[test]
fn postgres_store_config_serde_roundtrip() {
    let original = PostgresStoreConfig {
        table: "lineage".to_string(),
        initialize_schema: true,
        ..PostgresStoreConfig::default()
    };
    let json = serde_json::to_string(&original).expect("serialize");
    let restored: PostgresStoreConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(original.connection, restored.connection);
    assert_eq!(original.table, restored.table);
    assert_eq!(original.max_connections, restored.max_connections);
    assert_eq!(original.connect_timeout_ms, restored.connect_timeout_ms);
    assert_eq!(original.statement_timeout_ms, restored.statement_timeout_ms);
    assert_eq!(original.checkout_timeout_ms, restored.checkout_timeout_ms);
    assert!(restored.initialize_schema);
}

#[test]
fn postgres_store_config_fills_defaults_and_rejects_unknown_fields() {
    let config: PostgresStoreConfig =
        serde_json::from_str(r#"{"connection":"host=db user=certs"}"#).expect("deserialize");
    assert_eq!(config.table, "certificates");
    assert_eq!(config.max_connections, PostgresStoreConfig::default().max_connections);
    config.validate().expect("key-value connection string validates");

    let unknown = serde_json::from_str::<PostgresStoreConfig>(
        r#"{"connection":"host=db","pool_size":4}"#,
    );
    assert!(unknown.is_err());
}

// ============================================================================
// SECTION: Errors and Statements
// ============================================================================

#[test]
fn postgres_store_errors_map_into_cert_store_errors() {
    assert_eq!(
        CertStoreError::from(PostgresStoreError::Pool("timed out".to_string())),
        CertStoreError::Unavailable("timed out".to_string())
    );
    assert_eq!(
        CertStoreError::from(PostgresStoreError::Postgres("reset".to_string())),
        CertStoreError::Connection("reset".to_string())
    );
    assert_eq!(
        CertStoreError::from(PostgresStoreError::Invalid("bad".to_string())),
        CertStoreError::Invalid("bad".to_string())
    );
}

#[test]
fn postgres_statements_use_dollar_placeholders() {
    let statements =
        CertRecordStatements::new("certificates", PlaceholderStyle::Dollar).expect("statements");
    assert!(statements.select().ends_with("WHERE instanceId = $1"));
    assert!(statements.insert().contains("$8)"));
    assert!(statements.update().ends_with("WHERE instanceId = $7"));
    assert!(statements.update_if_current().ends_with("AND currentSerial = $8"));
    assert!(!statements.insert().contains('?'));
}
