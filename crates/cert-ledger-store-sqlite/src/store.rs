// crates/cert-ledger-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Certificate Record Store
// Description: Pooled CertRecordStore backed by SQLite WAL.
// Purpose: Map certificate lineage records to one SQLite table.
// Dependencies: cert-ledger-core, r2d2, rusqlite, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`SqliteCertRecordStore`] lends [`SqliteCertRecordConnection`]s from an
//! `r2d2` pool. Timestamps are stored as `INTEGER` Unix epoch milliseconds
//! and strings as `TEXT`, so every field reads back exactly as written.
//! Transactional connections open `BEGIN IMMEDIATE` lazily on their first
//! statement and roll back anything left uncommitted when closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cert_ledger_core::CertRecord;
use cert_ledger_core::CertRecordStatements;
use cert_ledger_core::CertRecordStore;
use cert_ledger_core::CertRecordStoreConnection;
use cert_ledger_core::CertStoreError;
use cert_ledger_core::ColumnKind;
use cert_ledger_core::ColumnMapping;
use cert_ledger_core::ColumnValue;
use cert_ledger_core::CommitMode;
use cert_ledger_core::PlaceholderStyle;
use cert_ledger_core::Timestamp;
use cert_ledger_core::columns::decode_record;
use cert_ledger_core::interfaces::require_instance_id;
use cert_ledger_core::statements::insert_values;
use cert_ledger_core::statements::update_if_current_values;
use cert_ledger_core::statements::update_values;
use cert_ledger_core::validate_table_name;
use r2d2::Pool;
use r2d2::PooledConnection;
use rusqlite::Connection;
use rusqlite::Row;
use rusqlite::ToSql;
use rusqlite::params_from_iter;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::Value;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::manager::SqliteConnectionManager;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default certificate table name.
const DEFAULT_TABLE: &str = "certificates";
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default pool checkout timeout (ms).
const DEFAULT_CHECKOUT_TIMEOUT_MS: u64 = 5_000;
/// Default maximum pooled connections.
const DEFAULT_MAX_CONNECTIONS: u32 = 8;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` certificate record store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory, not `:memory:`).
/// - `table` must be a plain SQL identifier.
/// - `max_connections` and `checkout_timeout_ms` must be greater than zero.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Certificate table name.
    #[serde(default = "default_table")]
    pub table: String,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Maximum wait for a pooled connection in milliseconds.
    #[serde(default = "default_checkout_timeout_ms")]
    pub checkout_timeout_ms: u64,
    /// Create the certificate table when missing.
    #[serde(default)]
    pub initialize_schema: bool,
}

impl SqliteStoreConfig {
    /// Returns a config for `path` with every other setting defaulted.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: default_table(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            checkout_timeout_ms: DEFAULT_CHECKOUT_TIMEOUT_MS,
            initialize_schema: false,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Invalid`] when a setting is out of range.
    pub fn validate(&self) -> Result<(), SqliteStoreError> {
        validate_store_path(&self.path)?;
        validate_table_name(&self.table)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if self.max_connections == 0 {
            return Err(SqliteStoreError::Invalid(
                "max_connections must be greater than zero".to_string(),
            ));
        }
        if self.checkout_timeout_ms == 0 {
            return Err(SqliteStoreError::Invalid(
                "checkout_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Returns the default certificate table name.
fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default maximum pooled connections.
const fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

/// Returns the default pool checkout timeout.
const fn default_checkout_timeout_ms() -> u64 {
    DEFAULT_CHECKOUT_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store construction errors.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Connection pool error.
    #[error("sqlite store pool error: {0}")]
    Pool(String),
    /// Invalid store configuration.
    #[error("sqlite store invalid config: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for CertStoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) | SqliteStoreError::Db(message) => {
                Self::Connection(message)
            }
            SqliteStoreError::Pool(message) => Self::Unavailable(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed certificate record store.
///
/// # Invariants
/// - Every connection it lends comes from one `r2d2` pool over one file.
/// - Statement text is generated once from the column table and shared.
#[derive(Clone)]
pub struct SqliteCertRecordStore {
    /// Connection pool.
    pool: Pool<SqliteConnectionManager>,
    /// Statement text for the configured table.
    statements: Arc<CertRecordStatements>,
}

impl SqliteCertRecordStore {
    /// Opens the pool and, when configured, creates the certificate table.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the config is invalid or the pool
    /// cannot open its connections.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        config.validate()?;
        ensure_parent_dir(&config.path)?;
        let statements = CertRecordStatements::new(&config.table, PlaceholderStyle::Numbered)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        let manager = SqliteConnectionManager::new(
            config.path.clone(),
            config.journal_mode,
            config.sync_mode,
            Duration::from_millis(config.busy_timeout_ms),
        );
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(Duration::from_millis(config.checkout_timeout_ms))
            .build(manager)
            .map_err(|err| SqliteStoreError::Pool(err.to_string()))?;
        let store = Self {
            pool,
            statements: Arc::new(statements),
        };
        if config.initialize_schema {
            store.initialize_schema()?;
        }
        info!(
            path = %config.path.display(),
            table = store.statements.table(),
            max_connections = config.max_connections,
            "sqlite cert record store opened"
        );
        Ok(store)
    }

    /// Creates the certificate table when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when no connection is available or the
    /// DDL fails.
    pub fn initialize_schema(&self) -> Result<(), SqliteStoreError> {
        let connection = self.pool.get().map_err(|err| SqliteStoreError::Pool(err.to_string()))?;
        let ddl = self.statements.create_table(|kind| match kind {
            ColumnKind::Text => "TEXT",
            ColumnKind::Timestamp => "INTEGER",
        });
        connection.execute_batch(&ddl).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        info!(table = self.statements.table(), "sqlite cert record table ready");
        Ok(())
    }

    /// Returns the certificate table name.
    #[must_use]
    pub fn table(&self) -> &str {
        self.statements.table()
    }

    /// Borrows a pooled connection and opens it in `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`CertStoreError::Unavailable`] when the pool cannot supply a
    /// connection before the checkout timeout.
    pub fn connect(&self, mode: CommitMode) -> Result<SqliteCertRecordConnection, CertStoreError> {
        let connection =
            self.pool.get().map_err(|err| CertStoreError::Unavailable(err.to_string()))?;
        Ok(SqliteCertRecordConnection {
            connection: Some(connection),
            statements: Arc::clone(&self.statements),
            mode,
        })
    }
}

impl CertRecordStore for SqliteCertRecordStore {
    fn new_connection(
        &self,
        mode: CommitMode,
    ) -> Result<Box<dyn CertRecordStoreConnection + Send>, CertStoreError> {
        Ok(Box::new(self.connect(mode)?))
    }
}

// ============================================================================
// SECTION: Connection
// ============================================================================

/// One unit of work over a pooled `SQLite` connection.
///
/// # Invariants
/// - `connection` is `None` exactly when the connection is closed.
/// - In transactional mode a transaction is open iff the underlying
///   connection is not in autocommit state.
pub struct SqliteCertRecordConnection {
    /// Pooled connection, taken on close.
    connection: Option<PooledConnection<SqliteConnectionManager>>,
    /// Shared statement text.
    statements: Arc<CertRecordStatements>,
    /// Commit mode chosen at open time.
    mode: CommitMode,
}

impl SqliteCertRecordConnection {
    /// Returns the live connection, opening a transaction first when the
    /// connection is transactional and none is open.
    fn live(&self) -> Result<&Connection, CertStoreError> {
        let connection = self.connection.as_deref().ok_or(CertStoreError::Closed)?;
        if self.mode == CommitMode::Transactional && connection.is_autocommit() {
            connection.execute_batch("BEGIN IMMEDIATE").map_err(connection_fault)?;
        }
        Ok(connection)
    }

    /// Runs a write statement and reports whether exactly one row changed.
    fn execute_write(&self, sql: &str, values: &[ColumnValue<'_>]) -> Result<bool, CertStoreError> {
        let connection = self.live()?;
        let mut statement = connection.prepare_cached(sql).map_err(connection_fault)?;
        let rows = statement
            .execute(params_from_iter(values.iter().map(SqliteBind)))
            .map_err(connection_fault)?;
        Ok(rows == 1)
    }

    /// Ends the open transaction with `COMMIT` or `ROLLBACK`.
    fn finish(&self, verb: &str) -> Result<(), CertStoreError> {
        if self.mode == CommitMode::AutoCommit {
            return Err(CertStoreError::Invalid(format!(
                "{verb} requires a transactional connection"
            )));
        }
        let connection = self.connection.as_deref().ok_or(CertStoreError::Closed)?;
        if connection.is_autocommit() {
            return Ok(());
        }
        connection.execute_batch(verb).map_err(connection_fault)
    }
}

impl CertRecordStoreConnection for SqliteCertRecordConnection {
    fn get_cert_record(&mut self, instance_id: &str) -> Result<Option<CertRecord>, CertStoreError> {
        require_instance_id(instance_id)?;
        let connection = self.live()?;
        let mut statement =
            connection.prepare_cached(self.statements.select()).map_err(connection_fault)?;
        let mut rows = statement.query([instance_id]).map_err(connection_fault)?;
        let Some(row) = rows.next().map_err(connection_fault)? else {
            debug!(instance_id, "cert record not found");
            return Ok(None);
        };
        let record =
            decode_record(instance_id, |index, mapping| read_column(row, index, mapping))?;
        Ok(Some(record))
    }

    fn insert_cert_record(&mut self, record: &CertRecord) -> Result<bool, CertStoreError> {
        require_instance_id(&record.instance_id)?;
        let inserted = self.execute_write(self.statements.insert(), &insert_values(record))?;
        debug!(
            instance_id = record.instance_id.as_str(),
            serial = record.current_serial.as_str(),
            inserted,
            "cert record insert"
        );
        Ok(inserted)
    }

    fn update_cert_record(&mut self, record: &CertRecord) -> Result<bool, CertStoreError> {
        require_instance_id(&record.instance_id)?;
        let updated = self.execute_write(self.statements.update(), &update_values(record))?;
        debug!(
            instance_id = record.instance_id.as_str(),
            serial = record.current_serial.as_str(),
            updated,
            "cert record update"
        );
        Ok(updated)
    }

    fn update_cert_record_if_current(
        &mut self,
        record: &CertRecord,
        expected_serial: &str,
    ) -> Result<bool, CertStoreError> {
        require_instance_id(&record.instance_id)?;
        let updated = self.execute_write(
            self.statements.update_if_current(),
            &update_if_current_values(record, expected_serial),
        )?;
        debug!(
            instance_id = record.instance_id.as_str(),
            expected_serial,
            updated,
            "cert record guarded update"
        );
        Ok(updated)
    }

    fn commit(&mut self) -> Result<(), CertStoreError> {
        self.finish("COMMIT")
    }

    fn rollback(&mut self) -> Result<(), CertStoreError> {
        self.finish("ROLLBACK")
    }

    fn commit_mode(&self) -> CommitMode {
        self.mode
    }

    fn is_closed(&self) -> bool {
        self.connection.is_none()
    }

    fn close(&mut self) -> Result<(), CertStoreError> {
        let Some(connection) = self.connection.take() else {
            return Ok(());
        };
        let mut result = Ok(());
        if !connection.is_autocommit() {
            warn!(
                table = self.statements.table(),
                "rolling back uncommitted cert record transaction on close"
            );
            if let Err(err) = connection.execute_batch("ROLLBACK") {
                result = Err(connection_fault(err));
            }
        }
        drop(connection);
        result
    }
}

impl Drop for SqliteCertRecordConnection {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(error = %err, "cert record connection close failed on drop");
        }
    }
}

// ============================================================================
// SECTION: Column Binding
// ============================================================================

/// Binds a [`ColumnValue`] as an `SQLite` parameter.
struct SqliteBind<'a>(&'a ColumnValue<'a>);

impl ToSql for SqliteBind<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            ColumnValue::Text(text) => ToSqlOutput::Borrowed(ValueRef::Text(text.as_bytes())),
            ColumnValue::Timestamp(ts) => ToSqlOutput::Owned(Value::Integer(ts.as_unix_millis())),
        })
    }
}

/// Reads one selected column as a [`ColumnValue`].
fn read_column(
    row: &Row<'_>,
    index: usize,
    mapping: &ColumnMapping,
) -> Result<ColumnValue<'static>, CertStoreError> {
    let value = match mapping.kind {
        ColumnKind::Text => {
            row.get::<_, String>(index).map(|text| ColumnValue::Text(Cow::Owned(text)))
        }
        ColumnKind::Timestamp => row
            .get::<_, i64>(index)
            .map(|millis| ColumnValue::Timestamp(Timestamp::from_unix_millis(millis))),
    };
    value.map_err(|err| match err {
        rusqlite::Error::InvalidColumnType(..) | rusqlite::Error::FromSqlConversionFailure(..) => {
            CertStoreError::Corrupt(format!("column {}: {err}", mapping.column))
        }
        other => connection_fault(other),
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a driver error to a connection fault.
fn connection_fault(err: rusqlite::Error) -> CertStoreError {
    CertStoreError::Connection(err.to_string())
}

/// Ensures the database parent directory exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path.as_os_str() == ":memory:" {
        return Err(SqliteStoreError::Invalid(
            "in-memory databases are not shared across pooled connections".to_string(),
        ));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}
