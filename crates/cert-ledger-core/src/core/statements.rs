// crates/cert-ledger-core/src/core/statements.rs
// ============================================================================
// Module: Certificate Record Statements
// Description: SQL statement shapes derived from the column table.
// Purpose: Give every backend the same keyed select, insert, and updates.
// Dependencies: crate::core::columns
// ============================================================================

//! ## Overview
//! Statement text and bind values are generated together from
//! [`CERT_RECORD_COLUMNS`](crate::core::columns::CERT_RECORD_COLUMNS). The
//! n-th placeholder in each statement always receives the n-th value from the
//! matching `*_values` function.
//! Security posture: the table name is configuration and is interpolated into
//! SQL, so it is restricted to a plain identifier.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::core::columns::CertRecordField;
use crate::core::columns::ColumnKind;
use crate::core::columns::ColumnValue;
use crate::core::columns::KEY_COLUMN;
use crate::core::columns::insert_columns;
use crate::core::columns::select_columns;
use crate::core::columns::update_columns;
use crate::core::record::CertRecord;
use crate::interfaces::CertStoreError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum table name length in bytes.
pub const MAX_TABLE_NAME_LENGTH: usize = 63;

// ============================================================================
// SECTION: Placeholders
// ============================================================================

/// Positional placeholder syntax of a SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?1, ?2, ...` (`SQLite`).
    Numbered,
    /// `$1, $2, ...` (Postgres).
    Dollar,
}

impl PlaceholderStyle {
    /// Renders the placeholder for a one-based parameter index.
    #[must_use]
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Self::Numbered => format!("?{index}"),
            Self::Dollar => format!("${index}"),
        }
    }
}

// ============================================================================
// SECTION: Statements
// ============================================================================

/// Prepared statement text for one certificate table.
///
/// # Invariants
/// - `table` passed [`validate_table_name`].
/// - Placeholder order matches [`insert_values`], [`update_values`], and
///   [`update_if_current_values`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertRecordStatements {
    /// Certificate table name.
    table: String,
    /// Keyed lookup.
    select: String,
    /// Insert that skips existing keys.
    insert: String,
    /// Unconditional update of mutable columns.
    update: String,
    /// Update guarded by the current serial.
    update_if_current: String,
}

impl CertRecordStatements {
    /// Builds statement text for `table` in the given placeholder style.
    ///
    /// # Errors
    ///
    /// Returns [`CertStoreError::Invalid`] when the table name is not a plain
    /// SQL identifier.
    pub fn new(table: &str, style: PlaceholderStyle) -> Result<Self, CertStoreError> {
        validate_table_name(table)?;
        let key = KEY_COLUMN.column;

        let selected = select_columns().map(|mapping| mapping.column).collect::<Vec<_>>();
        let select = format!(
            "SELECT {} FROM {table} WHERE {key} = {}",
            selected.join(", "),
            style.placeholder(1)
        );

        let inserted = insert_columns().map(|mapping| mapping.column).collect::<Vec<_>>();
        let placeholders =
            (1..=inserted.len()).map(|index| style.placeholder(index)).collect::<Vec<_>>();
        let insert = format!(
            "INSERT INTO {table} ({}) VALUES ({}) ON CONFLICT ({key}) DO NOTHING",
            inserted.join(", "),
            placeholders.join(", ")
        );

        let assignments = update_columns()
            .enumerate()
            .map(|(index, mapping)| format!("{} = {}", mapping.column, style.placeholder(index + 1)))
            .collect::<Vec<_>>();
        let key_index = assignments.len() + 1;
        let update = format!(
            "UPDATE {table} SET {} WHERE {key} = {}",
            assignments.join(", "),
            style.placeholder(key_index)
        );
        let update_if_current = format!(
            "{update} AND {} = {}",
            CertRecordField::CurrentSerial.mapping().column,
            style.placeholder(key_index + 1)
        );

        Ok(Self {
            table: table.to_string(),
            select,
            insert,
            update,
            update_if_current,
        })
    }

    /// Returns the certificate table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the keyed lookup statement.
    #[must_use]
    pub fn select(&self) -> &str {
        &self.select
    }

    /// Returns the insert statement.
    #[must_use]
    pub fn insert(&self) -> &str {
        &self.insert
    }

    /// Returns the unconditional update statement.
    #[must_use]
    pub fn update(&self) -> &str {
        &self.update
    }

    /// Returns the update statement guarded by the current serial.
    #[must_use]
    pub fn update_if_current(&self) -> &str {
        &self.update_if_current
    }

    /// Renders `CREATE TABLE IF NOT EXISTS` for the certificate table using
    /// the backend's column type for each kind.
    #[must_use]
    pub fn create_table(&self, column_type: impl Fn(ColumnKind) -> &'static str) -> String {
        let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (", self.table);
        for mapping in insert_columns() {
            let _ = write!(sql, "{} {} NOT NULL, ", mapping.column, column_type(mapping.kind));
        }
        let _ = write!(sql, "PRIMARY KEY ({}))", KEY_COLUMN.column);
        sql
    }
}

// ============================================================================
// SECTION: Bind Values
// ============================================================================

/// Values bound to [`CertRecordStatements::insert`], in placeholder order.
#[must_use]
pub fn insert_values(record: &CertRecord) -> Vec<ColumnValue<'_>> {
    insert_columns().map(|mapping| mapping.field.value(record)).collect()
}

/// Values bound to [`CertRecordStatements::update`], in placeholder order.
#[must_use]
pub fn update_values(record: &CertRecord) -> Vec<ColumnValue<'_>> {
    let mut values =
        update_columns().map(|mapping| mapping.field.value(record)).collect::<Vec<_>>();
    values.push(KEY_COLUMN.field.value(record));
    values
}

/// Values bound to [`CertRecordStatements::update_if_current`], in
/// placeholder order.
#[must_use]
pub fn update_if_current_values<'a>(
    record: &'a CertRecord,
    expected_serial: &'a str,
) -> Vec<ColumnValue<'a>> {
    let mut values = update_values(record);
    values.push(ColumnValue::Text(Cow::Borrowed(expected_serial)));
    values
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a table name as a plain SQL identifier.
///
/// # Errors
///
/// Returns [`CertStoreError::Invalid`] when the name is empty, too long, or
/// contains anything other than ASCII letters, digits, and underscores, or
/// starts with a digit.
pub fn validate_table_name(table: &str) -> Result<(), CertStoreError> {
    if table.is_empty() {
        return Err(CertStoreError::Invalid("table name must be non-empty".to_string()));
    }
    if table.len() > MAX_TABLE_NAME_LENGTH {
        return Err(CertStoreError::Invalid(format!(
            "table name exceeds {MAX_TABLE_NAME_LENGTH} bytes"
        )));
    }
    let mut chars = table.chars();
    let leading_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !leading_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(CertStoreError::Invalid(format!("table name is not an identifier: {table}")));
    }
    Ok(())
}
