// crates/cert-ledger-core/src/core/columns.rs
// ============================================================================
// Module: Certificate Record Column Mapping
// Description: Declarative field-to-column table for certificate records.
// Purpose: Drive read, insert, and update paths from one mapping.
// Dependencies: crate::core::{record, time}
// ============================================================================

//! ## Overview
//! [`CERT_RECORD_COLUMNS`] lists every persisted attribute of a
//! [`CertRecord`] in insert order, together with its column name, value kind,
//! and write role. Statement text, bind order, and row decoding are all
//! derived from this table so a positional index can never drift from its
//! column.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;

use crate::core::record::CertRecord;
use crate::core::time::Timestamp;
use crate::interfaces::CertStoreError;

// ============================================================================
// SECTION: Column Table
// ============================================================================

/// Persisted attribute of a [`CertRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertRecordField {
    /// Instance identifier (primary key).
    InstanceId,
    /// Certificate common name.
    CommonName,
    /// Current certificate serial.
    CurrentSerial,
    /// Current certificate issue time.
    CurrentTime,
    /// Current requester IP.
    CurrentIp,
    /// Previous certificate serial.
    PrevSerial,
    /// Previous certificate issue time.
    PrevTime,
    /// Previous requester IP.
    PrevIp,
}

/// Storage kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Exact string value.
    Text,
    /// Millisecond timestamp.
    Timestamp,
}

/// How a column participates in writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Lookup key; bound as the predicate, never rewritten.
    Key,
    /// Written on insert only.
    InsertOnly,
    /// Rewritten on every update.
    Mutable,
}

/// One entry of the field-to-column table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Record attribute.
    pub field: CertRecordField,
    /// Column name in the certificate table.
    pub column: &'static str,
    /// Storage kind.
    pub kind: ColumnKind,
    /// Write role.
    pub role: ColumnRole,
}

/// Field-to-column table in insert order.
pub const CERT_RECORD_COLUMNS: [ColumnMapping; 8] = [
    ColumnMapping {
        field: CertRecordField::InstanceId,
        column: "instanceId",
        kind: ColumnKind::Text,
        role: ColumnRole::Key,
    },
    ColumnMapping {
        field: CertRecordField::CommonName,
        column: "commonName",
        kind: ColumnKind::Text,
        role: ColumnRole::InsertOnly,
    },
    ColumnMapping {
        field: CertRecordField::CurrentSerial,
        column: "currentSerial",
        kind: ColumnKind::Text,
        role: ColumnRole::Mutable,
    },
    ColumnMapping {
        field: CertRecordField::CurrentTime,
        column: "currentTime",
        kind: ColumnKind::Timestamp,
        role: ColumnRole::Mutable,
    },
    ColumnMapping {
        field: CertRecordField::CurrentIp,
        column: "currentIP",
        kind: ColumnKind::Text,
        role: ColumnRole::Mutable,
    },
    ColumnMapping {
        field: CertRecordField::PrevSerial,
        column: "prevSerial",
        kind: ColumnKind::Text,
        role: ColumnRole::Mutable,
    },
    ColumnMapping {
        field: CertRecordField::PrevTime,
        column: "prevTime",
        kind: ColumnKind::Timestamp,
        role: ColumnRole::Mutable,
    },
    ColumnMapping {
        field: CertRecordField::PrevIp,
        column: "prevIP",
        kind: ColumnKind::Text,
        role: ColumnRole::Mutable,
    },
];

/// Key column entry.
pub const KEY_COLUMN: ColumnMapping = CERT_RECORD_COLUMNS[0];

/// Columns written by an insert, in bind order.
pub fn insert_columns() -> impl Iterator<Item = &'static ColumnMapping> {
    CERT_RECORD_COLUMNS.iter()
}

/// Columns rewritten by an update, in bind order (key excluded).
pub fn update_columns() -> impl Iterator<Item = &'static ColumnMapping> {
    CERT_RECORD_COLUMNS.iter().filter(|mapping| mapping.role == ColumnRole::Mutable)
}

/// Columns returned by a keyed lookup, in select order (key excluded).
pub fn select_columns() -> impl Iterator<Item = &'static ColumnMapping> {
    CERT_RECORD_COLUMNS.iter().filter(|mapping| mapping.role != ColumnRole::Key)
}

// ============================================================================
// SECTION: Column Values
// ============================================================================

/// Value bound to or read from a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue<'a> {
    /// Text column value.
    Text(Cow<'a, str>),
    /// Timestamp column value.
    Timestamp(Timestamp),
}

impl ColumnValue<'_> {
    /// Returns the storage kind of the value.
    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        match self {
            Self::Text(_) => ColumnKind::Text,
            Self::Timestamp(_) => ColumnKind::Timestamp,
        }
    }
}

impl CertRecordField {
    /// Returns the table entry for this attribute.
    ///
    /// Variants are declared in table order, so the discriminant indexes
    /// [`CERT_RECORD_COLUMNS`].
    #[must_use]
    pub const fn mapping(self) -> &'static ColumnMapping {
        &CERT_RECORD_COLUMNS[self as usize]
    }

    /// Borrows the attribute value from a record.
    #[must_use]
    pub fn value(self, record: &CertRecord) -> ColumnValue<'_> {
        match self {
            Self::InstanceId => text(&record.instance_id),
            Self::CommonName => text(&record.common_name),
            Self::CurrentSerial => text(&record.current_serial),
            Self::CurrentTime => ColumnValue::Timestamp(record.current_time),
            Self::CurrentIp => text(&record.current_ip),
            Self::PrevSerial => text(&record.prev_serial),
            Self::PrevTime => ColumnValue::Timestamp(record.prev_time),
            Self::PrevIp => text(&record.prev_ip),
        }
    }

    /// Stores a decoded column value into the matching record attribute.
    ///
    /// Returns `false` when the value kind does not match the attribute.
    fn assign(self, record: &mut CertRecord, value: ColumnValue<'_>) -> bool {
        match (self, value) {
            (Self::InstanceId, ColumnValue::Text(v)) => record.instance_id = v.into_owned(),
            (Self::CommonName, ColumnValue::Text(v)) => record.common_name = v.into_owned(),
            (Self::CurrentSerial, ColumnValue::Text(v)) => record.current_serial = v.into_owned(),
            (Self::CurrentTime, ColumnValue::Timestamp(v)) => record.current_time = v,
            (Self::CurrentIp, ColumnValue::Text(v)) => record.current_ip = v.into_owned(),
            (Self::PrevSerial, ColumnValue::Text(v)) => record.prev_serial = v.into_owned(),
            (Self::PrevTime, ColumnValue::Timestamp(v)) => record.prev_time = v,
            (Self::PrevIp, ColumnValue::Text(v)) => record.prev_ip = v.into_owned(),
            _ => return false,
        }
        true
    }
}

/// Borrows a string attribute as a text column value.
fn text(value: &str) -> ColumnValue<'_> {
    ColumnValue::Text(Cow::Borrowed(value))
}

/// Decodes a looked-up row into a record.
///
/// `read` is called once per [`select_columns`] entry with the zero-based
/// select position; `instance_id` is the lookup key. The record is only
/// returned once every column decoded successfully.
///
/// # Errors
///
/// Returns the first error produced by `read`, or
/// [`CertStoreError::Corrupt`] when a value has the wrong kind.
pub fn decode_record<F>(instance_id: &str, mut read: F) -> Result<CertRecord, CertStoreError>
where
    F: FnMut(usize, &ColumnMapping) -> Result<ColumnValue<'static>, CertStoreError>,
{
    let epoch = Timestamp::from_unix_millis(0);
    let mut record = CertRecord {
        instance_id: instance_id.to_string(),
        common_name: String::new(),
        current_serial: String::new(),
        current_ip: String::new(),
        current_time: epoch,
        prev_serial: String::new(),
        prev_ip: String::new(),
        prev_time: epoch,
    };
    for (index, mapping) in select_columns().enumerate() {
        let value = read(index, mapping)?;
        if value.kind() != mapping.kind || !mapping.field.assign(&mut record, value) {
            return Err(CertStoreError::Corrupt(format!(
                "column {} has unexpected value kind",
                mapping.column
            )));
        }
    }
    Ok(record)
}
