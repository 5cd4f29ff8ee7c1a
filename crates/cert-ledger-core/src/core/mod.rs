// crates/cert-ledger-core/src/core/mod.rs
// ============================================================================
// Module: Cert Ledger Core Types
// Description: Record, time, column mapping, and statement shapes.
// Purpose: Group the data model shared by every storage backend.
// ============================================================================

//! Core data model for certificate lineage records.

pub mod columns;
pub mod record;
pub mod statements;
pub mod time;

pub use columns::CERT_RECORD_COLUMNS;
pub use columns::CertRecordField;
pub use columns::ColumnKind;
pub use columns::ColumnMapping;
pub use columns::ColumnRole;
pub use columns::ColumnValue;
pub use record::CertRecord;
pub use statements::CertRecordStatements;
pub use statements::PlaceholderStyle;
pub use statements::validate_table_name;
pub use time::Timestamp;
