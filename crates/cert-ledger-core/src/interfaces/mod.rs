// crates/cert-ledger-core/src/interfaces/mod.rs
// ============================================================================
// Module: Cert Ledger Interfaces
// Description: Store and connection traits for certificate lineage records.
// Purpose: Define the backend-agnostic persistence contract.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! A [`CertRecordStore`] lends pooled connections; each
//! [`CertRecordStoreConnection`] owns one physical connection for a single
//! unit of work and releases it exactly once on `close()` or drop.
//!
//! Outcomes follow a fixed taxonomy: a missing record is `Ok(None)`, a write
//! that touched no row is `Ok(false)`, and only driver or pool faults surface
//! as [`CertStoreError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::CertRecord;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Certificate record store errors.
///
/// # Invariants
/// - Error messages never embed record contents beyond identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CertStoreError {
    /// The pool could not supply a connection.
    #[error("cert store unavailable: {0}")]
    Unavailable(String),
    /// The underlying connection or driver faulted.
    #[error("cert store connection fault: {0}")]
    Connection(String),
    /// Caller input or commit-mode misuse.
    #[error("cert store invalid request: {0}")]
    Invalid(String),
    /// Stored data cannot be mapped back to a record.
    #[error("cert store corruption: {0}")]
    Corrupt(String),
    /// The connection was already closed.
    #[error("cert store connection closed")]
    Closed,
}

// ============================================================================
// SECTION: Commit Mode
// ============================================================================

/// Commit discipline chosen when a connection is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    /// Every statement commits on its own.
    AutoCommit,
    /// Statements join a transaction the caller commits or rolls back.
    Transactional,
}

// ============================================================================
// SECTION: Connection
// ============================================================================

/// One unit of work over a borrowed database connection.
///
/// # Invariants
/// - Single owner; operations take `&mut self`.
/// - After `close()` every operation except `close()` returns
///   [`CertStoreError::Closed`].
/// - Dropping the connection closes it.
pub trait CertRecordStoreConnection {
    /// Looks up the record for `instance_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CertStoreError`] when the id is empty or the lookup faults.
    fn get_cert_record(&mut self, instance_id: &str) -> Result<Option<CertRecord>, CertStoreError>;

    /// Inserts a new record. Returns `false` when the key already exists.
    ///
    /// # Errors
    ///
    /// Returns [`CertStoreError`] when the id is empty or the write faults.
    fn insert_cert_record(&mut self, record: &CertRecord) -> Result<bool, CertStoreError>;

    /// Rewrites the mutable fields of an existing record. Returns `false`
    /// when no record matches `record.instance_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CertStoreError`] when the id is empty or the write faults.
    fn update_cert_record(&mut self, record: &CertRecord) -> Result<bool, CertStoreError>;

    /// Rewrites the mutable fields only while the stored current serial
    /// equals `expected_serial`. Returns `false` when the record is missing
    /// or was rotated by another writer.
    ///
    /// # Errors
    ///
    /// Returns [`CertStoreError`] when the id is empty or the write faults.
    fn update_cert_record_if_current(
        &mut self,
        record: &CertRecord,
        expected_serial: &str,
    ) -> Result<bool, CertStoreError>;

    /// Commits the open transaction, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CertStoreError::Invalid`] in auto-commit mode, or a
    /// connection fault when the commit fails.
    fn commit(&mut self) -> Result<(), CertStoreError>;

    /// Rolls back the open transaction, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CertStoreError::Invalid`] in auto-commit mode, or a
    /// connection fault when the rollback fails.
    fn rollback(&mut self) -> Result<(), CertStoreError>;

    /// Returns the commit mode chosen at open time.
    fn commit_mode(&self) -> CommitMode;

    /// Returns true once the connection has been released.
    fn is_closed(&self) -> bool;

    /// Releases the connection back to its pool. Idempotent.
    ///
    /// An uncommitted transaction is rolled back first.
    ///
    /// # Errors
    ///
    /// Returns [`CertStoreError::Connection`] when the rollback fails; the
    /// connection is released regardless.
    fn close(&mut self) -> Result<(), CertStoreError>;
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Factory for certificate record connections.
pub trait CertRecordStore {
    /// Borrows a pooled connection and opens it in `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`CertStoreError::Unavailable`] when the pool cannot supply a
    /// connection.
    fn new_connection(
        &self,
        mode: CommitMode,
    ) -> Result<Box<dyn CertRecordStoreConnection + Send>, CertStoreError>;
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Rejects an empty instance identifier.
///
/// # Errors
///
/// Returns [`CertStoreError::Invalid`] when `instance_id` is empty.
pub fn require_instance_id(instance_id: &str) -> Result<(), CertStoreError> {
    if instance_id.is_empty() {
        return Err(CertStoreError::Invalid("instance id must be non-empty".to_string()));
    }
    Ok(())
}
