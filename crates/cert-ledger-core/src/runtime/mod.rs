// crates/cert-ledger-core/src/runtime/mod.rs
// ============================================================================
// Module: Cert Ledger Runtime Helpers
// Description: Shared store wrapper and scoped unit-of-work helper.
// Purpose: Let callers hold any backend and run work with guaranteed release.
// Dependencies: crate::interfaces, tracing
// ============================================================================

//! ## Overview
//! [`SharedCertRecordStore`] erases the backend behind an `Arc`.
//! [`with_connection`] scopes a unit of work: the connection is closed on
//! every exit path, and in transactional mode the work commits on success
//! and rolls back on failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use tracing::warn;

use crate::interfaces::CertRecordStore;
use crate::interfaces::CertRecordStoreConnection;
use crate::interfaces::CertStoreError;
use crate::interfaces::CommitMode;

// ============================================================================
// SECTION: Shared Store
// ============================================================================

/// Shared certificate record store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedCertRecordStore {
    /// Inner store implementation.
    inner: Arc<dyn CertRecordStore + Send + Sync>,
}

impl SharedCertRecordStore {
    /// Wraps a store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl CertRecordStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn CertRecordStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl CertRecordStore for SharedCertRecordStore {
    fn new_connection(
        &self,
        mode: CommitMode,
    ) -> Result<Box<dyn CertRecordStoreConnection + Send>, CertStoreError> {
        self.inner.new_connection(mode)
    }
}

// ============================================================================
// SECTION: Scoped Unit of Work
// ============================================================================

/// Runs `work` on a fresh connection and always closes it.
///
/// In [`CommitMode::Transactional`] the transaction commits when `work`
/// returns `Ok` and rolls back when it returns `Err`. When both `work` and
/// the cleanup fail, the error from `work` is returned.
///
/// # Errors
///
/// Returns [`CertStoreError`] when no connection is available, when `work`
/// fails, or when commit or close fails.
pub fn with_connection<S, T, F>(store: &S, mode: CommitMode, work: F) -> Result<T, CertStoreError>
where
    S: CertRecordStore + ?Sized,
    F: FnOnce(&mut dyn CertRecordStoreConnection) -> Result<T, CertStoreError>,
{
    let mut connection = store.new_connection(mode)?;
    let outcome = work(&mut *connection);
    match outcome {
        Ok(value) => {
            if mode == CommitMode::Transactional
                && let Err(err) = connection.commit()
            {
                if let Err(close_err) = connection.close() {
                    warn!(error = %close_err, "close after failed commit failed");
                }
                return Err(err);
            }
            connection.close()?;
            Ok(value)
        }
        Err(err) => {
            if mode == CommitMode::Transactional
                && let Err(rollback_err) = connection.rollback()
            {
                warn!(error = %rollback_err, "rollback after failed unit of work failed");
            }
            if let Err(close_err) = connection.close() {
                warn!(error = %close_err, "close after failed unit of work failed");
            }
            Err(err)
        }
    }
}
