// crates/cert-ledger-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Certificate Record Store
// Description: Pooled CertRecordStore backend using SQLite WAL.
// Purpose: Persist certificate lineage for single-node deployments and tests.
// Dependencies: cert-ledger-core, r2d2, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`CertRecordStore`] whose connections
//! are lent by an `r2d2` pool. Each [`SqliteCertRecordConnection`] owns one
//! pooled connection and returns it on close or drop.
//!
//! [`CertRecordStore`]: cert_ledger_core::CertRecordStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod manager;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use manager::SqliteConnectionManager;
pub use store::SqliteCertRecordConnection;
pub use store::SqliteCertRecordStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
