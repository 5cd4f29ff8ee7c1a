// crates/cert-ledger-store-postgres/src/lib.rs
// ============================================================================
// Module: Postgres Certificate Record Store
// Description: Pooled CertRecordStore backend using Postgres.
// Purpose: Persist certificate lineage for shared, multi-node deployments.
// Dependencies: cert-ledger-core, postgres, r2d2, r2d2_postgres
// ============================================================================

//! ## Overview
//! This crate provides a Postgres-backed [`CertRecordStore`] whose
//! connections are lent by an `r2d2` pool. Timestamps are stored as
//! `TIMESTAMPTZ` and strings as `TEXT`.
//!
//! [`CertRecordStore`]: cert_ledger_core::CertRecordStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::PostgresCertRecordConnection;
pub use store::PostgresCertRecordStore;
pub use store::PostgresStoreConfig;
pub use store::PostgresStoreError;
pub use store::shared_postgres_store;
