// crates/cert-ledger-core/src/lib.rs
// ============================================================================
// Module: Cert Ledger Core Library
// Description: Public API surface for the Cert Ledger core.
// Purpose: Expose the lineage record, column mapping, and store interfaces.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Cert Ledger tracks the certificate lineage of workload instances: the
//! currently issued serial/IP/time and the one issued immediately before it.
//! This crate is backend-agnostic. Storage backends implement
//! [`CertRecordStore`] and [`CertRecordStoreConnection`] and derive their SQL
//! from the declarative column table in [`core::columns`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::CertRecordStore;
pub use interfaces::CertRecordStoreConnection;
pub use interfaces::CertStoreError;
pub use interfaces::CommitMode;
pub use runtime::SharedCertRecordStore;
pub use runtime::with_connection;
