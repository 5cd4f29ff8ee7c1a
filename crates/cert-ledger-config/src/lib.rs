// crates/cert-ledger-config/src/lib.rs
// ============================================================================
// Module: Cert Ledger Config Library
// Description: Store configuration model, validation, and construction.
// Purpose: Single source of truth for cert-ledger.toml semantics.
// Dependencies: cert-ledger-core, cert-ledger-store-*, serde, toml
// ============================================================================

//! ## Overview
//! `cert-ledger-config` loads `cert-ledger.toml`, validates it fail-closed,
//! and builds the configured backend as a [`SharedCertRecordStore`].
//!
//! Security posture: config inputs are untrusted.
//!
//! [`SharedCertRecordStore`]: cert_ledger_core::SharedCertRecordStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod builder;
pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::build_store;
pub use config::*;
