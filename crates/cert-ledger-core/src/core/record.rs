// crates/cert-ledger-core/src/core/record.rs
// ============================================================================
// Module: Certificate Lineage Record
// Description: Current and previous credential for one workload instance.
// Purpose: Provide the entity persisted by every certificate record store.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`CertRecord`] is one row of lineage keyed by instance identifier. It
//! holds the most recently issued credential and the one issued immediately
//! before it, so renewal logic can detect replay or rollback of an older
//! certificate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Record
// ============================================================================

/// Certificate lineage for a single workload instance.
///
/// # Invariants
/// - `instance_id` is the sole lookup key and never changes once stored.
/// - Monotonic `current_time` across renewals is a caller policy; the store
///   persists whatever instant it is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertRecord {
    /// Unique workload instance identifier.
    pub instance_id: String,
    /// Certificate subject common name.
    pub common_name: String,
    /// Serial of the most recently issued certificate.
    pub current_serial: String,
    /// Client IP that requested the current certificate.
    pub current_ip: String,
    /// Issue time of the current certificate.
    pub current_time: Timestamp,
    /// Serial of the certificate issued before the current one.
    pub prev_serial: String,
    /// Client IP that requested the previous certificate.
    pub prev_ip: String,
    /// Issue time of the previous certificate.
    pub prev_time: Timestamp,
}

impl CertRecord {
    /// Returns the record after a renewal: the current credential moves to
    /// the previous slot and the supplied credential becomes current.
    #[must_use]
    pub fn rotated(
        &self,
        serial: impl Into<String>,
        ip: impl Into<String>,
        issued_at: Timestamp,
    ) -> Self {
        Self {
            instance_id: self.instance_id.clone(),
            common_name: self.common_name.clone(),
            current_serial: serial.into(),
            current_ip: ip.into(),
            current_time: issued_at,
            prev_serial: self.current_serial.clone(),
            prev_ip: self.current_ip.clone(),
            prev_time: self.current_time,
        }
    }
}
