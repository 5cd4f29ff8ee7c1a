// crates/cert-ledger-core/src/core/time.rs
// ============================================================================
// Module: Cert Ledger Time Model
// Description: Millisecond timestamps for certificate issuance times.
// Purpose: Keep issuance instants lossless across every storage backend.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Issuance times are carried as signed Unix epoch milliseconds. Backends
//! with a native timestamp column convert through [`OffsetDateTime`] in UTC;
//! backends without one persist the raw millisecond value. Either way the
//! instant read back is the instant written.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::interfaces::CertStoreError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Nanoseconds per millisecond.
const NANOS_PER_MILLI: i128 = 1_000_000;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Issuance instant with millisecond resolution.
///
/// # Invariants
/// - The value is an absolute instant; no timezone is attached or applied.
/// - Ordering follows the underlying millisecond value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from Unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as Unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Returns the current wall-clock time, saturating at the `i64` range.
    #[must_use]
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(i64::try_from(millis).unwrap_or(i64::MAX))
    }

    /// Floors an [`OffsetDateTime`] to the millisecond.
    ///
    /// # Errors
    ///
    /// Returns [`CertStoreError::Corrupt`] when the instant does not fit in
    /// `i64` milliseconds.
    pub fn from_offset_date_time(value: OffsetDateTime) -> Result<Self, CertStoreError> {
        let millis = value.unix_timestamp_nanos().div_euclid(NANOS_PER_MILLI);
        i64::try_from(millis)
            .map(Self)
            .map_err(|_| CertStoreError::Corrupt("timestamp out of range".to_string()))
    }

    /// Converts the timestamp to a UTC [`OffsetDateTime`].
    ///
    /// # Errors
    ///
    /// Returns [`CertStoreError::Invalid`] when the value is outside the
    /// range supported by `time`.
    pub fn to_offset_date_time(self) -> Result<OffsetDateTime, CertStoreError> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.0) * NANOS_PER_MILLI)
            .map_err(|err| CertStoreError::Invalid(format!("timestamp out of range: {err}")))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
