//! # Engine Errors
//!
//! The service-level error taxonomy. Aggregate and review errors pass
//! through transparently; the store's version conflict surfaces as a
//! retryable [`EngineError::Conflict`] — the caller may re-fetch and
//! decide whether to retry, the engine never retries on its own.

use thiserror::Error;

use labourlink_accounts::ReviewError;
use labourlink_booking::BookingError;
use labourlink_core::{BookingId, CoreError};

use crate::store::{StoreError, Version};

/// Errors surfaced by the booking service.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A booking operation was rejected by the aggregate.
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// A review operation was rejected.
    #[error(transparent)]
    Review(#[from] ReviewError),

    /// No booking with this identifier.
    #[error("booking not found: {0}")]
    NotFound(BookingId),

    /// Two transitions raced; this writer lost the compare-and-swap.
    #[error(
        "concurrent transition conflict on {booking_id}: expected version {expected}, found {actual}"
    )]
    Conflict {
        /// The contended booking.
        booking_id: BookingId,
        /// The version this writer read.
        expected: Version,
        /// The version another writer committed.
        actual: Version,
    },

    /// An account referenced by the operation is not in the directory.
    #[error("unknown account: {0}")]
    UnknownAccount(String),

    /// Amount derivation overflowed or was otherwise invalid.
    #[error("amount error: {0}")]
    Amount(#[from] CoreError),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Duplicate(id) => Self::Conflict {
                booking_id: id,
                expected: 0,
                actual: 1,
            },
            StoreError::VersionConflict {
                booking_id,
                expected,
                actual,
            } => Self::Conflict {
                booking_id,
                expected,
                actual,
            },
        }
    }
}
