//! # Booking Store — Versioned Compare-and-Swap
//!
//! The system of record for bookings. Every stored booking carries a
//! monotonically increasing version; writes name the version they read,
//! and a mismatch rejects the write. This serializes all status-changing
//! operations per booking: a worker acceptance racing the expiry sweep
//! resolves to exactly one winner, and the loser observes a conflict
//! instead of silently overwriting.
//!
//! Bookings are never physically deleted — cancellation and expiry are
//! terminal statuses, not removals, so the store has no delete path.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use labourlink_booking::Booking;
use labourlink_core::BookingId;

/// Monotonic per-booking version, incremented on every committed write.
pub type Version = u64;

/// Errors from the booking store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No booking with this identifier.
    #[error("booking not found: {0}")]
    NotFound(BookingId),

    /// A booking with this identifier already exists.
    #[error("booking already exists: {0}")]
    Duplicate(BookingId),

    /// The conditional write named a stale version.
    #[error("version conflict on {booking_id}: expected {expected}, found {actual}")]
    VersionConflict {
        /// The contended booking.
        booking_id: BookingId,
        /// The version the writer read.
        expected: Version,
        /// The version currently stored.
        actual: Version,
    },
}

/// The booking system of record.
pub trait BookingStore: Send + Sync {
    /// Insert a new booking at version 1.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the id is already present.
    fn insert(&self, booking: Booking) -> Result<(), StoreError>;

    /// Snapshot a booking with the version to name on write-back.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    fn get(&self, id: BookingId) -> Result<(Booking, Version), StoreError>;

    /// Conditionally replace a booking. Succeeds only if the stored
    /// version equals `expected`; returns the new version.
    ///
    /// # Errors
    ///
    /// [`StoreError::VersionConflict`] if another writer committed
    /// since `expected` was read; [`StoreError::NotFound`] for an
    /// unknown id.
    fn update(
        &self,
        id: BookingId,
        expected: Version,
        booking: Booking,
    ) -> Result<Version, StoreError>;

    /// Snapshot every booking, for the sweep scheduler.
    fn list(&self) -> Vec<(Booking, Version)>;
}

impl<T: BookingStore> BookingStore for std::sync::Arc<T> {
    fn insert(&self, booking: Booking) -> Result<(), StoreError> {
        (**self).insert(booking)
    }

    fn get(&self, id: BookingId) -> Result<(Booking, Version), StoreError> {
        (**self).get(id)
    }

    fn update(
        &self,
        id: BookingId,
        expected: Version,
        booking: Booking,
    ) -> Result<Version, StoreError> {
        (**self).update(id, expected, booking)
    }

    fn list(&self) -> Vec<(Booking, Version)> {
        (**self).list()
    }
}

/// In-memory store. The write lock covers the whole version check and
/// replacement, making `update` a true compare-and-swap.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    inner: RwLock<HashMap<BookingId, (Booking, Version)>>,
}

impl InMemoryBookingStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookingStore for InMemoryBookingStore {
    fn insert(&self, booking: Booking) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if inner.contains_key(&booking.id) {
            return Err(StoreError::Duplicate(booking.id));
        }
        inner.insert(booking.id, (booking, 1));
        Ok(())
    }

    fn get(&self, id: BookingId) -> Result<(Booking, Version), StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn update(
        &self,
        id: BookingId,
        expected: Version,
        booking: Booking,
    ) -> Result<Version, StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let slot = inner.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if slot.1 != expected {
            return Err(StoreError::VersionConflict {
                booking_id: id,
                expected,
                actual: slot.1,
            });
        }
        *slot = (booking, expected + 1);
        Ok(expected + 1)
    }

    fn list(&self) -> Vec<(Booking, Version)> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.values().cloned().collect()
    }
}
