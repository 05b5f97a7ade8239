//! # Worker Record
//!
//! Read-mostly from the booking core's perspective: the engine consults
//! rate, availability, and verification at selection/assignment time,
//! and appends reviews after completion.

use serde::{Deserialize, Serialize};

use labourlink_core::{GeoPoint, Money, WorkerId};

use crate::review::{mean_rating_tenths, Review};

/// A manual-labour worker registered in the district.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    /// Unique worker identifier.
    pub id: WorkerId,
    /// Display name.
    pub name: String,
    /// The trade offered (e.g. "cleaner", "electrician", "plumber").
    pub trade: String,
    /// Contact phone, disclosed to the customer after verification.
    pub phone: String,
    /// Contact email, disclosed to the customer after verification.
    pub email: String,
    /// Rate per hour of work.
    pub hourly_rate: Money,
    /// Whether the worker is currently taking assignments.
    pub is_available: bool,
    /// Whether the marketplace has verified this worker's identity.
    pub is_verified: bool,
    /// Mean review rating in tenths (45 = 4.5). `None` until the first
    /// review lands. Recomputed on every append.
    pub rating_tenths: Option<u16>,
    /// Append-only review history.
    pub reviews: Vec<Review>,
    /// Last known location, if the worker shares one.
    pub current_location: Option<GeoPoint>,
}

impl Worker {
    /// A new, unreviewed worker.
    pub fn new(
        id: WorkerId,
        name: impl Into<String>,
        trade: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        hourly_rate: Money,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            trade: trade.into(),
            phone: phone.into(),
            email: email.into(),
            hourly_rate,
            is_available: true,
            is_verified: false,
            rating_tenths: None,
            reviews: Vec::new(),
            current_location: None,
        }
    }

    /// Whether this worker can be selected for a booking.
    pub fn is_bookable(&self) -> bool {
        self.is_available && self.is_verified
    }

    /// Whether `(booking, customer)` has already reviewed this worker.
    pub fn has_review_for(
        &self,
        booking_id: labourlink_core::BookingId,
        customer_id: labourlink_core::CustomerId,
    ) -> bool {
        self.reviews
            .iter()
            .any(|r| r.booking_id == booking_id && r.customer_id == customer_id)
    }

    /// Append a review and recompute the mean rating.
    ///
    /// The duplicate guard is the caller's responsibility (the directory
    /// holds the per-worker lock).
    pub(crate) fn push_review(&mut self, review: Review) {
        self.reviews.push(review);
        let ratings: Vec<u8> = self.reviews.iter().map(|r| r.rating).collect();
        self.rating_tenths = mean_rating_tenths(&ratings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labourlink_core::{BookingId, CustomerId, Timestamp};

    fn worker() -> Worker {
        Worker::new(
            WorkerId::new(),
            "Ayesha",
            "electrician",
            "+92-300-0000000",
            "ayesha@example.com",
            Money::from_major(1500).unwrap(),
        )
    }

    #[test]
    fn test_new_worker_is_unrated_and_unverified() {
        let w = worker();
        assert_eq!(w.rating_tenths, None);
        assert!(!w.is_bookable());
    }

    #[test]
    fn test_push_review_recomputes_rating() {
        let mut w = worker();
        let ts = Timestamp::now();
        w.push_review(Review::new(BookingId::new(), CustomerId::new(), 4, None, ts).unwrap());
        assert_eq!(w.rating_tenths, Some(40));
        w.push_review(Review::new(BookingId::new(), CustomerId::new(), 5, None, ts).unwrap());
        assert_eq!(w.rating_tenths, Some(45));
    }

    #[test]
    fn test_serde_roundtrip_keeps_reviews() {
        let mut w = worker();
        w.is_verified = true;
        w.push_review(
            Review::new(
                BookingId::new(),
                CustomerId::new(),
                4,
                Some("careful wiring".into()),
                Timestamp::now(),
            )
            .unwrap(),
        );
        let json = serde_json::to_string(&w).unwrap();
        let back: Worker = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rating_tenths, Some(40));
        assert_eq!(back.reviews.len(), 1);
        assert!(back.is_bookable());
    }
}
