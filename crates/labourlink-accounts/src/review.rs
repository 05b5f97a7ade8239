//! # Worker Reviews
//!
//! A review is appended by the customer of a completed booking, at most
//! once per `(booking, customer)` pair. Ratings live in the 1–5 domain
//! and aggregate into a mean held as tenths, so "4.5 stars" is the exact
//! integer 45 rather than a drifting float.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use labourlink_core::{BookingId, CustomerId, Timestamp};

/// Errors from review submission.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// Rating outside the 1–5 domain.
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    /// This customer already reviewed this booking.
    #[error("duplicate review for {booking_id} by {customer_id}")]
    Duplicate {
        /// The booking already reviewed.
        booking_id: BookingId,
        /// The reviewing customer.
        customer_id: CustomerId,
    },

    /// The reviewed worker does not exist in the directory.
    #[error("unknown worker: {0}")]
    UnknownWorker(String),
}

/// One customer review of one completed booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// The completed booking being reviewed.
    pub booking_id: BookingId,
    /// The reviewing customer (must be the booking's customer).
    pub customer_id: CustomerId,
    /// Star rating, 1–5.
    pub rating: u8,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// When the review was submitted.
    pub created_at: Timestamp,
}

impl Review {
    /// Build a review, validating the rating domain.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidRating`] outside 1–5.
    pub fn new(
        booking_id: BookingId,
        customer_id: CustomerId,
        rating: u8,
        comment: Option<String>,
        created_at: Timestamp,
    ) -> Result<Self, ReviewError> {
        if !(1..=5).contains(&rating) {
            return Err(ReviewError::InvalidRating(rating));
        }
        Ok(Self {
            booking_id,
            customer_id,
            rating,
            comment,
            created_at,
        })
    }
}

/// Arithmetic mean of ratings, rounded to one decimal and returned as
/// tenths (e.g. 45 for 4.5). `None` for an empty slice.
pub fn mean_rating_tenths(ratings: &[u8]) -> Option<u16> {
    if ratings.is_empty() {
        return None;
    }
    let sum: u64 = ratings.iter().map(|r| u64::from(*r)).sum();
    let count = ratings.len() as u64;
    // round(10 * sum / count) with half-up integer rounding
    let tenths = (sum * 10 + count / 2) / count;
    Some(tenths as u16)
}
