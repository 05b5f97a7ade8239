//! # Booking Errors
//!
//! Structured errors for the booking state machine. Every rejection
//! carries the current state and the attempted operation so callers can
//! report failures without re-fetching the aggregate.

use labourlink_core::Timestamp;
use thiserror::Error;

/// Errors that can occur during booking operations.
#[derive(Error, Debug)]
pub enum BookingError {
    /// Malformed input to booking creation; nothing was mutated.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation's precondition does not hold in the current status.
    #[error("{operation} not permitted: {reason}")]
    Precondition {
        /// The operation that was attempted.
        operation: &'static str,
        /// Why the precondition failed.
        reason: String,
    },

    /// Attempted transition is not an edge of the lifecycle graph.
    #[error("invalid booking transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: String,
        /// Attempted target status.
        to: String,
    },

    /// Booking is in a terminal status and cannot transition.
    #[error("booking is terminal in status {status}")]
    Terminal {
        /// The terminal status.
        status: String,
    },

    /// A worker response arrived after the response window closed.
    ///
    /// Callers should treat this as equivalent to an already-expired
    /// booking: re-fetch and observe `EXPIRED` once the sweep runs.
    #[error("response window closed at {deadline}, response attempted at {attempted}")]
    DeadlineExceeded {
        /// The absolute response deadline.
        deadline: Timestamp,
        /// When the response was attempted.
        attempted: Timestamp,
    },

    /// The acting party is not a participant of this booking.
    #[error("{operation} rejected: {actor} is not a participant of this booking")]
    NotParticipant {
        /// The operation that was attempted.
        operation: &'static str,
        /// The actor that was rejected.
        actor: String,
    },
}
