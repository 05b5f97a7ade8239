//! # labourlink-booking — The Booking Aggregate and State Machine
//!
//! Models one requested job between a customer and (eventually) a worker,
//! mediated by an admin-verification step and a time-boxed worker response
//! window.
//!
//! ## State Machine
//!
//! - **Status** (`status.rs`): `BookingStatus` enum with the legal edge
//!   table. `PENDING_ADMIN → ADMIN_VERIFIED → WORKER_ASSIGNED →
//!   ACCEPTED → IN_PROGRESS → COMPLETED`, with `REJECTED`, `EXPIRED`,
//!   and `CANCELLED` branches. Four terminal states.
//!
//! - **Aggregate** (`booking.rs`): the `Booking` struct with every
//!   transition operation. Invalid transitions are rejected at runtime
//!   with structured errors; every status change is appended to an
//!   immutable transition log.
//!
//! ## Design Decision
//!
//! The lifecycle uses an enum with validated transitions rather than
//! typestate types. Bookings are loaded from a store, transitioned, and
//! written back — the current status is runtime data, so the validation
//! must be runtime too. `require_status()` returning `Result` rejects
//! illegal edges with the current and attempted state in the error.
//!
//! ## Clock Discipline
//!
//! Every operation takes `now: Timestamp` from the caller. The aggregate
//! never reads the system clock, so deadline behavior (the response
//! window, reminder eligibility) is deterministic under test.

pub mod booking;
pub mod error;
pub mod location;
pub mod photo;
pub mod status;
pub mod verification;

// ─── Aggregate re-exports ───────────────────────────────────────────

pub use booking::{
    Actor, Booking, CreateBooking, ReminderFlags, ReminderKind, TransitionRecord, WorkerDecision,
};

// ─── Status re-exports ──────────────────────────────────────────────

pub use status::BookingStatus;

// ─── Supporting value re-exports ────────────────────────────────────

pub use error::BookingError;
pub use location::{Party, PartyLocation};
pub use photo::{CompletionPhotos, PhotoMetadata};
pub use verification::VerificationRecord;
