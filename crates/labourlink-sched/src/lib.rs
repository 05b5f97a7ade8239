//! # Booking Sweep Scheduler
//!
//! Periodic maintenance over the booking store. Each tick takes a single
//! clock reading and walks every booking once, doing two jobs:
//!
//! - **Expiry**: bookings still awaiting a worker response whose
//!   deadline has passed are moved to `EXPIRED`.
//! - **Reminders**: accepted bookings approaching their scheduled date
//!   get a one-hour and a thirty-minute reminder, each at most once.
//!
//! The sweep never retries on its own. When a sweep loses a write race
//! to a concurrent user action, that booking is skipped and picked up
//! again on the next tick if still relevant. Both jobs are idempotent,
//! so a missed or doubled tick is harmless.

pub mod config;
pub mod runner;
pub mod sweep;

pub use config::SchedulerConfig;
pub use runner::Sweeper;
pub use sweep::{run_sweep, SweepOutcome};
