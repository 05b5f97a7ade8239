//! # Worker Statistics
//!
//! Read-only aggregation over booking history and reviews. Statistics
//! are computed on demand from full snapshots, never incrementally
//! maintained, so there is no counter to drift out of sync with the
//! bookings themselves.

pub mod month;
pub mod statistics;

pub use month::MonthKey;
pub use statistics::{compute_statistics, WorkerStatistics};
