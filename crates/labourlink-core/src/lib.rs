//! # labourlink-core — Foundational Types for the LabourLink Booking Core
//!
//! This crate is the bedrock of the LabourLink workspace. It defines the
//! primitives every other crate builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `BookingId`, `CustomerId`,
//!    `WorkerId`, `AdminId`, `NotificationId` — all UUID newtypes. A worker
//!    identifier cannot be passed where a customer identifier is expected.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision. Deadline comparisons never depend on a
//!    local timezone.
//!
//! 3. **Injected clock.** Domain code never calls `Utc::now()` directly.
//!    Every timestamped write flows through the [`Clock`] trait, so deadline
//!    and reminder behavior is testable without sleeping.
//!
//! 4. **Float-free money.** `Money` is integer minor units. Hourly rates and
//!    booking totals never round through an `f64`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `labourlink-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement `Serialize`/`Deserialize`.

pub mod error;
pub mod geo;
pub mod identity;
pub mod money;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::CoreError;
pub use geo::{Address, Coordinates, GeoPoint};
pub use identity::{AdminId, BookingId, CustomerId, NotificationId, WorkerId};
pub use money::Money;
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
