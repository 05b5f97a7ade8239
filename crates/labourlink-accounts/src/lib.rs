//! # labourlink-accounts — The Account Directory
//!
//! Read-mostly account records consumed by the booking core, and the one
//! write path it owns: appending a worker review with an atomic rating
//! recompute.
//!
//! - **Worker** (`worker.rs`): hourly rate, availability, verification
//!   flag, contact details, append-only reviews with the mean rating
//!   held to one decimal.
//!
//! - **Customer** (`customer.rs`): contact details and last known
//!   location.
//!
//! - **Review** (`review.rs`): a 1–5 rating with optional comment,
//!   validated at construction; the duplicate guard keys on
//!   `(booking, customer)`.
//!
//! - **Directory** (`directory.rs`): the `AccountDirectory` trait, with
//!   the admin broadcast target expressed as an explicit role query
//!   rather than a magic user id, and an in-memory implementation whose
//!   review appends are atomic per worker.

pub mod customer;
pub mod directory;
pub mod review;
pub mod worker;

pub use customer::Customer;
pub use directory::{AccountDirectory, InMemoryDirectory};
pub use review::{mean_rating_tenths, Review, ReviewError};
pub use worker::Worker;
