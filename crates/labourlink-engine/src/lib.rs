//! # labourlink-engine — The Server-Owned Booking Service
//!
//! Wraps the booking aggregate with the persistence and delivery
//! discipline the marketplace requires:
//!
//! - **Store** (`store.rs`): versioned compare-and-swap. Every mutation
//!   is load → apply → conditional write; two racing transitions cannot
//!   both succeed. Whichever commits first wins, the loser surfaces a
//!   retryable conflict and the core never auto-retries.
//!
//! - **Notifications** (`notify.rs`): fire-and-forget records handed to
//!   a [`NotificationSink`]. Delivery failures are the sink's problem —
//!   they never fail or roll back the transition that triggered them.
//!
//! - **Service** (`service.rs`): the operation surface. Derives booking
//!   totals from the worker's hourly rate, broadcasts new bookings to
//!   the admin role, and fans out counterpart notifications on every
//!   lifecycle event.
//!
//! Time enters through the injected [`labourlink_core::Clock`]; the
//! scheduler passes its single per-sweep `now` into the deadline and
//! reminder paths explicitly.

pub mod error;
pub mod notify;
pub mod service;
pub mod store;

pub use error::EngineError;
pub use notify::{InMemorySink, Notification, NotificationKind, NotificationSink, Recipient, TracingSink};
pub use service::{BookingPolicy, BookingService, ContactCard};
pub use store::{BookingStore, InMemoryBookingStore, StoreError, Version};
