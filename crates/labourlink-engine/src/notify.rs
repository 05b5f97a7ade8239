//! # Notifications — Fire-and-Forget Delivery Records
//!
//! Write-only records handed to a [`NotificationSink`]. The sink's
//! delivery is at-least-once and best-effort from the core's point of
//! view: `notify` returns nothing, and a failing sink must never fail
//! or roll back the state transition that produced the record.
//!
//! The `is_read` flag defaults to false and is mutated only by an
//! explicit mark-read action outside this core.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use labourlink_core::{AdminId, BookingId, CustomerId, NotificationId, Timestamp, WorkerId};

// ─── Recipients and Kinds ────────────────────────────────────────────

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "role", content = "id")]
pub enum Recipient {
    /// A customer account.
    Customer(CustomerId),
    /// A worker account.
    Worker(WorkerId),
    /// An admin account (broadcasts resolve to one record per admin).
    Admin(AdminId),
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer(id) => write!(f, "{id}"),
            Self::Worker(id) => write!(f, "{id}"),
            Self::Admin(id) => write!(f, "{id}"),
        }
    }
}

/// Classification tag carried on every notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A new booking is awaiting admin triage.
    BookingCreated,
    /// A booking was assigned to a worker; the response window started.
    WorkerAssigned,
    /// Admin verified both parties and disclosed contact details.
    BookingVerified,
    /// Admin or worker rejected the booking.
    BookingRejected,
    /// The worker accepted the assignment.
    BookingAccepted,
    /// The response window elapsed with no worker response.
    BookingExpired,
    /// One party cancelled the booking.
    BookingCancelled,
    /// The worker marked the job complete.
    BookingCompleted,
    /// Upcoming-job reminder to the worker.
    Reminder,
}

// ─── The Record ──────────────────────────────────────────────────────

/// One notification record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The addressed account.
    pub recipient: Recipient,
    /// Short title.
    pub title: String,
    /// Full message body.
    pub message: String,
    /// Classification tag.
    pub kind: NotificationKind,
    /// Read flag, mutated only outside this core.
    pub is_read: bool,
    /// The booking this notification refers to, if any.
    pub booking_id: Option<BookingId>,
    /// When the core emitted the record.
    pub sent_at: Timestamp,
}

impl Notification {
    /// Build an unread notification.
    pub fn new(
        recipient: Recipient,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        booking_id: Option<BookingId>,
        sent_at: Timestamp,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            recipient,
            title: title.into(),
            message: message.into(),
            kind,
            is_read: false,
            booking_id,
            sent_at,
        }
    }
}

// ─── The Sink ────────────────────────────────────────────────────────

/// Destination for notification records.
///
/// Fire-and-forget: no return value is consumed by the core, and an
/// implementation must not block the calling transition on slow I/O —
/// queue and return.
pub trait NotificationSink: Send + Sync {
    /// Accept a notification for delivery.
    fn notify(&self, notification: Notification);
}

impl<T: NotificationSink> NotificationSink for std::sync::Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Test sink that retains every record.
#[derive(Debug, Default)]
pub struct InMemorySink {
    sent: Mutex<Vec<Notification>>,
}

impl InMemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Records addressed to one recipient.
    pub fn sent_to(&self, recipient: Recipient) -> Vec<Notification> {
        self.sent()
            .into_iter()
            .filter(|n| n.recipient == recipient)
            .collect()
    }
}

impl NotificationSink for InMemorySink {
    fn notify(&self, notification: Notification) {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}

/// Sink that logs each record at info level and drops it. Useful as a
/// default wiring before a real delivery channel exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        tracing::info!(
            recipient = %notification.recipient,
            kind = ?notification.kind,
            booking = ?notification.booking_id.map(|id| id.to_string()),
            title = %notification.title,
            "notification emitted"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_is_unread() {
        let n = Notification::new(
            Recipient::Customer(CustomerId::new()),
            NotificationKind::BookingCreated,
            "Booking received",
            "Your booking is awaiting verification.",
            None,
            Timestamp::now(),
        );
        assert!(!n.is_read);
    }

    #[test]
    fn test_in_memory_sink_filters_by_recipient() {
        let sink = InMemorySink::new();
        let customer = Recipient::Customer(CustomerId::new());
        let worker = Recipient::Worker(WorkerId::new());
        let ts = Timestamp::now();

        sink.notify(Notification::new(
            customer,
            NotificationKind::BookingAccepted,
            "Accepted",
            "Your worker accepted.",
            None,
            ts,
        ));
        sink.notify(Notification::new(
            worker,
            NotificationKind::Reminder,
            "Upcoming job",
            "Job in one hour.",
            None,
            ts,
        ));

        assert_eq!(sink.sent().len(), 2);
        assert_eq!(sink.sent_to(customer).len(), 1);
        assert_eq!(sink.sent_to(worker).len(), 1);
    }

    #[test]
    fn test_notification_serde_roundtrip() {
        let n = Notification::new(
            Recipient::Worker(WorkerId::new()),
            NotificationKind::BookingExpired,
            "Assignment expired",
            "The response window lapsed.",
            Some(BookingId::new()),
            Timestamp::now(),
        );
        let json = serde_json::to_string(&n).unwrap();
        let back: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(back.recipient, n.recipient);
        assert_eq!(back.kind, n.kind);
        assert_eq!(back.booking_id, n.booking_id);
        assert!(!back.is_read);
    }

    #[test]
    fn test_tracing_sink_accepts_without_panicking() {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt().with_test_writer().finish(),
        );
        TracingSink.notify(Notification::new(
            Recipient::Admin(AdminId::new()),
            NotificationKind::BookingCreated,
            "Booking awaiting verification",
            "New booking needs triage.",
            None,
            Timestamp::now(),
        ));
    }
}
