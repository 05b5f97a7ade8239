//! # The Booking Service
//!
//! The operation surface of the booking core. Every mutation follows the
//! same discipline: snapshot the booking with its version, apply the
//! aggregate operation, then write back conditionally. The winner of a
//! race commits; the loser gets [`EngineError::Conflict`] and nothing is
//! half-applied.
//!
//! Notification fan-out happens after the commit and never affects its
//! outcome. Booking totals are derived here, once, from the worker's
//! hourly rate — the aggregate stores the result and never recomputes it.

use serde::{Deserialize, Serialize};

use labourlink_accounts::{AccountDirectory, Review, Worker};
use labourlink_booking::{
    Booking, BookingError, BookingStatus, CreateBooking, Party, PhotoMetadata, ReminderKind,
    WorkerDecision,
};
use labourlink_core::{
    Address, AdminId, BookingId, Clock, Coordinates, CustomerId, Timestamp, WorkerId,
};

use crate::error::EngineError;
use crate::notify::{Notification, NotificationKind, NotificationSink, Recipient};
use crate::store::{BookingStore, Version};

// ─── Policy ──────────────────────────────────────────────────────────

/// Tunable booking policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BookingPolicy {
    /// Minutes a worker has to accept or reject an assignment.
    #[serde(default = "default_response_window")]
    pub response_window_minutes: i64,
}

fn default_response_window() -> i64 {
    15
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            response_window_minutes: default_response_window(),
        }
    }
}

// ─── Disclosure View ─────────────────────────────────────────────────

/// The counterpart's contact details, visible only after disclosure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCard {
    /// Display name.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
}

// ─── The Service ─────────────────────────────────────────────────────

/// Server-owned booking operations over a compare-and-swap store.
pub struct BookingService<S, D, N, C> {
    store: S,
    directory: D,
    sink: N,
    clock: C,
    policy: BookingPolicy,
}

impl<S, D, N, C> BookingService<S, D, N, C>
where
    S: BookingStore,
    D: AccountDirectory,
    N: NotificationSink,
    C: Clock,
{
    /// Assemble a service from its collaborators.
    pub fn new(store: S, directory: D, sink: N, clock: C, policy: BookingPolicy) -> Self {
        Self {
            store,
            directory,
            sink,
            clock,
            policy,
        }
    }

    /// The active policy.
    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    /// Current time from the injected clock, for callers that must
    /// share one reading across a batch of operations.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // ─── Creation ────────────────────────────────────────────────────

    /// Create a booking. With a `worker_id` this is the direct-assignment
    /// shortcut: the booking starts in `WORKER_ASSIGNED` with contact
    /// details disclosed and the response window running. Without one it
    /// starts in `PENDING_ADMIN` and every admin is notified.
    ///
    /// # Errors
    ///
    /// Validation failures from the aggregate, an unknown customer or
    /// worker, or a worker that is not bookable.
    pub fn create(
        &self,
        request: CreateBooking,
        worker_id: Option<WorkerId>,
    ) -> Result<Booking, EngineError> {
        let now = self.clock.now();
        if self.directory.customer(request.customer_id).is_none() {
            return Err(EngineError::UnknownAccount(request.customer_id.to_string()));
        }

        let booking = match worker_id {
            Some(worker_id) => {
                let worker = self.bookable_worker(worker_id, "create")?;
                let total = worker
                    .hourly_rate
                    .checked_mul(request.estimated_duration_hours)?;
                Booking::create_direct(
                    request,
                    worker_id,
                    total,
                    self.policy.response_window_minutes,
                    now,
                )?
            }
            None => Booking::create(request, now)?,
        };

        self.store.insert(booking.clone())?;
        tracing::info!(booking = %booking.id, status = %booking.status, "booking created");

        match booking.worker_id {
            Some(worker_id) => self.send(
                Recipient::Worker(worker_id),
                NotificationKind::WorkerAssigned,
                "New direct booking",
                format!(
                    "You have been booked for \"{}\". Respond before {}.",
                    booking.task,
                    booking
                        .response_deadline
                        .map(|d| d.to_string())
                        .unwrap_or_default()
                ),
                Some(booking.id),
                now,
            ),
            None => {
                for admin_id in self.directory.admin_ids() {
                    self.send(
                        Recipient::Admin(admin_id),
                        NotificationKind::BookingCreated,
                        "Booking awaiting verification",
                        format!("New booking \"{}\" needs triage.", booking.task),
                        Some(booking.id),
                        now,
                    );
                }
            }
        }
        Ok(booking)
    }

    // ─── Admin Triage ────────────────────────────────────────────────

    /// Select (or re-select) a worker for a pending booking, deriving
    /// the total from the worker's hourly rate. Repeatable while the
    /// booking stays `PENDING_ADMIN`; each call discards the prior
    /// selection.
    pub fn select_worker(
        &self,
        booking_id: BookingId,
        worker_id: WorkerId,
    ) -> Result<Booking, EngineError> {
        let now = self.clock.now();
        let worker = self.bookable_worker(worker_id, "select_worker")?;
        let (mut booking, version) = self.store.get(booking_id)?;
        let total = worker
            .hourly_rate
            .checked_mul(booking.estimated_duration_hours)?;
        booking.select_worker(worker_id, total, now)?;
        self.commit(version, booking)
    }

    /// Verify both parties and disclose contact details
    /// (`PENDING_ADMIN` → `ADMIN_VERIFIED`). Notifies both parties.
    pub fn admin_verify(
        &self,
        booking_id: BookingId,
        admin_id: AdminId,
        customer_verified: bool,
        worker_verified: bool,
        call_notes: Option<String>,
    ) -> Result<Booking, EngineError> {
        let now = self.clock.now();
        let (mut booking, version) = self.store.get(booking_id)?;
        booking.admin_verify(admin_id, customer_verified, worker_verified, call_notes, now)?;
        let booking = self.commit(version, booking)?;

        self.send(
            Recipient::Customer(booking.customer_id),
            NotificationKind::BookingVerified,
            "Booking verified",
            format!(
                "Your booking \"{}\" was verified. Contact details are now shared.",
                booking.task
            ),
            Some(booking.id),
            now,
        );
        if let Some(worker_id) = booking.worker_id {
            self.send(
                Recipient::Worker(worker_id),
                NotificationKind::BookingVerified,
                "Booking verified",
                format!(
                    "Booking \"{}\" was verified. Contact details are now shared.",
                    booking.task
                ),
                Some(booking.id),
                now,
            );
        }
        Ok(booking)
    }

    /// Reject a pending booking (`PENDING_ADMIN` → `REJECTED`).
    /// Disclosure stays false; the customer — and the selected worker,
    /// if any — receive the rejection reason.
    pub fn admin_reject(
        &self,
        booking_id: BookingId,
        admin_id: AdminId,
        notes: Option<String>,
    ) -> Result<Booking, EngineError> {
        let now = self.clock.now();
        let (mut booking, version) = self.store.get(booking_id)?;
        let reason = notes.clone().unwrap_or_else(|| "not approved".to_string());
        booking.admin_reject(admin_id, notes, now)?;
        let booking = self.commit(version, booking)?;

        self.send(
            Recipient::Customer(booking.customer_id),
            NotificationKind::BookingRejected,
            "Booking rejected",
            format!("Your booking \"{}\" was rejected: {reason}", booking.task),
            Some(booking.id),
            now,
        );
        if let Some(worker_id) = booking.worker_id {
            self.send(
                Recipient::Worker(worker_id),
                NotificationKind::BookingRejected,
                "Booking rejected",
                format!("Booking \"{}\" was rejected: {reason}", booking.task),
                Some(booking.id),
                now,
            );
        }
        Ok(booking)
    }

    /// Hand the verified booking to the selected worker
    /// (`ADMIN_VERIFIED` → `WORKER_ASSIGNED`), starting the response
    /// window and notifying the worker.
    pub fn dispatch(
        &self,
        booking_id: BookingId,
        admin_id: AdminId,
    ) -> Result<Booking, EngineError> {
        let now = self.clock.now();
        let (mut booking, version) = self.store.get(booking_id)?;
        booking.dispatch(admin_id, self.policy.response_window_minutes, now)?;
        let booking = self.commit(version, booking)?;

        if let Some(worker_id) = booking.worker_id {
            self.send(
                Recipient::Worker(worker_id),
                NotificationKind::WorkerAssigned,
                "New assignment",
                format!(
                    "You have been assigned \"{}\". Respond before {}.",
                    booking.task,
                    booking
                        .response_deadline
                        .map(|d| d.to_string())
                        .unwrap_or_default()
                ),
                Some(booking.id),
                now,
            );
        }
        Ok(booking)
    }

    // ─── Worker Operations ───────────────────────────────────────────

    /// Worker accepts or rejects the assignment before the deadline.
    /// The customer is notified either way.
    pub fn worker_respond(
        &self,
        booking_id: BookingId,
        worker_id: WorkerId,
        decision: WorkerDecision,
    ) -> Result<Booking, EngineError> {
        let now = self.clock.now();
        let (mut booking, version) = self.store.get(booking_id)?;
        booking.worker_respond(worker_id, decision, now)?;
        let booking = self.commit(version, booking)?;

        let (kind, title, message) = match decision {
            WorkerDecision::Accept => (
                NotificationKind::BookingAccepted,
                "Worker accepted",
                format!("Your worker accepted \"{}\".", booking.task),
            ),
            WorkerDecision::Reject => (
                NotificationKind::BookingRejected,
                "Worker declined",
                format!("The worker declined \"{}\".", booking.task),
            ),
        };
        self.send(
            Recipient::Customer(booking.customer_id),
            kind,
            title,
            message,
            Some(booking.id),
            now,
        );
        Ok(booking)
    }

    /// Worker starts the job (`ACCEPTED` → `IN_PROGRESS`).
    pub fn start_work(
        &self,
        booking_id: BookingId,
        worker_id: WorkerId,
    ) -> Result<Booking, EngineError> {
        let now = self.clock.now();
        let (mut booking, version) = self.store.get(booking_id)?;
        booking.start_work(worker_id, now)?;
        self.commit(version, booking)
    }

    /// Worker marks the job complete, optionally attaching an
    /// after-photo. The customer is notified.
    pub fn complete(
        &self,
        booking_id: BookingId,
        worker_id: WorkerId,
        after_photo: Option<PhotoMetadata>,
    ) -> Result<Booking, EngineError> {
        let now = self.clock.now();
        let (mut booking, version) = self.store.get(booking_id)?;
        booking.complete(worker_id, after_photo, now)?;
        let booking = self.commit(version, booking)?;

        self.send(
            Recipient::Customer(booking.customer_id),
            NotificationKind::BookingCompleted,
            "Job completed",
            format!("\"{}\" was marked complete.", booking.task),
            Some(booking.id),
            now,
        );
        Ok(booking)
    }

    /// Attach a before-photo to a live booking.
    pub fn attach_before_photo(
        &self,
        booking_id: BookingId,
        worker_id: WorkerId,
        photo: PhotoMetadata,
    ) -> Result<Booking, EngineError> {
        let now = self.clock.now();
        let (mut booking, version) = self.store.get(booking_id)?;
        booking.attach_before_photo(worker_id, photo, now)?;
        self.commit(version, booking)
    }

    // ─── Cancellation ────────────────────────────────────────────────

    /// Cancel on behalf of one party. The counterpart receives an
    /// actor-attributed notice.
    pub fn cancel(&self, booking_id: BookingId, by: Party) -> Result<Booking, EngineError> {
        let now = self.clock.now();
        let (mut booking, version) = self.store.get(booking_id)?;
        booking.cancel(by, now)?;
        let booking = self.commit(version, booking)?;

        let message = format!("\"{}\" was cancelled by {by}.", booking.task);
        match by {
            Party::Customer => {
                if let Some(worker_id) = booking.worker_id {
                    self.send(
                        Recipient::Worker(worker_id),
                        NotificationKind::BookingCancelled,
                        "Booking cancelled",
                        message,
                        Some(booking.id),
                        now,
                    );
                }
            }
            Party::Worker => self.send(
                Recipient::Customer(booking.customer_id),
                NotificationKind::BookingCancelled,
                "Booking cancelled",
                message,
                Some(booking.id),
                now,
            ),
        }
        Ok(booking)
    }

    // ─── Location ────────────────────────────────────────────────────

    /// Record a live-location fix for one party.
    pub fn update_live_location(
        &self,
        booking_id: BookingId,
        party: Party,
        coordinates: Coordinates,
        address: Option<Address>,
    ) -> Result<Booking, EngineError> {
        let now = self.clock.now();
        let (mut booking, version) = self.store.get(booking_id)?;
        booking.update_live_location(party, coordinates, address, now)?;
        self.commit(version, booking)
    }

    // ─── Scheduler Entry Points ──────────────────────────────────────

    /// Expire the booking if its response window lapsed unanswered.
    /// Idempotent; returns whether a transition happened. `now` is the
    /// sweep's single consistent clock read.
    pub fn expire_overdue(
        &self,
        booking_id: BookingId,
        now: Timestamp,
    ) -> Result<bool, EngineError> {
        let (mut booking, version) = self.store.get(booking_id)?;
        if !booking.expire_if_overdue(now) {
            return Ok(false);
        }
        let booking = self.commit(version, booking)?;

        self.send(
            Recipient::Customer(booking.customer_id),
            NotificationKind::BookingExpired,
            "Worker did not respond",
            format!(
                "The worker did not respond to \"{}\" in time. Please rebook.",
                booking.task
            ),
            Some(booking.id),
            now,
        );
        Ok(true)
    }

    /// Send one reminder if it is due, setting its one-shot flag.
    /// Returns whether a reminder went out; a second sweep finding the
    /// flag set is a no-op.
    pub fn send_reminder(
        &self,
        booking_id: BookingId,
        kind: ReminderKind,
        offset_minutes: i64,
        now: Timestamp,
    ) -> Result<bool, EngineError> {
        let (mut booking, version) = self.store.get(booking_id)?;
        if !booking.reminder_due(kind, offset_minutes, now) {
            return Ok(false);
        }
        if !booking.mark_reminder_sent(kind, now) {
            return Ok(false);
        }
        let booking = self.commit(version, booking)?;

        if let Some(worker_id) = booking.worker_id {
            let lead = match kind {
                ReminderKind::OneHour => "in one hour",
                ReminderKind::ThirtyMin => "in thirty minutes",
            };
            self.send(
                Recipient::Worker(worker_id),
                NotificationKind::Reminder,
                "Upcoming job",
                format!(
                    "\"{}\" is scheduled {lead}, at {}.",
                    booking.task, booking.scheduled_date
                ),
                Some(booking.id),
                now,
            );
        }
        Ok(true)
    }

    // ─── Reviews ─────────────────────────────────────────────────────

    /// Append a review for a completed booking's worker. The reviewer
    /// must be that booking's customer, once per booking. Returns the
    /// worker's new mean rating in tenths.
    pub fn append_review(
        &self,
        booking_id: BookingId,
        customer_id: CustomerId,
        rating: u8,
        comment: Option<String>,
    ) -> Result<u16, EngineError> {
        let now = self.clock.now();
        let (booking, _) = self.store.get(booking_id)?;
        if booking.status != BookingStatus::Completed {
            return Err(BookingError::Precondition {
                operation: "append_review",
                reason: format!("booking is {}, expected COMPLETED", booking.status),
            }
            .into());
        }
        if booking.customer_id != customer_id {
            return Err(BookingError::NotParticipant {
                operation: "append_review",
                actor: customer_id.to_string(),
            }
            .into());
        }
        let worker_id = booking.worker_id.ok_or(BookingError::Precondition {
            operation: "append_review",
            reason: "booking has no assigned worker".into(),
        })?;
        let review = Review::new(booking_id, customer_id, rating, comment, now)?;
        let tenths = self.directory.append_review(worker_id, review)?;
        tracing::info!(booking = %booking_id, worker = %worker_id, rating_tenths = tenths, "review appended");
        Ok(tenths)
    }

    // ─── Disclosure ──────────────────────────────────────────────────

    /// The counterpart's contact details, gated on disclosure.
    pub fn contact_card(
        &self,
        booking_id: BookingId,
        viewer: Party,
    ) -> Result<ContactCard, EngineError> {
        let (booking, _) = self.store.get(booking_id)?;
        if !booking.contact_details_shared {
            return Err(BookingError::Precondition {
                operation: "contact_card",
                reason: "contact details have not been disclosed".into(),
            }
            .into());
        }
        match viewer {
            Party::Customer => {
                let worker_id = booking.worker_id.ok_or(BookingError::Precondition {
                    operation: "contact_card",
                    reason: "booking has no assigned worker".into(),
                })?;
                let worker = self
                    .directory
                    .worker(worker_id)
                    .ok_or_else(|| EngineError::UnknownAccount(worker_id.to_string()))?;
                Ok(ContactCard {
                    name: worker.name,
                    phone: worker.phone,
                    email: worker.email,
                })
            }
            Party::Worker => {
                let customer = self
                    .directory
                    .customer(booking.customer_id)
                    .ok_or_else(|| EngineError::UnknownAccount(booking.customer_id.to_string()))?;
                Ok(ContactCard {
                    name: customer.name,
                    phone: customer.phone,
                    email: customer.email,
                })
            }
        }
    }

    // ─── Read Access ─────────────────────────────────────────────────

    /// Snapshot one booking.
    pub fn booking(&self, booking_id: BookingId) -> Result<Booking, EngineError> {
        Ok(self.store.get(booking_id)?.0)
    }

    /// Snapshot every booking, for sweeps and statistics.
    pub fn bookings(&self) -> Vec<Booking> {
        self.store.list().into_iter().map(|(b, _)| b).collect()
    }

    // ─── Internals ───────────────────────────────────────────────────

    fn bookable_worker(
        &self,
        worker_id: WorkerId,
        operation: &'static str,
    ) -> Result<Worker, EngineError> {
        let worker = self
            .directory
            .worker(worker_id)
            .ok_or_else(|| EngineError::UnknownAccount(worker_id.to_string()))?;
        if !worker.is_bookable() {
            return Err(BookingError::Precondition {
                operation,
                reason: format!("{worker_id} is not available or not verified"),
            }
            .into());
        }
        Ok(worker)
    }

    fn commit(&self, expected: Version, booking: Booking) -> Result<Booking, EngineError> {
        self.store.update(booking.id, expected, booking.clone())?;
        tracing::info!(
            booking = %booking.id,
            status = %booking.status,
            version = expected + 1,
            "booking transition committed"
        );
        Ok(booking)
    }

    fn send(
        &self,
        recipient: Recipient,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        booking_id: Option<BookingId>,
        now: Timestamp,
    ) {
        self.sink.notify(Notification::new(
            recipient,
            kind,
            title,
            message,
            booking_id,
            now,
        ));
    }
}
