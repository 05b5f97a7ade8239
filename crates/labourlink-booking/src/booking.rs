//! # The Booking Aggregate
//!
//! One requested job between a customer and (eventually) a worker. All
//! state-changing operations live here; the engine crate wraps them with
//! the compare-and-swap store discipline and notification fan-out.
//!
//! ## Invariants (enforced at every transition)
//!
//! - A worker must be assigned before the booking can reach `ACCEPTED`,
//!   `IN_PROGRESS`, or `COMPLETED`.
//! - `contact_details_shared == true` implies an assigned worker:
//!   disclosure is only set by admin verification (which requires a
//!   selected worker) and by direct assignment.
//! - An `EXPIRED` booking has no `worker_response_time` — expiry and
//!   response are mutually exclusive terminal causes.
//! - Terminal bookings reject every further transition.
//!
//! ## Time
//!
//! Every operation takes `now` from the caller. `updated_at` moves on
//! every mutation; the transition log records each status change with
//! its actor.

use serde::{Deserialize, Serialize};

use labourlink_core::{
    Address, AdminId, BookingId, Coordinates, CustomerId, Money, Timestamp, WorkerId,
};

use crate::error::BookingError;
use crate::location::{Party, PartyLocation};
use crate::photo::{CompletionPhotos, PhotoMetadata};
use crate::status::BookingStatus;
use crate::verification::VerificationRecord;

// ─── Actors ──────────────────────────────────────────────────────────

/// The party responsible for a transition, recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "role", content = "id")]
pub enum Actor {
    /// The booking's customer.
    Customer(CustomerId),
    /// The assigned worker.
    Worker(WorkerId),
    /// A verifying admin.
    Admin(AdminId),
    /// The timer sweep.
    Scheduler,
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer(id) => write!(f, "{id}"),
            Self::Worker(id) => write!(f, "{id}"),
            Self::Admin(id) => write!(f, "{id}"),
            Self::Scheduler => f.write_str("scheduler"),
        }
    }
}

/// A worker's decision on an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerDecision {
    /// Take the job.
    Accept,
    /// Decline the job.
    Reject,
}

// ─── Reminders ───────────────────────────────────────────────────────

/// One-shot reminder flags, each settable exactly once per booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReminderFlags {
    /// The one-hour-before reminder has been sent.
    pub one_hour: bool,
    /// The thirty-minutes-before reminder has been sent.
    pub thirty_min: bool,
}

/// Which reminder a sweep is attempting to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// One hour before the scheduled date.
    OneHour,
    /// Thirty minutes before the scheduled date.
    ThirtyMin,
}

impl std::fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::OneHour => "one_hour",
            Self::ThirtyMin => "thirty_min",
        })
    }
}

// ─── Transition Log ──────────────────────────────────────────────────

/// Record of a single status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Status before the transition.
    pub from_status: BookingStatus,
    /// Status after the transition.
    pub to_status: BookingStatus,
    /// When the transition occurred.
    pub at: Timestamp,
    /// Who drove the transition.
    pub actor: Actor,
    /// Human-readable reason, if one was supplied.
    pub reason: Option<String>,
}

// ─── Creation Request ────────────────────────────────────────────────

/// Input to booking creation, validated before any state exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    /// The requesting customer.
    pub customer_id: CustomerId,
    /// Short task label (e.g. "deep cleaning").
    pub task: String,
    /// Long-form description of the work.
    pub description: String,
    /// When the work should happen. Not validated against the current
    /// time at creation.
    pub scheduled_date: Timestamp,
    /// Estimated duration in whole hours, must be positive.
    pub estimated_duration_hours: i64,
    /// Service address, if the customer provided one up front.
    pub address: Option<Address>,
}

// ─── The Aggregate ───────────────────────────────────────────────────

/// The booking aggregate root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,
    /// The requesting customer. Immutable after creation.
    pub customer_id: CustomerId,
    /// The assigned worker, if any. Re-settable only while the booking
    /// is in admin triage; each re-selection discards the prior one.
    pub worker_id: Option<WorkerId>,
    /// Short task label.
    pub task: String,
    /// Long-form description of the work.
    pub description: String,
    /// When the work is scheduled to happen.
    pub scheduled_date: Timestamp,
    /// Estimated duration in whole hours.
    pub estimated_duration_hours: i64,
    /// Derived as `worker.hourly_rate * estimated_duration_hours` by the
    /// caller at selection/assignment time; not recomputed here.
    pub total_amount: Money,
    /// Current lifecycle status.
    pub status: BookingStatus,
    /// Whether each party may see the counterpart's contact details.
    pub contact_details_shared: bool,
    /// When the booking was created.
    pub created_at: Timestamp,
    /// Moves on every mutation.
    pub updated_at: Timestamp,
    /// Absolute deadline for the worker response; set when the booking
    /// enters `WORKER_ASSIGNED`.
    pub response_deadline: Option<Timestamp>,
    /// When the worker accepted or rejected. Set exactly once.
    pub worker_response_time: Option<Timestamp>,
    /// One-shot reminder bookkeeping.
    pub reminders_sent: ReminderFlags,
    /// The customer's location state.
    pub customer_location: PartyLocation,
    /// The worker's location state.
    pub worker_location: PartyLocation,
    /// The admin verification record, once a verification pass ran.
    pub verification: Option<VerificationRecord>,
    /// Optional before/after photo artifacts.
    pub photos: CompletionPhotos,
    /// Ordered log of all status changes.
    pub transitions: Vec<TransitionRecord>,
}

impl Booking {
    /// Create a booking awaiting admin triage (`PENDING_ADMIN`).
    ///
    /// No deadline, no disclosure; the total amount stays zero until an
    /// admin selects a worker.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if a required text field is
    /// empty or the duration is not positive.
    pub fn create(request: CreateBooking, now: Timestamp) -> Result<Self, BookingError> {
        Self::validate(&request)?;
        Ok(Self::base(request, Money::ZERO, now))
    }

    /// Create a booking directly assigned to a specific worker,
    /// bypassing admin triage.
    ///
    /// Starts in `WORKER_ASSIGNED` with contact details disclosed, live
    /// sharing enabled for both parties, and the response deadline set
    /// to `now + response_window_minutes`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] on malformed input.
    pub fn create_direct(
        request: CreateBooking,
        worker_id: WorkerId,
        total_amount: Money,
        response_window_minutes: i64,
        now: Timestamp,
    ) -> Result<Self, BookingError> {
        Self::validate(&request)?;
        let mut booking = Self::base(request, total_amount, now);
        booking.worker_id = Some(worker_id);
        booking.status = BookingStatus::WorkerAssigned;
        booking.contact_details_shared = true;
        booking.response_deadline = Some(now.plus_minutes(response_window_minutes));
        booking.customer_location.enable_sharing();
        booking.worker_location.enable_sharing();
        Ok(booking)
    }

    fn validate(request: &CreateBooking) -> Result<(), BookingError> {
        if request.task.trim().is_empty() {
            return Err(BookingError::Validation("task must not be empty".into()));
        }
        if request.description.trim().is_empty() {
            return Err(BookingError::Validation(
                "description must not be empty".into(),
            ));
        }
        if request.estimated_duration_hours <= 0 {
            return Err(BookingError::Validation(format!(
                "estimated duration must be positive, got {}",
                request.estimated_duration_hours
            )));
        }
        Ok(())
    }

    fn base(request: CreateBooking, total_amount: Money, now: Timestamp) -> Self {
        let customer_location = match request.address {
            Some(address) => PartyLocation::with_address(address),
            None => PartyLocation::default(),
        };
        Self {
            id: BookingId::new(),
            customer_id: request.customer_id,
            worker_id: None,
            task: request.task,
            description: request.description,
            scheduled_date: request.scheduled_date,
            estimated_duration_hours: request.estimated_duration_hours,
            total_amount,
            status: BookingStatus::PendingAdmin,
            contact_details_shared: false,
            created_at: now,
            updated_at: now,
            response_deadline: None,
            worker_response_time: None,
            reminders_sent: ReminderFlags::default(),
            customer_location,
            worker_location: PartyLocation::default(),
            verification: None,
            photos: CompletionPhotos::default(),
            transitions: Vec::new(),
        }
    }

    // ─── Admin Operations ────────────────────────────────────────────

    /// Select (or re-select) the worker during admin triage.
    ///
    /// Repeatable while the booking is `PENDING_ADMIN`; each call
    /// overwrites the prior selection and its derived amount. No history
    /// of prior selections is kept.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Precondition`] outside `PENDING_ADMIN`.
    pub fn select_worker(
        &mut self,
        worker_id: WorkerId,
        total_amount: Money,
        now: Timestamp,
    ) -> Result<(), BookingError> {
        if self.status != BookingStatus::PendingAdmin {
            return Err(BookingError::Precondition {
                operation: "select_worker",
                reason: format!("status is {}, expected PENDING_ADMIN", self.status),
            });
        }
        self.worker_id = Some(worker_id);
        self.total_amount = total_amount;
        self.updated_at = now;
        Ok(())
    }

    /// Verify both parties and disclose contact details
    /// (`PENDING_ADMIN` → `ADMIN_VERIFIED`).
    ///
    /// Requires a previously selected worker. Writes the verification
    /// record (a re-verification would overwrite it, not append) and
    /// enables live-location sharing for both parties.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Precondition`] if no worker has been
    /// selected, or a transition error outside `PENDING_ADMIN`.
    pub fn admin_verify(
        &mut self,
        admin_id: AdminId,
        customer_verified: bool,
        worker_verified: bool,
        call_notes: Option<String>,
        now: Timestamp,
    ) -> Result<(), BookingError> {
        self.require_status(BookingStatus::PendingAdmin, BookingStatus::AdminVerified)?;
        if self.worker_id.is_none() {
            return Err(BookingError::Precondition {
                operation: "admin_verify",
                reason: "no worker has been selected".into(),
            });
        }
        self.verification = Some(VerificationRecord::new(
            admin_id,
            customer_verified,
            worker_verified,
            call_notes,
            now,
        ));
        self.contact_details_shared = true;
        self.customer_location.enable_sharing();
        self.worker_location.enable_sharing();
        self.do_transition(
            BookingStatus::AdminVerified,
            Actor::Admin(admin_id),
            Some("verified by admin, contact details disclosed".to_string()),
            now,
        );
        Ok(())
    }

    /// Reject the booking during triage (`PENDING_ADMIN` → `REJECTED`).
    ///
    /// Disclosure stays false.
    ///
    /// # Errors
    ///
    /// Returns a transition error outside `PENDING_ADMIN`.
    pub fn admin_reject(
        &mut self,
        admin_id: AdminId,
        notes: Option<String>,
        now: Timestamp,
    ) -> Result<(), BookingError> {
        self.require_status(BookingStatus::PendingAdmin, BookingStatus::Rejected)?;
        self.do_transition(BookingStatus::Rejected, Actor::Admin(admin_id), notes, now);
        Ok(())
    }

    /// Hand the verified booking to the selected worker
    /// (`ADMIN_VERIFIED` → `WORKER_ASSIGNED`), starting the response
    /// window.
    ///
    /// # Errors
    ///
    /// Returns a transition error outside `ADMIN_VERIFIED`.
    pub fn dispatch(
        &mut self,
        admin_id: AdminId,
        response_window_minutes: i64,
        now: Timestamp,
    ) -> Result<(), BookingError> {
        self.require_status(BookingStatus::AdminVerified, BookingStatus::WorkerAssigned)?;
        if self.worker_id.is_none() {
            return Err(BookingError::Precondition {
                operation: "dispatch",
                reason: "no worker has been selected".into(),
            });
        }
        self.response_deadline = Some(now.plus_minutes(response_window_minutes));
        self.do_transition(
            BookingStatus::WorkerAssigned,
            Actor::Admin(admin_id),
            Some("assigned to worker, response window started".to_string()),
            now,
        );
        Ok(())
    }

    // ─── Worker Operations ───────────────────────────────────────────

    /// Accept or reject the assignment before the deadline
    /// (`WORKER_ASSIGNED` → `ACCEPTED` | `REJECTED`).
    ///
    /// # Errors
    ///
    /// - [`BookingError::DeadlineExceeded`] at or after the deadline —
    ///   the decision is not applied; callers should treat the booking
    ///   as already expired.
    /// - [`BookingError::NotParticipant`] if `worker_id` is not the
    ///   assigned worker.
    /// - A transition error outside `WORKER_ASSIGNED`.
    pub fn worker_respond(
        &mut self,
        worker_id: WorkerId,
        decision: WorkerDecision,
        now: Timestamp,
    ) -> Result<(), BookingError> {
        let target = match decision {
            WorkerDecision::Accept => BookingStatus::Accepted,
            WorkerDecision::Reject => BookingStatus::Rejected,
        };
        self.require_status(BookingStatus::WorkerAssigned, target)?;
        self.require_assigned_worker("worker_respond", worker_id)?;
        let deadline = self.response_deadline.ok_or(BookingError::Precondition {
            operation: "worker_respond",
            reason: "no response deadline is set".into(),
        })?;
        if now >= deadline {
            return Err(BookingError::DeadlineExceeded {
                deadline,
                attempted: now,
            });
        }
        self.worker_response_time = Some(now);
        let reason = match decision {
            WorkerDecision::Accept => "accepted by worker",
            WorkerDecision::Reject => "rejected by worker",
        };
        self.do_transition(target, Actor::Worker(worker_id), Some(reason.to_string()), now);
        Ok(())
    }

    /// Start the job (`ACCEPTED` → `IN_PROGRESS`).
    ///
    /// # Errors
    ///
    /// Returns a transition error outside `ACCEPTED`, or
    /// [`BookingError::NotParticipant`] for the wrong worker.
    pub fn start_work(&mut self, worker_id: WorkerId, now: Timestamp) -> Result<(), BookingError> {
        self.require_status(BookingStatus::Accepted, BookingStatus::InProgress)?;
        self.require_assigned_worker("start_work", worker_id)?;
        self.do_transition(
            BookingStatus::InProgress,
            Actor::Worker(worker_id),
            Some("work started".to_string()),
            now,
        );
        Ok(())
    }

    /// Mark the job complete (`ACCEPTED` | `IN_PROGRESS` → `COMPLETED`),
    /// optionally attaching an after-photo. No further transitions are
    /// possible afterward.
    ///
    /// # Errors
    ///
    /// Returns a transition error from any other status, or
    /// [`BookingError::NotParticipant`] for the wrong worker.
    pub fn complete(
        &mut self,
        worker_id: WorkerId,
        after_photo: Option<PhotoMetadata>,
        now: Timestamp,
    ) -> Result<(), BookingError> {
        if self.status.is_terminal() {
            return Err(BookingError::Terminal {
                status: self.status.to_string(),
            });
        }
        if !matches!(
            self.status,
            BookingStatus::Accepted | BookingStatus::InProgress
        ) {
            return Err(BookingError::InvalidTransition {
                from: self.status.to_string(),
                to: BookingStatus::Completed.to_string(),
            });
        }
        self.require_assigned_worker("complete", worker_id)?;
        if let Some(photo) = after_photo {
            self.photos.after = Some(photo);
        }
        self.do_transition(
            BookingStatus::Completed,
            Actor::Worker(worker_id),
            Some("work completed".to_string()),
            now,
        );
        Ok(())
    }

    /// Attach a before-photo. Purely additive; no status precondition
    /// beyond the booking not being terminal.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Terminal`] on a terminal booking or
    /// [`BookingError::NotParticipant`] for the wrong worker.
    pub fn attach_before_photo(
        &mut self,
        worker_id: WorkerId,
        photo: PhotoMetadata,
        now: Timestamp,
    ) -> Result<(), BookingError> {
        if self.status.is_terminal() {
            return Err(BookingError::Terminal {
                status: self.status.to_string(),
            });
        }
        self.require_assigned_worker("attach_before_photo", worker_id)?;
        self.photos.before = Some(photo);
        self.updated_at = now;
        Ok(())
    }

    // ─── Cancellation ────────────────────────────────────────────────

    /// Cancel the booking on behalf of one party (→ `CANCELLED`).
    ///
    /// Permitted while the status is in the cancellable set
    /// (`ADMIN_VERIFIED`, `WORKER_ASSIGNED`, `ACCEPTED`, `IN_PROGRESS`)
    /// or once contact details have been disclosed. Disables
    /// live-location sharing for both parties.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Terminal`] on a terminal booking,
    /// [`BookingError::NotParticipant`] if a worker cancels a booking
    /// with no assigned worker, or [`BookingError::Precondition`] when
    /// the status does not permit cancellation.
    pub fn cancel(&mut self, by: Party, now: Timestamp) -> Result<(), BookingError> {
        if self.status.is_terminal() {
            return Err(BookingError::Terminal {
                status: self.status.to_string(),
            });
        }
        if !self.status.is_cancellable() && !self.contact_details_shared {
            return Err(BookingError::Precondition {
                operation: "cancel",
                reason: format!("status {} does not permit cancellation", self.status),
            });
        }
        let actor = match by {
            Party::Customer => Actor::Customer(self.customer_id),
            Party::Worker => {
                let worker_id = self.worker_id.ok_or(BookingError::NotParticipant {
                    operation: "cancel",
                    actor: "worker".to_string(),
                })?;
                Actor::Worker(worker_id)
            }
        };
        self.customer_location.disable_sharing();
        self.worker_location.disable_sharing();
        self.do_transition(
            BookingStatus::Cancelled,
            actor,
            Some(format!("cancelled by {by}")),
            now,
        );
        Ok(())
    }

    // ─── Scheduler Operations ────────────────────────────────────────

    /// Expire the booking if the response window has lapsed with no
    /// worker response. Idempotent: returns `false` (no error) when the
    /// booking is not eligible, so repeated sweeps are no-ops.
    pub fn expire_if_overdue(&mut self, now: Timestamp) -> bool {
        if self.status != BookingStatus::WorkerAssigned || self.worker_response_time.is_some() {
            return false;
        }
        match self.response_deadline {
            Some(deadline) if deadline < now => {
                self.do_transition(
                    BookingStatus::Expired,
                    Actor::Scheduler,
                    Some("response window elapsed with no worker response".to_string()),
                    now,
                );
                true
            }
            _ => false,
        }
    }

    /// Whether a reminder of the given kind is due at `now`.
    ///
    /// Reminders compare against `scheduled_date` (not the response
    /// deadline) and only fire while the status is exactly `ACCEPTED`.
    pub fn reminder_due(&self, kind: ReminderKind, offset_minutes: i64, now: Timestamp) -> bool {
        if self.status != BookingStatus::Accepted || self.reminder_sent(kind) {
            return false;
        }
        now >= self.scheduled_date.minus_minutes(offset_minutes)
    }

    /// Set a reminder flag, exactly once. Returns `false` if the flag
    /// was already set or the status is no longer `ACCEPTED`.
    pub fn mark_reminder_sent(&mut self, kind: ReminderKind, now: Timestamp) -> bool {
        if self.status != BookingStatus::Accepted || self.reminder_sent(kind) {
            return false;
        }
        match kind {
            ReminderKind::OneHour => self.reminders_sent.one_hour = true,
            ReminderKind::ThirtyMin => self.reminders_sent.thirty_min = true,
        }
        self.updated_at = now;
        true
    }

    fn reminder_sent(&self, kind: ReminderKind) -> bool {
        match kind {
            ReminderKind::OneHour => self.reminders_sent.one_hour,
            ReminderKind::ThirtyMin => self.reminders_sent.thirty_min,
        }
    }

    // ─── Location ────────────────────────────────────────────────────

    /// Record a live-location fix for one party.
    ///
    /// No status precondition beyond sharing being enabled for that
    /// party.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Precondition`] if sharing is disabled for
    /// the party.
    pub fn update_live_location(
        &mut self,
        party: Party,
        coordinates: Coordinates,
        address: Option<Address>,
        now: Timestamp,
    ) -> Result<(), BookingError> {
        let location = match party {
            Party::Customer => &mut self.customer_location,
            Party::Worker => &mut self.worker_location,
        };
        if !location.sharing_enabled {
            return Err(BookingError::Precondition {
                operation: "update_live_location",
                reason: format!("live-location sharing is not enabled for {party}"),
            });
        }
        location.record_fix(coordinates, address, now);
        self.updated_at = now;
        Ok(())
    }

    // ─── Accessors ───────────────────────────────────────────────────

    /// Whether the booking is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// One party's location state.
    pub fn location(&self, party: Party) -> &PartyLocation {
        match party {
            Party::Customer => &self.customer_location,
            Party::Worker => &self.worker_location,
        }
    }

    // ─── Internals ───────────────────────────────────────────────────

    /// Validate that the booking is in the expected status.
    fn require_status(
        &self,
        expected: BookingStatus,
        target: BookingStatus,
    ) -> Result<(), BookingError> {
        if self.status.is_terminal() {
            return Err(BookingError::Terminal {
                status: self.status.to_string(),
            });
        }
        if self.status != expected {
            return Err(BookingError::InvalidTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }

    fn require_assigned_worker(
        &self,
        operation: &'static str,
        worker_id: WorkerId,
    ) -> Result<(), BookingError> {
        if self.worker_id != Some(worker_id) {
            return Err(BookingError::NotParticipant {
                operation,
                actor: worker_id.to_string(),
            });
        }
        Ok(())
    }

    /// Record a status change.
    fn do_transition(
        &mut self,
        to: BookingStatus,
        actor: Actor,
        reason: Option<String>,
        now: Timestamp,
    ) {
        self.transitions.push(TransitionRecord {
            from_status: self.status,
            to_status: to,
            at: now,
            actor,
            reason,
        });
        self.status = to;
        self.updated_at = now;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
