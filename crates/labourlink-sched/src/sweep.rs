//! One sweep pass over the booking store.

use labourlink_accounts::AccountDirectory;
use labourlink_booking::{BookingStatus, ReminderKind};
use labourlink_core::{Clock, Timestamp};
use labourlink_engine::{BookingService, BookingStore, EngineError, NotificationSink};

use crate::config::SchedulerConfig;

/// What one sweep did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Bookings examined.
    pub scanned: usize,
    /// Bookings moved to `EXPIRED`.
    pub expired: usize,
    /// One-hour reminders sent.
    pub one_hour_reminders: usize,
    /// Thirty-minute reminders sent.
    pub thirty_min_reminders: usize,
    /// Bookings skipped after losing a write race.
    pub conflicts: usize,
}

/// Walk every booking once at a single `now`, expiring lapsed
/// assignments and sending due reminders.
///
/// A booking that loses a write race to a concurrent user action is
/// counted and skipped; the next sweep reconsiders it. Errors on one
/// booking never abort the pass.
pub fn run_sweep<S, D, N, C>(
    service: &BookingService<S, D, N, C>,
    config: &SchedulerConfig,
    now: Timestamp,
) -> SweepOutcome
where
    S: BookingStore,
    D: AccountDirectory,
    N: NotificationSink,
    C: Clock,
{
    let mut outcome = SweepOutcome::default();

    for booking in service.bookings() {
        outcome.scanned += 1;
        match booking.status {
            BookingStatus::WorkerAssigned => {
                match service.expire_overdue(booking.id, now) {
                    Ok(true) => outcome.expired += 1,
                    Ok(false) => {}
                    Err(e) => outcome.absorb(booking_err(booking.id, "expire", e)),
                }
            }
            BookingStatus::Accepted => {
                match service.send_reminder(
                    booking.id,
                    ReminderKind::OneHour,
                    config.one_hour_offset_minutes,
                    now,
                ) {
                    Ok(true) => outcome.one_hour_reminders += 1,
                    Ok(false) => {}
                    Err(e) => outcome.absorb(booking_err(booking.id, "remind-1h", e)),
                }
                match service.send_reminder(
                    booking.id,
                    ReminderKind::ThirtyMin,
                    config.thirty_min_offset_minutes,
                    now,
                ) {
                    Ok(true) => outcome.thirty_min_reminders += 1,
                    Ok(false) => {}
                    Err(e) => outcome.absorb(booking_err(booking.id, "remind-30m", e)),
                }
            }
            _ => {}
        }
    }

    tracing::debug!(
        scanned = outcome.scanned,
        expired = outcome.expired,
        one_hour = outcome.one_hour_reminders,
        thirty_min = outcome.thirty_min_reminders,
        conflicts = outcome.conflicts,
        "sweep pass finished"
    );
    outcome
}

impl SweepOutcome {
    fn absorb(&mut self, conflicted: bool) {
        if conflicted {
            self.conflicts += 1;
        }
    }
}

/// Log a per-booking sweep error. Returns whether it was a write race.
fn booking_err(id: labourlink_core::BookingId, job: &str, err: EngineError) -> bool {
    match err {
        EngineError::Conflict { .. } => {
            tracing::debug!(booking = %id, job, "sweep lost write race, skipping");
            true
        }
        other => {
            tracing::warn!(booking = %id, job, error = %other, "sweep job failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use labourlink_accounts::{Customer, InMemoryDirectory, Worker};
    use labourlink_booking::{CreateBooking, WorkerDecision};
    use labourlink_core::{
        AdminId, BookingId, Clock, CustomerId, ManualClock, Money, Timestamp, WorkerId,
    };
    use labourlink_engine::{
        BookingPolicy, InMemoryBookingStore, InMemorySink, NotificationKind, Recipient,
    };

    use super::*;

    type Service = BookingService<
        Arc<InMemoryBookingStore>,
        Arc<InMemoryDirectory>,
        Arc<InMemorySink>,
        ManualClock,
    >;

    struct Fixture {
        service: Service,
        sink: Arc<InMemorySink>,
        clock: ManualClock,
        customer: CustomerId,
        worker: WorkerId,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryBookingStore::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let sink = Arc::new(InMemorySink::new());
        let clock = ManualClock::new(Timestamp::from_epoch_secs(1_700_000_000).unwrap());

        let customer = CustomerId::new();
        let worker = WorkerId::new();
        directory.upsert_customer(Customer::new(
            customer,
            "Amina",
            "+880171000001",
            "amina@example.com",
        ));
        let mut w = Worker::new(
            worker,
            "Rafiq",
            "plumber",
            "+880171000002",
            "rafiq@example.com",
            Money::from_major(500).unwrap(),
        );
        w.is_verified = true;
        directory.upsert_worker(w);
        directory.add_admin(AdminId::new());

        let service = BookingService::new(
            store,
            directory,
            Arc::clone(&sink),
            clock.clone(),
            BookingPolicy::default(),
        );
        Fixture {
            service,
            sink,
            clock,
            customer,
            worker,
        }
    }

    /// Direct booking, accepted, scheduled `minutes_ahead` from now.
    fn accepted_booking(f: &Fixture, minutes_ahead: i64) -> BookingId {
        let booking = f
            .service
            .create(
                CreateBooking {
                    customer_id: f.customer,
                    task: "fix sink".into(),
                    description: "leaking trap under the kitchen sink".into(),
                    scheduled_date: f.clock.now().plus_minutes(minutes_ahead),
                    estimated_duration_hours: 2,
                    address: None,
                },
                Some(f.worker),
            )
            .unwrap();
        f.service
            .worker_respond(booking.id, f.worker, WorkerDecision::Accept)
            .unwrap();
        booking.id
    }

    fn reminders(f: &Fixture) -> usize {
        f.sink
            .sent_to(Recipient::Worker(f.worker))
            .into_iter()
            .filter(|n| n.kind == NotificationKind::Reminder)
            .count()
    }

    // ── reminders ──

    #[test]
    fn test_reminder_fires_once_at_the_hour_boundary() {
        let f = fixture();
        accepted_booking(&f, 61);
        let cfg = SchedulerConfig::default();

        // Too early: 61 minutes out, the one-hour window has not opened.
        let out = run_sweep(&f.service, &cfg, f.clock.now());
        assert_eq!(out.one_hour_reminders, 0);
        assert_eq!(reminders(&f), 0);

        // One minute later the booking is exactly 60 minutes out.
        f.clock.advance_minutes(1);
        let out = run_sweep(&f.service, &cfg, f.clock.now());
        assert_eq!(out.one_hour_reminders, 1);
        assert_eq!(reminders(&f), 1);

        // Second sweep shortly after must not resend.
        f.clock.advance_secs(5);
        let out = run_sweep(&f.service, &cfg, f.clock.now());
        assert_eq!(out.one_hour_reminders, 0);
        assert_eq!(reminders(&f), 1);
    }

    #[test]
    fn test_both_reminders_over_the_approach() {
        let f = fixture();
        accepted_booking(&f, 90);
        let cfg = SchedulerConfig::default();

        f.clock.advance_minutes(30); // 60 minutes out
        run_sweep(&f.service, &cfg, f.clock.now());
        f.clock.advance_minutes(30); // 30 minutes out
        let out = run_sweep(&f.service, &cfg, f.clock.now());
        assert_eq!(out.thirty_min_reminders, 1);
        assert_eq!(reminders(&f), 2);
    }

    #[test]
    fn test_late_sweep_sends_both_pending_reminders() {
        // A stalled scheduler catching up inside the 30-minute window
        // sends each still-unsent reminder once.
        let f = fixture();
        accepted_booking(&f, 90);
        let cfg = SchedulerConfig::default();

        f.clock.advance_minutes(70); // 20 minutes out, nothing sent yet
        let out = run_sweep(&f.service, &cfg, f.clock.now());
        assert_eq!(out.one_hour_reminders, 1);
        assert_eq!(out.thirty_min_reminders, 1);
        assert_eq!(reminders(&f), 2);
    }

    #[test]
    fn test_no_reminders_after_cancellation() {
        let f = fixture();
        let id = accepted_booking(&f, 61);
        f.service
            .cancel(id, labourlink_booking::Party::Customer)
            .unwrap();

        f.clock.advance_minutes(1);
        let out = run_sweep(&f.service, &SchedulerConfig::default(), f.clock.now());
        assert_eq!(out.one_hour_reminders, 0);
        assert_eq!(reminders(&f), 0);
    }

    // ── expiry ──

    #[test]
    fn test_sweep_expires_unanswered_assignment() {
        let f = fixture();
        let booking = f
            .service
            .create(
                CreateBooking {
                    customer_id: f.customer,
                    task: "fix sink".into(),
                    description: "leaking trap under the kitchen sink".into(),
                    scheduled_date: f.clock.now().plus_minutes(240),
                    estimated_duration_hours: 2,
                    address: None,
                },
                Some(f.worker),
            )
            .unwrap();

        f.clock.advance_minutes(16);
        let out = run_sweep(&f.service, &SchedulerConfig::default(), f.clock.now());
        assert_eq!(out.expired, 1);

        // Repeated sweeps find nothing left to do.
        for _ in 0..100 {
            f.clock.advance_secs(5);
            let out = run_sweep(&f.service, &SchedulerConfig::default(), f.clock.now());
            assert_eq!(out, SweepOutcome { scanned: 1, ..Default::default() });
        }
        let expirations = f
            .sink
            .sent_to(Recipient::Customer(f.customer))
            .into_iter()
            .filter(|n| n.kind == NotificationKind::BookingExpired)
            .count();
        assert_eq!(expirations, 1);
        let _ = booking;
    }
}
