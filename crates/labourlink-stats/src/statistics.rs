//! The statistics aggregator.

use serde::{Deserialize, Serialize};

use labourlink_accounts::{mean_rating_tenths, Review};
use labourlink_booking::{Booking, BookingStatus};
use labourlink_core::{Money, Timestamp, WorkerId};

use crate::month::MonthKey;

/// Number of trailing calendar months in the completion histogram,
/// current month included.
const HISTOGRAM_MONTHS: usize = 6;

/// A worker's performance profile at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStatistics {
    /// The worker this profile describes.
    pub worker_id: WorkerId,
    /// Every booking ever assigned to this worker, regardless of
    /// outcome.
    pub total_tasks_assigned: u64,
    /// Bookings finished successfully.
    pub completed: u64,
    /// Bookings currently accepted or underway.
    pub active: u64,
    /// Bookings cancelled by either party.
    pub cancelled: u64,
    /// Bookings rejected or expired unanswered.
    pub declined: u64,
    /// `round(100 * (active + completed) / assigned)`, 0 when nothing
    /// was ever assigned.
    pub acceptance_rate: u8,
    /// `round(100 * completed / assigned)`, 0 when nothing was ever
    /// assigned.
    pub success_rate: u8,
    /// Sum of `total_amount` over completed bookings.
    pub total_earnings: Money,
    /// Mean review rating in tenths (`43` = 4.3), `None` if unreviewed.
    pub average_rating_tenths: Option<u16>,
    /// Review counts by rating; index 0 holds one-star reviews.
    pub rating_histogram: [u64; 5],
    /// Completions per calendar month over the trailing six months,
    /// oldest first, keyed by the booking's `updated_at` at completion.
    pub monthly_completions: Vec<(MonthKey, u64)>,
}

/// Aggregate one worker's statistics from booking history and that
/// worker's reviews. Pure: nothing is written back.
pub fn compute_statistics(
    worker_id: WorkerId,
    bookings: &[Booking],
    reviews: &[Review],
    now: Timestamp,
) -> WorkerStatistics {
    let mut assigned = 0u64;
    let mut completed = 0u64;
    let mut active = 0u64;
    let mut cancelled = 0u64;
    let mut declined = 0u64;
    let mut earnings = Money::ZERO;

    let mut window: Vec<(MonthKey, u64)> = month_window(now);

    for booking in bookings {
        if booking.worker_id != Some(worker_id) {
            continue;
        }
        assigned += 1;
        match booking.status {
            BookingStatus::Completed => {
                completed += 1;
                earnings = earnings.saturating_add(booking.total_amount);
                let month = MonthKey::of(booking.updated_at);
                if let Some(slot) = window.iter_mut().find(|(key, _)| *key == month) {
                    slot.1 += 1;
                }
            }
            BookingStatus::Accepted | BookingStatus::InProgress => active += 1,
            BookingStatus::Cancelled => cancelled += 1,
            BookingStatus::Rejected | BookingStatus::Expired => declined += 1,
            BookingStatus::PendingAdmin
            | BookingStatus::AdminVerified
            | BookingStatus::WorkerAssigned => {}
        }
    }

    let mut histogram = [0u64; 5];
    let mut ratings = Vec::with_capacity(reviews.len());
    for review in reviews {
        if let Some(bucket) = histogram.get_mut(review.rating as usize - 1) {
            *bucket += 1;
            ratings.push(review.rating);
        }
    }

    WorkerStatistics {
        worker_id,
        total_tasks_assigned: assigned,
        completed,
        active,
        cancelled,
        declined,
        acceptance_rate: rate(active + completed, assigned),
        success_rate: rate(completed, assigned),
        total_earnings: earnings,
        average_rating_tenths: mean_rating_tenths(&ratings),
        rating_histogram: histogram,
        monthly_completions: window,
    }
}

/// Integer percentage with half-up rounding; 0 for an empty base.
fn rate(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((100 * part + whole / 2) / whole) as u8
}

/// The trailing window of month buckets ending at `now`, oldest first.
fn month_window(now: Timestamp) -> Vec<(MonthKey, u64)> {
    let mut keys = Vec::with_capacity(HISTOGRAM_MONTHS);
    let mut key = MonthKey::of(now);
    for _ in 0..HISTOGRAM_MONTHS {
        keys.push((key, 0));
        key = key.previous();
    }
    keys.reverse();
    keys
}

#[cfg(test)]
mod tests {
    use labourlink_booking::{CreateBooking, WorkerDecision};
    use labourlink_core::{BookingId, CustomerId};

    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn assigned(worker: WorkerId, amount: Money, at: Timestamp) -> Booking {
        Booking::create_direct(
            CreateBooking {
                customer_id: CustomerId::new(),
                task: "repair".into(),
                description: "general repair work".into(),
                scheduled_date: at.plus_minutes(120),
                estimated_duration_hours: 2,
                address: None,
            },
            worker,
            amount,
            15,
            at,
        )
        .unwrap()
    }

    fn with_status(worker: WorkerId, status: BookingStatus, at: Timestamp) -> Booking {
        let mut b = assigned(worker, Money::from_major(1000).unwrap(), at);
        match status {
            BookingStatus::WorkerAssigned => {}
            BookingStatus::Accepted => {
                b.worker_respond(worker, WorkerDecision::Accept, at).unwrap();
            }
            BookingStatus::Rejected => {
                b.worker_respond(worker, WorkerDecision::Reject, at).unwrap();
            }
            BookingStatus::Expired => {
                assert!(b.expire_if_overdue(at.plus_minutes(16)));
            }
            BookingStatus::Completed => {
                b.worker_respond(worker, WorkerDecision::Accept, at).unwrap();
                b.complete(worker, None, at).unwrap();
            }
            BookingStatus::Cancelled => {
                b.worker_respond(worker, WorkerDecision::Accept, at).unwrap();
                b.cancel(labourlink_booking::Party::Worker, at).unwrap();
            }
            other => panic!("unsupported test status {other}"),
        }
        b
    }

    fn review(rating: u8, at: Timestamp) -> Review {
        Review::new(BookingId::new(), CustomerId::new(), rating, None, at).unwrap()
    }

    // ── rates ──

    #[test]
    fn test_rates_over_mixed_outcomes() {
        let worker = WorkerId::new();
        let at = ts("2026-08-10T09:00:00Z");
        let bookings = vec![
            with_status(worker, BookingStatus::Completed, at),
            with_status(worker, BookingStatus::Completed, at),
            with_status(worker, BookingStatus::Rejected, at),
            with_status(worker, BookingStatus::Expired, at),
            with_status(worker, BookingStatus::Accepted, at),
        ];

        let stats = compute_statistics(worker, &bookings, &[], at);
        assert_eq!(stats.total_tasks_assigned, 5);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.declined, 2);
        assert_eq!(stats.success_rate, 40);
        assert_eq!(stats.acceptance_rate, 60);
    }

    #[test]
    fn test_empty_history_is_all_zero_not_nan() {
        let stats = compute_statistics(WorkerId::new(), &[], &[], ts("2026-08-10T09:00:00Z"));
        assert_eq!(stats.total_tasks_assigned, 0);
        assert_eq!(stats.acceptance_rate, 0);
        assert_eq!(stats.success_rate, 0);
        assert_eq!(stats.total_earnings, Money::ZERO);
        assert_eq!(stats.average_rating_tenths, None);
    }

    #[test]
    fn test_rate_rounds_half_up() {
        // 1 of 3 → 33.3 → 33; 2 of 3 → 66.7 → 67.
        assert_eq!(rate(1, 3), 33);
        assert_eq!(rate(2, 3), 67);
        assert_eq!(rate(1, 2), 50);
    }

    #[test]
    fn test_other_workers_bookings_excluded() {
        let worker = WorkerId::new();
        let at = ts("2026-08-10T09:00:00Z");
        let bookings = vec![
            with_status(worker, BookingStatus::Completed, at),
            with_status(WorkerId::new(), BookingStatus::Completed, at),
        ];
        let stats = compute_statistics(worker, &bookings, &[], at);
        assert_eq!(stats.total_tasks_assigned, 1);
    }

    // ── earnings ──

    #[test]
    fn test_earnings_sum_completed_only() {
        let worker = WorkerId::new();
        let at = ts("2026-08-10T09:00:00Z");
        let mut paid = assigned(worker, Money::from_major(1500).unwrap(), at);
        paid.worker_respond(worker, WorkerDecision::Accept, at).unwrap();
        paid.complete(worker, None, at).unwrap();
        let bookings = vec![paid, with_status(worker, BookingStatus::Cancelled, at)];

        let stats = compute_statistics(worker, &bookings, &[], at);
        assert_eq!(stats.total_earnings, Money::from_major(1500).unwrap());
    }

    // ── ratings ──

    #[test]
    fn test_rating_mean_and_histogram() {
        let at = ts("2026-08-10T09:00:00Z");
        let reviews = vec![review(5, at), review(4, at), review(4, at), review(1, at)];
        let stats = compute_statistics(WorkerId::new(), &[], &reviews, at);
        // mean 3.5
        assert_eq!(stats.average_rating_tenths, Some(35));
        assert_eq!(stats.rating_histogram, [1, 0, 0, 2, 1]);
    }

    // ── monthly histogram ──

    #[test]
    fn test_monthly_window_spans_year_boundary() {
        let worker = WorkerId::new();
        let now = ts("2026-02-15T12:00:00Z");
        let stats = compute_statistics(worker, &[], &[], now);

        let months: Vec<String> = stats
            .monthly_completions
            .iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(
            months,
            vec!["2025-09", "2025-10", "2025-11", "2025-12", "2026-01", "2026-02"]
        );
    }

    #[test]
    fn test_completions_bucketed_by_updated_at_month() {
        let worker = WorkerId::new();
        let now = ts("2026-08-29T12:00:00Z");
        let bookings = vec![
            with_status(worker, BookingStatus::Completed, ts("2026-08-10T09:00:00Z")),
            with_status(worker, BookingStatus::Completed, ts("2026-08-20T09:00:00Z")),
            with_status(worker, BookingStatus::Completed, ts("2026-06-05T09:00:00Z")),
            // Outside the trailing window, counted in totals only.
            with_status(worker, BookingStatus::Completed, ts("2025-11-01T09:00:00Z")),
        ];

        let stats = compute_statistics(worker, &bookings, &[], now);
        assert_eq!(stats.completed, 4);
        let by_month: std::collections::HashMap<String, u64> = stats
            .monthly_completions
            .iter()
            .map(|(k, n)| (k.to_string(), *n))
            .collect();
        assert_eq!(by_month["2026-08"], 2);
        assert_eq!(by_month["2026-06"], 1);
        assert_eq!(by_month["2026-03"], 0);
        assert_eq!(by_month.len(), 6);
    }

    // ── properties ──

    proptest::proptest! {
        /// A percentage of a part never leaves 0..=100.
        #[test]
        fn prop_rate_stays_in_percent_range(whole in 0u64..10_000, frac in 0u64..=100) {
            let part = whole * frac / 100;
            let r = rate(part, whole);
            proptest::prop_assert!(r <= 100);
        }

        /// The month window is always six strictly increasing buckets
        /// ending at the month of `now`.
        #[test]
        fn prop_month_window_shape(secs in 0i64..4_102_444_800) {
            let now = Timestamp::from_epoch_secs(secs).unwrap();
            let window = month_window(now);
            proptest::prop_assert_eq!(window.len(), HISTOGRAM_MONTHS);
            proptest::prop_assert!(window.windows(2).all(|w| w[0].0 < w[1].0));
            proptest::prop_assert_eq!(window[HISTOGRAM_MONTHS - 1].0, MonthKey::of(now));
        }
    }
}
