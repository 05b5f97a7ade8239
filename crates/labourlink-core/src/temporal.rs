//! # Temporal Types — UTC-Only Timestamps and the Injected Clock
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds
//! precision, and the [`Clock`] trait that supplies it to domain code.
//!
//! ## Invariant
//!
//! All deadline arithmetic in the booking core (the 15-minute response
//! window, the one-hour and thirty-minute reminder offsets) compares
//! `Timestamp` values produced by a single `Clock`. Non-UTC inputs are
//! rejected at construction — there is no silent conversion that could
//! shift a deadline across a timezone boundary.
//!
//! ## Clock Injection
//!
//! Domain code never calls `Utc::now()`. The scheduler and the booking
//! service hold a `Clock` implementation: [`SystemClock`] in production,
//! [`ManualClock`] in tests, where deadline expiry is simulated by
//! advancing the clock rather than sleeping.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ─── Timestamp ───────────────────────────────────────────────────────

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an RFC 3339 string, rejecting non-UTC offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    ///
    /// Domain code should obtain timestamps through a [`Clock`] instead;
    /// this constructor backs [`SystemClock`] and test setup.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// **Rejects non-UTC inputs.** Only timestamps with the `Z` suffix are
    /// accepted; explicit offsets like `+05:00` — and even `+00:00` — are
    /// rejected so that every stored timestamp has one canonical rendering.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Timestamp`] if the string is not valid RFC 3339
    /// or does not use the `Z` suffix.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with('Z') {
            return Err(CoreError::Timestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }

        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CoreError::Timestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;

        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Timestamp`] if `secs` is out of chrono's range.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, CoreError> {
        let dt = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| CoreError::Timestamp(format!("invalid Unix timestamp: {secs}")))?;
        Ok(Self(dt))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// This timestamp shifted forward by whole minutes.
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        Self(self.0 + Duration::minutes(minutes))
    }

    /// This timestamp shifted backward by whole minutes.
    pub fn minus_minutes(&self, minutes: i64) -> Self {
        Self(self.0 - Duration::minutes(minutes))
    }

    /// This timestamp shifted forward by whole seconds.
    pub fn plus_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Signed duration from `earlier` to `self`.
    pub fn duration_since(&self, earlier: Timestamp) -> Duration {
        self.0 - earlier.0
    }

    /// Calendar year of this timestamp (UTC).
    pub fn year(&self) -> i32 {
        use chrono::Datelike;
        self.0.year()
    }

    /// Calendar month of this timestamp (UTC), 1-12.
    pub fn month(&self) -> u32 {
        use chrono::Datelike;
        self.0.month()
    }

    /// Render as RFC 3339 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_rfc3339(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

// ─── Clock ───────────────────────────────────────────────────────────

/// Wall-clock time source.
///
/// The booking service and the sweep scheduler read the current time
/// through this trait, once per operation or sweep. A single consistent
/// read per sweep prevents a reminder firing twice because the clock
/// moved between eligibility check and flag write.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Manually driven clock for tests.
///
/// Cloning shares the underlying instant: advancing one handle advances
/// every clone, so a service and a scheduler under test observe the same
/// time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    /// Create a manual clock fixed at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward by whole seconds.
    pub fn advance_secs(&self, secs: i64) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = current.plus_secs(secs);
    }

    /// Move the clock forward by whole minutes.
    pub fn advance_minutes(&self, minutes: i64) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = current.plus_minutes(minutes);
    }

    /// Set the clock to an absolute instant.
    pub fn set(&self, to: Timestamp) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 45).unwrap();
        let dt_with_nanos = dt.with_nanosecond(123_456_789).unwrap();
        let ts = Timestamp::from_utc(dt_with_nanos);
        assert_eq!(ts.as_datetime().nanosecond(), 0);
        assert_eq!(ts.to_rfc3339(), "2026-01-15T12:30:45Z");
    }

    #[test]
    fn test_parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_parse_offset_rejected() {
        assert!(Timestamp::parse("2026-01-15T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("2026-01-15T17:00:00+05:00").is_err());
        assert!(Timestamp::parse("not-a-date").is_err());
    }

    #[test]
    fn test_minute_arithmetic() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(ts.plus_minutes(15).to_rfc3339(), "2026-01-15T12:15:00Z");
        assert_eq!(ts.minus_minutes(60).to_rfc3339(), "2026-01-15T11:00:00Z");
        assert_eq!(ts.plus_secs(1).to_rfc3339(), "2026-01-15T12:00:01Z");
    }

    #[test]
    fn test_duration_since() {
        let t0 = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let t1 = t0.plus_minutes(15);
        assert_eq!(t1.duration_since(t0), Duration::minutes(15));
    }

    #[test]
    fn test_ordering() {
        let earlier = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let later = earlier.plus_secs(1);
        assert!(earlier < later);
    }

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }

    #[test]
    fn test_epoch_roundtrip() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let ts2 = Timestamp::from_epoch_secs(ts.epoch_secs()).unwrap();
        assert_eq!(ts, ts2);
    }

    // ── Clock tests ──────────────────────────────────────────────────

    #[test]
    fn test_manual_clock_advances_shared_state() {
        let start = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        clock.advance_minutes(15);
        assert_eq!(handle.now(), start.plus_minutes(15));

        handle.advance_secs(1);
        assert_eq!(clock.now(), start.plus_minutes(15).plus_secs(1));
    }

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::new(Timestamp::parse("2026-01-15T12:00:00Z").unwrap());
        let target = Timestamp::parse("2026-06-01T00:00:00Z").unwrap();
        clock.set(target);
        assert_eq!(clock.now(), target);
    }

    #[test]
    fn test_system_clock_is_utc_seconds() {
        let ts = SystemClock.now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    proptest::proptest! {
        #[test]
        fn prop_plus_minus_minutes_roundtrip(mins in 0i64..=10_000) {
            let base = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
            let shifted = base.plus_minutes(mins).minus_minutes(mins);
            proptest::prop_assert_eq!(base, shifted);
        }

        #[test]
        fn prop_parse_display_roundtrip(secs in 0i64..=4_102_444_800) {
            let ts = Timestamp::from_epoch_secs(secs).unwrap();
            let reparsed = Timestamp::parse(&ts.to_rfc3339()).unwrap();
            proptest::prop_assert_eq!(ts, reparsed);
        }
    }
}
