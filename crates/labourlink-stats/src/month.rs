//! Calendar-month bucketing for the completion histogram.

use serde::{Deserialize, Serialize};

use labourlink_core::Timestamp;

/// A calendar month, the histogram bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1–12.
    pub month: u32,
}

impl MonthKey {
    /// The month containing `at`.
    pub fn of(at: Timestamp) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// The month before this one.
    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(year: i32, month: u32) -> MonthKey {
        MonthKey { year, month }
    }

    #[test]
    fn test_previous_within_year() {
        assert_eq!(key(2026, 8).previous(), key(2026, 7));
    }

    #[test]
    fn test_previous_crosses_year_boundary() {
        assert_eq!(key(2026, 1).previous(), key(2025, 12));
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(key(2025, 12) < key(2026, 1));
        assert!(key(2026, 1) < key(2026, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(key(2026, 8).to_string(), "2026-08");
    }

    #[test]
    fn test_of_timestamp() {
        let at = Timestamp::parse("2026-08-29T10:00:00Z").unwrap();
        assert_eq!(MonthKey::of(at), key(2026, 8));
    }
}
