//! # Money — Integer Minor Units
//!
//! Monetary amounts as non-negative integer minor units (cents).
//!
//! ## Invariant
//!
//! Booking totals are derived as `hourly_rate * estimated_duration` and
//! summed into earnings statistics. Floats would accumulate rounding drift
//! across those folds, so amounts never pass through `f64`: construction,
//! arithmetic, and serde all operate on `i64` minor units.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A non-negative monetary amount in minor units (cents).
///
/// Serializes as a bare integer. Display renders major.minor with two
/// decimals (`1250` → `"12.50"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Money = Money(0);

    /// Create an amount from minor units.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Money`] if `minor` is negative.
    pub fn from_minor(minor: i64) -> Result<Self, CoreError> {
        if minor < 0 {
            return Err(CoreError::Money(format!(
                "amount must be non-negative, got {minor} minor units"
            )));
        }
        Ok(Self(minor))
    }

    /// Create an amount from whole major units (e.g., rupees, dollars).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Money`] if `major` is negative or the
    /// conversion to minor units overflows.
    pub fn from_major(major: i64) -> Result<Self, CoreError> {
        let minor = major
            .checked_mul(100)
            .ok_or_else(|| CoreError::Money(format!("amount overflow: {major} major units")))?;
        Self::from_minor(minor)
    }

    /// The amount in minor units.
    pub fn minor_units(&self) -> i64 {
        self.0
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiply by a non-negative factor (e.g., rate × hours).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Money`] if `factor` is negative or the
    /// multiplication overflows.
    pub fn checked_mul(&self, factor: i64) -> Result<Self, CoreError> {
        if factor < 0 {
            return Err(CoreError::Money(format!(
                "multiplication factor must be non-negative, got {factor}"
            )));
        }
        let minor = self
            .0
            .checked_mul(factor)
            .ok_or_else(|| CoreError::Money(format!("amount overflow: {} * {factor}", self.0)))?;
        Ok(Self(minor))
    }

    /// Add another amount, saturating at the maximum representable value.
    ///
    /// Used by statistics folds where overflow must not abort the
    /// aggregation.
    pub fn saturating_add(&self, other: Money) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Add another amount.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Money`] on overflow.
    pub fn checked_add(&self, other: Money) -> Result<Self, CoreError> {
        let minor = self
            .0
            .checked_add(other.0)
            .ok_or_else(|| CoreError::Money(format!("amount overflow: {} + {}", self.0, other.0)))?;
        Ok(Self(minor))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
