//! # Location Primitives
//!
//! Structured addresses and live-location coordinates. Coordinates are
//! range-validated at construction; a booking can carry an address with
//! no coordinates (live sharing disabled) but never coordinates outside
//! the WGS84 domain.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::temporal::Timestamp;

/// A structured service address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street address, house/flat number.
    pub line1: String,
    /// Additional address detail (landmark, block), if any.
    pub line2: Option<String>,
    /// City.
    pub city: String,
    /// District the marketplace operates in.
    pub district: String,
    /// Postal code, if known.
    pub postal_code: Option<String>,
}

/// A WGS84 coordinate pair, validated to range at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, -90.0..=90.0.
    pub latitude: f64,
    /// Longitude in degrees, -180.0..=180.0.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Coordinates`] if either component is out of
    /// range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::Coordinates(format!(
                "latitude out of range: {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::Coordinates(format!(
                "longitude out of range: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// A live-location fix: where, and when it was captured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// The coordinates of the fix.
    pub coordinates: Coordinates,
    /// When the fix was captured.
    pub captured_at: Timestamp,
}
