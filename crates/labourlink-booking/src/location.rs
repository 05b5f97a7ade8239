//! # Per-Party Location State
//!
//! Each party to a booking owns its location independently: a structured
//! address, a live-sharing toggle, and the latest coordinate fix with its
//! own timestamp. Status transitions never implicitly clear the other
//! party's coordinates; only cancellation disables sharing for both
//! parties.

use serde::{Deserialize, Serialize};

use labourlink_core::{Address, Coordinates, GeoPoint, Timestamp};

/// The two non-admin parties to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    /// The requesting customer.
    Customer,
    /// The assigned worker.
    Worker,
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Customer => "customer",
            Self::Worker => "worker",
        })
    }
}

/// One party's location state on a booking.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartyLocation {
    /// Structured service address, if provided.
    pub address: Option<Address>,
    /// Whether live-location sharing is enabled for this party.
    pub sharing_enabled: bool,
    /// The most recent live fix; `captured_at` is the per-party
    /// last-updated timestamp.
    pub last_fix: Option<GeoPoint>,
}

impl PartyLocation {
    /// Location state with a known address and sharing disabled.
    pub fn with_address(address: Address) -> Self {
        Self {
            address: Some(address),
            sharing_enabled: false,
            last_fix: None,
        }
    }

    /// Enable live sharing. Stale fixes from a prior enablement are kept;
    /// they carry their own capture timestamp.
    pub fn enable_sharing(&mut self) {
        self.sharing_enabled = true;
    }

    /// Disable live sharing.
    pub fn disable_sharing(&mut self) {
        self.sharing_enabled = false;
    }

    /// Record a live fix and optionally replace the address.
    pub fn record_fix(&mut self, coordinates: Coordinates, address: Option<Address>, at: Timestamp) {
        self.last_fix = Some(GeoPoint {
            coordinates,
            captured_at: at,
        });
        if let Some(address) = address {
            self.address = Some(address);
        }
    }
}
