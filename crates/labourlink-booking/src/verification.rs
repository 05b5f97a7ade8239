//! # Admin Verification Record
//!
//! The outcome of the admin's phone-verification pass. Written once per
//! verification; a re-verification overwrites the whole record rather
//! than appending.

use serde::{Deserialize, Serialize};

use labourlink_core::{AdminId, Timestamp};

/// Outcome of an admin verification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// The admin who performed the verification.
    pub admin_id: AdminId,
    /// Whether the customer's phone verification succeeded.
    pub customer_verified: bool,
    /// Whether the worker's phone verification succeeded.
    pub worker_verified: bool,
    /// Free-text notes from the verification call. Never null — an
    /// unset value is stored as the empty string to keep display logic
    /// simple.
    pub call_notes: String,
    /// When the verification was recorded.
    pub verified_at: Timestamp,
}

impl VerificationRecord {
    /// Build a verification record, defaulting absent notes to `""`.
    pub fn new(
        admin_id: AdminId,
        customer_verified: bool,
        worker_verified: bool,
        call_notes: Option<String>,
        verified_at: Timestamp,
    ) -> Self {
        Self {
            admin_id,
            customer_verified,
            worker_verified,
            call_notes: call_notes.unwrap_or_default(),
            verified_at,
        }
    }
}
