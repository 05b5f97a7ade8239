//! # Booking Status — Lifecycle States and the Legal Edge Table
//!
//! ## States
//!
//! ```text
//! PendingAdmin ──verify──▶ AdminVerified ──dispatch──▶ WorkerAssigned
//!      │                        │                           │
//!      └──reject──▶ Rejected    │              accept──▶ Accepted ──start──▶ InProgress
//!                               │                │  │        │                   │
//!                               │           reject  expire   └──────complete─────┴──▶ Completed
//!                               │                │  │
//!                               │                ▼  ▼
//!                               │          Rejected  Expired
//!                               │
//!                               └── cancel (also from WorkerAssigned,
//!                                   Accepted, InProgress) ──▶ Cancelled
//! ```
//!
//! Direct-assignment bookings skip admin triage and start at
//! `WorkerAssigned` with the response deadline already set.
//!
//! Terminal states: `Rejected`, `Completed`, `Cancelled`, `Expired`.
//! No operation may resurrect a terminal booking.

use serde::{Deserialize, Serialize};

/// The lifecycle status of a booking. Exactly one value at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created by the customer, awaiting admin triage.
    PendingAdmin,
    /// Admin verified both parties and disclosed contact details.
    AdminVerified,
    /// A worker has been assigned and the response window is running.
    WorkerAssigned,
    /// The worker accepted within the response window.
    Accepted,
    /// Rejected by the admin or by the worker (terminal).
    Rejected,
    /// The worker has started the job.
    InProgress,
    /// The worker marked the job complete (terminal).
    Completed,
    /// Cancelled by the customer or the worker (terminal).
    Cancelled,
    /// The response window elapsed with no worker response (terminal).
    Expired,
}

impl BookingStatus {
    /// Whether this status is terminal (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::Completed | Self::Cancelled | Self::Expired
        )
    }

    /// Whether cancellation is permitted from this status.
    ///
    /// Cancellation is also permitted from any non-terminal status once
    /// contact details have been disclosed; the aggregate checks that
    /// disjunct separately.
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            Self::AdminVerified | Self::WorkerAssigned | Self::Accepted | Self::InProgress
        )
    }

    /// Whether `to` is a legal direct successor of this status.
    pub fn allows(&self, to: BookingStatus) -> bool {
        use BookingStatus::*;
        match (self, to) {
            (PendingAdmin, AdminVerified) | (PendingAdmin, Rejected) => true,
            (AdminVerified, WorkerAssigned) | (AdminVerified, Cancelled) => true,
            (WorkerAssigned, Accepted)
            | (WorkerAssigned, Rejected)
            | (WorkerAssigned, Expired)
            | (WorkerAssigned, Cancelled) => true,
            (Accepted, InProgress) | (Accepted, Completed) | (Accepted, Cancelled) => true,
            (InProgress, Completed) | (InProgress, Cancelled) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PendingAdmin => "PENDING_ADMIN",
            Self::AdminVerified => "ADMIN_VERIFIED",
            Self::WorkerAssigned => "WORKER_ASSIGNED",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    const ALL: [BookingStatus; 9] = [
        PendingAdmin,
        AdminVerified,
        WorkerAssigned,
        Accepted,
        Rejected,
        InProgress,
        Completed,
        Cancelled,
        Expired,
    ];

    #[test]
    fn test_terminal_states() {
        assert!(Rejected.is_terminal());
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(Expired.is_terminal());
        assert!(!PendingAdmin.is_terminal());
        assert!(!Accepted.is_terminal());
    }

    #[test]
    fn test_terminal_states_have_no_successors() {
        for from in ALL.iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(!from.allows(to), "{from} must not allow {to}");
            }
        }
    }

    #[test]
    fn test_happy_path_edges() {
        assert!(PendingAdmin.allows(AdminVerified));
        assert!(AdminVerified.allows(WorkerAssigned));
        assert!(WorkerAssigned.allows(Accepted));
        assert!(Accepted.allows(InProgress));
        assert!(Accepted.allows(Completed));
        assert!(InProgress.allows(Completed));
    }

    #[test]
    fn test_rejection_and_expiry_edges() {
        assert!(PendingAdmin.allows(Rejected));
        assert!(WorkerAssigned.allows(Rejected));
        assert!(WorkerAssigned.allows(Expired));
        assert!(!Accepted.allows(Expired));
        assert!(!PendingAdmin.allows(Expired));
    }

    #[test]
    fn test_cancellable_set() {
        assert!(AdminVerified.is_cancellable());
        assert!(WorkerAssigned.is_cancellable());
        assert!(Accepted.is_cancellable());
        assert!(InProgress.is_cancellable());
        assert!(!PendingAdmin.is_cancellable());
        assert!(!Completed.is_cancellable());
    }

    #[test]
    fn test_no_skipping_triage() {
        assert!(!PendingAdmin.allows(WorkerAssigned));
        assert!(!PendingAdmin.allows(Accepted));
        assert!(!AdminVerified.allows(Accepted));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(PendingAdmin.to_string(), "PENDING_ADMIN");
        assert_eq!(WorkerAssigned.to_string(), "WORKER_ASSIGNED");
        assert_eq!(InProgress.to_string(), "IN_PROGRESS");
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&PendingAdmin).unwrap(),
            "\"pending_admin\""
        );
        let parsed: BookingStatus = serde_json::from_str("\"worker_assigned\"").unwrap();
        assert_eq!(parsed, WorkerAssigned);
    }
}
