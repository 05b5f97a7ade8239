//! # The Account Directory
//!
//! The booking core's view of accounts. Lookups return owned snapshots;
//! the one write path — review append — is atomic per worker, so two
//! racing appends for the same worker cannot both read the same review
//! list and lose one of the writes.
//!
//! The admin broadcast target is an explicit role query
//! ([`AccountDirectory::admin_ids`]); there is no magic `"admin"` user.

use std::collections::HashMap;
use std::sync::RwLock;

use labourlink_core::{AdminId, CustomerId, WorkerId};

use crate::customer::Customer;
use crate::review::{Review, ReviewError};
use crate::worker::Worker;

/// Directory of workers, customers, and admins.
pub trait AccountDirectory: Send + Sync {
    /// Snapshot of a worker record.
    fn worker(&self, id: WorkerId) -> Option<Worker>;

    /// Snapshot of a customer record.
    fn customer(&self, id: CustomerId) -> Option<Customer>;

    /// All accounts with the admin role, for broadcast notifications.
    fn admin_ids(&self) -> Vec<AdminId>;

    /// Append a review to a worker, atomically with the duplicate guard
    /// and rating recompute. Returns the new mean rating in tenths.
    ///
    /// # Errors
    ///
    /// - [`ReviewError::UnknownWorker`] if the worker does not exist.
    /// - [`ReviewError::Duplicate`] if `(booking, customer)` already
    ///   reviewed this worker; the review list and rating are unchanged.
    fn append_review(&self, worker_id: WorkerId, review: Review) -> Result<u16, ReviewError>;
}

impl<T: AccountDirectory> AccountDirectory for std::sync::Arc<T> {
    fn worker(&self, id: WorkerId) -> Option<Worker> {
        (**self).worker(id)
    }

    fn customer(&self, id: CustomerId) -> Option<Customer> {
        (**self).customer(id)
    }

    fn admin_ids(&self) -> Vec<AdminId> {
        (**self).admin_ids()
    }

    fn append_review(&self, worker_id: WorkerId, review: Review) -> Result<u16, ReviewError> {
        (**self).append_review(worker_id, review)
    }
}

/// In-memory directory. Review appends take the write lock for the whole
/// read-modify-write, satisfying the per-worker atomicity requirement.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    workers: RwLock<HashMap<WorkerId, Worker>>,
    customers: RwLock<HashMap<CustomerId, Customer>>,
    admins: RwLock<Vec<AdminId>>,
}

impl InMemoryDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a worker record.
    pub fn upsert_worker(&self, worker: Worker) {
        let mut workers = self.workers.write().unwrap_or_else(|e| e.into_inner());
        workers.insert(worker.id, worker);
    }

    /// Register or replace a customer record.
    pub fn upsert_customer(&self, customer: Customer) {
        let mut customers = self.customers.write().unwrap_or_else(|e| e.into_inner());
        customers.insert(customer.id, customer);
    }

    /// Grant the admin role to an account.
    pub fn add_admin(&self, id: AdminId) {
        let mut admins = self.admins.write().unwrap_or_else(|e| e.into_inner());
        if !admins.contains(&id) {
            admins.push(id);
        }
    }
}

impl AccountDirectory for InMemoryDirectory {
    fn worker(&self, id: WorkerId) -> Option<Worker> {
        let workers = self.workers.read().unwrap_or_else(|e| e.into_inner());
        workers.get(&id).cloned()
    }

    fn customer(&self, id: CustomerId) -> Option<Customer> {
        let customers = self.customers.read().unwrap_or_else(|e| e.into_inner());
        customers.get(&id).cloned()
    }

    fn admin_ids(&self) -> Vec<AdminId> {
        let admins = self.admins.read().unwrap_or_else(|e| e.into_inner());
        admins.clone()
    }

    fn append_review(&self, worker_id: WorkerId, review: Review) -> Result<u16, ReviewError> {
        let mut workers = self.workers.write().unwrap_or_else(|e| e.into_inner());
        let worker = workers
            .get_mut(&worker_id)
            .ok_or_else(|| ReviewError::UnknownWorker(worker_id.to_string()))?;
        if worker.has_review_for(review.booking_id, review.customer_id) {
            return Err(ReviewError::Duplicate {
                booking_id: review.booking_id,
                customer_id: review.customer_id,
            });
        }
        worker.push_review(review);
        worker
            .rating_tenths
            .ok_or_else(|| ReviewError::UnknownWorker(worker_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labourlink_core::{BookingId, Money, Timestamp};

    fn directory_with_worker() -> (InMemoryDirectory, WorkerId) {
        let dir = InMemoryDirectory::new();
        let id = WorkerId::new();
        dir.upsert_worker(Worker::new(
            id,
            "Bilal",
            "plumber",
            "+92-300-1111111",
            "bilal@example.com",
            Money::from_major(1200).unwrap(),
        ));
        (dir, id)
    }

    #[test]
    fn test_lookup_returns_snapshot() {
        let (dir, id) = directory_with_worker();
        assert!(dir.worker(id).is_some());
        assert!(dir.worker(WorkerId::new()).is_none());
    }

    #[test]
    fn test_append_review_recomputes_rating() {
        let (dir, id) = directory_with_worker();
        let review = Review::new(BookingId::new(), CustomerId::new(), 4, None, Timestamp::now())
            .unwrap();
        let tenths = dir.append_review(id, review).unwrap();
        assert_eq!(tenths, 40);
        assert_eq!(dir.worker(id).unwrap().reviews.len(), 1);
    }

    #[test]
    fn test_duplicate_review_fails_and_rating_changes_once() {
        let (dir, id) = directory_with_worker();
        let booking = BookingId::new();
        let customer = CustomerId::new();
        let ts = Timestamp::now();

        let first = Review::new(booking, customer, 5, None, ts).unwrap();
        dir.append_review(id, first).unwrap();

        let second = Review::new(booking, customer, 1, None, ts).unwrap();
        let err = dir.append_review(id, second).unwrap_err();
        assert!(matches!(err, ReviewError::Duplicate { .. }));

        let worker = dir.worker(id).unwrap();
        assert_eq!(worker.reviews.len(), 1);
        assert_eq!(worker.rating_tenths, Some(50));
    }

    #[test]
    fn test_same_customer_may_review_different_bookings() {
        let (dir, id) = directory_with_worker();
        let customer = CustomerId::new();
        let ts = Timestamp::now();
        dir.append_review(id, Review::new(BookingId::new(), customer, 4, None, ts).unwrap())
            .unwrap();
        dir.append_review(id, Review::new(BookingId::new(), customer, 5, None, ts).unwrap())
            .unwrap();
        assert_eq!(dir.worker(id).unwrap().reviews.len(), 2);
    }

    #[test]
    fn test_admin_role_query_deduplicates() {
        let dir = InMemoryDirectory::new();
        let admin = AdminId::new();
        dir.add_admin(admin);
        dir.add_admin(admin);
        assert_eq!(dir.admin_ids(), vec![admin]);
    }
}
