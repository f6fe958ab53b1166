use std::sync::Arc;

use super::domain::{Application, JobOfferId, UserId};
use super::store::{ApplicationStore, StoreError};

/// Claims the one-application-per-offer-per-applicant slot.
///
/// The claim is the constrained insert itself: the store's unique index is
/// the source of truth, and a conflict there converts to `AlreadyExists`
/// rather than a failure. No existence check runs before the write.
pub struct UniquenessEnforcer<S> {
    store: Arc<S>,
}

/// Outcome of attempting to claim the uniqueness slot.
#[derive(Debug)]
pub enum Reservation {
    Reserved(Application),
    AlreadyExists,
}

impl<S> UniquenessEnforcer<S>
where
    S: ApplicationStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Single atomic insert under the unique constraint. A concurrent claim
    /// of the same pair surfaces as `AlreadyExists`, a normal outcome.
    pub fn try_reserve(&self, application: Application) -> Result<Reservation, StoreError> {
        match self.store.insert_application(application) {
            Ok(stored) => Ok(Reservation::Reserved(stored)),
            Err(StoreError::Conflict) => Ok(Reservation::AlreadyExists),
            Err(other) => Err(other),
        }
    }

    /// Advisory pre-check over the same existence test. May be stale by the
    /// time of an actual create; `try_reserve` is the only authority.
    pub fn can_apply(
        &self,
        job_offer_id: &JobOfferId,
        applicant: &UserId,
    ) -> Result<bool, StoreError> {
        Ok(!self.store.has_applied(job_offer_id, applicant)?)
    }
}
