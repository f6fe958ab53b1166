use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{Actor, Application, ApplicationStatus, NotificationKind};
use super::notify::NotificationDispatcher;
use super::store::{ApplicationStore, StoreError};

/// Status workflow for applications.
///
/// Trusts that the caller already authorized the actor for this change; the
/// lifecycle validates the move itself, persists it, and announces it.
pub struct ApplicationLifecycle<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> ApplicationLifecycle<S, N>
where
    S: ApplicationStore,
    N: NotificationDispatcher,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    /// Move `application` to `new_status`, persist the change, and announce
    /// it to the applicant.
    ///
    /// Terminal applications are refused before anything is written, so a
    /// rejected call leaves status and updated_at untouched. The announcement
    /// is best effort: a dispatch failure is logged and the committed
    /// transition stands. Concurrent transitions on the same application
    /// interleave without a version check; the last committed write wins.
    pub fn transition(
        &self,
        actor: &Actor,
        application: Application,
        new_status: ApplicationStatus,
    ) -> Result<Application, TransitionError> {
        if application.status.is_terminal() {
            return Err(TransitionError::Terminal {
                from: application.status,
            });
        }
        if new_status == ApplicationStatus::Pending {
            return Err(TransitionError::IntoPending);
        }

        let mut updated = application;
        let previous = updated.status;
        updated.status = new_status;
        updated.updated_at = Utc::now();
        self.store.update_application(updated.clone())?;

        info!(
            application = %updated.id.0,
            actor = %actor.user_id.0,
            from = previous.label(),
            to = new_status.label(),
            "application status changed"
        );

        if let Some(kind) = NotificationKind::for_status(new_status) {
            if let Err(err) = self.notifier.notify(&updated.applicant_user_id, kind) {
                warn!(
                    application = %updated.id.0,
                    kind = kind.label(),
                    error = %err,
                    "notification dropped after status change"
                );
            }
        }

        Ok(updated)
    }
}

/// Rejected or failed transition.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    /// Accepted and rejected are final.
    #[error("application is {from} and can no longer change status")]
    Terminal { from: ApplicationStatus },
    /// Pending is assigned at intake and never re-entered.
    #[error("applications cannot return to pending")]
    IntoPending,
    #[error(transparent)]
    Store(#[from] StoreError),
}
