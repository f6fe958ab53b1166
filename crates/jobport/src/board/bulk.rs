use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::authorize::{Action, AuthorizationGuard, Decision};
use super::domain::{Actor, ApplicationId, ApplicationStatus};
use super::lifecycle::{ApplicationLifecycle, TransitionError};
use super::notify::NotificationDispatcher;
use super::ownership::{OwnershipResolver, ResolveError};
use super::store::{ApplicationStore, DirectoryStore, StoreError};

/// Applies one status change across many applications, one commit per item.
///
/// Every id is resolved, authorized, and transitioned independently; one
/// item's failure never aborts the rest, it lands in the outcome map instead.
/// The only raised error is an empty input set. Re-running the same call is
/// safe: items that became terminal in the first run come back in `failed`.
pub struct BulkCoordinator<S, N> {
    guard: AuthorizationGuard,
    resolver: OwnershipResolver<S>,
    lifecycle: ApplicationLifecycle<S, N>,
}

/// Aggregated outcome. The input set splits exactly across the two sides.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub succeeded: Vec<ApplicationId>,
    pub failed: BTreeMap<ApplicationId, BulkFailure>,
}

/// Per-item failure reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkFailure {
    NotFound,
    Forbidden,
    TerminalState { from: ApplicationStatus },
    InvalidStatus,
    Unavailable,
}

impl BulkFailure {
    pub const fn label(self) -> &'static str {
        match self {
            BulkFailure::NotFound => "not found",
            BulkFailure::Forbidden => "forbidden",
            BulkFailure::TerminalState { .. } => "terminal state",
            BulkFailure::InvalidStatus => "invalid status",
            BulkFailure::Unavailable => "store unavailable",
        }
    }
}

impl fmt::Display for BulkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised only for an empty input set; a caller-contract violation rather
/// than a per-item outcome.
#[derive(Debug, thiserror::Error)]
#[error("bulk status update requires at least one application id")]
pub struct EmptyBulk;

impl<S, N> BulkCoordinator<S, N>
where
    S: DirectoryStore + ApplicationStore,
    N: NotificationDispatcher,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            guard: AuthorizationGuard,
            resolver: OwnershipResolver::new(store.clone()),
            lifecycle: ApplicationLifecycle::new(store, notifier),
        }
    }

    pub fn transition_all(
        &self,
        actor: &Actor,
        ids: &[ApplicationId],
        new_status: ApplicationStatus,
    ) -> Result<BulkOutcome, EmptyBulk> {
        if ids.is_empty() {
            return Err(EmptyBulk);
        }

        // The input is a set; a repeated id is processed once.
        let ids: BTreeSet<&ApplicationId> = ids.iter().collect();

        let mut outcome = BulkOutcome::default();
        for id in ids {
            match self.transition_one(actor, id, new_status) {
                Ok(()) => outcome.succeeded.push(id.clone()),
                Err(failure) => {
                    outcome.failed.insert(id.clone(), failure);
                }
            }
        }

        Ok(outcome)
    }

    fn transition_one(
        &self,
        actor: &Actor,
        id: &ApplicationId,
        new_status: ApplicationStatus,
    ) -> Result<(), BulkFailure> {
        let resolved = self.resolver.application(id).map_err(|err| match err {
            ResolveError::Missing(_) | ResolveError::Store(StoreError::NotFound) => {
                BulkFailure::NotFound
            }
            ResolveError::Store(_) => BulkFailure::Unavailable,
        })?;

        let action = Action::UpdateApplicationStatus {
            company_owner: resolved.company_owner(),
        };
        if let Decision::Deny(denial) = self.guard.authorize(actor, action) {
            debug!(
                application = %id.0,
                actor = %actor.user_id.0,
                reason = denial.reason,
                "bulk status update denied"
            );
            return Err(BulkFailure::Forbidden);
        }

        self.lifecycle
            .transition(actor, resolved.application, new_status)
            .map_err(|err| match err {
                TransitionError::Terminal { from } => BulkFailure::TerminalState { from },
                TransitionError::IntoPending => BulkFailure::InvalidStatus,
                TransitionError::Store(StoreError::NotFound) => BulkFailure::NotFound,
                TransitionError::Store(_) => BulkFailure::Unavailable,
            })?;

        Ok(())
    }
}
