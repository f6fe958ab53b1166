use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::authorize::{Action, AuthorizationGuard, Decision, Denial};
use super::bulk::{BulkCoordinator, BulkOutcome, EmptyBulk};
use super::domain::{
    Actor, Application, ApplicationId, ApplicationStatus, InvalidStatus, JobOffer, JobOfferId,
    Notification, NotificationId, ResourceKind, UserId,
};
use super::lifecycle::{ApplicationLifecycle, TransitionError};
use super::notify::NotificationDispatcher;
use super::ownership::{OwnershipResolver, ResolveError};
use super::store::{BoardStore, StoreError};
use super::uniqueness::{Reservation, UniquenessEnforcer};

/// Facade over the board's components. Every operation takes the acting
/// identity explicitly; nothing here reads an ambient "current user".
pub struct BoardService<S, N> {
    store: Arc<S>,
    guard: AuthorizationGuard,
    resolver: OwnershipResolver<S>,
    uniqueness: UniquenessEnforcer<S>,
    lifecycle: ApplicationLifecycle<S, N>,
    bulk: BulkCoordinator<S, N>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static JOB_OFFER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

fn next_job_offer_id() -> JobOfferId {
    let id = JOB_OFFER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobOfferId(format!("job-{id:06}"))
}

fn store_missing(err: StoreError, kind: ResourceKind) -> BoardError {
    match err {
        StoreError::NotFound => BoardError::NotFound(kind),
        other => BoardError::Store(other),
    }
}

impl<S, N> BoardService<S, N>
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            guard: AuthorizationGuard,
            resolver: OwnershipResolver::new(store.clone()),
            uniqueness: UniquenessEnforcer::new(store.clone()),
            lifecycle: ApplicationLifecycle::new(store.clone(), notifier.clone()),
            bulk: BulkCoordinator::new(store.clone(), notifier),
            store,
        }
    }

    /// Bridge for the authentication layer: maps a subject id to its stored
    /// role. Credentials never reach this crate.
    pub fn resolve_actor(&self, user_id: &UserId) -> Result<Actor, BoardError> {
        let user = self
            .store
            .user(user_id)?
            .ok_or(BoardError::NotFound(ResourceKind::User))?;
        Ok(Actor::new(user.id, user.role))
    }

    /// File a new application for the actor against an active job offer.
    ///
    /// The applicant id is always the actor's own; inactive and missing
    /// offers are indistinguishable to the caller. A duplicate claim on the
    /// (offer, applicant) pair answers `Conflict`.
    pub fn create_application(
        &self,
        actor: &Actor,
        job_offer_id: &JobOfferId,
        cover_note: Option<String>,
    ) -> Result<Application, BoardError> {
        self.check(actor, Action::CreateApplication)?;

        let resolved = self.resolver.job_offer(job_offer_id)?;
        if !resolved.job_offer.is_active {
            return Err(BoardError::NotFound(ResourceKind::JobOffer));
        }

        let now = Utc::now();
        let application = Application {
            id: next_application_id(),
            job_offer_id: resolved.job_offer.id.clone(),
            applicant_user_id: actor.user_id.clone(),
            status: ApplicationStatus::Pending,
            cover_note,
            created_at: now,
            updated_at: now,
        };

        match self.uniqueness.try_reserve(application)? {
            Reservation::Reserved(stored) => Ok(stored),
            Reservation::AlreadyExists => Err(BoardError::Conflict),
        }
    }

    /// Advisory check whether the actor could still apply to an offer. May be
    /// stale by the time of an actual create.
    pub fn can_apply(&self, actor: &Actor, job_offer_id: &JobOfferId) -> Result<bool, BoardError> {
        self.check(actor, Action::CreateApplication)?;

        let resolved = self.resolver.job_offer(job_offer_id)?;
        if !resolved.job_offer.is_active {
            return Err(BoardError::NotFound(ResourceKind::JobOffer));
        }

        Ok(self
            .uniqueness
            .can_apply(&resolved.job_offer.id, &actor.user_id)?)
    }

    /// Read one application: its applicant always may, the owning company's
    /// representative may as well.
    pub fn application(
        &self,
        actor: &Actor,
        id: &ApplicationId,
    ) -> Result<Application, BoardError> {
        let resolved = self.resolver.application(id)?;

        let read_own = Action::ReadOwnApplication {
            applicant: resolved.applicant(),
        };
        if self.guard.authorize(actor, read_own).is_allowed() {
            return Ok(resolved.application);
        }

        self.check(
            actor,
            Action::ReadJobApplications {
                company_owner: resolved.company_owner(),
            },
        )?;
        Ok(resolved.application)
    }

    /// List every application filed against one job offer.
    pub fn job_applications(
        &self,
        actor: &Actor,
        job_offer_id: &JobOfferId,
    ) -> Result<Vec<Application>, BoardError> {
        let resolved = self.resolver.job_offer(job_offer_id)?;
        self.check(
            actor,
            Action::ReadJobApplications {
                company_owner: resolved.company_owner(),
            },
        )?;

        Ok(self.store.applications_for_offer(&resolved.job_offer.id)?)
    }

    /// Move one application to a new status and announce it to the applicant.
    pub fn update_application_status(
        &self,
        actor: &Actor,
        id: &ApplicationId,
        new_status: ApplicationStatus,
    ) -> Result<Application, BoardError> {
        let resolved = self.resolver.application(id)?;
        self.check(
            actor,
            Action::UpdateApplicationStatus {
                company_owner: resolved.company_owner(),
            },
        )?;

        Ok(self
            .lifecycle
            .transition(actor, resolved.application, new_status)?)
    }

    /// Apply one status change across a set of applications, one commit per
    /// item, aggregating per-item failures instead of raising them.
    pub fn bulk_update_application_status(
        &self,
        actor: &Actor,
        ids: &[ApplicationId],
        new_status: ApplicationStatus,
    ) -> Result<BulkOutcome, BoardError> {
        Ok(self.bulk.transition_all(actor, ids, new_status)?)
    }

    /// Replace the applicant-owned cover note. Not a lifecycle transition:
    /// no status change and no announcement.
    pub fn update_application_content(
        &self,
        actor: &Actor,
        id: &ApplicationId,
        cover_note: Option<String>,
    ) -> Result<Application, BoardError> {
        let resolved = self.resolver.application(id)?;
        self.check(
            actor,
            Action::UpdateApplicationContent {
                applicant: resolved.applicant(),
            },
        )?;

        let mut updated = resolved.application;
        updated.cover_note = cover_note;
        updated.updated_at = Utc::now();
        self.store
            .update_application(updated.clone())
            .map_err(|err| store_missing(err, ResourceKind::Application))?;
        Ok(updated)
    }

    /// Unconditional removal by the owning applicant. Works from any status,
    /// announces nothing, and never releases the uniqueness claim.
    pub fn delete_application(&self, actor: &Actor, id: &ApplicationId) -> Result<(), BoardError> {
        let resolved = self.resolver.application(id)?;
        self.check(
            actor,
            Action::DeleteApplication {
                applicant: resolved.applicant(),
            },
        )?;

        self.store
            .delete_application(&resolved.application.id)
            .map_err(|err| store_missing(err, ResourceKind::Application))
    }

    /// Publish a job offer under the company the actor owns. The owning
    /// company is derived from the directory, never taken from the payload.
    pub fn post_job_offer(&self, actor: &Actor, title: String) -> Result<JobOffer, BoardError> {
        self.check(actor, Action::PostJobOffer)?;

        let company = self
            .store
            .company_owned_by(&actor.user_id)?
            .ok_or(BoardError::NotFound(ResourceKind::Company))?;

        let offer = JobOffer {
            id: next_job_offer_id(),
            company_id: company.id,
            title,
            is_active: true,
        };
        Ok(self.store.insert_job_offer(offer)?)
    }

    /// Open or close an offer for new applications. Existing applications
    /// stay readable and triageable either way.
    pub fn set_job_offer_active(
        &self,
        actor: &Actor,
        id: &JobOfferId,
        active: bool,
    ) -> Result<JobOffer, BoardError> {
        let resolved = self.resolver.job_offer(id)?;
        self.check(
            actor,
            Action::ManageJobOffer {
                company_owner: resolved.company_owner(),
            },
        )?;

        let mut offer = resolved.job_offer;
        offer.is_active = active;
        self.store
            .update_job_offer(offer.clone())
            .map_err(|err| store_missing(err, ResourceKind::JobOffer))?;
        Ok(offer)
    }

    /// Notifications addressed to the actor. The store query is keyed by the
    /// recipient, so foreign rows are unreachable by construction.
    pub fn notifications(&self, actor: &Actor) -> Result<Vec<Notification>, BoardError> {
        Ok(self.store.notifications_for(&actor.user_id)?)
    }

    /// Toggle the read flag on one of the actor's own notifications. Rows
    /// addressed to anyone else look missing.
    pub fn mark_notification_read(
        &self,
        actor: &Actor,
        id: &NotificationId,
    ) -> Result<(), BoardError> {
        self.store
            .mark_notification_read(id, &actor.user_id)
            .map_err(|err| store_missing(err, ResourceKind::Notification))
    }

    fn check(&self, actor: &Actor, action: Action<'_>) -> Result<(), BoardError> {
        match self.guard.authorize(actor, action) {
            Decision::Allow => Ok(()),
            Decision::Deny(denial) => {
                debug!(
                    actor = %actor.user_id.0,
                    role = actor.role.label(),
                    reason = denial.reason,
                    "authorization denied"
                );
                Err(BoardError::Forbidden(denial))
            }
        }
    }
}

/// Error taxonomy surfaced by the board service.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// The caller always sees the generic wording; the precise grounds stay
    /// on the source and in the logs.
    #[error("insufficient permissions")]
    Forbidden(#[source] Denial),
    #[error("{0} not found")]
    NotFound(ResourceKind),
    #[error("application already exists for this job offer")]
    Conflict,
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),
    #[error("application is {from} and can no longer change status")]
    TerminalState { from: ApplicationStatus },
    #[error(transparent)]
    EmptyBulk(#[from] EmptyBulk),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ResolveError> for BoardError {
    fn from(value: ResolveError) -> Self {
        match value {
            ResolveError::Missing(kind) => BoardError::NotFound(kind),
            ResolveError::Store(err) => BoardError::Store(err),
        }
    }
}

impl From<TransitionError> for BoardError {
    fn from(value: TransitionError) -> Self {
        match value {
            TransitionError::Terminal { from } => BoardError::TerminalState { from },
            TransitionError::IntoPending => BoardError::InvalidStatus(InvalidStatus {
                value: ApplicationStatus::Pending.label().to_string(),
            }),
            TransitionError::Store(StoreError::NotFound) => {
                BoardError::NotFound(ResourceKind::Application)
            }
            TransitionError::Store(err) => BoardError::Store(err),
        }
    }
}
