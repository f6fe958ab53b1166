use std::sync::Arc;

use super::domain::{
    Application, ApplicationId, Company, JobOffer, JobOfferId, ResourceKind, User, UserId,
};
use super::store::{ApplicationStore, DirectoryStore, StoreError};

/// Re-derives the ownership chain of a resource from stored records.
///
/// Every walk goes Application -> JobOffer -> Company -> owning User; owner
/// ids carried in request payloads are never consulted. A dangling link
/// anywhere in the chain is a missing-resource error, not a panic.
pub struct OwnershipResolver<S> {
    store: Arc<S>,
}

/// An application together with its fully resolved owning chain.
#[derive(Debug, Clone)]
pub struct ResolvedApplication {
    pub application: Application,
    pub job_offer: JobOffer,
    pub company: Company,
    pub owner: User,
}

impl ResolvedApplication {
    /// User who filed the application.
    pub fn applicant(&self) -> &UserId {
        &self.application.applicant_user_id
    }

    /// User who owns the company behind the job offer.
    pub fn company_owner(&self) -> &UserId {
        &self.owner.id
    }
}

/// A job offer together with its owning company and user.
#[derive(Debug, Clone)]
pub struct ResolvedJobOffer {
    pub job_offer: JobOffer,
    pub company: Company,
    pub owner: User,
}

impl ResolvedJobOffer {
    pub fn company_owner(&self) -> &UserId {
        &self.owner.id
    }
}

impl<S> OwnershipResolver<S>
where
    S: DirectoryStore + ApplicationStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn application(&self, id: &ApplicationId) -> Result<ResolvedApplication, ResolveError> {
        let application = self
            .store
            .application(id)?
            .ok_or(ResolveError::Missing(ResourceKind::Application))?;
        let chain = self.offer_chain(&application.job_offer_id)?;

        Ok(ResolvedApplication {
            application,
            job_offer: chain.job_offer,
            company: chain.company,
            owner: chain.owner,
        })
    }

    pub fn job_offer(&self, id: &JobOfferId) -> Result<ResolvedJobOffer, ResolveError> {
        self.offer_chain(id)
    }

    fn offer_chain(&self, id: &JobOfferId) -> Result<ResolvedJobOffer, ResolveError> {
        let job_offer = self
            .store
            .job_offer(id)?
            .ok_or(ResolveError::Missing(ResourceKind::JobOffer))?;
        let company = self
            .store
            .company(&job_offer.company_id)?
            .ok_or(ResolveError::Missing(ResourceKind::Company))?;
        let owner = self
            .store
            .user(&company.owner_user_id)?
            .ok_or(ResolveError::Missing(ResourceKind::User))?;

        Ok(ResolvedJobOffer {
            job_offer,
            company,
            owner,
        })
    }
}

/// Error raised when a chain cannot be walked to its owner.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("{0} not found")]
    Missing(ResourceKind),
    #[error(transparent)]
    Store(#[from] StoreError),
}
