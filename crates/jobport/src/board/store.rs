use super::domain::{
    Application, ApplicationId, Company, CompanyId, JobOffer, JobOfferId, Notification,
    NotificationId, User, UserId,
};

/// Lookup surface for the users, companies, and job offers the board hangs
/// off. Ownership walks read exclusively from here.
pub trait DirectoryStore: Send + Sync {
    fn user(&self, id: &UserId) -> Result<Option<User>, StoreError>;
    fn insert_user(&self, user: User) -> Result<User, StoreError>;
    fn company(&self, id: &CompanyId) -> Result<Option<Company>, StoreError>;
    fn company_owned_by(&self, owner: &UserId) -> Result<Option<Company>, StoreError>;
    fn insert_company(&self, company: Company) -> Result<Company, StoreError>;
    fn job_offer(&self, id: &JobOfferId) -> Result<Option<JobOffer>, StoreError>;
    fn insert_job_offer(&self, offer: JobOffer) -> Result<JobOffer, StoreError>;
    fn update_job_offer(&self, offer: JobOffer) -> Result<(), StoreError>;
}

/// Application rows plus the uniqueness claim on (job offer, applicant).
pub trait ApplicationStore: Send + Sync {
    /// Insert under the unique (job_offer_id, applicant_user_id) constraint.
    /// The claim check and the write are one atomic step; an already-claimed
    /// pair answers `StoreError::Conflict`, never a partial write.
    fn insert_application(&self, application: Application) -> Result<Application, StoreError>;
    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;
    /// Replace the row unconditionally; concurrent writers interleave and the
    /// last commit wins.
    fn update_application(&self, application: Application) -> Result<(), StoreError>;
    fn delete_application(&self, id: &ApplicationId) -> Result<(), StoreError>;
    /// Whether the pair has ever been claimed, deleted rows included.
    fn has_applied(
        &self,
        job_offer_id: &JobOfferId,
        applicant: &UserId,
    ) -> Result<bool, StoreError>;
    fn applications_for_offer(
        &self,
        job_offer_id: &JobOfferId,
    ) -> Result<Vec<Application>, StoreError>;
}

/// Notification rows. All reads are scoped to the recipient.
pub trait NotificationStore: Send + Sync {
    fn insert_notification(&self, notification: Notification) -> Result<Notification, StoreError>;
    fn notifications_for(&self, recipient: &UserId) -> Result<Vec<Notification>, StoreError>;
    fn mark_notification_read(
        &self,
        id: &NotificationId,
        recipient: &UserId,
    ) -> Result<(), StoreError>;
}

/// Everything the board service needs from one storage backend.
pub trait BoardStore: DirectoryStore + ApplicationStore + NotificationStore {}

impl<S> BoardStore for S where S: DirectoryStore + ApplicationStore + NotificationStore {}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
