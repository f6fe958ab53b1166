use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::domain::{
    Application, ApplicationId, Company, CompanyId, JobOffer, JobOfferId, Notification,
    NotificationId, User, UserId,
};
use super::store::{ApplicationStore, DirectoryStore, NotificationStore, StoreError};

/// In-memory store backing the demo binary and the test suites.
///
/// Application rows and their uniqueness claims share one mutex so the
/// constrained insert is a single critical section. A claim outlives its row:
/// deleting an application does not reopen the offer for that applicant.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<UserId, User>>,
    companies: Mutex<HashMap<CompanyId, Company>>,
    job_offers: Mutex<HashMap<JobOfferId, JobOffer>>,
    applications: Mutex<ApplicationTable>,
    notifications: Mutex<Vec<Notification>>,
}

#[derive(Default)]
struct ApplicationTable {
    rows: HashMap<ApplicationId, Application>,
    claims: HashSet<(JobOfferId, UserId)>,
}

impl DirectoryStore for MemoryStore {
    fn user(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let table = self.users.lock().expect("store mutex poisoned");
        Ok(table.get(id).cloned())
    }

    fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut table = self.users.lock().expect("store mutex poisoned");
        if table.contains_key(&user.id) {
            return Err(StoreError::Conflict);
        }
        table.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn company(&self, id: &CompanyId) -> Result<Option<Company>, StoreError> {
        let table = self.companies.lock().expect("store mutex poisoned");
        Ok(table.get(id).cloned())
    }

    fn company_owned_by(&self, owner: &UserId) -> Result<Option<Company>, StoreError> {
        let table = self.companies.lock().expect("store mutex poisoned");
        Ok(table
            .values()
            .find(|company| company.owner_user_id == *owner)
            .cloned())
    }

    fn insert_company(&self, company: Company) -> Result<Company, StoreError> {
        let mut table = self.companies.lock().expect("store mutex poisoned");
        if table.contains_key(&company.id) {
            return Err(StoreError::Conflict);
        }
        table.insert(company.id.clone(), company.clone());
        Ok(company)
    }

    fn job_offer(&self, id: &JobOfferId) -> Result<Option<JobOffer>, StoreError> {
        let table = self.job_offers.lock().expect("store mutex poisoned");
        Ok(table.get(id).cloned())
    }

    fn insert_job_offer(&self, offer: JobOffer) -> Result<JobOffer, StoreError> {
        let mut table = self.job_offers.lock().expect("store mutex poisoned");
        if table.contains_key(&offer.id) {
            return Err(StoreError::Conflict);
        }
        table.insert(offer.id.clone(), offer.clone());
        Ok(offer)
    }

    fn update_job_offer(&self, offer: JobOffer) -> Result<(), StoreError> {
        let mut table = self.job_offers.lock().expect("store mutex poisoned");
        if !table.contains_key(&offer.id) {
            return Err(StoreError::NotFound);
        }
        table.insert(offer.id.clone(), offer);
        Ok(())
    }
}

impl ApplicationStore for MemoryStore {
    fn insert_application(&self, application: Application) -> Result<Application, StoreError> {
        let mut table = self.applications.lock().expect("store mutex poisoned");
        let claim = (
            application.job_offer_id.clone(),
            application.applicant_user_id.clone(),
        );
        if !table.claims.insert(claim) {
            return Err(StoreError::Conflict);
        }
        table.rows.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let table = self.applications.lock().expect("store mutex poisoned");
        Ok(table.rows.get(id).cloned())
    }

    fn update_application(&self, application: Application) -> Result<(), StoreError> {
        let mut table = self.applications.lock().expect("store mutex poisoned");
        if !table.rows.contains_key(&application.id) {
            return Err(StoreError::NotFound);
        }
        table.rows.insert(application.id.clone(), application);
        Ok(())
    }

    fn delete_application(&self, id: &ApplicationId) -> Result<(), StoreError> {
        let mut table = self.applications.lock().expect("store mutex poisoned");
        // The claim stays behind so the pair can never be refiled.
        match table.rows.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    fn has_applied(
        &self,
        job_offer_id: &JobOfferId,
        applicant: &UserId,
    ) -> Result<bool, StoreError> {
        let table = self.applications.lock().expect("store mutex poisoned");
        Ok(table
            .claims
            .contains(&(job_offer_id.clone(), applicant.clone())))
    }

    fn applications_for_offer(
        &self,
        job_offer_id: &JobOfferId,
    ) -> Result<Vec<Application>, StoreError> {
        let table = self.applications.lock().expect("store mutex poisoned");
        let mut rows: Vec<Application> = table
            .rows
            .values()
            .filter(|row| row.job_offer_id == *job_offer_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }
}

impl NotificationStore for MemoryStore {
    fn insert_notification(
        &self,
        notification: Notification,
    ) -> Result<Notification, StoreError> {
        let mut table = self.notifications.lock().expect("store mutex poisoned");
        table.push(notification.clone());
        Ok(notification)
    }

    fn notifications_for(&self, recipient: &UserId) -> Result<Vec<Notification>, StoreError> {
        let table = self.notifications.lock().expect("store mutex poisoned");
        Ok(table
            .iter()
            .filter(|notification| notification.recipient_user_id == *recipient)
            .cloned()
            .collect())
    }

    fn mark_notification_read(
        &self,
        id: &NotificationId,
        recipient: &UserId,
    ) -> Result<(), StoreError> {
        let mut table = self.notifications.lock().expect("store mutex poisoned");
        match table.iter_mut().find(|notification| {
            notification.id == *id && notification.recipient_user_id == *recipient
        }) {
            Some(notification) => {
                notification.is_read = true;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}
