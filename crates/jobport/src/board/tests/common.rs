use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::board::domain::{
    Actor, Application, ApplicationId, ApplicationStatus, Company, CompanyId, JobOffer, JobOfferId,
    Notification, NotificationId, NotificationKind, Role, User, UserId,
};
use crate::board::memory::MemoryStore;
use crate::board::notify::{NotificationDispatcher, NotifyError, StoreNotifier};
use crate::board::store::{ApplicationStore, DirectoryStore, NotificationStore, StoreError};
use crate::board::{board_router, BoardService};

pub(super) fn applicant_actor() -> Actor {
    Actor::new(UserId("user-ava".to_string()), Role::Applicant)
}

pub(super) fn second_applicant_actor() -> Actor {
    Actor::new(UserId("user-ben".to_string()), Role::Applicant)
}

/// Representative owning Acme Robotics, which posts the backend offer.
pub(super) fn owner_rep_actor() -> Actor {
    Actor::new(UserId("user-rhea".to_string()), Role::CompanyRep)
}

/// Representative owning Orbit Freight; foreign to every Acme offer.
pub(super) fn foreign_rep_actor() -> Actor {
    Actor::new(UserId("user-vik".to_string()), Role::CompanyRep)
}

pub(super) fn admin_actor() -> Actor {
    Actor::new(UserId("user-zed".to_string()), Role::Admin)
}

pub(super) fn backend_offer_id() -> JobOfferId {
    JobOfferId("job-backend".to_string())
}

pub(super) fn archived_offer_id() -> JobOfferId {
    JobOfferId("job-archived".to_string())
}

pub(super) fn dispatch_offer_id() -> JobOfferId {
    JobOfferId("job-dispatch".to_string())
}

/// Directory used by every suite: two applicants, two companies with one
/// representative each, one admin, and three offers (one inactive).
pub(super) fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::default());

    let users = [
        ("user-ava", Role::Applicant),
        ("user-ben", Role::Applicant),
        ("user-rhea", Role::CompanyRep),
        ("user-vik", Role::CompanyRep),
        ("user-zed", Role::Admin),
    ];
    for (id, role) in users {
        store
            .insert_user(User {
                id: UserId(id.to_string()),
                role,
            })
            .expect("seed user");
    }

    store
        .insert_company(Company {
            id: CompanyId("co-acme".to_string()),
            owner_user_id: UserId("user-rhea".to_string()),
            name: "Acme Robotics".to_string(),
        })
        .expect("seed company");
    store
        .insert_company(Company {
            id: CompanyId("co-orbit".to_string()),
            owner_user_id: UserId("user-vik".to_string()),
            name: "Orbit Freight".to_string(),
        })
        .expect("seed company");

    let offers = [
        ("job-backend", "co-acme", "Backend Engineer", true),
        ("job-archived", "co-acme", "Archived Role", false),
        ("job-dispatch", "co-orbit", "Dispatch Coordinator", true),
    ];
    for (id, company, title, is_active) in offers {
        store
            .insert_job_offer(JobOffer {
                id: JobOfferId(id.to_string()),
                company_id: CompanyId(company.to_string()),
                title: title.to_string(),
                is_active,
            })
            .expect("seed job offer");
    }

    store
}

pub(super) fn build_service() -> (
    BoardService<MemoryStore, StoreNotifier<MemoryStore>>,
    Arc<MemoryStore>,
) {
    let store = seeded_store();
    let notifier = Arc::new(StoreNotifier::new(store.clone()));
    let service = BoardService::new(store.clone(), notifier);
    (service, store)
}

pub(super) fn build_service_with_notifier<N>(
    notifier: N,
) -> (BoardService<MemoryStore, N>, Arc<MemoryStore>, Arc<N>)
where
    N: NotificationDispatcher + 'static,
{
    let store = seeded_store();
    let notifier = Arc::new(notifier);
    let service = BoardService::new(store.clone(), notifier.clone());
    (service, store, notifier)
}

/// Files ava's application against the backend offer through the service.
pub(super) fn file_application<N>(service: &BoardService<MemoryStore, N>) -> Application
where
    N: NotificationDispatcher + 'static,
{
    service
        .create_application(
            &applicant_actor(),
            &backend_offer_id(),
            Some("Six years of Rust services.".to_string()),
        )
        .expect("application files")
}

/// Row builder for suites that seed the storage layer directly.
pub(super) fn pending_application(id: &str) -> Application {
    let now = Utc::now();
    Application {
        id: ApplicationId(id.to_string()),
        job_offer_id: backend_offer_id(),
        applicant_user_id: UserId("user-ava".to_string()),
        status: ApplicationStatus::Pending,
        cover_note: None,
        created_at: now,
        updated_at: now,
    }
}

pub(super) fn application_with_status(id: &str, status: ApplicationStatus) -> Application {
    let mut application = pending_application(id);
    application.status = status;
    application
}

#[derive(Default)]
pub(super) struct CountingNotifier {
    sent: Mutex<Vec<(UserId, NotificationKind)>>,
}

impl CountingNotifier {
    pub(super) fn sent(&self) -> Vec<(UserId, NotificationKind)> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationDispatcher for CountingNotifier {
    fn notify(
        &self,
        recipient: &UserId,
        kind: NotificationKind,
    ) -> Result<Notification, NotifyError> {
        let mut sent = self.sent.lock().expect("notifier mutex poisoned");
        sent.push((recipient.clone(), kind));
        Ok(Notification {
            id: NotificationId(format!("ntf-test-{:03}", sent.len())),
            recipient_user_id: recipient.clone(),
            kind,
            message: kind.message(),
            is_read: false,
            created_at: Utc::now(),
        })
    }
}

pub(super) struct FailingNotifier;

impl NotificationDispatcher for FailingNotifier {
    fn notify(
        &self,
        _recipient: &UserId,
        _kind: NotificationKind,
    ) -> Result<Notification, NotifyError> {
        Err(NotifyError::Store(StoreError::Unavailable(
            "notification channel offline".to_string(),
        )))
    }
}

pub(super) struct UnavailableStore;

fn offline() -> StoreError {
    StoreError::Unavailable("backing store offline".to_string())
}

impl DirectoryStore for UnavailableStore {
    fn user(&self, _id: &UserId) -> Result<Option<User>, StoreError> {
        Err(offline())
    }

    fn insert_user(&self, _user: User) -> Result<User, StoreError> {
        Err(offline())
    }

    fn company(&self, _id: &CompanyId) -> Result<Option<Company>, StoreError> {
        Err(offline())
    }

    fn company_owned_by(&self, _owner: &UserId) -> Result<Option<Company>, StoreError> {
        Err(offline())
    }

    fn insert_company(&self, _company: Company) -> Result<Company, StoreError> {
        Err(offline())
    }

    fn job_offer(&self, _id: &JobOfferId) -> Result<Option<JobOffer>, StoreError> {
        Err(offline())
    }

    fn insert_job_offer(&self, _offer: JobOffer) -> Result<JobOffer, StoreError> {
        Err(offline())
    }

    fn update_job_offer(&self, _offer: JobOffer) -> Result<(), StoreError> {
        Err(offline())
    }
}

impl ApplicationStore for UnavailableStore {
    fn insert_application(&self, _application: Application) -> Result<Application, StoreError> {
        Err(offline())
    }

    fn application(&self, _id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Err(offline())
    }

    fn update_application(&self, _application: Application) -> Result<(), StoreError> {
        Err(offline())
    }

    fn delete_application(&self, _id: &ApplicationId) -> Result<(), StoreError> {
        Err(offline())
    }

    fn has_applied(
        &self,
        _job_offer_id: &JobOfferId,
        _applicant: &UserId,
    ) -> Result<bool, StoreError> {
        Err(offline())
    }

    fn applications_for_offer(
        &self,
        _job_offer_id: &JobOfferId,
    ) -> Result<Vec<Application>, StoreError> {
        Err(offline())
    }
}

impl NotificationStore for UnavailableStore {
    fn insert_notification(
        &self,
        _notification: Notification,
    ) -> Result<Notification, StoreError> {
        Err(offline())
    }

    fn notifications_for(&self, _recipient: &UserId) -> Result<Vec<Notification>, StoreError> {
        Err(offline())
    }

    fn mark_notification_read(
        &self,
        _id: &NotificationId,
        _recipient: &UserId,
    ) -> Result<(), StoreError> {
        Err(offline())
    }
}

pub(super) fn board_router_with_service(
    service: BoardService<MemoryStore, StoreNotifier<MemoryStore>>,
) -> axum::Router {
    board_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
