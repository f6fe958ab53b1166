use jobport::board::{
    Company, CompanyId, DirectoryStore, JobOffer, JobOfferId, MemoryStore, Role, StoreError, User,
    UserId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Everything `seed_directory` installs, by name. The binary has no sign-up
/// surface, so both the serve and demo commands start from this cast.
pub(crate) struct SeededDirectory {
    pub(crate) first_applicant: UserId,
    pub(crate) second_applicant: UserId,
    pub(crate) northbeam_rep: UserId,
    pub(crate) tidewater_rep: UserId,
    pub(crate) admin: UserId,
    pub(crate) platform_offer: JobOffer,
    pub(crate) data_offer: JobOffer,
    pub(crate) ops_offer: JobOffer,
}

/// Populate a fresh store with two companies and their reps, two applicants,
/// one admin and three open offers. Subject ids double as `x-actor` values.
pub(crate) fn seed_directory(store: &MemoryStore) -> Result<SeededDirectory, StoreError> {
    let ada = store
        .insert_user(User {
            id: UserId("ada".to_string()),
            role: Role::Applicant,
        })?
        .id;
    let bram = store
        .insert_user(User {
            id: UserId("bram".to_string()),
            role: Role::Applicant,
        })?
        .id;
    let nora = store
        .insert_user(User {
            id: UserId("nora".to_string()),
            role: Role::CompanyRep,
        })?
        .id;
    let theo = store
        .insert_user(User {
            id: UserId("theo".to_string()),
            role: Role::CompanyRep,
        })?
        .id;
    let mara = store
        .insert_user(User {
            id: UserId("mara".to_string()),
            role: Role::Admin,
        })?
        .id;

    let northbeam = store.insert_company(Company {
        id: CompanyId("northbeam".to_string()),
        owner_user_id: nora.clone(),
        name: "Northbeam Analytics".to_string(),
    })?;
    let tidewater = store.insert_company(Company {
        id: CompanyId("tidewater".to_string()),
        owner_user_id: theo.clone(),
        name: "Tidewater Logistics".to_string(),
    })?;

    let platform_offer = store.insert_job_offer(JobOffer {
        id: JobOfferId("offer-platform".to_string()),
        company_id: northbeam.id.clone(),
        title: "Platform Engineer".to_string(),
        is_active: true,
    })?;
    let data_offer = store.insert_job_offer(JobOffer {
        id: JobOfferId("offer-data".to_string()),
        company_id: northbeam.id,
        title: "Data Engineer".to_string(),
        is_active: true,
    })?;
    let ops_offer = store.insert_job_offer(JobOffer {
        id: JobOfferId("offer-ops".to_string()),
        company_id: tidewater.id,
        title: "Operations Analyst".to_string(),
        is_active: true,
    })?;

    Ok(SeededDirectory {
        first_applicant: ada,
        second_applicant: bram,
        northbeam_rep: nora,
        tidewater_rep: theo,
        admin: mara,
        platform_offer,
        data_offer,
        ops_offer,
    })
}
