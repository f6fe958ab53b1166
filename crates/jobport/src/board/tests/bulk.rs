use super::common::*;
use crate::board::bulk::{BulkCoordinator, BulkFailure, BulkOutcome};
use crate::board::domain::{Application, ApplicationId, ApplicationStatus};
use crate::board::memory::MemoryStore;
use crate::board::store::ApplicationStore;
use std::sync::Arc;

fn coordinator() -> (
    BulkCoordinator<MemoryStore, CountingNotifier>,
    Arc<MemoryStore>,
    Arc<CountingNotifier>,
) {
    let store = seeded_store();
    let notifier = Arc::new(CountingNotifier::default());
    let coordinator = BulkCoordinator::new(store.clone(), notifier.clone());
    (coordinator, store, notifier)
}

fn seed(store: &MemoryStore, application: Application) -> ApplicationId {
    store
        .insert_application(application)
        .expect("seed application")
        .id
}

fn ids(raw: &[&ApplicationId]) -> Vec<ApplicationId> {
    raw.iter().map(|id| (*id).clone()).collect()
}

#[test]
fn empty_input_is_rejected_up_front() {
    let (coordinator, _store, notifier) = coordinator();

    coordinator
        .transition_all(&owner_rep_actor(), &[], ApplicationStatus::Reviewed)
        .expect_err("empty batch must not be a silent no-op");
    assert!(notifier.sent().is_empty());
}

#[test]
fn mixed_batch_splits_item_by_item() {
    let (coordinator, store, notifier) = coordinator();

    let open = seed(&store, pending_application("app-bk1"));
    let closed = seed(
        &store,
        application_with_status("app-bk2", ApplicationStatus::Accepted),
    );
    // Filed by ben against Orbit's offer, so rhea has no standing.
    let mut foreign = pending_application("app-bk3");
    foreign.job_offer_id = dispatch_offer_id();
    foreign.applicant_user_id = second_applicant_actor().user_id;
    let foreign = seed(&store, foreign);
    let missing = ApplicationId("app-bk-missing".to_string());

    let outcome = coordinator
        .transition_all(
            &owner_rep_actor(),
            &ids(&[&open, &closed, &foreign, &missing]),
            ApplicationStatus::Reviewed,
        )
        .expect("mixed batch still returns an outcome");

    assert_eq!(outcome.succeeded, vec![open.clone()]);
    assert_eq!(outcome.failed.len(), 3);
    assert_eq!(
        outcome.failed.get(&closed),
        Some(&BulkFailure::TerminalState {
            from: ApplicationStatus::Accepted
        })
    );
    assert_eq!(outcome.failed.get(&foreign), Some(&BulkFailure::Forbidden));
    assert_eq!(outcome.failed.get(&missing), Some(&BulkFailure::NotFound));

    // Only the item that went through announced anything.
    assert_eq!(notifier.sent().len(), 1);

    let stored = store
        .application(&open)
        .expect("lookup succeeds")
        .expect("row present");
    assert_eq!(stored.status, ApplicationStatus::Reviewed);
}

#[test]
fn repeated_ids_are_processed_once() {
    let (coordinator, store, notifier) = coordinator();
    let open = seed(&store, pending_application("app-bk4"));

    let outcome = coordinator
        .transition_all(
            &owner_rep_actor(),
            &ids(&[&open, &open, &open]),
            ApplicationStatus::Reviewed,
        )
        .expect("batch runs");

    assert_eq!(outcome.succeeded, vec![open]);
    assert!(outcome.failed.is_empty());
    assert_eq!(notifier.sent().len(), 1, "one item, one announcement");
}

#[test]
fn retry_after_terminal_lands_in_failed_not_error() {
    let (coordinator, store, _notifier) = coordinator();
    let open = seed(&store, pending_application("app-bk5"));
    let batch = ids(&[&open]);

    let first = coordinator
        .transition_all(&owner_rep_actor(), &batch, ApplicationStatus::Accepted)
        .expect("first run");
    assert_eq!(first.succeeded, vec![open.clone()]);

    let second = coordinator
        .transition_all(&owner_rep_actor(), &batch, ApplicationStatus::Accepted)
        .expect("retry still returns an outcome");
    assert!(second.succeeded.is_empty());
    assert_eq!(
        second.failed.get(&open),
        Some(&BulkFailure::TerminalState {
            from: ApplicationStatus::Accepted
        })
    );
}

#[test]
fn batch_to_pending_fails_per_item() {
    let (coordinator, store, _notifier) = coordinator();
    let open = seed(&store, pending_application("app-bk6"));

    let outcome = coordinator
        .transition_all(&owner_rep_actor(), &ids(&[&open]), ApplicationStatus::Pending)
        .expect("batch runs");

    assert!(outcome.succeeded.is_empty());
    assert_eq!(outcome.failed.get(&open), Some(&BulkFailure::InvalidStatus));
}

#[test]
fn applicants_have_no_bulk_standing() {
    let (coordinator, store, _notifier) = coordinator();
    let open = seed(&store, pending_application("app-bk7"));

    let outcome = coordinator
        .transition_all(&applicant_actor(), &ids(&[&open]), ApplicationStatus::Reviewed)
        .expect("batch runs");

    assert_eq!(outcome.failed.get(&open), Some(&BulkFailure::Forbidden));
}

#[test]
fn admins_triage_across_companies() {
    let (coordinator, store, _notifier) = coordinator();
    let acme_item = seed(&store, pending_application("app-bk8"));
    let mut orbit_row = pending_application("app-bk9");
    orbit_row.job_offer_id = dispatch_offer_id();
    orbit_row.applicant_user_id = second_applicant_actor().user_id;
    let orbit_item = seed(&store, orbit_row);

    let outcome = coordinator
        .transition_all(
            &admin_actor(),
            &ids(&[&acme_item, &orbit_item]),
            ApplicationStatus::Reviewed,
        )
        .expect("batch runs");

    assert_eq!(outcome.succeeded.len(), 2);
    assert!(outcome.failed.is_empty());
}

#[test]
fn store_outage_marks_items_unavailable() {
    let coordinator = BulkCoordinator::new(
        Arc::new(UnavailableStore),
        Arc::new(CountingNotifier::default()),
    );
    let id = ApplicationId("app-bk10".to_string());

    let outcome: BulkOutcome = coordinator
        .transition_all(
            &owner_rep_actor(),
            &ids(&[&id]),
            ApplicationStatus::Reviewed,
        )
        .expect("outage is a per-item failure");

    assert_eq!(outcome.failed.get(&id), Some(&BulkFailure::Unavailable));
}
