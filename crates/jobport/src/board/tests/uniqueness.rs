use super::common::*;
use crate::board::memory::MemoryStore;
use crate::board::store::{ApplicationStore, StoreError};
use crate::board::uniqueness::{Reservation, UniquenessEnforcer};
use std::sync::Arc;
use std::thread;

fn enforcer() -> (UniquenessEnforcer<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    (UniquenessEnforcer::new(store.clone()), store)
}

#[test]
fn first_reservation_wins_the_pair() {
    let (enforcer, store) = enforcer();

    match enforcer.try_reserve(pending_application("app-u1")) {
        Ok(Reservation::Reserved(stored)) => assert_eq!(stored.id.0, "app-u1"),
        other => panic!("expected reservation, got {other:?}"),
    }

    // Same (offer, applicant) pair under a fresh id.
    match enforcer.try_reserve(pending_application("app-u2")) {
        Ok(Reservation::AlreadyExists) => {}
        other => panic!("expected existing claim, got {other:?}"),
    }

    assert!(store
        .application(&pending_application("app-u1").id)
        .expect("lookup succeeds")
        .is_some());
    assert!(store
        .application(&pending_application("app-u2").id)
        .expect("lookup succeeds")
        .is_none());
}

#[test]
fn concurrent_reservations_admit_exactly_one() {
    let store = Arc::new(MemoryStore::default());
    let enforcer = Arc::new(UniquenessEnforcer::new(store.clone()));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let enforcer = enforcer.clone();
            thread::spawn(move || {
                enforcer.try_reserve(pending_application(&format!("app-race-{worker}")))
            })
        })
        .collect();

    let outcomes: Vec<Reservation> = handles
        .into_iter()
        .map(|handle| {
            handle
                .join()
                .expect("reservation thread joins")
                .expect("store reachable")
        })
        .collect();

    let reserved = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Reservation::Reserved(_)))
        .count();
    assert_eq!(reserved, 1, "exactly one concurrent insert may win");
    assert_eq!(outcomes.len(), 8);

    assert!(store
        .has_applied(&backend_offer_id(), &applicant_actor().user_id)
        .expect("claim lookup"));
}

#[test]
fn can_apply_flips_once_the_pair_is_claimed() {
    let (enforcer, _store) = enforcer();
    let applicant = applicant_actor().user_id;

    assert!(enforcer
        .can_apply(&backend_offer_id(), &applicant)
        .expect("advisory check"));

    enforcer
        .try_reserve(pending_application("app-u3"))
        .expect("reservation succeeds");

    assert!(!enforcer
        .can_apply(&backend_offer_id(), &applicant)
        .expect("advisory check"));
}

#[test]
fn claim_outlives_the_application_row() {
    let (enforcer, store) = enforcer();
    let filed = pending_application("app-u4");

    enforcer
        .try_reserve(filed.clone())
        .expect("reservation succeeds");
    store.delete_application(&filed.id).expect("row deleted");

    assert!(!enforcer
        .can_apply(&backend_offer_id(), &applicant_actor().user_id)
        .expect("advisory check"));
    match enforcer.try_reserve(pending_application("app-u5")) {
        Ok(Reservation::AlreadyExists) => {}
        other => panic!("deleted pair must stay claimed, got {other:?}"),
    }
}

#[test]
fn storage_outage_is_not_reported_as_a_claim() {
    let enforcer = UniquenessEnforcer::new(Arc::new(UnavailableStore));

    match enforcer.try_reserve(pending_application("app-u6")) {
        Err(StoreError::Unavailable(_)) => {}
        other => panic!("expected outage to surface, got {other:?}"),
    }
    match enforcer.can_apply(&backend_offer_id(), &applicant_actor().user_id) {
        Err(StoreError::Unavailable(_)) => {}
        other => panic!("expected outage to surface, got {other:?}"),
    }
}
