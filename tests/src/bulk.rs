#![cfg(test)]

use std::sync::Arc;

use contactbook_common::models::Contact;
use contactbook_core::bulk::{BulkService, Selection};

use crate::support::FakeBackend;

fn seed_contacts(backend: &FakeBackend, count: usize) -> Vec<i64> {
    (0..count)
        .map(|n| {
            backend.seed_contact(Contact {
                email: Some(format!("person{n}@example.com")),
                ..Default::default()
            })
        })
        .collect()
}

#[tokio::test]
async fn assigning_k_contacts_sends_k_requests_and_clears_the_selection() {
    let backend = Arc::new(FakeBackend::new());
    let group = backend.seed_group("Friends");
    let ids = seed_contacts(&backend, 7);

    let mut selection: Selection = ids.iter().copied().collect();
    let outcome = BulkService::new(backend.clone(), 3)
        .assign_to_group(group, &mut selection)
        .await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.succeeded.len(), 7);
    assert_eq!(backend.calls("add_to_group"), 7);
    assert!(selection.is_empty());
    assert_eq!(backend.members_of(group), ids);
}

#[tokio::test]
async fn failed_ids_stay_selected_for_a_retry() {
    let backend = Arc::new(FakeBackend::new());
    let group = backend.seed_group("Team");
    let mut ids = seed_contacts(&backend, 3);
    ids.push(999);

    let mut selection: Selection = ids.iter().copied().collect();
    let outcome = BulkService::new(backend.clone(), 10)
        .assign_to_group(group, &mut selection)
        .await;

    assert!(!outcome.is_complete());
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0, 999);
    assert_eq!(selection.ids(), &[999]);
}

#[tokio::test]
async fn removing_and_deleting_use_the_same_selection_rules() {
    let backend = Arc::new(FakeBackend::new());
    let group = backend.seed_group("Clients");
    let ids = seed_contacts(&backend, 4);
    let service = BulkService::new(backend.clone(), 2);

    let mut selection: Selection = ids.iter().copied().collect();
    service.assign_to_group(group, &mut selection).await;

    let mut selection: Selection = ids[..2].iter().copied().collect();
    let removed = service.remove_from_group(group, &mut selection).await;
    assert!(removed.is_complete());
    assert_eq!(backend.members_of(group), ids[2..].to_vec());

    let mut selection: Selection = ids.iter().copied().collect();
    let deleted = service.delete_contacts(&mut selection).await;
    assert_eq!(deleted.succeeded.len(), 4);
    assert!(backend.contacts().is_empty());
    assert!(backend.members_of(group).is_empty());
}
