#![cfg(test)]

use std::sync::Arc;

use contactbook_common::models::{Contact, ContactField};
use contactbook_core::duplicates::{find_duplicates, MatchReason};
use contactbook_core::merge::{MergeService, NOTES_SEPARATOR};

use crate::support::FakeBackend;

fn seed_pair(backend: &FakeBackend) -> (i64, i64) {
    let primary = backend.seed_contact(Contact {
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        email: Some("ada@example.com".into()),
        company: Some("Engines".into()),
        notes: Some("met at the Royal Society".into()),
        ..Default::default()
    });
    let secondary = backend.seed_contact(Contact {
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        email: Some("ADA@example.com ".into()),
        phone: Some("+44 20 7946 0000".into()),
        company: Some("Analytical Engines".into()),
        notes: Some("prefers letters".into()),
        ..Default::default()
    });
    (primary, secondary)
}

#[tokio::test]
async fn merge_keeps_primary_fills_gaps_and_deletes_secondary() {
    let backend = Arc::new(FakeBackend::new());
    let (primary, secondary) = seed_pair(&backend);

    let service = MergeService::new(backend.clone());
    let proposal = service.propose(primary, secondary).await.unwrap();
    let merged = service.apply(proposal).await.unwrap();

    assert_eq!(merged.id, Some(primary));
    assert_eq!(merged.email.as_deref(), Some("ada@example.com"));
    assert_eq!(merged.phone.as_deref(), Some("+44 20 7946 0000"));
    assert_eq!(merged.company.as_deref(), Some("Analytical Engines"));
    assert_eq!(
        merged.notes,
        Some(format!("met at the Royal Society{NOTES_SEPARATOR}prefers letters"))
    );

    assert_eq!(backend.contact(primary), Some(merged));
    assert_eq!(backend.contact(secondary), None);
    assert_eq!(backend.calls("update_contact"), 1);
    assert_eq!(backend.calls("delete_contact"), 1);
}

#[tokio::test]
async fn manual_choice_overrides_the_proposal() {
    let backend = Arc::new(FakeBackend::new());
    let (primary, secondary) = seed_pair(&backend);

    let service = MergeService::new(backend.clone());
    let mut proposal = service.propose(primary, secondary).await.unwrap();
    assert!(proposal.conflicts().iter().any(|c| c.field == ContactField::Company));
    proposal.set(ContactField::Company, "Engines");

    let merged = service.apply(proposal).await.unwrap();
    assert_eq!(merged.company.as_deref(), Some("Engines"));
}

#[tokio::test]
async fn duplicates_found_by_email_merge_into_one_record() {
    let backend = Arc::new(FakeBackend::new());
    let (primary, secondary) = seed_pair(&backend);
    backend.seed_contact(Contact {
        first_name: Some("Grace".into()),
        email: Some("grace@example.com".into()),
        ..Default::default()
    });

    let pairs = find_duplicates(&backend.contacts());
    assert_eq!(pairs.len(), 1);
    assert_eq!((pairs[0].primary, pairs[0].secondary), (primary, secondary));
    assert_eq!(pairs[0].reason, MatchReason::Email);

    let service = MergeService::new(backend.clone());
    let proposal = service.propose(pairs[0].primary, pairs[0].secondary).await.unwrap();
    service.apply(proposal).await.unwrap();

    assert_eq!(backend.contacts().len(), 2);
    assert!(find_duplicates(&backend.contacts()).is_empty());
}
