#![cfg(test)]

use std::cell::RefCell;
use std::fs;
use std::sync::Arc;

use contactbook_core::import::{self, ColumnMapping, ColumnTarget, ImportService};
use tempfile::TempDir;

use crate::support::FakeBackend;

const ADDRESS_BOOK: &str = "\
First Name,Last Name,E-mail,Phone Number,Company
Ada,Lovelace,ada@example.com,+44 20 7946 0000,Analytical Engines
Grace,Hopper,grace@example.com,+1 202 555 0100,US Navy
Alan,Turing,alan@example.com,,Bletchley Park
Katherine,Johnson,katherine@example.com,,NASA
Edsger,Dijkstra,edsger@example.com,,
";

const VCARDS: &str = "\
BEGIN:VCARD
VERSION:3.0
N:Hopper;Grace;;;
FN:Grace Hopper
EMAIL;TYPE=work:grace@example.com
ORG:US Navy
END:VCARD
BEGIN:VCARD
VERSION:3.0
FN:Margaret Hamilton
TEL;TYPE=cell:+1 617 555 0199
END:VCARD
";

fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

#[tokio::test]
async fn known_headers_import_every_record_without_review() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "contacts.csv", ADDRESS_BOOK);
    let backend = Arc::new(FakeBackend::new());

    let table = import::read_table(&path).unwrap();
    let outcome = ColumnMapping::auto(&table.headers);
    assert!(!outcome.needs_review());

    let prepared = outcome.into_mapping().apply(&table);
    assert_eq!(prepared.rows.len(), 5);
    assert!(prepared.skipped.is_empty());

    let service = ImportService::new(backend.clone(), 2);
    let seen = RefCell::new(Vec::new());
    let summary = service
        .submit(&prepared, |progress| seen.borrow_mut().push(progress.processed))
        .await;

    assert_eq!(summary.imported, 5);
    assert_eq!(summary.failed, 0);
    assert!(!summary.aborted);
    assert_eq!(backend.calls("create_contact"), 5);
    assert_eq!(seen.into_inner(), vec![2, 4, 5]);

    let grace = backend
        .contacts()
        .into_iter()
        .find(|c| c.email.as_deref() == Some("grace@example.com"))
        .unwrap();
    assert_eq!(grace.first_name.as_deref(), Some("Grace"));
    assert_eq!(grace.company.as_deref(), Some("US Navy"));
}

#[tokio::test]
async fn rejected_records_are_counted_and_the_rest_still_imported() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "contacts.csv", ADDRESS_BOOK);
    let backend = Arc::new(FakeBackend::new());
    backend.reject_email("alan@example.com");

    let table = import::read_table(&path).unwrap();
    let prepared = ColumnMapping::auto(&table.headers).into_mapping().apply(&table);
    let summary = ImportService::new(backend.clone(), 10)
        .submit(&prepared, |_| {})
        .await;

    assert_eq!(summary.imported, 4);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].record, 3);
    assert_eq!(backend.contacts().len(), 4);
}

#[test]
fn unknown_header_asks_for_review_only_for_that_column() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "contacts.csv",
        "Name,Email,Shoe Size\nAda Lovelace,ada@example.com,38\n",
    );

    let table = import::read_table(&path).unwrap();
    let outcome = ColumnMapping::auto(&table.headers);
    assert!(outcome.needs_review());

    let mut mapping = outcome.into_mapping();
    assert_eq!(mapping.unmapped(), vec![2]);
    assert_eq!(mapping.target(0), Some(ColumnTarget::FullName));

    mapping.skip_unmapped();
    let prepared = mapping.apply(&table);
    let ada = &prepared.rows[0].contact;
    assert_eq!(ada.first_name.as_deref(), Some("Ada"));
    assert_eq!(ada.last_name.as_deref(), Some("Lovelace"));
}

#[tokio::test]
async fn vcards_go_through_the_same_pipeline() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "people.vcf", VCARDS);
    let backend = Arc::new(FakeBackend::new());

    let table = import::read_table(&path).unwrap();
    let outcome = ColumnMapping::auto(&table.headers);
    assert!(!outcome.needs_review());

    let prepared = outcome.into_mapping().apply(&table);
    let summary = ImportService::new(backend.clone(), 10)
        .submit(&prepared, |_| {})
        .await;
    assert_eq!(summary.imported, 2);

    let names: Vec<String> = backend.contacts().iter().map(|c| c.display_name()).collect();
    assert!(names.contains(&"Grace Hopper".to_owned()));
    assert!(names.contains(&"Margaret Hamilton".to_owned()));
}
