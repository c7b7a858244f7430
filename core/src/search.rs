//! Client-side filtering and ordering of contact listings.

use std::cmp::Ordering;

use contactbook_common::models::{Contact, SortOrder};

/// Case-insensitive substring match over name, email, phone, company and job
/// title. A blank term matches everything.
pub fn matches(contact: &Contact, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    let full_name = contact.full_name();
    [
        full_name.as_deref(),
        contact.email.as_deref(),
        contact.phone.as_deref(),
        contact.company.as_deref(),
        contact.job_title.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|value| value.to_lowercase().contains(&term))
}

pub fn filter(contacts: Vec<Contact>, term: &str) -> Vec<Contact> {
    contacts.into_iter().filter(|c| matches(c, term)).collect()
}

pub fn sort_contacts(contacts: &mut [Contact], order: SortOrder) {
    match order {
        SortOrder::NameAsc => contacts.sort_by(by_name),
        SortOrder::NameDesc => contacts.sort_by(|a, b| by_name(b, a)),
        SortOrder::Newest => contacts.sort_by(|a, b| by_created(b, a)),
        SortOrder::Oldest => contacts.sort_by(by_created),
        SortOrder::Company => contacts.sort_by(|a, b| {
            // contacts without a company go last
            match (lowered(&a.company), lowered(&b.company)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| by_name(a, b))
        }),
    }
}

fn lowered(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn by_name(a: &Contact, b: &Contact) -> Ordering {
    let key = |c: &Contact| {
        (
            lowered(&c.last_name).unwrap_or_default(),
            lowered(&c.first_name).unwrap_or_default(),
            lowered(&c.email).unwrap_or_default(),
        )
    };
    key(a).cmp(&key(b)).then_with(|| a.id.cmp(&b.id))
}

/// ISO-8601 timestamps order correctly as text.
fn by_created(a: &Contact, b: &Contact) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}
