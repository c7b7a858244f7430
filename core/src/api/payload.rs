//! Response envelopes.
//!
//! Depending on the endpoint the backend answers with a bare record, a bare
//! array, or the same wrapped in a named key. These untagged enums accept all
//! of them.

use serde::Deserialize;

/// A single record, optionally wrapped. Wrapped variants come first because a
/// bare [`Contact`](contactbook_common::models::Contact) accepts any object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum Single<T> {
    Contact { contact: T },
    Group { group: T },
    User { user: T },
    Data { data: T },
    Bare(T),
}

impl<T> Single<T> {
    pub(super) fn into_inner(self) -> T {
        match self {
            Single::Contact { contact } => contact,
            Single::Group { group } => group,
            Single::User { user } => user,
            Single::Data { data } => data,
            Single::Bare(inner) => inner,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum Listing<T> {
    Bare(Vec<T>),
    Contacts { contacts: Vec<T> },
    Groups { groups: Vec<T> },
    Data { data: Vec<T> },
}

impl<T> Listing<T> {
    pub(super) fn into_inner(self) -> Vec<T> {
        match self {
            Listing::Bare(items) => items,
            Listing::Contacts { contacts } => contacts,
            Listing::Groups { groups } => groups,
            Listing::Data { data } => data,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    pub(super) fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty())
    }
}
