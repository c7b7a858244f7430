//! Contact listing and single-record operations.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use contactbook_common::error::{ApiError, SessionError};
use contactbook_common::models::{Contact, ContactField, SortOrder};
use contactbook_common::ports::{ContactsApi, SessionStore};
use thiserror::Error;
use tracing::{debug, info};

use crate::search;

#[derive(Debug, Error)]
pub enum ContactsError {
    #[error("a contact needs a first name, last name or email")]
    MissingIdentity,
    #[error("invalid field edit {0:?}, expected field=value")]
    InvalidEdit(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ContactsError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ContactsError::Api(ApiError::Unauthorized))
    }
}

/// `field=value` assignment given on the command line. An empty value clears
/// the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub field: ContactField,
    pub value: String,
}

impl FieldEdit {
    pub fn apply(&self, contact: &mut Contact) {
        self.field.set(contact, Some(self.value.clone()));
    }
}

impl FromStr for FieldEdit {
    type Err = ContactsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| ContactsError::InvalidEdit(s.to_owned()))?;
        let field = key
            .parse::<ContactField>()
            .map_err(|_| ContactsError::InvalidEdit(s.to_owned()))?;
        Ok(Self {
            field,
            value: value.trim().to_owned(),
        })
    }
}

impl fmt::Display for FieldEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field, self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub group: Option<i64>,
    /// Explicit order; remembered for later listings. `None` uses the stored one.
    pub sort: Option<SortOrder>,
}

pub struct ContactsService {
    api: Arc<dyn ContactsApi>,
    session: Arc<dyn SessionStore>,
}

impl ContactsService {
    pub fn new(api: Arc<dyn ContactsApi>, session: Arc<dyn SessionStore>) -> Self {
        Self { api, session }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Contact>, ContactsError> {
        let order = self.resolve_sort(query.sort)?;
        let contacts = match query.group {
            Some(group_id) => self.api.group_contacts(group_id).await?,
            None => self.api.list_contacts().await?,
        };

        let mut contacts = match query.search.as_deref() {
            Some(term) => search::filter(contacts, term),
            None => contacts,
        };
        search::sort_contacts(&mut contacts, order);
        debug!(count = contacts.len(), %order, "listed contacts");
        Ok(contacts)
    }

    fn resolve_sort(&self, requested: Option<SortOrder>) -> Result<SortOrder, ContactsError> {
        match requested {
            Some(order) => {
                if self.session.sort_order() != Some(order) {
                    self.session.set_sort_order(order)?;
                }
                Ok(order)
            }
            None => Ok(self.session.sort_order().unwrap_or_default()),
        }
    }

    pub async fn get(&self, id: i64) -> Result<Contact, ContactsError> {
        Ok(self.api.get_contact(id).await?)
    }

    pub async fn create(&self, contact: &Contact) -> Result<Contact, ContactsError> {
        if !contact.has_identity() {
            return Err(ContactsError::MissingIdentity);
        }
        let created = self.api.create_contact(contact).await?;
        info!(contact_id = ?created.id, "contact created");
        Ok(created)
    }

    /// Loads the contact, applies `edits` in order and saves it.
    pub async fn update(&self, id: i64, edits: &[FieldEdit]) -> Result<Contact, ContactsError> {
        let mut contact = self.api.get_contact(id).await?;
        for edit in edits {
            edit.apply(&mut contact);
        }
        if !contact.has_identity() {
            return Err(ContactsError::MissingIdentity);
        }
        let updated = self.api.update_contact(id, &contact).await?;
        info!(contact_id = id, fields = edits.len(), "contact updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContactsError> {
        self.api.delete_contact(id).await?;
        info!(contact_id = id, "contact deleted");
        Ok(())
    }
}
