//! # Ports
//!
//! Traits that isolate the application services from the outside world.
//!
//! * [`ContactsApi`]: the REST backend (contacts, groups, authentication, export).
//! * [`SessionStore`]: local persistence of the bearer token and sort preference.
//!
//! Services in `contactbook-core` depend on these traits only. Concrete adapters
//! (reqwest client, JSON session file) implement them, and tests swap in doubles.
//! With the `mocks` feature enabled, mockall generates `MockContactsApi` and
//! `MockSessionStore`.

use async_trait::async_trait;

use crate::error::{ApiError, SessionError};
use crate::models::{Contact, Credentials, ExportFormat, Group, NewGroup, Session, SortOrder, User};

/// The REST contract of the contacts backend.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait ContactsApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn profile(&self) -> Result<User, ApiError>;

    async fn list_contacts(&self) -> Result<Vec<Contact>, ApiError>;
    async fn get_contact(&self, id: i64) -> Result<Contact, ApiError>;
    async fn create_contact(&self, contact: &Contact) -> Result<Contact, ApiError>;
    async fn update_contact(&self, id: i64, contact: &Contact) -> Result<Contact, ApiError>;
    async fn delete_contact(&self, id: i64) -> Result<(), ApiError>;

    async fn list_groups(&self) -> Result<Vec<Group>, ApiError>;
    async fn create_group(&self, group: &NewGroup) -> Result<Group, ApiError>;
    async fn update_group(&self, id: i64, group: &NewGroup) -> Result<Group, ApiError>;
    async fn delete_group(&self, id: i64) -> Result<(), ApiError>;
    async fn group_contacts(&self, group_id: i64) -> Result<Vec<Contact>, ApiError>;
    async fn add_to_group(&self, group_id: i64, contact_id: i64) -> Result<(), ApiError>;
    async fn remove_from_group(&self, group_id: i64, contact_id: i64) -> Result<(), ApiError>;

    /// Raw bytes of the exported address book.
    async fn export_contacts(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError>;
}

/// Client-side persistence, the terminal counterpart of browser local storage.
#[cfg_attr(feature = "mocks", mockall::automock)]
pub trait SessionStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str) -> Result<(), SessionError>;
    fn clear_token(&self) -> Result<(), SessionError>;

    fn sort_order(&self) -> Option<SortOrder>;
    fn set_sort_order(&self, order: SortOrder) -> Result<(), SessionError>;
}
