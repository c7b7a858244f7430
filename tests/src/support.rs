//! In-memory stand-ins for the backend and the session file.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use contactbook_common::error::{ApiError, SessionError};
use contactbook_common::models::{
    Contact, Credentials, ExportFormat, Group, NewGroup, Session, SortOrder, User,
};
use contactbook_common::ports::{ContactsApi, SessionStore};

#[derive(Default)]
struct State {
    next_id: i64,
    contacts: BTreeMap<i64, Contact>,
    groups: BTreeMap<i64, Group>,
    members: BTreeSet<(i64, i64)>,
    calls: Vec<String>,
    rejected_emails: BTreeSet<String>,
}

impl State {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Behaves like the REST backend: ids are assigned on create, unknown ids are
/// 404s, and every call is recorded by name.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record(&self, call: &str) -> MutexGuard<'_, State> {
        let mut state = self.lock();
        state.calls.push(call.to_owned());
        state
    }

    /// Creating a contact with this email answers 422.
    pub fn reject_email(&self, email: &str) {
        self.lock().rejected_emails.insert(email.to_owned());
    }

    pub fn seed_contact(&self, contact: Contact) -> i64 {
        let mut state = self.lock();
        let id = state.allocate_id();
        state.contacts.insert(
            id,
            Contact {
                id: Some(id),
                ..contact
            },
        );
        id
    }

    pub fn seed_group(&self, name: &str) -> i64 {
        let mut state = self.lock();
        let id = state.allocate_id();
        state.groups.insert(
            id,
            Group {
                id,
                name: name.to_owned(),
                ..Default::default()
            },
        );
        id
    }

    pub fn contacts(&self) -> Vec<Contact> {
        self.lock().contacts.values().cloned().collect()
    }

    pub fn contact(&self, id: i64) -> Option<Contact> {
        self.lock().contacts.get(&id).cloned()
    }

    pub fn members_of(&self, group_id: i64) -> Vec<i64> {
        self.lock()
            .members
            .iter()
            .filter(|(group, _)| *group == group_id)
            .map(|(_, contact)| *contact)
            .collect()
    }

    /// Number of recorded calls named `call`.
    pub fn calls(&self, call: &str) -> usize {
        self.lock().calls.iter().filter(|c| *c == call).count()
    }
}

fn not_found(what: &str, id: i64) -> ApiError {
    ApiError::NotFound {
        resource: format!("{what} {id}"),
    }
}

#[async_trait]
impl ContactsApi for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        self.record("login");
        Ok(Session {
            token: format!("token-for-{}", credentials.email),
            user: None,
        })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("logout");
        Ok(())
    }

    async fn profile(&self) -> Result<User, ApiError> {
        self.record("profile");
        Ok(User {
            id: 1,
            name: Some("Test User".into()),
            email: "user@example.com".into(),
        })
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        Ok(self.record("list_contacts").contacts.values().cloned().collect())
    }

    async fn get_contact(&self, id: i64) -> Result<Contact, ApiError> {
        let state = self.record("get_contact");
        state.contacts.get(&id).cloned().ok_or_else(|| not_found("contact", id))
    }

    async fn create_contact(&self, contact: &Contact) -> Result<Contact, ApiError> {
        let mut state = self.record("create_contact");
        if let Some(email) = contact.email.as_deref() {
            if state.rejected_emails.contains(email) {
                return Err(ApiError::Status {
                    status: 422,
                    message: format!("email {email} is not accepted"),
                });
            }
        }
        let id = state.allocate_id();
        let created = Contact {
            id: Some(id),
            ..contact.clone()
        };
        state.contacts.insert(id, created.clone());
        Ok(created)
    }

    async fn update_contact(&self, id: i64, contact: &Contact) -> Result<Contact, ApiError> {
        let mut state = self.record("update_contact");
        let slot = state.contacts.get_mut(&id).ok_or_else(|| not_found("contact", id))?;
        *slot = Contact {
            id: Some(id),
            ..contact.clone()
        };
        Ok(slot.clone())
    }

    async fn delete_contact(&self, id: i64) -> Result<(), ApiError> {
        let mut state = self.record("delete_contact");
        state.contacts.remove(&id).ok_or_else(|| not_found("contact", id))?;
        state.members.retain(|(_, contact)| *contact != id);
        Ok(())
    }

    async fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
        Ok(self.record("list_groups").groups.values().cloned().collect())
    }

    async fn create_group(&self, group: &NewGroup) -> Result<Group, ApiError> {
        let mut state = self.record("create_group");
        let id = state.allocate_id();
        let created = Group {
            id,
            name: group.name.clone(),
            description: group.description.clone(),
            contact_count: Some(0),
        };
        state.groups.insert(id, created.clone());
        Ok(created)
    }

    async fn update_group(&self, id: i64, group: &NewGroup) -> Result<Group, ApiError> {
        let mut state = self.record("update_group");
        let slot = state.groups.get_mut(&id).ok_or_else(|| not_found("group", id))?;
        slot.name = group.name.clone();
        slot.description = group.description.clone();
        Ok(slot.clone())
    }

    async fn delete_group(&self, id: i64) -> Result<(), ApiError> {
        let mut state = self.record("delete_group");
        state.groups.remove(&id).ok_or_else(|| not_found("group", id))?;
        state.members.retain(|(group, _)| *group != id);
        Ok(())
    }

    async fn group_contacts(&self, group_id: i64) -> Result<Vec<Contact>, ApiError> {
        let state = self.record("group_contacts");
        Ok(state
            .members
            .iter()
            .filter(|(group, _)| *group == group_id)
            .filter_map(|(_, contact)| state.contacts.get(contact).cloned())
            .collect())
    }

    async fn add_to_group(&self, group_id: i64, contact_id: i64) -> Result<(), ApiError> {
        let mut state = self.record("add_to_group");
        if !state.groups.contains_key(&group_id) {
            return Err(not_found("group", group_id));
        }
        if !state.contacts.contains_key(&contact_id) {
            return Err(not_found("contact", contact_id));
        }
        state.members.insert((group_id, contact_id));
        Ok(())
    }

    async fn remove_from_group(&self, group_id: i64, contact_id: i64) -> Result<(), ApiError> {
        let mut state = self.record("remove_from_group");
        if state.members.remove(&(group_id, contact_id)) {
            Ok(())
        } else {
            Err(not_found("membership", contact_id))
        }
    }

    async fn export_contacts(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError> {
        let state = self.record("export_contacts");
        Ok(format!("{} contacts as {format}", state.contacts.len()).into_bytes())
    }
}

/// Session store kept in memory.
#[derive(Default)]
pub struct MemorySession {
    token: Mutex<Option<String>>,
    sort: Mutex<Option<SortOrder>>,
}

impl MemorySession {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_owned())),
            sort: Mutex::new(None),
        }
    }
}

impl SessionStore for MemorySession {
    fn token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    fn set_token(&self, token: &str) -> Result<(), SessionError> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_owned());
        }
        Ok(())
    }

    fn clear_token(&self) -> Result<(), SessionError> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
        Ok(())
    }

    fn sort_order(&self) -> Option<SortOrder> {
        self.sort.lock().ok().and_then(|s| *s)
    }

    fn set_sort_order(&self, order: SortOrder) -> Result<(), SessionError> {
        if let Ok(mut slot) = self.sort.lock() {
            *slot = Some(order);
        }
        Ok(())
    }
}
