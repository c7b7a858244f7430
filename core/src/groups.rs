//! Group management and lookup by id or name.

use std::sync::Arc;

use contactbook_common::error::ApiError;
use contactbook_common::models::{Contact, Group, NewGroup};
use contactbook_common::ports::ContactsApi;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum GroupsError {
    #[error("no group matches {0:?}")]
    UnknownGroup(String),
    #[error("{0:?} matches several groups, use the id")]
    AmbiguousGroup(String),
    #[error("group name cannot be empty")]
    EmptyName,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl GroupsError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GroupsError::Api(ApiError::Unauthorized))
    }
}

pub struct GroupsService {
    api: Arc<dyn ContactsApi>,
}

impl GroupsService {
    pub fn new(api: Arc<dyn ContactsApi>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Group>, GroupsError> {
        let mut groups = self.api.list_groups().await?;
        groups.sort_by_key(|g| g.name.to_lowercase());
        Ok(groups)
    }

    /// Finds a group by numeric id or by case-insensitive name.
    pub async fn resolve(&self, reference: &str) -> Result<Group, GroupsError> {
        let groups = self.api.list_groups().await?;
        let reference = reference.trim();

        if let Ok(id) = reference.parse::<i64>() {
            if let Some(group) = groups.iter().find(|g| g.id == id) {
                return Ok(group.clone());
            }
        }

        let mut named = groups
            .into_iter()
            .filter(|g| g.name.trim().eq_ignore_ascii_case(reference));
        match (named.next(), named.next()) {
            (Some(group), None) => Ok(group),
            (Some(_), Some(_)) => Err(GroupsError::AmbiguousGroup(reference.to_owned())),
            (None, _) => Err(GroupsError::UnknownGroup(reference.to_owned())),
        }
    }

    pub async fn create(&self, name: &str, description: Option<String>) -> Result<Group, GroupsError> {
        let payload = new_group(name, description)?;
        let group = self.api.create_group(&payload).await?;
        info!(group_id = group.id, name = %group.name, "group created");
        Ok(group)
    }

    /// Renames `group`. The description is kept unless a new one is given.
    pub async fn rename(
        &self,
        group: &Group,
        name: &str,
        description: Option<String>,
    ) -> Result<Group, GroupsError> {
        let payload = new_group(name, description.or_else(|| group.description.clone()))?;
        let updated = self.api.update_group(group.id, &payload).await?;
        info!(group_id = group.id, from = %group.name, to = %updated.name, "group renamed");
        Ok(updated)
    }

    pub async fn delete(&self, group: &Group) -> Result<(), GroupsError> {
        self.api.delete_group(group.id).await?;
        info!(group_id = group.id, name = %group.name, "group deleted");
        Ok(())
    }

    pub async fn members(&self, group: &Group) -> Result<Vec<Contact>, GroupsError> {
        Ok(self.api.group_contacts(group.id).await?)
    }
}

fn new_group(name: &str, description: Option<String>) -> Result<NewGroup, GroupsError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GroupsError::EmptyName);
    }
    Ok(NewGroup {
        name: name.to_owned(),
        description: description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty()),
    })
}
