//! # Merge Reconciliation
//!
//! Folds a secondary contact into a primary one. [`MergeProposal::new`] picks a
//! value per field (the longer one wins, ties keep the primary's) and joins
//! differing notes. The user may edit the proposal before [`MergeService::apply`]
//! updates the primary and deletes the secondary.
//!
//! The two requests are not atomic. When the delete fails the primary has
//! already been updated; [`MergeError::SecondaryNotDeleted`] carries it.

use std::sync::Arc;

use contactbook_common::error::ApiError;
use contactbook_common::models::{Contact, ContactField};
use contactbook_common::ports::ContactsApi;
use thiserror::Error;
use tracing::{info, warn};

pub const NOTES_SEPARATOR: &str = "\n---\n";

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("a contact cannot be merged with itself")]
    SameContact,
    #[error("contact has no id, it was never saved")]
    Unsaved,
    #[error("failed to load contact: {0}")]
    Fetch(#[source] ApiError),
    #[error("failed to update the primary contact: {0}")]
    UpdatePrimary(#[source] ApiError),
    #[error("primary contact {} was updated but the secondary could not be deleted: {source}", .merged.id.unwrap_or_default())]
    SecondaryNotDeleted {
        merged: Box<Contact>,
        #[source]
        source: ApiError,
    },
}

impl MergeError {
    pub fn is_unauthorized(&self) -> bool {
        match self {
            MergeError::Fetch(source)
            | MergeError::UpdatePrimary(source)
            | MergeError::SecondaryNotDeleted { source, .. } => {
                source.is_unauthorized()
            }
            _ => false,
        }
    }
}

/// A field where both contacts hold different non-empty values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub field: ContactField,
    pub primary: String,
    pub secondary: String,
    pub chosen: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeProposal {
    primary: Contact,
    secondary: Contact,
    merged: Contact,
}

impl MergeProposal {
    pub fn new(primary: Contact, secondary: Contact) -> Self {
        let mut merged = primary.clone();
        for field in ContactField::ALL {
            let value = if field == ContactField::Notes {
                merge_notes(field.get(&primary), field.get(&secondary))
            } else {
                pick_longer(field.get(&primary), field.get(&secondary))
            };
            field.set(&mut merged, value);
        }
        Self {
            primary,
            secondary,
            merged,
        }
    }

    pub fn primary(&self) -> &Contact {
        &self.primary
    }

    pub fn secondary(&self) -> &Contact {
        &self.secondary
    }

    pub fn merged(&self) -> &Contact {
        &self.merged
    }

    /// Overrides the proposed value. Blank clears the field.
    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        field.set(&mut self.merged, Some(value.into()));
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        ContactField::ALL
            .into_iter()
            .filter_map(|field| {
                let primary = non_blank(field.get(&self.primary))?;
                let secondary = non_blank(field.get(&self.secondary))?;
                (primary != secondary).then(|| Conflict {
                    field,
                    primary: primary.to_owned(),
                    secondary: secondary.to_owned(),
                    chosen: field.get(&self.merged).map(str::to_owned),
                })
            })
            .collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn pick_longer(primary: Option<&str>, secondary: Option<&str>) -> Option<String> {
    match (non_blank(primary), non_blank(secondary)) {
        (Some(p), Some(s)) if s.chars().count() > p.chars().count() => Some(s.to_owned()),
        (Some(p), _) => Some(p.to_owned()),
        (None, s) => s.map(str::to_owned),
    }
}

fn merge_notes(primary: Option<&str>, secondary: Option<&str>) -> Option<String> {
    match (non_blank(primary), non_blank(secondary)) {
        (Some(p), Some(s)) if p != s => Some(format!("{p}{NOTES_SEPARATOR}{s}")),
        (Some(p), _) => Some(p.to_owned()),
        (None, s) => s.map(str::to_owned),
    }
}

pub struct MergeService {
    api: Arc<dyn ContactsApi>,
}

impl MergeService {
    pub fn new(api: Arc<dyn ContactsApi>) -> Self {
        Self { api }
    }

    /// Fetches both contacts and builds the default proposal.
    pub async fn propose(&self, primary_id: i64, secondary_id: i64) -> Result<MergeProposal, MergeError> {
        if primary_id == secondary_id {
            return Err(MergeError::SameContact);
        }
        let primary = self
            .api
            .get_contact(primary_id)
            .await
            .map_err(MergeError::Fetch)?;
        let secondary = self
            .api
            .get_contact(secondary_id)
            .await
            .map_err(MergeError::Fetch)?;
        Ok(MergeProposal::new(primary, secondary))
    }

    /// Writes the merged record over the primary, then deletes the secondary.
    pub async fn apply(&self, proposal: MergeProposal) -> Result<Contact, MergeError> {
        let primary_id = proposal.primary.id.ok_or(MergeError::Unsaved)?;
        let secondary_id = proposal.secondary.id.ok_or(MergeError::Unsaved)?;
        if primary_id == secondary_id {
            return Err(MergeError::SameContact);
        }

        let merged = self
            .api
            .update_contact(primary_id, &proposal.merged)
            .await
            .map_err(MergeError::UpdatePrimary)?;

        if let Err(source) = self.api.delete_contact(secondary_id).await {
            warn!(primary_id, secondary_id, %source, "merged primary but secondary is still present");
            return Err(MergeError::SecondaryNotDeleted {
                merged: Box::new(merged),
                source,
            });
        }

        info!(primary_id, secondary_id, "contacts merged");
        Ok(merged)
    }
}
