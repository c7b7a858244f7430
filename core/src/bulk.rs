//! # Bulk Operations
//!
//! Applies one action to every selected contact: add to a group, remove from a
//! group, or delete. Each contact costs exactly one request; requests are fanned
//! out in batches like the importer does.
//!
//! After a run the [`Selection`] keeps only the ids that did not succeed, so a
//! fully successful run leaves it empty and a retry touches just the failures.

use std::future::Future;
use std::sync::Arc;

use contactbook_common::error::ApiError;
use contactbook_common::ports::ContactsApi;
use futures::future::join_all;
use tracing::{debug, info, warn};

/// Selected contact ids in selection order, without repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<i64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id`; returns false if it was already selected.
    pub fn select(&mut self, id: i64) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn deselect(&mut self, id: i64) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&selected| selected != id);
        self.ids.len() != before
    }

    /// Flips the selection state of `id`.
    pub fn toggle(&mut self, id: i64) {
        if !self.deselect(id) {
            self.ids.push(id);
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl FromIterator<i64> for Selection {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for id in iter {
            selection.select(id);
        }
        selection
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub succeeded: Vec<i64>,
    pub failed: Vec<(i64, ApiError)>,
    /// Ids never attempted because the session expired mid-run.
    pub not_attempted: Vec<i64>,
}

impl BulkOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.not_attempted.is_empty()
    }

    pub fn unauthorized(&self) -> bool {
        self.failed.iter().any(|(_, error)| error.is_unauthorized())
    }
}

pub struct BulkService {
    api: Arc<dyn ContactsApi>,
    batch_size: usize,
}

impl BulkService {
    pub fn new(api: Arc<dyn ContactsApi>, batch_size: usize) -> Self {
        Self {
            api,
            batch_size: batch_size.max(1),
        }
    }

    pub async fn assign_to_group(&self, group_id: i64, selection: &mut Selection) -> BulkOutcome {
        let outcome = self
            .run(selection, |id| self.api.add_to_group(group_id, id))
            .await;
        info!(group_id, added = outcome.succeeded.len(), failed = outcome.failed.len(), "bulk assign finished");
        outcome
    }

    pub async fn remove_from_group(&self, group_id: i64, selection: &mut Selection) -> BulkOutcome {
        let outcome = self
            .run(selection, |id| self.api.remove_from_group(group_id, id))
            .await;
        info!(group_id, removed = outcome.succeeded.len(), failed = outcome.failed.len(), "bulk unassign finished");
        outcome
    }

    pub async fn delete_contacts(&self, selection: &mut Selection) -> BulkOutcome {
        let outcome = self.run(selection, |id| self.api.delete_contact(id)).await;
        info!(deleted = outcome.succeeded.len(), failed = outcome.failed.len(), "bulk delete finished");
        outcome
    }

    async fn run<F, Fut>(&self, selection: &mut Selection, action: F) -> BulkOutcome
    where
        F: Fn(i64) -> Fut,
        Fut: Future<Output = Result<(), ApiError>>,
    {
        let ids = selection.ids().to_vec();
        let mut outcome = BulkOutcome::default();

        let mut batches = ids.chunks(self.batch_size);
        for batch in batches.by_ref() {
            debug!(size = batch.len(), "sending bulk batch");
            let results = join_all(batch.iter().map(|&id| action(id))).await;
            for (&id, result) in batch.iter().zip(results) {
                match result {
                    Ok(()) => outcome.succeeded.push(id),
                    Err(error) => {
                        warn!(contact_id = id, %error, "bulk action failed");
                        outcome.failed.push((id, error));
                    }
                }
            }
            if outcome.unauthorized() {
                break;
            }
        }
        outcome.not_attempted = batches.flatten().copied().collect();

        for id in &outcome.succeeded {
            selection.deselect(*id);
        }
        outcome
    }
}
