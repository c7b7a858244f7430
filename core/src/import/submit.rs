//! Batched submission of prepared contacts.
//!
//! Contacts are created in fixed-size batches. Requests inside a batch run
//! concurrently; batches run one after another. A failed row is counted and
//! the run goes on, except for an expired session, which stops the import
//! because every later request would fail the same way.

use std::sync::Arc;

use contactbook_common::ports::ContactsApi;
use futures::future::join_all;
use tracing::{debug, info, warn};

use super::mapping::PreparedImport;

/// Error samples kept in the summary; the rest are only logged.
const MAX_ERROR_SAMPLES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportProgress {
    pub processed: usize,
    pub total: usize,
    pub imported: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub record: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
    /// Records dropped before submission for lacking a name and email.
    pub skipped: usize,
    /// Records never sent because the run stopped early.
    pub not_attempted: usize,
    /// The backend rejected the session mid-run.
    pub aborted: bool,
    pub errors: Vec<RowError>,
}

impl ImportSummary {
    fn record_failure(&mut self, record: usize, message: String) {
        self.failed += 1;
        if self.errors.len() < MAX_ERROR_SAMPLES {
            self.errors.push(RowError { record, message });
        }
    }
}

pub struct ImportService {
    api: Arc<dyn ContactsApi>,
    batch_size: usize,
}

impl ImportService {
    pub fn new(api: Arc<dyn ContactsApi>, batch_size: usize) -> Self {
        Self {
            api,
            batch_size: batch_size.max(1),
        }
    }

    /// Creates every prepared contact. `on_progress` runs after each batch.
    pub async fn submit<F>(&self, import: &PreparedImport, on_progress: F) -> ImportSummary
    where
        F: Fn(ImportProgress),
    {
        let total = import.rows.len();
        let mut summary = ImportSummary {
            skipped: import.skipped.len(),
            ..ImportSummary::default()
        };
        let mut processed = 0;

        for (index, batch) in import.rows.chunks(self.batch_size).enumerate() {
            debug!(batch = index + 1, size = batch.len(), "submitting batch");
            let results = join_all(
                batch
                    .iter()
                    .map(|row| self.api.create_contact(&row.contact)),
            )
            .await;

            for (row, result) in batch.iter().zip(results) {
                match result {
                    Ok(created) => {
                        summary.imported += 1;
                        debug!(record = row.record, id = ?created.id, "contact created");
                    }
                    Err(error) => {
                        summary.aborted |= error.is_unauthorized();
                        warn!(record = row.record, %error, "failed to import record");
                        summary.record_failure(row.record, error.to_string());
                    }
                }
            }

            processed += batch.len();
            on_progress(ImportProgress {
                processed,
                total,
                imported: summary.imported,
                failed: summary.failed,
            });

            if summary.aborted {
                warn!(remaining = total - processed, "session expired, stopping import");
                break;
            }
        }

        summary.not_attempted = total - processed;
        info!(
            imported = summary.imported,
            failed = summary.failed,
            skipped = summary.skipped,
            "import finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::mapping::PreparedRow;
    use contactbook_common::error::ApiError;
    use contactbook_common::models::Contact;
    use contactbook_common::ports::MockContactsApi;
    use std::sync::Mutex;

    fn prepared(emails: &[&str]) -> PreparedImport {
        PreparedImport {
            rows: emails
                .iter()
                .enumerate()
                .map(|(i, email)| PreparedRow {
                    record: i + 1,
                    contact: Contact {
                        email: Some(email.to_string()),
                        ..Default::default()
                    },
                })
                .collect(),
            skipped: vec![],
        }
    }

    #[tokio::test]
    async fn every_accepted_row_is_counted_as_imported() {
        let mut api = MockContactsApi::new();
        api.expect_create_contact()
            .times(5)
            .returning(|contact| {
                Ok(Contact {
                    id: Some(1),
                    ..contact.clone()
                })
            });

        let service = ImportService::new(Arc::new(api), 2);
        let progress = Mutex::new(Vec::new());
        let summary = service
            .submit(&prepared(&["a@x", "b@x", "c@x", "d@x", "e@x"]), |p| {
                progress.lock().unwrap().push(p.processed)
            })
            .await;

        assert_eq!(summary.imported, 5);
        assert_eq!(summary.failed, 0);
        assert!(!summary.aborted);
        assert_eq!(*progress.lock().unwrap(), vec![2, 4, 5]);
    }

    #[tokio::test]
    async fn row_failures_do_not_abort_the_batch() {
        let mut api = MockContactsApi::new();
        api.expect_create_contact().times(3).returning(|contact| {
            if contact.email.as_deref() == Some("bad@x") {
                Err(ApiError::Status {
                    status: 422,
                    message: "invalid email".into(),
                })
            } else {
                Ok(contact.clone())
            }
        });

        let service = ImportService::new(Arc::new(api), 10);
        let summary = service
            .submit(&prepared(&["a@x", "bad@x", "c@x"]), |_| {})
            .await;

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(
            summary.errors,
            vec![RowError {
                record: 2,
                message: "backend returned 422: invalid email".into()
            }]
        );
    }

    #[tokio::test]
    async fn expired_session_stops_after_the_current_batch() {
        let mut api = MockContactsApi::new();
        api.expect_create_contact()
            .times(2)
            .returning(|_| Err(ApiError::Unauthorized));

        let service = ImportService::new(Arc::new(api), 2);
        let summary = service
            .submit(&prepared(&["a@x", "b@x", "c@x", "d@x", "e@x"]), |_| {})
            .await;

        assert!(summary.aborted);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.not_attempted, 3);
    }
}
