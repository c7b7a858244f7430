//! Server-side export saved to a local file.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use contactbook_common::error::ApiError;
use contactbook_common::models::ExportFormat;
use contactbook_common::ports::ContactsApi;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ExportError::Api(ApiError::Unauthorized))
    }
}

pub struct ExportService {
    api: Arc<dyn ContactsApi>,
}

impl ExportService {
    pub fn new(api: Arc<dyn ContactsApi>) -> Self {
        Self { api }
    }

    /// Downloads the export and writes it to `path`. Returns the byte count.
    pub async fn export(&self, format: ExportFormat, path: &Path) -> Result<usize, ExportError> {
        let bytes = self.api.export_contacts(format).await?;
        fs::write(path, &bytes).map_err(|source| ExportError::Write {
            path: path.display().to_string(),
            source,
        })?;
        info!(%format, path = %path.display(), bytes = bytes.len(), "export saved");
        Ok(bytes.len())
    }
}
