//! JSON file implementation of [`SessionStore`].
//!
//! The file holds the bearer token and the preferred sort order. It is rewritten
//! on every change; a missing file is an empty session.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use contactbook_common::error::SessionError;
use contactbook_common::models::SortOrder;
use contactbook_common::ports::SessionStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sort: Option<SortOrder>,
}

pub struct FileSessionStore {
    path: PathBuf,
    state: Mutex<SessionFile>,
}

impl FileSessionStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let state = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| io_error(&path, source))?;
            if raw.trim().is_empty() {
                SessionFile::default()
            } else {
                serde_json::from_str(&raw).map_err(|source| SessionError::Corrupt {
                    path: path.display().to_string(),
                    source,
                })?
            }
        } else {
            SessionFile::default()
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, SessionFile> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, change: impl FnOnce(&mut SessionFile)) -> Result<(), SessionError> {
        let mut state = self.lock();
        change(&mut state);
        self.persist(&state)
    }

    fn persist(&self, state: &SessionFile) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }
        let body = serde_json::to_string_pretty(state).map_err(|source| SessionError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })?;
        fs::write(&self.path, body).map_err(|source| io_error(&self.path, source))?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "session file written");
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    fn set_token(&self, token: &str) -> Result<(), SessionError> {
        let token = token.to_owned();
        self.update(|state| state.token = Some(token))
    }

    fn clear_token(&self) -> Result<(), SessionError> {
        if self.lock().token.is_none() {
            return Ok(());
        }
        self.update(|state| state.token = None)
    }

    fn sort_order(&self) -> Option<SortOrder> {
        self.lock().sort
    }

    fn set_sort_order(&self, order: SortOrder) -> Result<(), SessionError> {
        self.update(|state| state.sort = Some(order))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> SessionError {
    SessionError::Io {
        path: path.display().to_string(),
        source,
    }
}

// The token is a credential; keep it owner-readable only.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), SessionError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|source| io_error(path, source))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), SessionError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(dir.path().join("session.json")).unwrap();
        assert_eq!(store.token(), None);
        assert_eq!(store.sort_order(), None);
    }

    #[test]
    fn token_and_sort_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileSessionStore::open(&path).unwrap();
        store.set_token("abc123").unwrap();
        store.set_sort_order(SortOrder::Company).unwrap();

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("abc123"));
        assert_eq!(reopened.sort_order(), Some(SortOrder::Company));
    }

    #[test]
    fn clearing_the_token_keeps_the_sort_preference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileSessionStore::open(&path).unwrap();
        store.set_token("abc123").unwrap();
        store.set_sort_order(SortOrder::Newest).unwrap();
        store.clear_token().unwrap();

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.token(), None);
        assert_eq!(reopened.sort_order(), Some(SortOrder::Newest));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            FileSessionStore::open(&path),
            Err(SessionError::Corrupt { .. })
        ));
    }
}
