//! Errors that cross the port boundary.
//!
//! Adapters map their failures into these variants so services and the CLI can
//! react to them (forced logout on [`ApiError::Unauthorized`], for instance)
//! without knowing which transport produced them.

use thiserror::Error;

/// Failures of the contacts backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend rejected the bearer token. The stored token has already been cleared.
    #[error("not authenticated: the session is missing or has expired")]
    Unauthorized,
    #[error("not found: {resource}")]
    NotFound { resource: String },
    /// Any other non-success HTTP status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {message}")]
    Transport { message: String },
    #[error("unexpected response body: {message}")]
    Decode { message: String },
    #[error("invalid endpoint: {message}")]
    InvalidUrl { message: String },
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Failures of the local session store.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
