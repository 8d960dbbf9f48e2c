//! Error types for scanning, remote management and synchronization.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::ContentTypeDefinition;

/// Errors while discovering annotated types.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scope not found: {scope}")]
    ScopeNotFound { scope: String },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scope manifest: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl ScanError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScanError::ScopeNotFound { .. } | ScanError::ReadError { .. } => 3,
            ScanError::InvalidJson { .. } => 2,
        }
    }
}

/// Errors reported by a [`ManagementClient`](crate::ManagementClient).
#[derive(Debug, Error)]
pub enum ManagementError {
    /// The version sent was stale, or missing for an existing id.
    #[error("version conflict on content type '{id}' (sent version {})", version.map_or_else(|| "none".to_string(), |v| v.to_string()))]
    Conflict { id: String, version: Option<u64> },

    /// The service rejected the request.
    #[error("request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// A request body could not be serialized.
    #[error("cannot encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Network or authentication failure before a response was read.
    #[error("failed to reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ManagementError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ManagementError::Conflict { .. } => 1,
            ManagementError::Api { .. } | ManagementError::Encode(_) => 2,
            ManagementError::Transport { .. } => 3,
        }
    }

    /// Wrap any transport error.
    pub fn transport<E>(url: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ManagementError::Transport {
            url: url.into(),
            source: source.into(),
        }
    }
}

/// A synchronization aborted by a client error.
///
/// Displays as the underlying error. `completed` holds the definitions
/// upserted before the failure; they are not rolled back.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct SyncError {
    #[source]
    pub source: ManagementError,
    pub completed: Vec<ContentTypeDefinition>,
}

impl SyncError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        self.source.exit_code()
    }
}

/// Errors from scanning and synchronizing a scope in one go.
#[derive(Debug, Error)]
pub enum CodeFirstError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl CodeFirstError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CodeFirstError::Scan(e) => e.exit_code(),
            CodeFirstError::Sync(e) => e.exit_code(),
        }
    }
}
