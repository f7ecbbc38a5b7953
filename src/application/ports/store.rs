//! File store port interface
//!
//! A single contract over both durable backends (GitHub repository and
//! local vault). Reads are safe to repeat; `create` and `update` each
//! produce exactly one durable mutation per call.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::note::{StoredNote, VersionToken};

/// Store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Note already exists: {0}")]
    Conflict(String),

    #[error("Note {0} was modified concurrently; version token no longer matches")]
    VersionMismatch(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Port for durable note storage
#[async_trait]
pub trait FileStore: Send + Sync {
    /// List all Markdown note identifiers currently visible.
    async fn list_identifiers(&self) -> Result<Vec<String>, StoreError>;

    /// Read a note's content and version token.
    ///
    /// Fails with `StoreError::NotFound` if the identifier is absent.
    async fn read(&self, identifier: &str) -> Result<StoredNote, StoreError>;

    /// Create a new note.
    ///
    /// Fails with `StoreError::Conflict` if the identifier already
    /// exists, e.g. because a concurrent run won the race.
    async fn create(
        &self,
        identifier: &str,
        content: &str,
        commit_label: &str,
    ) -> Result<StoredNote, StoreError>;

    /// Overwrite a note, guarded by its version token.
    ///
    /// Fails with `StoreError::VersionMismatch` if the note changed
    /// since the token was obtained. Callers must not retry silently.
    async fn update(
        &self,
        identifier: &str,
        content: &str,
        version_token: &VersionToken,
        commit_label: &str,
    ) -> Result<StoredNote, StoreError>;
}
