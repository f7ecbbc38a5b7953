//! Local vault store adapter
//!
//! Persists notes as plain Markdown files under a root directory. The
//! version token is a SHA-256 hash of the file content, checked on
//! update so the optimistic-concurrency contract holds even without a
//! single-writer guarantee from the host.

use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::application::ports::{FileStore, StoreError};
use crate::domain::note::{StoredNote, VersionToken, NOTE_EXTENSION};

/// Local directory store
pub struct VaultStore {
    root: PathBuf,
}

impl VaultStore {
    /// Create a store rooted at the given vault directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Hash content into a version token
    fn hash_content(content: &str) -> VersionToken {
        let digest = Sha256::digest(content.as_bytes());
        VersionToken::new(hex::encode(digest))
    }

    /// Resolve an identifier to an absolute path inside the vault.
    /// Rejects absolute identifiers and parent traversal.
    fn resolve(&self, identifier: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(identifier);
        let escapes = relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir));
        if escapes {
            return Err(StoreError::Backend(format!(
                "Identifier escapes vault root: {}",
                identifier
            )));
        }
        Ok(self.root.join(relative))
    }

    fn map_io(identifier: &str, err: io::Error) -> StoreError {
        match err.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(identifier.to_string()),
            io::ErrorKind::AlreadyExists => StoreError::Conflict(identifier.to_string()),
            _ => StoreError::Backend(format!("{}: {}", identifier, err)),
        }
    }
}

#[async_trait]
impl FileStore for VaultStore {
    async fn list_identifiers(&self) -> Result<Vec<String>, StoreError> {
        let mut identifiers = Vec::new();
        let mut pending = vec![self.root.clone()];

        // Iterative walk; async recursion would need boxing
        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir)
                .await
                .map_err(|e| StoreError::Backend(format!("{}: {}", dir.display(), e)))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?
            {
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| StoreError::Backend(e.to_string()))?;

                if file_type.is_dir() {
                    pending.push(path);
                } else if path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(NOTE_EXTENSION))
                {
                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        identifiers.push(relative.to_string_lossy().replace('\\', "/"));
                    }
                }
            }
        }

        identifiers.sort();
        debug!(count = identifiers.len(), "listed vault notes");
        Ok(identifiers)
    }

    async fn read(&self, identifier: &str) -> Result<StoredNote, StoreError> {
        let path = self.resolve(identifier)?;
        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| Self::map_io(identifier, e))?;

        let version_token = Self::hash_content(&content);
        Ok(StoredNote {
            identifier: identifier.to_string(),
            content,
            version_token,
        })
    }

    async fn create(
        &self,
        identifier: &str,
        content: &str,
        _commit_label: &str,
    ) -> Result<StoredNote, StoreError> {
        let path = self.resolve(identifier)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Self::map_io(identifier, e))?;
        }

        // create_new makes "file exists" the conflict check
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| Self::map_io(identifier, e))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| Self::map_io(identifier, e))?;
        file.flush()
            .await
            .map_err(|e| Self::map_io(identifier, e))?;

        debug!(%identifier, "created note in vault");
        Ok(StoredNote {
            identifier: identifier.to_string(),
            content: content.to_string(),
            version_token: Self::hash_content(content),
        })
    }

    async fn update(
        &self,
        identifier: &str,
        content: &str,
        version_token: &VersionToken,
        _commit_label: &str,
    ) -> Result<StoredNote, StoreError> {
        let path = self.resolve(identifier)?;
        let current = fs::read_to_string(&path)
            .await
            .map_err(|e| Self::map_io(identifier, e))?;

        if Self::hash_content(&current) != *version_token {
            return Err(StoreError::VersionMismatch(identifier.to_string()));
        }

        fs::write(&path, content.as_bytes())
            .await
            .map_err(|e| Self::map_io(identifier, e))?;

        debug!(%identifier, "updated note in vault");
        Ok(StoredNote {
            identifier: identifier.to_string(),
            content: content.to_string(),
            version_token: Self::hash_content(content),
        })
    }
}
