//! GitHub repository store adapter
//!
//! Persists notes through the GitHub contents API. File content travels
//! base64-encoded; the blob SHA returned on read doubles as the version
//! token for optimistic-concurrency updates. Every write carries a
//! human-readable commit message.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ports::{FileStore, StoreError};
use crate::domain::note::{StoredNote, VersionToken, NOTE_EXTENSION};

/// GitHub API base URL
const API_BASE_URL: &str = "https://api.github.com";

/// User agent required by the GitHub API
const USER_AGENT: &str = concat!("voxvault/", env!("CARGO_PKG_VERSION"));

// Wire types for the contents API

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    name: String,
    path: String,
}

#[derive(Debug, Deserialize)]
struct FileContentResponse {
    content: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct WriteRequest {
    message: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    content: WrittenFile,
}

#[derive(Debug, Deserialize)]
struct WrittenFile {
    path: String,
    sha: String,
}

/// GitHub contents API store
pub struct GitHubStore {
    owner_repo: String,
    token: String,
    base_url: String,
    client: reqwest::Client,
}

impl GitHubStore {
    /// Create a new store for `owner/repo` with a bearer token
    pub fn new(owner_repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            owner_repo: owner_repo.into(),
            token: token.into(),
            base_url: API_BASE_URL.to_string(),
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Override the API base URL (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn contents_url(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/repos/{}/contents", self.base_url, self.owner_repo)
        } else {
            format!("{}/repos/{}/contents/{}", self.base_url, self.owner_repo, path)
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
    }

    /// Decode base64 file content, which GitHub wraps with newlines
    fn decode_content(encoded: &str) -> Result<String, StoreError> {
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| StoreError::Backend(format!("Invalid base64 file content: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| StoreError::Backend(format!("File content is not UTF-8: {}", e)))
    }

    async fn backend_error(identifier: &str, response: reqwest::Response) -> StoreError {
        let status = response.status();
        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        StoreError::Backend(format!("{}: HTTP {}: {}", identifier, status, detail))
    }

    async fn put_file(
        &self,
        identifier: &str,
        content: &str,
        commit_label: &str,
        sha: Option<String>,
    ) -> Result<reqwest::Response, StoreError> {
        let is_update = sha.is_some();
        let body = WriteRequest {
            message: commit_label.to_string(),
            content: base64::engine::general_purpose::STANDARD.encode(content.as_bytes()),
            sha,
        };

        let response = self
            .request(self.client.put(self.contents_url(identifier)))
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::CONFLICT
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            // An unconditioned PUT hitting an existing file, or a stale
            // SHA on a conditioned one
            return Err(if is_update {
                StoreError::VersionMismatch(identifier.to_string())
            } else {
                StoreError::Conflict(identifier.to_string())
            });
        }
        if !status.is_success() {
            return Err(Self::backend_error(identifier, response).await);
        }

        Ok(response)
    }

    async fn parse_write(
        identifier: &str,
        content: &str,
        response: reqwest::Response,
    ) -> Result<StoredNote, StoreError> {
        let written: WriteResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Backend(format!("{}: {}", identifier, e)))?;

        Ok(StoredNote {
            identifier: written.content.path,
            content: content.to_string(),
            version_token: VersionToken::new(written.content.sha),
        })
    }
}

#[async_trait]
impl FileStore for GitHubStore {
    async fn list_identifiers(&self) -> Result<Vec<String>, StoreError> {
        let response = self
            .request(self.client.get(self.contents_url("")))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::backend_error("<listing>", response).await);
        }

        let entries: Vec<ContentsEntry> = response
            .json()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let identifiers: Vec<String> = entries
            .into_iter()
            .filter(|e| e.name.ends_with(NOTE_EXTENSION))
            .map(|e| e.path)
            .collect();
        debug!(count = identifiers.len(), "listed repository notes");

        Ok(identifiers)
    }

    async fn read(&self, identifier: &str) -> Result<StoredNote, StoreError> {
        let response = self
            .request(self.client.get(self.contents_url(identifier)))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(identifier.to_string()));
        }
        if !response.status().is_success() {
            return Err(Self::backend_error(identifier, response).await);
        }

        let file: FileContentResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Backend(format!("{}: {}", identifier, e)))?;

        Ok(StoredNote {
            identifier: identifier.to_string(),
            content: Self::decode_content(&file.content)?,
            version_token: VersionToken::new(file.sha),
        })
    }

    async fn create(
        &self,
        identifier: &str,
        content: &str,
        commit_label: &str,
    ) -> Result<StoredNote, StoreError> {
        let response = self.put_file(identifier, content, commit_label, None).await?;
        debug!(%identifier, "created note in repository");
        Self::parse_write(identifier, content, response).await
    }

    async fn update(
        &self,
        identifier: &str,
        content: &str,
        version_token: &VersionToken,
        commit_label: &str,
    ) -> Result<StoredNote, StoreError> {
        let response = self
            .put_file(
                identifier,
                content,
                commit_label,
                Some(version_token.as_str().to_string()),
            )
            .await?;
        debug!(%identifier, "updated note in repository");
        Self::parse_write(identifier, content, response).await
    }
}
