//! Publish-record registrar.
//!
//! A registrar persists one record per published file. The production
//! service is reached through this trait only; [`LedgerRegistrar`] keeps
//! records in a local JSON file and [`InMemoryRegistrar`] keeps them in
//! memory for tests and dry runs.

mod ledger;
mod memory;

pub use ledger::LedgerRegistrar;
pub use memory::InMemoryRegistrar;

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::context::{EntityRef, PipelineContext};

/// Status given to freshly registered records.
pub const STATUS_ACTIVE: &str = "active";

/// Errors raised by registrars. None of them are retried.
#[derive(Debug, Error)]
pub enum RegistrarError {
    #[error("registrar unavailable: {0}")]
    Unavailable(String),

    #[error("failed to access ledger {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("ledger {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Fields sent to the registrar for one published file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRecord {
    pub path: PathBuf,
    /// Publish name shared by every version of a lineage.
    pub name: String,
    pub version_number: u64,
    pub published_file_type: String,
    #[serde(default)]
    pub context: PipelineContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependency_ids: Vec<u64>,
    /// Hex SHA-256 of the file at registration time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PublishRecord {
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        version_number: u64,
        published_file_type: impl Into<String>,
        context: PipelineContext,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            version_number,
            published_file_type: published_file_type.into(),
            context,
            comment: None,
            thumbnail_path: None,
            dependency_ids: Vec::new(),
            checksum: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: Option<PathBuf>) -> Self {
        self.thumbnail_path = thumbnail;
        self
    }

    pub fn with_dependencies(mut self, ids: Vec<u64>) -> Self {
        self.dependency_ids = ids;
        self
    }

    pub fn with_checksum(mut self, checksum: Option<String>) -> Self {
        self.checksum = checksum;
        self
    }
}

/// Opaque handle returned by a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordHandle {
    pub id: u64,
    pub name: String,
    pub version_number: u64,
}

/// A record as the registrar stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: u64,
    /// `None` once superseded by a later publish.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub record: PublishRecord,
}

impl StoredRecord {
    pub fn handle(&self) -> RecordHandle {
        RecordHandle {
            id: self.id,
            name: self.record.name.clone(),
            version_number: self.record.version_number,
        }
    }

    /// Same lineage, same context, still flagged, and not `exclude_id`.
    fn conflicts_with(&self, name: &str, context: &PipelineContext, exclude_id: u64) -> bool {
        self.id != exclude_id
            && self.status.is_some()
            && self.record.name == name
            && self.record.context == *context
    }
}

/// A reviewable movie or image, linked to the publishes it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewVersion {
    /// Display code, e.g. `shot010_pb.mov`.
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<EntityRef>,
    /// Task, entity or project the version is attached to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_to_media: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub published_file_ids: Vec<u64>,
    pub created_at: DateTime<Utc>,
}

impl ReviewVersion {
    /// A version for `context`, attached to its [`PipelineContext::review_entity`].
    pub fn new(code: impl Into<String>, context: &PipelineContext) -> Self {
        Self {
            code: code.into(),
            description: None,
            project: context.project.clone(),
            entity: context.review_entity().cloned(),
            path_to_media: None,
            published_file_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_media(mut self, path: Option<PathBuf>) -> Self {
        self.path_to_media = path;
        self
    }

    pub fn with_published_files(mut self, ids: Vec<u64>) -> Self {
        self.published_file_ids = ids;
        self
    }
}

/// A review version as the registrar stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReviewVersion {
    pub id: u64,
    #[serde(flatten)]
    pub version: ReviewVersion,
}

/// Persists publish records.
pub trait Registrar: Send + Sync {
    /// Create a record and return its handle.
    fn register(&self, record: &PublishRecord) -> Result<RecordHandle, RegistrarError>;

    /// Records of the same lineage in the same context that still carry a
    /// status, excluding `exclude_id`.
    fn find_conflicting(
        &self,
        name: &str,
        context: &PipelineContext,
        exclude_id: u64,
    ) -> Result<Vec<StoredRecord>, RegistrarError>;

    /// Clear the status of `ids`; returns how many records changed.
    fn clear_status(&self, ids: &[u64]) -> Result<usize, RegistrarError>;

    /// Every stored record, oldest first.
    fn records(&self) -> Result<Vec<StoredRecord>, RegistrarError>;

    /// Create a review version and return its id.
    fn create_version(&self, version: &ReviewVersion) -> Result<u64, RegistrarError>;

    /// Every review version, oldest first.
    fn review_versions(&self) -> Result<Vec<StoredReviewVersion>, RegistrarError>;
}

/// Hex-encoded SHA-256 of the file at `path`.
pub fn file_checksum(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
