//! Context cache stored next to a project.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::PipelineContext;
use crate::log::Logger;
use crate::{log_debug, log_warn};

/// File name of the cached context inside a project root.
pub const CONTEXT_FILENAME: &str = "shotgun.context";

/// Errors from reading or writing the context cache.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to read context {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write context {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid context in {}: {source}", .path.display())]
    Deserialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize context: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads and writes `shotgun.context` inside a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextStore {
    root: PathBuf,
}

impl ContextStore {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            root: project_root.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(CONTEXT_FILENAME)
    }

    /// Load the cached context, strictly.
    ///
    /// Returns `Ok(None)` when there is no cache file.
    pub fn load(&self) -> Result<Option<PipelineContext>, ContextError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ContextError::Read { path, source }),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ContextError::Deserialize { path, source })
    }

    /// Load the cached context, logging a warning instead of failing.
    ///
    /// A missing or unreadable cache means processing continues without a
    /// restored context.
    pub fn restore(&self, logger: &dyn Logger) -> Option<PipelineContext> {
        log_debug!(logger, "Looking for context file in {}", self.path().display());
        match self.load() {
            Ok(context) => context,
            Err(e) => {
                log_warn!(logger, "Could not read saved context: {}", e);
                None
            }
        }
    }

    /// Write `context` to the cache file.
    pub fn save(&self, context: &PipelineContext) -> Result<(), ContextError> {
        let path = self.path();
        let json = serde_json::to_string_pretty(context)?;
        fs::write(&path, json).map_err(|source| ContextError::Write { path, source })
    }

    /// Whether a cache file exists.
    pub fn exists(&self) -> bool {
        self.path().is_file()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
