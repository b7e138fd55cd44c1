//! Error types for the publisher module.

use std::fmt;
use std::io;
use std::path::PathBuf;

use super::registrar::RegistrarError;
use super::task::TaskState;
use crate::context::ContextError;
use crate::version::ResolveError;

/// Result type for publisher operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Errors that can occur while validating, publishing or finalizing an item.
#[derive(Debug)]
pub enum PublishError {
    /// The item has no file on disk (e.g. an unsaved session).
    UnresolvableSource(String),

    /// Version parsing, scanning or destination checks failed.
    Resolve(ResolveError),

    /// Failed to create a publish folder.
    CreateDirectoryFailed { path: PathBuf, source: io::Error },

    /// Failed to copy the source to its destination.
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    /// Failed to read a published file back (checksum).
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to remove a source file after publishing.
    RemoveFailed { path: PathBuf, source: io::Error },

    /// The registrar rejected the record.
    Registration(RegistrarError),

    /// Reading or writing the context cache failed.
    Context(ContextError),

    /// A task was asked to move between incompatible states.
    InvalidTransition { from: TaskState, to: TaskState },

    /// A child artifact whose parent did not validate.
    ParentIncomplete { item: String, parent: String },

    /// The plugin reached publish without a validated plan.
    MissingPlan { plugin: String, item: String },
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::UnresolvableSource(item) => {
                write!(f, "'{}' has no file on disk; save it first", item)
            }
            PublishError::Resolve(e) => write!(f, "{}", e),
            PublishError::CreateDirectoryFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            PublishError::CopyFailed { from, to, source } => {
                write!(
                    f,
                    "failed to copy {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
            PublishError::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            PublishError::RemoveFailed { path, source } => {
                write!(f, "failed to remove {}: {}", path.display(), source)
            }
            PublishError::Registration(e) => write!(f, "registration failed: {}", e),
            PublishError::Context(e) => write!(f, "{}", e),
            PublishError::InvalidTransition { from, to } => {
                write!(f, "invalid task transition from {} to {}", from, to)
            }
            PublishError::ParentIncomplete { item, parent } => {
                write!(f, "'{}' depends on '{}', which did not validate", item, parent)
            }
            PublishError::MissingPlan { plugin, item } => {
                write!(f, "{} has no validated plan for '{}'", plugin, item)
            }
        }
    }
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PublishError::Resolve(e) => Some(e),
            PublishError::CreateDirectoryFailed { source, .. } => Some(source),
            PublishError::CopyFailed { source, .. } => Some(source),
            PublishError::ReadFailed { source, .. } => Some(source),
            PublishError::RemoveFailed { source, .. } => Some(source),
            PublishError::Registration(e) => Some(e),
            PublishError::Context(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResolveError> for PublishError {
    fn from(e: ResolveError) -> Self {
        PublishError::Resolve(e)
    }
}

impl From<RegistrarError> for PublishError {
    fn from(e: RegistrarError) -> Self {
        PublishError::Registration(e)
    }
}

impl From<ContextError> for PublishError {
    fn from(e: ContextError) -> Self {
        PublishError::Context(e)
    }
}
