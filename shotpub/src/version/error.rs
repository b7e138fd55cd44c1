//! Error types for version resolution.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving a versioned publish path.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The path has no file name component to work with.
    #[error("path has no file name: {0}")]
    MissingFileName(PathBuf),

    /// A version token is required but the file name does not carry one.
    #[error("no version number detected in the file name: {0}")]
    UnparseableVersion(PathBuf),

    /// The computed destination already exists.
    #[error("the publish destination already exists: {} (version {version})", .destination.display())]
    DestinationCollision { destination: PathBuf, version: u64 },

    /// The version is already the largest representable number.
    #[error("version {0} is too large to increment")]
    VersionOverflow(u64),

    /// The scan pattern built from a file name was rejected by the regex
    /// engine, typically because the prefix is enormous.
    #[error("cannot scan for '{prefix}': {source}")]
    Pattern {
        prefix: String,
        #[source]
        source: regex::Error,
    },

    /// Listing the publish area failed.
    #[error("failed to scan {}: {source}", .path.display())]
    Scan { path: PathBuf, source: io::Error },
}
