//! Versioned publish path resolution.
//!
//! This module is the single place where version tokens are parsed out of
//! file names, where publish areas are scanned for the highest existing
//! version, and where publish destinations are built. Every plugin and every
//! host goes through it; none of them re-implement the numbering rules.
//!
//! # Naming convention
//!
//! A versioned file is named `<prefix>.v<digits>.<ext>`:
//!
//! ```text
//! shot010.v002.ma
//! └─┬───┘ └┬─┘ └┬┘
//! prefix  version extension
//! ```
//!
//! The digit width is kept as the version padding so that the next version
//! of `render.v7.exr` is `render.v8.exr` and the next of `comp.v0099.nk` is
//! `comp.v0100.nk`.
//!
//! # Layouts
//!
//! - **Flat**: `<source dir>/publishes/<prefix>.v<NNN>.<ext>`
//! - **Nested**: `<root>/publish/v<NNN>/[scenes/]<filename>`
//!
//! # Example
//!
//! ```
//! use shotpub::version::parse_path;
//!
//! let components = parse_path("/proj/scenes/shot010.v002.ma");
//! assert_eq!(components.prefix, "shot010");
//! assert_eq!(components.version_number(), Some(2));
//! assert_eq!(components.publish_name(), "shot010.ma");
//! ```

mod components;
mod destination;
mod error;
mod resolver;
mod scan;

pub use components::{parse_path, PathComponents, VersionToken};
pub use destination::{
    build_destination, is_available, next_version_path, version_folder_name, Layout,
    NESTED_FOLDER_PADDING,
};
pub use error::ResolveError;
pub use resolver::{PublishVersionState, Resolution, VersionPolicy, VersionedPublishResolver};
pub use scan::{highest_version, highest_version_folder, next_version, next_version_folder};

/// The version after `version`.
///
/// # Errors
///
/// [`ResolveError::VersionOverflow`] when `version` is `u64::MAX`.
pub fn successor(version: u64) -> Result<u64, ResolveError> {
    version
        .checked_add(1)
        .ok_or(ResolveError::VersionOverflow(version))
}

/// Padding used when the source carries no version token.
pub const DEFAULT_VERSION_PADDING: usize = 3;
