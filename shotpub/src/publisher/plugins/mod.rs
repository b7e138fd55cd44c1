//! Built-in publish plugins.
//!
//! | Plugin | Default filters | Effect |
//! |--------|-----------------|--------|
//! | [`VersionedFilePublisher`] | `*.session` | copy into the publish area, register |
//! | [`InPlaceFilePublisher`] | `file.*`, `*.playblast` | register where it lies |
//! | [`CachePublisher`] | `*.alembic` | copy at the parent's version, register with a dependency |
//! | [`ReviewVersionPlugin`] | `file.image`, `file.video`, `*.playblast` | create a review version |
//! | [`VersionUpPlugin`] | `*.session` | save the work file to its next version |

mod cache;
mod in_place;
mod review;
mod version_up;
mod versioned_file;

pub use cache::CachePublisher;
pub use in_place::InPlaceFilePublisher;
pub use review::ReviewVersionPlugin;
pub use version_up::VersionUpPlugin;
pub use versioned_file::VersionedFilePublisher;

use std::fs;
use std::path::{Path, PathBuf};

use super::item::{ItemId, ItemTree, PublishItem};
use super::plugin::{PublishEnv, PublishPlugin};
use super::registrar::{file_checksum, PublishRecord, RecordHandle};
use super::{PublishError, PublishResult};
use crate::log::Logger;
use crate::version::{is_available, parse_path, ResolveError};
use crate::{log_debug, log_info, log_warn};

/// The plugins a regular publish runs, in execution order.
pub fn default_plugins() -> Vec<Box<dyn PublishPlugin>> {
    vec![
        Box::new(VersionedFilePublisher::new()),
        Box::new(InPlaceFilePublisher::new()),
        Box::new(ReviewVersionPlugin::new()),
        Box::new(CachePublisher::new()),
    ]
}

fn lookup(items: &ItemTree, id: ItemId) -> PublishResult<&PublishItem> {
    items
        .get(id)
        .ok_or_else(|| PublishError::UnresolvableSource(format!("item #{}", id.index())))
}

/// The item's file, or `UnresolvableSource` for unsaved sessions.
fn source_path(item: &PublishItem) -> PublishResult<PathBuf> {
    item.path
        .clone()
        .ok_or_else(|| PublishError::UnresolvableSource(item.name.clone()))
}

/// Like [`source_path`] but also requires the file to exist.
fn existing_source(item: &PublishItem) -> PublishResult<PathBuf> {
    let source = source_path(item)?;
    if !source.is_file() {
        return Err(PublishError::UnresolvableSource(item.name.clone()));
    }
    Ok(source)
}

/// Copy `from` to `to`, refusing to overwrite.
///
/// The destination is re-checked right before copying to keep the window
/// between validation and publish small.
fn copy_to_destination(from: &Path, to: &Path, version: u64) -> PublishResult<()> {
    if !is_available(to) {
        return Err(ResolveError::DestinationCollision {
            destination: to.to_path_buf(),
            version,
        }
        .into());
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|source| PublishError::CreateDirectoryFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::copy(from, to).map_err(|source| PublishError::CopyFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Publish type for `path`: the collector's hint, then the configured
/// rules, then a generic fallback.
fn publish_type(env: &PublishEnv<'_>, item: &PublishItem, path: &Path) -> String {
    item.publish_type
        .clone()
        .or_else(|| env.settings.publish_type_for(&parse_path(path).extension))
        .unwrap_or_else(|| "File".to_string())
}

/// Register `path` for `item`.
fn register(
    env: &PublishEnv<'_>,
    item: &PublishItem,
    path: &Path,
    version: u64,
    published_file_type: String,
    dependency_ids: Vec<u64>,
) -> PublishResult<RecordHandle> {
    let checksum = if path.is_file() {
        Some(file_checksum(path).map_err(|source| PublishError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?)
    } else {
        None
    };

    let name = parse_path(path).publish_name();
    let record = PublishRecord::new(
        path,
        name.as_str(),
        version,
        published_file_type.as_str(),
        item.context.clone(),
    )
    .with_comment(item.description.clone())
    .with_thumbnail(item.thumbnail.clone())
    .with_dependencies(dependency_ids)
    .with_checksum(checksum);

    log_debug!(
        env.logger,
        "Registering {} v{} as '{}'",
        name,
        version,
        published_file_type
    );
    let handle = env.registrar.register(&record)?;
    log_info!(
        env.logger,
        "Registered {} (record {}, version {})",
        handle.name,
        handle.id,
        handle.version_number
    );
    Ok(handle)
}

/// Clear the status of older records in the same lineage and context.
fn supersede_previous(
    env: &PublishEnv<'_>,
    item: &PublishItem,
    record: &RecordHandle,
) -> PublishResult<()> {
    let previous = env
        .registrar
        .find_conflicting(&record.name, &item.context, record.id)?;
    if previous.is_empty() {
        return Ok(());
    }
    let ids: Vec<u64> = previous.iter().map(|r| r.id).collect();
    let cleared = env.registrar.clear_status(&ids)?;
    log_info!(
        env.logger,
        "Cleared status of {} previous publish(es) of {}",
        cleared,
        record.name
    );
    Ok(())
}

/// Keep the first error of several independent finalize steps.
fn first_error(results: impl IntoIterator<Item = PublishResult<()>>, logger: &dyn Logger) -> PublishResult<()> {
    let mut first = None;
    for result in results {
        if let Err(e) = result {
            if first.is_some() {
                log_warn!(logger, "{}", e);
            } else {
                first = Some(e);
            }
        }
    }
    first.map_or(Ok(()), Err)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{CapturingLogger, LogLevel};
    use tempfile::TempDir;

    #[test]
    fn test_copy_refuses_existing_destination() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("a.ma");
        let to = temp.path().join("publishes").join("a.v001.ma");
        fs::write(&from, "new").unwrap();
        fs::create_dir_all(to.parent().unwrap()).unwrap();
        fs::write(&to, "old").unwrap();

        let err = copy_to_destination(&from, &to, 1).unwrap_err();
        assert!(matches!(
            err,
            PublishError::Resolve(ResolveError::DestinationCollision { version: 1, .. })
        ));
        assert_eq!(fs::read_to_string(&to).unwrap(), "old");
    }

    #[test]
    fn test_copy_creates_folders() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("a.ma");
        let to = temp.path().join("publish").join("v001").join("scenes").join("a.ma");
        fs::write(&from, "scene").unwrap();

        copy_to_destination(&from, &to, 1).unwrap();
        assert_eq!(fs::read_to_string(&to).unwrap(), "scene");
    }

    #[test]
    fn test_first_error_logs_the_rest() {
        let logger = CapturingLogger::new();
        let result = first_error(
            [
                Ok(()),
                Err(PublishError::UnresolvableSource("one".to_string())),
                Err(PublishError::UnresolvableSource("two".to_string())),
            ],
            &logger,
        );
        assert!(result.unwrap_err().to_string().contains("one"));
        assert!(logger.contains(LogLevel::Warn, "two"));
    }
}
