//! Publish destination construction.

use std::fs;
use std::path::{Path, PathBuf};

use super::{parse_path, successor, PathComponents, ResolveError};

/// Digit width of nested `v<NNN>` version folders.
pub const NESTED_FOLDER_PADDING: usize = 3;

/// Where versioned publishes are placed relative to a publish root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// `<root>/<folder>/<prefix>.v<NNN>.<ext>`
    Flat { folder: String },

    /// `<root>/<folder>/v<NNN>/[<mirror_subfolder>/]<filename>`
    Nested {
        folder: String,
        mirror_subfolder: Option<String>,
    },
}

impl Layout {
    /// Flat layout in a `publishes` folder next to the source.
    pub fn flat() -> Self {
        Layout::Flat {
            folder: "publishes".to_string(),
        }
    }

    /// Nested layout in a `publish` folder with no mirrored sub-folder.
    pub fn nested() -> Self {
        Layout::Nested {
            folder: "publish".to_string(),
            mirror_subfolder: None,
        }
    }

    /// Folder scanned for existing versions.
    pub fn publish_folder(&self, publish_root: &Path) -> PathBuf {
        match self {
            Layout::Flat { folder } | Layout::Nested { folder, .. } => publish_root.join(folder),
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Layout::Nested { .. })
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::flat()
    }
}

/// Name of a nested version folder, e.g. `v007`.
pub fn version_folder_name(version: u64) -> String {
    format!("v{:0width$}", version, width = NESTED_FOLDER_PADDING)
}

/// Destination path of `source` published as `version`.
///
/// `padding` only applies to the flat layout; nested folders always use
/// [`NESTED_FOLDER_PADDING`].
pub fn build_destination(
    source: &PathComponents,
    publish_root: &Path,
    layout: &Layout,
    version: u64,
    padding: usize,
) -> PathBuf {
    let folder = layout.publish_folder(publish_root);
    match layout {
        Layout::Flat { .. } => folder.join(source.versioned_filename(version, padding)),
        Layout::Nested {
            mirror_subfolder, ..
        } => {
            let mut path = folder.join(version_folder_name(version));
            if let Some(sub) = mirror_subfolder {
                path.push(sub);
            }
            path.join(&source.filename)
        }
    }
}

/// True if nothing exists at `path`, including dangling symlinks.
pub fn is_available(path: &Path) -> bool {
    fs::symlink_metadata(path).is_err()
}

/// Path of the next version of a versioned work file, in the same folder
/// and with the same padding.
///
/// # Errors
///
/// [`ResolveError::UnparseableVersion`] when the file name carries no
/// version token.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use shotpub::version::next_version_path;
///
/// assert_eq!(
///     next_version_path("/work/comp.v0099.nk").unwrap(),
///     PathBuf::from("/work/comp.v0100.nk")
/// );
/// assert!(next_version_path("/work/comp.nk").is_err());
/// ```
pub fn next_version_path(path: impl AsRef<Path>) -> Result<PathBuf, ResolveError> {
    let path = path.as_ref();
    let components = parse_path(path);
    let token = components
        .version
        .ok_or_else(|| ResolveError::UnparseableVersion(path.to_path_buf()))?;

    let next = successor(token.number)?;
    Ok(components
        .directory
        .join(components.versioned_filename(next, token.padding)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flat_destination() {
        let source = parse_path("/proj/scenes/shot010.v002.ma");
        let dest = build_destination(&source, &source.directory, &Layout::flat(), 2, 3);
        assert_eq!(
            dest,
            PathBuf::from("/proj/scenes/publishes/shot010.v002.ma")
        );
    }

    #[test]
    fn test_flat_destination_for_unversioned_source() {
        let source = parse_path("/proj/scenes/layout.max");
        let dest = build_destination(&source, &source.directory, &Layout::flat(), 7, 3);
        assert_eq!(dest, PathBuf::from("/proj/scenes/publishes/layout.v007.max"));
    }

    #[test]
    fn test_nested_destination_with_mirror() {
        let source = parse_path("/proj/scenes/shot010.v002.ma");
        let layout = Layout::Nested {
            folder: "publish".to_string(),
            mirror_subfolder: Some("scenes".to_string()),
        };
        let dest = build_destination(&source, Path::new("/proj"), &layout, 4, 5);
        assert_eq!(
            dest,
            PathBuf::from("/proj/publish/v004/scenes/shot010.v002.ma")
        );
    }

    #[test]
    fn test_nested_destination_without_mirror() {
        let source = parse_path("/job/fx/sim.hip");
        let dest = build_destination(&source, Path::new("/job/fx"), &Layout::nested(), 12, 3);
        assert_eq!(dest, PathBuf::from("/job/fx/publish/v012/sim.hip"));
    }

    #[test]
    fn test_version_folder_name() {
        assert_eq!(version_folder_name(1), "v001");
        assert_eq!(version_folder_name(1234), "v1234");
    }

    #[test]
    fn test_is_available() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shot.v001.ma");
        assert!(is_available(&path));
        fs::write(&path, b"").unwrap();
        assert!(!is_available(&path));
    }

    #[test]
    fn test_next_version_path_keeps_padding() {
        assert_eq!(
            next_version_path("/w/shot.v007.ma").unwrap(),
            PathBuf::from("/w/shot.v008.ma")
        );
        assert_eq!(
            next_version_path("/w/render.v7.exr").unwrap(),
            PathBuf::from("/w/render.v8.exr")
        );
    }

    #[test]
    fn test_next_version_path_requires_version() {
        let err = next_version_path("/w/shot.ma").unwrap_err();
        assert!(matches!(err, ResolveError::UnparseableVersion(_)));
    }

    #[test]
    fn test_next_version_path_at_max_version() {
        let err = next_version_path("/w/shot.v18446744073709551615.ma").unwrap_err();
        assert!(matches!(err, ResolveError::VersionOverflow(u64::MAX)));
    }
}
