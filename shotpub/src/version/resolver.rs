//! The versioned publish resolver.
//!
//! Combines parsing, scanning and destination building into one decision:
//! which version a source publishes as and where it lands.

use std::path::{Path, PathBuf};

use super::{
    build_destination, highest_version, highest_version_folder, is_available, parse_path,
    successor, Layout, PathComponents, ResolveError, DEFAULT_VERSION_PADDING,
};

/// How the publish version is chosen for the flat layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    /// A versioned source publishes under its own version number, keeping
    /// work file and publish in step. Unversioned sources fall back to
    /// [`VersionPolicy::NextAvailable`].
    #[default]
    FromSource,

    /// Always one above the highest version already published.
    NextAvailable,
}

impl VersionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionPolicy::FromSource => "source",
            VersionPolicy::NextAvailable => "next",
        }
    }
}

impl std::str::FromStr for VersionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "source" | "from_source" => Ok(VersionPolicy::FromSource),
            "next" | "next_available" => Ok(VersionPolicy::NextAvailable),
            other => Err(format!(
                "unknown version policy '{}', expected 'source' or 'next'",
                other
            )),
        }
    }
}

/// Version bookkeeping for one publish folder.
///
/// Computed at validation and carried on the in-flight item so that every
/// artifact published by the same operation agrees on one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishVersionState {
    /// Highest version already present in the publish folder (0 if none).
    pub highest_version_found: u64,
    /// Version the publish will be registered as.
    pub version_to_use: u64,
    /// Digit width used for file-name version tokens.
    pub padding: usize,
}

impl PublishVersionState {
    /// State for the next free version after `highest_version_found`.
    pub fn next_after(highest_version_found: u64, padding: usize) -> Result<Self, ResolveError> {
        Ok(Self {
            highest_version_found,
            version_to_use: successor(highest_version_found)?,
            padding,
        })
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub components: PathComponents,
    /// Folder that was scanned and that will receive the publish.
    pub publish_folder: PathBuf,
    pub state: PublishVersionState,
    /// Free path the source will be copied to.
    pub destination: PathBuf,
}

/// Resolves publish versions and destinations for any file type and host.
///
/// # Example
///
/// ```
/// use shotpub::version::{Layout, VersionedPublishResolver};
///
/// let work = tempfile::tempdir().unwrap();
/// let source = work.path().join("shot010.v002.ma");
/// std::fs::write(&source, b"scene").unwrap();
///
/// let resolver = VersionedPublishResolver::new(Layout::flat());
/// let resolution = resolver.resolve(&source, work.path()).unwrap();
/// assert_eq!(resolution.state.version_to_use, 2);
/// assert!(resolution.destination.ends_with("publishes/shot010.v002.ma"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedPublishResolver {
    layout: Layout,
    policy: VersionPolicy,
    default_padding: usize,
}

impl VersionedPublishResolver {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            policy: VersionPolicy::default(),
            default_padding: DEFAULT_VERSION_PADDING,
        }
    }

    pub fn with_policy(mut self, policy: VersionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_default_padding(mut self, padding: usize) -> Self {
        self.default_padding = padding.max(1);
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn policy(&self) -> VersionPolicy {
        self.policy
    }

    /// Scan the publish area for `source` without choosing a destination.
    pub fn scan(&self, source: &Path, publish_root: &Path) -> Result<PublishVersionState, ResolveError> {
        let components = self.components(source)?;
        let publish_folder = self.layout.publish_folder(publish_root);
        self.version_state(&components, &publish_folder)
    }

    /// Choose the version and destination for `source`.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::MissingFileName`] if `source` has no file name
    /// - [`ResolveError::Scan`] if the publish folder cannot be listed
    /// - [`ResolveError::VersionOverflow`] if the highest version found has
    ///   no successor
    /// - [`ResolveError::DestinationCollision`] if the destination exists;
    ///   the resolver never skips ahead to a higher version
    pub fn resolve(&self, source: &Path, publish_root: &Path) -> Result<Resolution, ResolveError> {
        let components = self.components(source)?;
        let publish_folder = self.layout.publish_folder(publish_root);
        let state = self.version_state(&components, &publish_folder)?;
        self.finish(components, publish_folder, publish_root, state)
    }

    /// Resolve `source` as an explicit `version`, typically one already
    /// chosen for a parent artifact of the same publish operation.
    pub fn resolve_as(
        &self,
        source: &Path,
        publish_root: &Path,
        version: u64,
    ) -> Result<Resolution, ResolveError> {
        let components = self.components(source)?;
        let publish_folder = self.layout.publish_folder(publish_root);
        let highest = self.highest_in(&components, &publish_folder)?;
        let state = PublishVersionState {
            highest_version_found: highest,
            version_to_use: version,
            padding: self.padding_for(&components),
        };
        self.finish(components, publish_folder, publish_root, state)
    }

    fn components(&self, source: &Path) -> Result<PathComponents, ResolveError> {
        let components = parse_path(source);
        if components.filename.is_empty() {
            return Err(ResolveError::MissingFileName(source.to_path_buf()));
        }
        Ok(components)
    }

    fn padding_for(&self, components: &PathComponents) -> usize {
        components.version_padding().unwrap_or(self.default_padding)
    }

    fn highest_in(
        &self,
        components: &PathComponents,
        publish_folder: &Path,
    ) -> Result<u64, ResolveError> {
        match self.layout {
            Layout::Flat { .. } => highest_version(
                publish_folder,
                &components.prefix,
                components.raw_extension(),
            ),
            Layout::Nested { .. } => highest_version_folder(publish_folder),
        }
    }

    fn version_state(
        &self,
        components: &PathComponents,
        publish_folder: &Path,
    ) -> Result<PublishVersionState, ResolveError> {
        let highest = self.highest_in(components, publish_folder)?;
        let padding = self.padding_for(components);

        let state = match (&self.layout, self.policy, components.version_number()) {
            (Layout::Flat { .. }, VersionPolicy::FromSource, Some(source_version)) => {
                PublishVersionState {
                    highest_version_found: highest,
                    version_to_use: source_version,
                    padding,
                }
            }
            _ => PublishVersionState::next_after(highest, padding)?,
        };
        Ok(state)
    }

    fn finish(
        &self,
        components: PathComponents,
        publish_folder: PathBuf,
        publish_root: &Path,
        state: PublishVersionState,
    ) -> Result<Resolution, ResolveError> {
        let destination = build_destination(
            &components,
            publish_root,
            &self.layout,
            state.version_to_use,
            state.padding,
        );

        if !is_available(&destination) {
            return Err(ResolveError::DestinationCollision {
                destination,
                version: state.version_to_use,
            });
        }

        Ok(Resolution {
            components,
            publish_folder,
            state,
            destination,
        })
    }
}

impl Default for VersionedPublishResolver {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scene_dir() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let scenes = temp.path().join("proj").join("scenes");
        fs::create_dir_all(scenes.join("publishes")).unwrap();
        (temp, scenes)
    }

    #[test]
    fn test_end_to_end_then_collision() {
        let (_temp, scenes) = scene_dir();
        let source = scenes.join("shot010.v002.ma");
        fs::write(&source, b"scene").unwrap();
        fs::write(scenes.join("publishes").join("shot010.v001.ma"), b"old").unwrap();

        let resolver = VersionedPublishResolver::new(Layout::flat());
        let resolution = resolver.resolve(&source, &scenes).unwrap();

        assert_eq!(resolution.state.highest_version_found, 1);
        assert_eq!(resolution.state.version_to_use, 2);
        assert_eq!(
            resolution.destination,
            scenes.join("publishes").join("shot010.v002.ma")
        );

        fs::copy(&source, &resolution.destination).unwrap();

        let err = resolver.resolve(&source, &scenes).unwrap_err();
        match err {
            ResolveError::DestinationCollision {
                destination,
                version,
            } => {
                assert_eq!(version, 2);
                assert_eq!(destination, resolution.destination);
            }
            other => panic!("expected collision, got {:?}", other),
        }
    }

    #[test]
    fn test_next_available_at_max_version_is_an_error() {
        let (_temp, scenes) = scene_dir();
        let source = scenes.join("shot010.v002.ma");
        fs::write(&source, b"scene").unwrap();
        fs::write(
            scenes.join("publishes").join("shot010.v18446744073709551615.ma"),
            b"old",
        )
        .unwrap();

        let resolver =
            VersionedPublishResolver::new(Layout::flat()).with_policy(VersionPolicy::NextAvailable);
        let err = resolver.resolve(&source, &scenes).unwrap_err();
        assert!(matches!(err, ResolveError::VersionOverflow(u64::MAX)));
    }

    #[test]
    fn test_next_available_policy() {
        let (_temp, scenes) = scene_dir();
        let source = scenes.join("shot010.v002.ma");
        fs::write(scenes.join("publishes").join("shot010.v005.ma"), b"").unwrap();

        let resolver =
            VersionedPublishResolver::new(Layout::flat()).with_policy(VersionPolicy::NextAvailable);
        let resolution = resolver.resolve(&source, &scenes).unwrap();

        assert_eq!(resolution.state.highest_version_found, 5);
        assert_eq!(resolution.state.version_to_use, 6);
        assert!(resolution.destination.ends_with("shot010.v006.ma"));
    }

    #[test]
    fn test_unversioned_source_uses_next_available_and_default_padding() {
        let (_temp, scenes) = scene_dir();
        let source = scenes.join("layout.max");
        fs::write(scenes.join("publishes").join("layout.v001.max"), b"").unwrap();

        let resolver = VersionedPublishResolver::new(Layout::flat());
        let resolution = resolver.resolve(&source, &scenes).unwrap();

        assert_eq!(resolution.state.version_to_use, 2);
        assert_eq!(resolution.state.padding, 3);
        assert!(resolution.destination.ends_with("layout.v002.max"));
    }

    #[test]
    fn test_source_padding_is_preserved() {
        let (_temp, scenes) = scene_dir();
        let source = scenes.join("comp.v0042.nk");

        let resolver = VersionedPublishResolver::new(Layout::flat());
        let resolution = resolver.resolve(&source, &scenes).unwrap();

        assert_eq!(resolution.state.padding, 4);
        assert!(resolution.destination.ends_with("comp.v0042.nk"));
    }

    #[test]
    fn test_custom_default_padding() {
        let (_temp, scenes) = scene_dir();
        let resolver = VersionedPublishResolver::new(Layout::flat()).with_default_padding(5);
        let resolution = resolver.resolve(&scenes.join("plate.exr"), &scenes).unwrap();
        assert!(resolution.destination.ends_with("plate.v00001.exr"));
    }

    #[test]
    fn test_nested_layout_uses_next_folder() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("publish").join("v001")).unwrap();
        fs::create_dir_all(root.join("publish").join("v002")).unwrap();

        let layout = Layout::Nested {
            folder: "publish".to_string(),
            mirror_subfolder: Some("scenes".to_string()),
        };
        let resolver = VersionedPublishResolver::new(layout);
        let source = root.join("scenes").join("shot010.v009.ma");
        let resolution = resolver.resolve(&source, root).unwrap();

        assert_eq!(resolution.state.version_to_use, 3);
        assert_eq!(
            resolution.destination,
            root.join("publish/v003/scenes/shot010.v009.ma")
        );
    }

    #[test]
    fn test_resolve_as_explicit_version() {
        let (_temp, scenes) = scene_dir();
        let resolver = VersionedPublishResolver::new(Layout::flat());
        let resolution = resolver
            .resolve_as(&scenes.join("cache.abc"), &scenes, 7)
            .unwrap();

        assert_eq!(resolution.state.version_to_use, 7);
        assert_eq!(resolution.state.highest_version_found, 0);
        assert!(resolution.destination.ends_with("cache.v007.abc"));
    }

    #[test]
    fn test_resolve_as_collides_instead_of_skipping() {
        let (_temp, scenes) = scene_dir();
        fs::write(scenes.join("publishes").join("cache.v007.abc"), b"").unwrap();

        let resolver = VersionedPublishResolver::new(Layout::flat());
        let err = resolver
            .resolve_as(&scenes.join("cache.abc"), &scenes, 7)
            .unwrap_err();
        assert!(matches!(err, ResolveError::DestinationCollision { version: 7, .. }));
    }

    #[test]
    fn test_missing_file_name() {
        let resolver = VersionedPublishResolver::default();
        let err = resolver.resolve(Path::new("/"), Path::new("/")).unwrap_err();
        assert!(matches!(err, ResolveError::MissingFileName(_)));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("source".parse::<VersionPolicy>(), Ok(VersionPolicy::FromSource));
        assert_eq!("NEXT".parse::<VersionPolicy>(), Ok(VersionPolicy::NextAvailable));
        assert!("latest".parse::<VersionPolicy>().is_err());
    }
}
