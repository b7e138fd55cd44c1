//! Publishes caches exported alongside a scene.

use std::fs;
use std::path::Path;

use crate::log::Logger;
use crate::publisher::item::{ItemId, ItemTree, PublishItem};
use crate::publisher::plugin::{
    filters, Acceptance, PublishEnv, PublishOutcome, PublishPlan, PublishPlugin,
};
use crate::publisher::{PublishError, PublishResult};
use crate::version::{Layout, VersionedPublishResolver};
use crate::{log_debug, log_info};

use super::{copy_to_destination, existing_source, lookup, publish_type, register};

const ALEMBIC_PUBLISH_TYPE: &str = "Alembic Cache";

/// Copies caches into the publish area at the same version as their
/// parent scene and registers them with a dependency on the scene record.
///
/// In the nested layout the cache keeps its project-relative folder, e.g.
/// `publish/v003/cache/alembic/hero.abc`.
pub struct CachePublisher {
    filters: Vec<String>,
}

impl CachePublisher {
    pub fn new() -> Self {
        Self {
            filters: filters(&["*.alembic"]),
        }
    }

    pub fn with_filters(mut self, patterns: &[&str]) -> Self {
        self.filters = filters(patterns);
        self
    }

    fn resolver(&self, env: &PublishEnv<'_>, source: &Path, root: &Path) -> VersionedPublishResolver {
        let layout = match env.settings.layout() {
            Layout::Nested { folder, .. } => Layout::Nested {
                folder,
                mirror_subfolder: source
                    .parent()
                    .and_then(|dir| dir.strip_prefix(root).ok())
                    .filter(|rel| !rel.as_os_str().is_empty())
                    .map(|rel| rel.to_string_lossy().into_owned()),
            },
            flat => flat,
        };
        VersionedPublishResolver::new(layout)
            .with_policy(env.settings.version_policy)
            .with_default_padding(env.settings.default_padding)
    }
}

impl Default for CachePublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishPlugin for CachePublisher {
    fn name(&self) -> &str {
        "Publish caches"
    }

    fn item_filters(&self) -> &[String] {
        &self.filters
    }

    fn accept(&self, _env: &PublishEnv<'_>, item: &PublishItem) -> Acceptance {
        if item.path.is_none() {
            return Acceptance::reject();
        }
        Acceptance::accept()
    }

    fn validate(
        &self,
        env: &PublishEnv<'_>,
        items: &ItemTree,
        id: ItemId,
    ) -> PublishResult<PublishPlan> {
        let item = lookup(items, id)?;
        let source = existing_source(item)?;
        let root = item
            .publish_root(&env.settings.layout())
            .ok_or_else(|| PublishError::UnresolvableSource(item.name.clone()))?;
        let resolver = self.resolver(env, &source, &root);

        let parent = items.parent(id);
        if let Some(parent) = parent {
            if parent.path.is_some() && parent.version_state.is_none() {
                return Err(PublishError::ParentIncomplete {
                    item: item.name.clone(),
                    parent: parent.name.clone(),
                });
            }
        }
        let parent_version = parent
            .and_then(|parent| parent.version_state)
            .map(|state| state.version_to_use);

        let resolution = match parent_version {
            Some(version) => {
                log_debug!(
                    env.logger,
                    "{} follows its scene at version {}",
                    item.name,
                    version
                );
                resolver.resolve_as(&source, &root, version)?
            }
            None => resolver.resolve(&source, &root)?,
        };

        Ok(PublishPlan {
            source,
            version: resolution.state.version_to_use,
            version_state: Some(resolution.state),
            destination: Some(resolution.destination),
        })
    }

    fn publish(
        &self,
        env: &PublishEnv<'_>,
        items: &ItemTree,
        id: ItemId,
        plan: &PublishPlan,
    ) -> PublishResult<PublishOutcome> {
        let item = lookup(items, id)?;
        let destination = plan.destination.as_ref().ok_or_else(|| PublishError::MissingPlan {
            plugin: self.name().to_string(),
            item: item.name.clone(),
        })?;

        copy_to_destination(&plan.source, destination, plan.version)?;

        let dependencies: Vec<u64> = items
            .parent(id)
            .and_then(|parent| parent.published.as_ref())
            .map(|published| vec![published.record.id])
            .unwrap_or_default();

        let mut kind = publish_type(env, item, destination);
        if kind == "File" {
            kind = ALEMBIC_PUBLISH_TYPE.to_string();
        }
        let record = register(env, item, destination, plan.version, kind, dependencies)?;

        Ok(PublishOutcome {
            record: Some(record),
            published_path: Some(destination.clone()),
            review_version: None,
        })
    }

    fn finalize(
        &self,
        env: &PublishEnv<'_>,
        _items: &ItemTree,
        _id: ItemId,
        plan: &PublishPlan,
        _outcome: &PublishOutcome,
    ) -> PublishResult<()> {
        if !env.settings.remove_published_caches {
            return Ok(());
        }
        fs::remove_file(&plan.source).map_err(|source| PublishError::RemoveFailed {
            path: plan.source.clone(),
            source,
        })?;
        log_info!(env.logger, "Removed published cache {}", plan.source.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutKind;
    use crate::publisher::item::PublishedFile;
    use crate::publisher::plugins::test_support::{session_item, write, Fixture};
    use crate::publisher::registrar::{RecordHandle, Registrar};
    use crate::version::PublishVersionState;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn cache_item(tree: &mut ItemTree, parent: Option<ItemId>, path: PathBuf, root: &Path) -> ItemId {
        let id = tree.create_item(parent, "maya.alembic", "Alembic Cache", "hero.abc");
        let item = tree.get_mut(id).unwrap();
        item.path = Some(path);
        item.project_root = Some(root.to_path_buf());
        id
    }

    #[test]
    fn test_follows_parent_version_and_depends_on_it() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("proj");
        let scene = write(&project.join("scenes").join("shot.v003.ma"), "scene");
        let cache = write(&project.join("cache").join("alembic").join("hero.abc"), "abc");

        let fixture = Fixture::new();
        let mut tree = ItemTree::new();
        let session = session_item(&mut tree, Some(scene), Some(project.clone()));
        {
            let parent = tree.get_mut(session).unwrap();
            parent.version_state = Some(PublishVersionState::next_after(2, 3).unwrap());
            parent.published = Some(PublishedFile {
                record: RecordHandle {
                    id: 41,
                    name: "shot.ma".to_string(),
                    version_number: 3,
                },
                path: project.join("scenes").join("publishes").join("shot.v003.ma"),
                version: 3,
            });
        }
        let id = cache_item(&mut tree, Some(session), cache, &project);

        let plugin = CachePublisher::new();
        let env = fixture.env();
        let plan = plugin.validate(&env, &tree, id).unwrap();
        assert_eq!(plan.version, 3);
        assert_eq!(
            plan.destination.as_deref(),
            Some(
                project
                    .join("cache")
                    .join("alembic")
                    .join("publishes")
                    .join("hero.v003.abc")
                    .as_path()
            )
        );

        plugin.publish(&env, &tree, id, &plan).unwrap();
        let records = fixture.registrar.records().unwrap();
        assert_eq!(records[0].record.dependency_ids, vec![41]);
        assert_eq!(records[0].record.published_file_type, "Alembic Cache");
        assert_eq!(records[0].record.name, "hero.abc");
    }

    #[test]
    fn test_fails_when_saved_parent_did_not_validate() {
        let temp = TempDir::new().unwrap();
        let scene = write(&temp.path().join("shot.v001.ma"), "scene");
        let cache = write(&temp.path().join("hero.abc"), "abc");

        let fixture = Fixture::new();
        let mut tree = ItemTree::new();
        let session = session_item(&mut tree, Some(scene), None);
        let id = cache_item(&mut tree, Some(session), cache, temp.path());

        let err = CachePublisher::new()
            .validate(&fixture.env(), &tree, id)
            .unwrap_err();
        assert!(matches!(err, PublishError::ParentIncomplete { .. }));
    }

    #[test]
    fn test_nested_layout_keeps_cache_folder() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("proj");
        let cache = write(&project.join("cache").join("alembic").join("hero.abc"), "abc");

        let mut fixture = Fixture::new();
        fixture.settings.layout = LayoutKind::Nested;
        let mut tree = ItemTree::new();
        let id = cache_item(&mut tree, None, cache, &project);

        let plan = CachePublisher::new()
            .validate(&fixture.env(), &tree, id)
            .unwrap();
        assert_eq!(
            plan.destination.unwrap(),
            project
                .join("publish")
                .join("v001")
                .join("cache")
                .join("alembic")
                .join("hero.abc")
        );
    }

    #[test]
    fn test_remove_after_publish_when_enabled() {
        let temp = TempDir::new().unwrap();
        let cache = write(&temp.path().join("hero.abc"), "abc");

        let mut fixture = Fixture::new();
        let mut tree = ItemTree::new();
        let id = cache_item(&mut tree, None, cache.clone(), temp.path());
        let plugin = CachePublisher::new();

        let plan = plugin.validate(&fixture.env(), &tree, id).unwrap();
        let outcome = plugin.publish(&fixture.env(), &tree, id, &plan).unwrap();
        plugin
            .finalize(&fixture.env(), &tree, id, &plan, &outcome)
            .unwrap();
        assert!(cache.exists());

        fixture.settings.remove_published_caches = true;
        plugin
            .finalize(&fixture.env(), &tree, id, &plan, &outcome)
            .unwrap();
        assert!(!cache.exists());
        assert!(temp.path().join("publishes").join("hero.v001.abc").exists());
    }
}
