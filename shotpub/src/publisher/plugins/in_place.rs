//! Registers files where they already are.

use crate::log::Logger;
use crate::publisher::item::{ItemId, ItemTree, PublishItem};
use crate::publisher::plugin::{
    filters, Acceptance, PublishEnv, PublishOutcome, PublishPlan, PublishPlugin,
};
use crate::publisher::{PublishError, PublishResult};
use crate::version::parse_path;
use crate::{log_debug, log_info, log_warn};

use super::{lookup, register, source_path, supersede_previous};

/// Generic file publisher.
///
/// The publish type comes from the configured file types; with
/// `publish_all_file_types` any extension is accepted as `<Ext> File`.
/// The version is the one in the file name, or 1.
pub struct InPlaceFilePublisher {
    filters: Vec<String>,
}

impl InPlaceFilePublisher {
    pub fn new() -> Self {
        Self {
            filters: filters(&["file.*", "*.playblast"]),
        }
    }

    pub fn with_filters(mut self, patterns: &[&str]) -> Self {
        self.filters = filters(patterns);
        self
    }

    fn publish_type(&self, env: &PublishEnv<'_>, item: &PublishItem) -> Option<String> {
        let path = item.path.as_ref()?;
        env.settings.publish_type_for(&parse_path(path).extension)
    }
}

impl Default for InPlaceFilePublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishPlugin for InPlaceFilePublisher {
    fn name(&self) -> &str {
        "Publish to production tracking"
    }

    fn item_filters(&self) -> &[String] {
        &self.filters
    }

    fn accept(&self, env: &PublishEnv<'_>, item: &PublishItem) -> Acceptance {
        if item.path.is_none() {
            return Acceptance::reject();
        }
        match self.publish_type(env, item) {
            Some(_) => Acceptance::accept(),
            None => {
                log_debug!(
                    env.logger,
                    "No publish type configured for '{}', skipping",
                    item.name
                );
                Acceptance::reject()
            }
        }
    }

    fn validate(
        &self,
        env: &PublishEnv<'_>,
        items: &ItemTree,
        id: ItemId,
    ) -> PublishResult<PublishPlan> {
        let item = lookup(items, id)?;
        let source = source_path(item)?;

        // sequences are printf patterns; their folder has to exist
        let present = if item.item_type == "file.image.sequence" {
            source.parent().is_some_and(|dir| dir.is_dir())
        } else {
            source.exists()
        };
        if !present {
            return Err(PublishError::UnresolvableSource(item.name.clone()));
        }

        let components = parse_path(&source);
        let version = components.version_number().unwrap_or(1);

        let name = components.publish_name();
        let previous = env.registrar.find_conflicting(&name, &item.context, 0)?;
        if !previous.is_empty() {
            log_warn!(
                env.logger,
                "{} has {} earlier publish(es) that will be superseded",
                name,
                previous.len()
            );
        }

        Ok(PublishPlan {
            source,
            version,
            version_state: None,
            destination: None,
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
        let kind = self
            .publish_type(env, item)
            .unwrap_or_else(|| "File".to_string());
        let record = register(env, item, &plan.source, plan.version, kind, Vec::new())?;
        log_info!(env.logger, "Published {} in place", plan.source.display());

        Ok(PublishOutcome {
            record: Some(record),
            published_path: Some(plan.source.clone()),
            review_version: None,
        })
    }

    fn finalize(
        &self,
        env: &PublishEnv<'_>,
        items: &ItemTree,
        id: ItemId,
        _plan: &PublishPlan,
        outcome: &PublishOutcome,
    ) -> PublishResult<()> {
        match (&outcome.record, items.get(id)) {
            (Some(record), Some(item)) => supersede_previous(env, item, record),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::plugins::test_support::{write, Fixture};
    use crate::publisher::registrar::Registrar;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn file_item(tree: &mut ItemTree, item_type: &str, path: PathBuf) -> ItemId {
        let id = tree.create_item(None, item_type, "File", "file");
        tree.get_mut(id).unwrap().path = Some(path);
        id
    }

    #[test]
    fn test_accepts_configured_types_only() {
        let mut fixture = Fixture::new();
        let mut tree = ItemTree::new();
        let texture = file_item(&mut tree, "file.texture", PathBuf::from("/t/wood.tx"));
        let notes = file_item(&mut tree, "file.unknown", PathBuf::from("/t/notes.txt"));

        let plugin = InPlaceFilePublisher::new();
        assert!(plugin.accept(&fixture.env(), tree.get(texture).unwrap()).accepted);
        assert!(!plugin.accept(&fixture.env(), tree.get(notes).unwrap()).accepted);

        fixture.settings.publish_all_file_types = true;
        assert!(plugin.accept(&fixture.env(), tree.get(notes).unwrap()).accepted);
    }

    #[test]
    fn test_version_from_name_or_one() {
        let temp = TempDir::new().unwrap();
        let versioned = write(&temp.path().join("comp.v012.nk"), "nk");
        let plain = write(&temp.path().join("wood.tx"), "tx");

        let fixture = Fixture::new();
        let mut tree = ItemTree::new();
        let a = file_item(&mut tree, "file.nuke", versioned);
        let b = file_item(&mut tree, "file.texture", plain);

        let plugin = InPlaceFilePublisher::new();
        assert_eq!(plugin.validate(&fixture.env(), &tree, a).unwrap().version, 12);
        assert_eq!(plugin.validate(&fixture.env(), &tree, b).unwrap().version, 1);
    }

    #[test]
    fn test_publish_registers_in_place() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp.path().join("comp.v003.nk"), "nk");

        let fixture = Fixture::new();
        let mut tree = ItemTree::new();
        let id = file_item(&mut tree, "file.nuke", path.clone());
        tree.get_mut(id).unwrap().description = Some("final comp".to_string());

        let plugin = InPlaceFilePublisher::new();
        let env = fixture.env();
        let plan = plugin.validate(&env, &tree, id).unwrap();
        let outcome = plugin.publish(&env, &tree, id, &plan).unwrap();
        plugin.finalize(&env, &tree, id, &plan, &outcome).unwrap();

        assert_eq!(outcome.published_path, Some(path.clone()));
        let records = fixture.registrar.records().unwrap();
        assert_eq!(records[0].record.path, path);
        assert_eq!(records[0].record.name, "comp.nk");
        assert_eq!(records[0].record.published_file_type, "Nuke Script");
        assert_eq!(records[0].record.comment.as_deref(), Some("final comp"));
    }

    #[test]
    fn test_sequence_checks_folder() {
        let temp = TempDir::new().unwrap();
        let fixture = Fixture::new();
        let mut tree = ItemTree::new();
        let present = file_item(
            &mut tree,
            "file.image.sequence",
            temp.path().join("beauty.%04d.exr"),
        );
        let missing = file_item(
            &mut tree,
            "file.image.sequence",
            temp.path().join("gone").join("beauty.%04d.exr"),
        );

        let plugin = InPlaceFilePublisher::new();
        let plan = plugin.validate(&fixture.env(), &tree, present).unwrap();
        assert_eq!(plan.version, 1);
        assert!(plugin.validate(&fixture.env(), &tree, missing).is_err());

        let outcome = plugin.publish(&fixture.env(), &tree, present, &plan).unwrap();
        assert!(outcome.record.is_some());
        let records = fixture.registrar.records().unwrap();
        assert_eq!(records[0].record.checksum, None);
        assert_eq!(records[0].record.published_file_type, "Rendered Image");
    }
}
