//! Copies a scene into the versioned publish area.

use crate::context::ContextStore;
use crate::log::Logger;
use crate::publisher::item::{ItemId, ItemTree, PublishItem};
use crate::publisher::plugin::{
    filters, Acceptance, PublishEnv, PublishOutcome, PublishPlan, PublishPlugin,
};
use crate::publisher::{PublishError, PublishResult};
use crate::version::{is_available, next_version_path};
use crate::{log_debug, log_info, log_warn};

use super::{
    copy_to_destination, existing_source, first_error, lookup, publish_type, register,
    source_path, supersede_previous,
};

/// Publishes session files as `<name>.v<NNN>.<ext>` (flat) or under
/// `v<NNN>/` (nested), per the configured layout.
///
/// Finalize saves the item's context next to the project, clears the
/// status of superseded records and, with `auto_version`, copies the work
/// file to its next version.
pub struct VersionedFilePublisher {
    filters: Vec<String>,
}

impl VersionedFilePublisher {
    pub fn new() -> Self {
        Self {
            filters: filters(&["*.session"]),
        }
    }

    pub fn with_filters(mut self, patterns: &[&str]) -> Self {
        self.filters = filters(patterns);
        self
    }

    fn save_context(&self, env: &PublishEnv<'_>, item: &PublishItem) -> PublishResult<()> {
        let Some(root) = &item.project_root else {
            return Ok(());
        };
        if item.context.is_empty() {
            return Ok(());
        }
        let store = ContextStore::new(root);
        store.save(&item.context)?;
        log_debug!(env.logger, "Saved context to {}", store.path().display());
        Ok(())
    }

    fn auto_version(&self, env: &PublishEnv<'_>, item: &PublishItem) -> PublishResult<()> {
        if !env.settings.auto_version {
            return Ok(());
        }
        let source = source_path(item)?;
        let Ok(next) = next_version_path(&source) else {
            log_debug!(
                env.logger,
                "{} has no version number, not versioning up",
                source.display()
            );
            return Ok(());
        };
        if !is_available(&next) {
            log_warn!(
                env.logger,
                "Not versioning up: {} already exists",
                next.display()
            );
            return Ok(());
        }
        copy_to_destination(&source, &next, 0)?;
        log_info!(env.logger, "Saved work file as {}", next.display());
        Ok(())
    }
}

impl Default for VersionedFilePublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishPlugin for VersionedFilePublisher {
    fn name(&self) -> &str {
        "Publish to versioned folder"
    }

    fn item_filters(&self) -> &[String] {
        &self.filters
    }

    fn accept(&self, env: &PublishEnv<'_>, item: &PublishItem) -> Acceptance {
        if item.path.is_none() {
            log_warn!(
                env.logger,
                "'{}' has not been saved and will not be published",
                item.name
            );
            return Acceptance::reject();
        }
        Acceptance::required()
    }

    fn validate(
        &self,
        env: &PublishEnv<'_>,
        items: &ItemTree,
        id: ItemId,
    ) -> PublishResult<PublishPlan> {
        let item = lookup(items, id)?;
        let source = existing_source(item)?;
        let resolver = env.settings.resolver();
        let root = item
            .publish_root(resolver.layout())
            .ok_or_else(|| PublishError::UnresolvableSource(item.name.clone()))?;

        let resolution = resolver.resolve(&source, &root)?;
        log_info!(
            env.logger,
            "{} will publish as version {} to {}",
            item.name,
            resolution.state.version_to_use,
            resolution.destination.display()
        );

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
        log_info!(
            env.logger,
            "Copied {} to {}",
            plan.source.display(),
            destination.display()
        );

        let kind = publish_type(env, item, destination);
        let record = register(env, item, destination, plan.version, kind, Vec::new())?;

        Ok(PublishOutcome {
            record: Some(record),
            published_path: Some(destination.clone()),
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
        let Some(item) = items.get(id) else {
            return Ok(());
        };
        let supersede = match &outcome.record {
            Some(record) => supersede_previous(env, item, record),
            None => Ok(()),
        };
        first_error(
            [
                self.save_context(env, item),
                supersede,
                self.auto_version(env, item),
            ],
            env.logger,
        )
    }
}
