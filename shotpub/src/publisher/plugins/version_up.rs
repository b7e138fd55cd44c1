//! Saves the work file to its next version.

use crate::log::Logger;
use crate::publisher::item::{ItemId, ItemTree, PublishItem};
use crate::publisher::plugin::{
    filters, Acceptance, PublishEnv, PublishOutcome, PublishPlan, PublishPlugin,
};
use crate::publisher::{PublishError, PublishResult};
use crate::version::{is_available, next_version_path, parse_path, successor, ResolveError};
use crate::{log_info, log_warn};

use super::{copy_to_destination, existing_source, lookup};

/// Copies `shot.v003.ma` to `shot.v004.ma` so work continues on a fresh
/// version. Nothing is registered.
///
/// Unsaved or unversioned sessions are offered unchecked, and fail
/// validation if the user checks them anyway.
pub struct VersionUpPlugin {
    filters: Vec<String>,
}

impl VersionUpPlugin {
    pub fn new() -> Self {
        Self {
            filters: filters(&["*.session"]),
        }
    }

    pub fn with_filters(mut self, patterns: &[&str]) -> Self {
        self.filters = filters(patterns);
        self
    }
}

impl Default for VersionUpPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishPlugin for VersionUpPlugin {
    fn name(&self) -> &str {
        "Begin file versioning"
    }

    fn item_filters(&self) -> &[String] {
        &self.filters
    }

    fn accept(&self, env: &PublishEnv<'_>, item: &PublishItem) -> Acceptance {
        let Some(path) = &item.path else {
            log_warn!(
                env.logger,
                "'{}' has not been saved; save it before versioning up",
                item.name
            );
            return Acceptance::unchecked();
        };
        if parse_path(path).version.is_none() {
            log_info!(
                env.logger,
                "{} has no version number; add one such as .v001 to version up",
                path.display()
            );
            return Acceptance::unchecked();
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
        let token = parse_path(&source)
            .version
            .ok_or_else(|| ResolveError::UnparseableVersion(source.clone()))?;
        let next = next_version_path(&source)?;
        let version = successor(token.number)?;

        if !is_available(&next) {
            return Err(ResolveError::DestinationCollision {
                destination: next,
                version,
            }
            .into());
        }
        log_info!(env.logger, "{} will be saved as {}", item.name, next.display());

        Ok(PublishPlan {
            source,
            version,
            // the next work file is not a publish area version
            version_state: None,
            destination: Some(next),
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
        let next = plan.destination.as_ref().ok_or_else(|| PublishError::MissingPlan {
            plugin: self.name().to_string(),
            item: item.name.clone(),
        })?;
        copy_to_destination(&plan.source, next, plan.version)?;
        log_info!(env.logger, "Saved {} as {}", item.name, next.display());

        Ok(PublishOutcome {
            record: None,
            published_path: Some(next.clone()),
            review_version: None,
        })
    }
}
