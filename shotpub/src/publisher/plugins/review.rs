//! Creates review versions for movies and images.

use crate::log::Logger;
use crate::publisher::item::{ItemId, ItemTree, PublishItem};
use crate::publisher::plugin::{
    filters, Acceptance, PublishEnv, PublishOutcome, PublishPlan, PublishPlugin,
};
use crate::publisher::registrar::ReviewVersion;
use crate::publisher::PublishResult;
use crate::version::parse_path;
use crate::{log_debug, log_info};

use super::{existing_source, lookup};

const REVIEW_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "mov", "mp4"];

/// Sends playblasts, movies and stills to review.
///
/// The version is attached to the context's most specific record and
/// linked to whatever the item and its parent published earlier in the
/// run. Nothing is copied.
pub struct ReviewVersionPlugin {
    filters: Vec<String>,
    extensions: Vec<String>,
}

impl ReviewVersionPlugin {
    pub fn new() -> Self {
        Self {
            filters: filters(&["file.image", "file.video", "*.playblast"]),
            extensions: REVIEW_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn with_filters(mut self, patterns: &[&str]) -> Self {
        self.filters = filters(patterns);
        self
    }

    /// Accepted extensions, with or without a leading dot.
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Publish records this version shows: the item's own, then its parent's.
    fn published_file_ids(items: &ItemTree, item: &PublishItem) -> Vec<u64> {
        let parent = item.parent_id().and_then(|id| items.get(id));
        [Some(item), parent]
            .into_iter()
            .flatten()
            .filter_map(|i| i.published.as_ref().map(|p| p.record.id))
            .collect()
    }
}

impl Default for ReviewVersionPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishPlugin for ReviewVersionPlugin {
    fn name(&self) -> &str {
        "Send to review"
    }

    fn item_filters(&self) -> &[String] {
        &self.filters
    }

    fn accept(&self, env: &PublishEnv<'_>, item: &PublishItem) -> Acceptance {
        let Some(path) = &item.path else {
            return Acceptance::reject();
        };
        let extension = parse_path(path).extension.to_lowercase();
        if self.extensions.contains(&extension) {
            Acceptance::accept()
        } else {
            log_debug!(
                env.logger,
                "'{}' is not reviewable media, skipping",
                item.name
            );
            Acceptance::reject()
        }
    }

    fn validate(
        &self,
        _env: &PublishEnv<'_>,
        items: &ItemTree,
        id: ItemId,
    ) -> PublishResult<PublishPlan> {
        let item = lookup(items, id)?;
        let source = existing_source(item)?;
        let version = parse_path(&source).version_number().unwrap_or(1);

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
        let version = ReviewVersion::new(parse_path(&plan.source).publish_name(), &item.context)
            .with_description(item.description.clone())
            .with_media(Some(plan.source.clone()))
            .with_published_files(Self::published_file_ids(items, item));

        log_debug!(env.logger, "Review version: {:?}", version);
        let review_id = env.registrar.create_version(&version)?;
        match &version.entity {
            Some(entity) => log_info!(
                env.logger,
                "Created review version {} for {}",
                review_id,
                entity
            ),
            None => log_info!(env.logger, "Created review version {}", review_id),
        }

        Ok(PublishOutcome {
            record: None,
            published_path: None,
            review_version: Some(review_id),
        })
    }
}
