//! The publish plugin contract.

use std::path::PathBuf;

use glob::Pattern;

use super::item::{ItemId, ItemTree, PublishItem};
use super::registrar::{RecordHandle, Registrar};
use super::PublishResult;
use crate::config::PublishSettings;
use crate::log::Logger;
use crate::version::PublishVersionState;

/// Everything a plugin may use, passed explicitly into every call.
#[derive(Clone, Copy)]
pub struct PublishEnv<'a> {
    pub logger: &'a dyn Logger,
    pub settings: &'a PublishSettings,
    pub registrar: &'a dyn Registrar,
}

impl<'a> PublishEnv<'a> {
    pub fn new(
        logger: &'a dyn Logger,
        settings: &'a PublishSettings,
        registrar: &'a dyn Registrar,
    ) -> Self {
        Self {
            logger,
            settings,
            registrar,
        }
    }
}

/// A plugin's answer to "do you want this item?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acceptance {
    pub accepted: bool,
    /// The user may not disable the task.
    pub required: bool,
    /// The user may toggle the task.
    pub enabled: bool,
    /// The task runs unless the user unchecks it.
    pub checked: bool,
}

impl Acceptance {
    pub fn accept() -> Self {
        Self {
            accepted: true,
            required: false,
            enabled: true,
            checked: true,
        }
    }

    pub fn reject() -> Self {
        Self {
            accepted: false,
            required: false,
            enabled: false,
            checked: false,
        }
    }

    /// Accepted but left unchecked.
    pub fn unchecked() -> Self {
        Self {
            checked: false,
            ..Self::accept()
        }
    }

    /// Accepted, checked, and locked on.
    pub fn required() -> Self {
        Self {
            required: true,
            enabled: false,
            ..Self::accept()
        }
    }

    /// Accepted and checked; the task will run.
    pub fn will_run(&self) -> bool {
        self.accepted && self.checked
    }
}

/// What validation decided, carried into publish and finalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPlan {
    pub source: PathBuf,
    /// Version the artifact is registered as.
    pub version: u64,
    /// Scan result, when the version came from a publish area. Child
    /// artifacts reuse it, so plugins that do not publish into a publish
    /// area leave it `None`.
    pub version_state: Option<PublishVersionState>,
    /// Copy target; `None` when the source is registered in place.
    pub destination: Option<PathBuf>,
}

/// What a publish produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    pub record: Option<RecordHandle>,
    pub published_path: Option<PathBuf>,
    /// Id of a review version created for the item.
    pub review_version: Option<u64>,
}

/// A collector item handler: accept, validate, publish, finalize.
///
/// `validate` must not touch the filesystem beyond reading it. `publish`
/// performs the side effects. `finalize` is bookkeeping whose failures are
/// logged and never roll anything back.
pub trait PublishPlugin: Send + Sync {
    fn name(&self) -> &str;

    /// Glob patterns over item types, e.g. `file.*` or `maya.session`.
    fn item_filters(&self) -> &[String];

    fn accept(&self, env: &PublishEnv<'_>, item: &PublishItem) -> Acceptance;

    fn validate(
        &self,
        env: &PublishEnv<'_>,
        items: &ItemTree,
        id: ItemId,
    ) -> PublishResult<PublishPlan>;

    fn publish(
        &self,
        env: &PublishEnv<'_>,
        items: &ItemTree,
        id: ItemId,
        plan: &PublishPlan,
    ) -> PublishResult<PublishOutcome>;

    fn finalize(
        &self,
        _env: &PublishEnv<'_>,
        _items: &ItemTree,
        _id: ItemId,
        _plan: &PublishPlan,
        _outcome: &PublishOutcome,
    ) -> PublishResult<()> {
        Ok(())
    }

    /// Whether the plugin's filters cover `item_type`.
    fn matches(&self, item_type: &str) -> bool {
        filters_match(self.item_filters(), item_type)
    }
}

/// True when any pattern in `filters` matches `item_type`.
///
/// Malformed patterns never match.
pub fn filters_match(filters: &[String], item_type: &str) -> bool {
    filters.iter().any(|filter| {
        Pattern::new(filter)
            .map(|pattern| pattern.matches(item_type))
            .unwrap_or(false)
    })
}

/// Owned filter list from string literals.
pub(crate) fn filters(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matching() {
        let f = filters(&["file.*", "maya.session"]);
        assert!(filters_match(&f, "file.maya"));
        assert!(filters_match(&f, "file.image.sequence"));
        assert!(filters_match(&f, "maya.session"));
        assert!(!filters_match(&f, "nuke.session"));
        assert!(!filters_match(&f, "files"));
    }

    #[test]
    fn test_bad_pattern_never_matches() {
        assert!(!filters_match(&filters(&["file.[abc"]), "file.a"));
    }

    #[test]
    fn test_acceptance_flags() {
        assert!(Acceptance::accept().will_run());
        assert!(!Acceptance::unchecked().will_run());
        assert!(Acceptance::unchecked().accepted);
        assert!(!Acceptance::reject().will_run());
        let required = Acceptance::required();
        assert!(required.required && !required.enabled && required.will_run());
    }
}
