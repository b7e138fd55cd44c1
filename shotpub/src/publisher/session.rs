//! Publish orchestration.
//!
//! A [`PublishSession`] pairs every item with every plugin whose filters
//! match it, then runs each item's tasks to completion, in tree order,
//! before moving on. Validation failures stay local to their task.
//! Publish failures are side-effecting, so the caller's
//! [`PublishErrorPolicy`] decides whether the rest of the run continues.

use std::path::PathBuf;

use super::item::{ItemId, ItemTree, PublishedFile};
use super::plugin::{Acceptance, PublishEnv, PublishOutcome, PublishPlan, PublishPlugin};
use super::task::{TaskProgress, TaskState};
use super::PublishResult;
use crate::log::Logger;
use crate::{log_debug, log_error, log_info, log_warn};

/// What to do with the remaining tasks after a publish-phase error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishErrorPolicy {
    /// Stop scheduling further tasks.
    #[default]
    Abort,
    /// Carry on with the next task.
    Continue,
}

/// One (item, plugin) pairing and its progress.
#[derive(Debug, Clone)]
pub struct PublishTask {
    pub item: ItemId,
    /// Index into the session's plugin list.
    pub plugin: usize,
    pub acceptance: Acceptance,
    progress: TaskProgress,
    pub plan: Option<PublishPlan>,
    pub outcome: Option<PublishOutcome>,
    pub error: Option<String>,
}

impl PublishTask {
    fn new(item: ItemId, plugin: usize) -> Self {
        Self {
            item,
            plugin,
            acceptance: Acceptance::reject(),
            progress: TaskProgress::new(),
            plan: None,
            outcome: None,
            error: None,
        }
    }

    pub fn state(&self) -> TaskState {
        self.progress.state()
    }

    fn advance(&mut self, next: TaskState) -> PublishResult<()> {
        self.progress.advance(next)
    }
}

/// Summary of one task after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub item: ItemId,
    pub item_name: String,
    pub plugin: String,
    pub state: TaskState,
    /// False when the task was accepted but left unchecked.
    pub checked: bool,
    pub version: Option<u64>,
    pub destination: Option<PathBuf>,
    pub record_id: Option<u64>,
    pub review_version: Option<u64>,
    pub error: Option<String>,
}

/// Result of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub tasks: Vec<TaskReport>,
    /// A publish error stopped the run early.
    pub aborted: bool,
}

impl PublishReport {
    pub fn failures(&self) -> impl Iterator<Item = &TaskReport> {
        self.tasks.iter().filter(|t| t.state.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Tasks that reached `Finalized`.
    pub fn completed(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.state == TaskState::Finalized)
            .count()
    }

    /// Tasks that were rejected, unchecked, or never ran.
    pub fn skipped(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| {
                matches!(t.state, TaskState::Rejected | TaskState::Accepted) || !t.checked
            })
            .count()
    }
}

/// Drives the plugin lifecycle over an item tree.
pub struct PublishSession<'a> {
    env: PublishEnv<'a>,
    plugins: Vec<Box<dyn PublishPlugin>>,
}

impl<'a> PublishSession<'a> {
    pub fn new(env: PublishEnv<'a>, plugins: Vec<Box<dyn PublishPlugin>>) -> Self {
        Self { env, plugins }
    }

    pub fn plugins(&self) -> &[Box<dyn PublishPlugin>] {
        &self.plugins
    }

    pub fn env(&self) -> &PublishEnv<'a> {
        &self.env
    }

    /// Accept phase: one task per (item, matching plugin).
    pub fn collect_tasks(&self, items: &ItemTree) -> PublishResult<Vec<PublishTask>> {
        let mut tasks = Vec::new();
        for item in items.iter() {
            for (index, plugin) in self.plugins.iter().enumerate() {
                if !plugin.matches(&item.item_type) {
                    continue;
                }
                let mut task = PublishTask::new(item.id(), index);
                task.acceptance = plugin.accept(&self.env, item);
                if task.acceptance.accepted {
                    task.advance(TaskState::Accepted)?;
                    log_debug!(self.env.logger, "{} accepted '{}'", plugin.name(), item.name);
                } else {
                    task.advance(TaskState::Rejected)?;
                }
                tasks.push(task);
            }
        }
        Ok(tasks)
    }

    /// Validate an accepted task. Returns whether it validated.
    ///
    /// A validation error is recorded on the task and logged; it is not
    /// returned.
    pub fn validate_task(&self, items: &mut ItemTree, task: &mut PublishTask) -> PublishResult<bool> {
        let plugin = &self.plugins[task.plugin];
        let item_name = item_name(items, task.item);

        match plugin.validate(&self.env, items, task.item) {
            Ok(plan) => {
                task.advance(TaskState::Validated)?;
                if let Some(item) = items.get_mut(task.item) {
                    if item.version_state.is_none() {
                        item.version_state = plan.version_state;
                    }
                }
                task.plan = Some(plan);
                Ok(true)
            }
            Err(e) => {
                task.advance(TaskState::ValidationFailed)?;
                log_error!(
                    self.env.logger,
                    "{}: validation failed for '{}': {}",
                    plugin.name(),
                    item_name,
                    e
                );
                task.error = Some(e.to_string());
                Ok(false)
            }
        }
    }

    /// Publish a validated task. Publish errors are returned.
    pub fn publish_task(&self, items: &mut ItemTree, task: &mut PublishTask) -> PublishResult<()> {
        let plugin = &self.plugins[task.plugin];
        let Some(plan) = task.plan.clone() else {
            return Err(super::PublishError::MissingPlan {
                plugin: plugin.name().to_string(),
                item: item_name(items, task.item),
            });
        };

        match plugin.publish(&self.env, items, task.item, &plan) {
            Ok(outcome) => {
                task.advance(TaskState::Published)?;
                if let (Some(record), Some(path), Some(item)) = (
                    outcome.record.clone(),
                    outcome.published_path.clone(),
                    items.get_mut(task.item),
                ) {
                    if item.published.is_none() {
                        item.published = Some(PublishedFile {
                            record,
                            path,
                            version: plan.version,
                        });
                    }
                }
                task.outcome = Some(outcome);
                Ok(())
            }
            Err(e) => {
                task.advance(TaskState::PublishFailed)?;
                log_error!(
                    self.env.logger,
                    "{}: publish failed for '{}': {}",
                    plugin.name(),
                    item_name(items, task.item),
                    e
                );
                task.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Finalize a published task. Errors are logged, never returned.
    pub fn finalize_task(&self, items: &ItemTree, task: &mut PublishTask) -> PublishResult<()> {
        let plugin = &self.plugins[task.plugin];
        if let (Some(plan), Some(outcome)) = (&task.plan, &task.outcome) {
            if let Err(e) = plugin.finalize(&self.env, items, task.item, plan, outcome) {
                log_warn!(
                    self.env.logger,
                    "{}: finalize for '{}' did not complete: {}",
                    plugin.name(),
                    item_name(items, task.item),
                    e
                );
            }
        }
        task.advance(TaskState::Finalized)
    }

    /// Run every checked task through validate, publish and finalize.
    pub fn run_all(
        &self,
        items: &mut ItemTree,
        policy: PublishErrorPolicy,
    ) -> PublishResult<PublishReport> {
        let mut tasks = self.collect_tasks(items)?;
        let runnable = tasks.iter().filter(|t| t.acceptance.will_run()).count();
        log_info!(self.env.logger, "Publishing {} task(s)", runnable);

        let mut aborted = false;
        for task in tasks.iter_mut() {
            if !task.acceptance.will_run() {
                continue;
            }
            if !self.validate_task(items, task)? {
                continue;
            }
            if self.publish_task(items, task).is_err() {
                if policy == PublishErrorPolicy::Abort {
                    log_warn!(self.env.logger, "Stopping after publish error");
                    aborted = true;
                    break;
                }
                continue;
            }
            self.finalize_task(items, task)?;
        }

        let report = self.report(items, &tasks, aborted);
        log_info!(
            self.env.logger,
            "Publish finished: {} completed, {} failed",
            report.completed(),
            report.failures().count()
        );
        Ok(report)
    }

    /// Accept and validate only; nothing is written.
    pub fn validate_all(&self, items: &mut ItemTree) -> PublishResult<PublishReport> {
        let mut tasks = self.collect_tasks(items)?;
        for task in tasks.iter_mut().filter(|t| t.acceptance.will_run()) {
            self.validate_task(items, task)?;
        }
        Ok(self.report(items, &tasks, false))
    }

    fn report(&self, items: &ItemTree, tasks: &[PublishTask], aborted: bool) -> PublishReport {
        PublishReport {
            tasks: tasks
                .iter()
                .map(|task| TaskReport {
                    item: task.item,
                    item_name: item_name(items, task.item),
                    plugin: self.plugins[task.plugin].name().to_string(),
                    state: task.state(),
                    checked: task.acceptance.checked,
                    version: task.plan.as_ref().map(|p| p.version),
                    destination: task
                        .outcome
                        .as_ref()
                        .and_then(|o| o.published_path.clone())
                        .or_else(|| task.plan.as_ref().and_then(|p| p.destination.clone())),
                    record_id: task
                        .outcome
                        .as_ref()
                        .and_then(|o| o.record.as_ref())
                        .map(|r| r.id),
                    review_version: task.outcome.as_ref().and_then(|o| o.review_version),
                    error: task.error.clone(),
                })
                .collect(),
            aborted,
        }
    }
}

fn item_name(items: &ItemTree, id: ItemId) -> String {
    items
        .get(id)
        .map(|item| item.name.clone())
        .unwrap_or_default()
}
