//! Pipeline context threaded explicitly through every publish call.
//!
//! A context names the project, the entity (shot, asset) and the task a
//! publish belongs to. It is attached to each collected item and can be
//! cached next to a project in a `shotgun.context` file so that later
//! sessions in the same project restore it.

mod store;

pub use store::{ContextError, ContextStore, CONTEXT_FILENAME};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a record in the production-tracking service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Record type, e.g. `Project`, `Shot`, `Task`.
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
    pub name: String,
}

impl EntityRef {
    pub fn new(kind: impl Into<String>, id: u64, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (#{})", self.kind, self.name, self.id)
    }
}

/// The pipeline position of a publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<EntityRef>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: EntityRef) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_entity(mut self, entity: EntityRef) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn with_step(mut self, step: EntityRef) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_task(mut self, task: EntityRef) -> Self {
        self.task = Some(task);
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.project.is_none() && self.entity.is_none() && self.step.is_none() && self.task.is_none()
    }

    /// Most specific record a review version should link to: the task,
    /// then the entity, then the project.
    pub fn review_entity(&self) -> Option<&EntityRef> {
        self.task
            .as_ref()
            .or(self.entity.as_ref())
            .or(self.project.as_ref())
    }
}

impl fmt::Display for PipelineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [&self.project, &self.entity, &self.step, &self.task]
            .into_iter()
            .flatten()
            .map(|e| e.name.clone())
            .collect();
        if parts.is_empty() {
            f.write_str("(no context)")
        } else {
            f.write_str(&parts.join(" / "))
        }
    }
}
