//! Per-artifact publish state machine.

use std::fmt;

use super::{PublishError, PublishResult};

/// Lifecycle state of one (item, plugin) task.
///
/// ```text
/// Collected -> Accepted -> Validated -> Published -> Finalized
///     |            |            |
///  Rejected  ValidationFailed  PublishFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Collected,
    Accepted,
    Rejected,
    Validated,
    ValidationFailed,
    Published,
    PublishFailed,
    Finalized,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Collected => "collected",
            TaskState::Accepted => "accepted",
            TaskState::Rejected => "rejected",
            TaskState::Validated => "validated",
            TaskState::ValidationFailed => "validation failed",
            TaskState::Published => "published",
            TaskState::PublishFailed => "publish failed",
            TaskState::Finalized => "finalized",
        }
    }

    /// Whether `self -> next` is a legal move.
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        use TaskState::*;
        matches!(
            (self, next),
            (Collected, Accepted)
                | (Collected, Rejected)
                | (Accepted, Validated)
                | (Accepted, ValidationFailed)
                | (Validated, Published)
                | (Validated, PublishFailed)
                | (Published, Finalized)
        )
    }

    /// No further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Rejected
                | TaskState::ValidationFailed
                | TaskState::PublishFailed
                | TaskState::Finalized
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TaskState::ValidationFailed | TaskState::PublishFailed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks one state machine, refusing illegal moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskProgress {
    state: TaskState,
}

impl Default for TaskProgress {
    fn default() -> Self {
        Self {
            state: TaskState::Collected,
        }
    }
}

impl TaskProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn advance(&mut self, next: TaskState) -> PublishResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(PublishError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut progress = TaskProgress::new();
        for state in [
            TaskState::Accepted,
            TaskState::Validated,
            TaskState::Published,
            TaskState::Finalized,
        ] {
            progress.advance(state).unwrap();
        }
        assert_eq!(progress.state(), TaskState::Finalized);
        assert!(progress.state().is_terminal());
    }

    #[test]
    fn test_no_way_back_from_validation_failure() {
        let mut progress = TaskProgress::new();
        progress.advance(TaskState::Accepted).unwrap();
        progress.advance(TaskState::ValidationFailed).unwrap();

        let err = progress.advance(TaskState::Validated).unwrap_err();
        assert!(matches!(
            err,
            PublishError::InvalidTransition {
                from: TaskState::ValidationFailed,
                to: TaskState::Validated
            }
        ));
        assert_eq!(progress.state(), TaskState::ValidationFailed);
    }

    #[test]
    fn test_rejected_only_from_collected() {
        assert!(TaskState::Collected.can_transition_to(TaskState::Rejected));
        assert!(!TaskState::Accepted.can_transition_to(TaskState::Rejected));
    }

    #[test]
    fn test_cannot_skip_validation() {
        let mut progress = TaskProgress::new();
        progress.advance(TaskState::Accepted).unwrap();
        assert!(progress.advance(TaskState::Published).is_err());
    }

    #[test]
    fn test_failure_states() {
        assert!(TaskState::ValidationFailed.is_failure());
        assert!(TaskState::PublishFailed.is_failure());
        assert!(!TaskState::Rejected.is_failure());
    }
}
