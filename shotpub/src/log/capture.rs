//! Logger that keeps every message in memory.

use parking_lot::Mutex;
use std::fmt::Arguments;

use crate::log::{LogLevel, Logger};

/// A single captured log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedMessage {
    pub level: LogLevel,
    pub message: String,
}

/// Records messages so callers can inspect what a publish reported.
///
/// Hosts use this to build the per-item feedback shown to the user; tests
/// use it to assert on validation messages.
#[derive(Debug, Default)]
pub struct CapturingLogger {
    messages: Mutex<Vec<CapturedMessage>>,
}

impl CapturingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every message logged so far.
    pub fn messages(&self) -> Vec<CapturedMessage> {
        self.messages.lock().clone()
    }

    /// Messages at exactly `level`.
    pub fn at_level(&self, level: LogLevel) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter(|m| m.level == level)
            .map(|m| m.message.clone())
            .collect()
    }

    /// True if any message at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.messages
            .lock()
            .iter()
            .any(|m| m.level == level && m.message.contains(needle))
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl Logger for CapturingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        self.messages.lock().push(CapturedMessage {
            level,
            message: args.to_string(),
        });
    }
}
