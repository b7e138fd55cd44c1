//! Core traits for the command handler pattern.
//!
//! Handlers depend on these interfaces only, so they can run against mocks.

use std::path::Path;

use crate::error::CliError;
use shotpub::config::LayoutKind;
use shotpub::publisher::{PublishReport, StoredRecord};
use shotpub::version::Resolution;

use super::args::{PublishArgs, VersionUpArgs};

// ============================================================================
// Output Trait - Abstracts console/UI output
// ============================================================================

/// Trait for outputting messages to the user.
pub trait Output: Send + Sync {
    /// Print a line of text.
    fn println(&self, message: &str);

    /// Print an empty line.
    fn newline(&self) {
        self.println("");
    }

    /// Print an indented line.
    fn indented(&self, message: &str) {
        self.println(&format!("  {}", message));
    }
}

// ============================================================================
// Publisher Service Trait
// ============================================================================

/// Operations that touch configuration, the registrar or the publish
/// folders.
pub trait PublisherService: Send + Sync {
    /// Resolve where `source` would publish.
    fn resolve(
        &self,
        source: &Path,
        root: &Path,
        layout: Option<LayoutKind>,
    ) -> Result<Resolution, CliError>;

    /// Collect and publish (or only validate, for a dry run).
    fn publish(&self, args: &PublishArgs) -> Result<PublishReport, CliError>;

    /// Copy a work file to its next free version.
    fn version_up(&self, args: &VersionUpArgs) -> Result<PublishReport, CliError>;

    /// All records known to the registrar.
    fn records(&self) -> Result<Vec<StoredRecord>, CliError>;
}

// ============================================================================
// Command Context - Bundles dependencies for handlers
// ============================================================================

/// Context providing dependencies to command handlers.
pub struct CommandContext<'a> {
    /// Output interface for user messages.
    pub output: &'a dyn Output,

    /// Publisher service.
    pub publisher: &'a dyn PublisherService,
}

impl<'a> CommandContext<'a> {
    /// Create a new command context.
    pub fn new(output: &'a dyn Output, publisher: &'a dyn PublisherService) -> Self {
        Self { output, publisher }
    }
}

// ============================================================================
// Command Handler Trait
// ============================================================================

/// Trait for command handlers.
pub trait CommandHandler {
    /// The arguments type for this handler.
    type Args;

    /// Execute the command with the given arguments and context.
    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError>;
}
