//! Publish CLI commands.
//!
//! Command pattern with trait-based dependency injection:
//!
//! - `traits`: Core interfaces (`Output`, `PublisherService`, `CommandHandler`)
//! - `services`: Concrete implementations of the traits
//! - `args`: CLI argument types (clap-derived)
//! - `handlers`: One handler per subcommand
//! - `output`: Shared output formatting
//!
//! # Example
//!
//! ```ignore
//! let output = ConsoleOutput::new();
//! let publisher = DefaultPublisherService::new(config);
//! let ctx = CommandContext::new(&output, &publisher);
//! ParseHandler::execute(ParseArgs { path }, &ctx)?;
//! ```

mod args;
mod handlers;
mod output;
mod services;
mod traits;


pub use args::PublishCommands;

use args::{NextVersionArgs, ParseArgs, PublishArgs, RecordsArgs, ResolveArgs, VersionUpArgs};
use handlers::{
    NextVersionHandler, ParseHandler, PublishHandler, RecordsHandler, ResolveHandler,
    VersionUpHandler,
};
use services::{ConsoleOutput, DefaultPublisherService};
use shotpub::config::ConfigFile;
use shotpub::publisher::PublishErrorPolicy;
use traits::{CommandContext, CommandHandler};

use crate::error::CliError;

/// Run a publish subcommand with the loaded configuration.
pub fn run(command: PublishCommands, config: ConfigFile) -> Result<(), CliError> {
    let output = ConsoleOutput::new();
    let publisher = DefaultPublisherService::new(config);
    let ctx = CommandContext::new(&output, &publisher);

    match command {
        PublishCommands::Parse { path } => ParseHandler::execute(ParseArgs { path }, &ctx),

        PublishCommands::NextVersion {
            folder,
            prefix,
            ext,
            folders,
        } => NextVersionHandler::execute(
            NextVersionArgs {
                folder,
                prefix,
                extension: ext,
                folders,
            },
            &ctx,
        ),

        PublishCommands::Resolve {
            source,
            root,
            layout,
        } => ResolveHandler::execute(
            ResolveArgs {
                source,
                root,
                layout: layout.map(Into::into),
            },
            &ctx,
        ),

        PublishCommands::Publish {
            host,
            session,
            files,
            project_root,
            comment,
            continue_on_error,
            dry_run,
        } => PublishHandler::execute(
            PublishArgs {
                host: host.into(),
                session,
                files,
                project_root,
                comment,
                policy: if continue_on_error {
                    PublishErrorPolicy::Continue
                } else {
                    PublishErrorPolicy::Abort
                },
                dry_run,
            },
            &ctx,
        ),

        PublishCommands::VersionUp { path, host } => VersionUpHandler::execute(
            VersionUpArgs {
                path,
                host: host.into(),
            },
            &ctx,
        ),

        PublishCommands::Records { name } => {
            RecordsHandler::execute(RecordsArgs { name }, &ctx)
        }
    }
}
