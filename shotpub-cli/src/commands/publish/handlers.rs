//! Command handlers for publish subcommands.
//!
//! Each handler implements the `CommandHandler` trait and contains the
//! logic for a single command.

use std::path::{Path, PathBuf};

use super::args::{
    NextVersionArgs, ParseArgs, PublishArgs, RecordsArgs, ResolveArgs, VersionUpArgs,
};
use super::output::{print_components, print_records, print_report, print_resolution};
use super::traits::{CommandContext, CommandHandler};
use crate::error::CliError;
use shotpub::version::{next_version, next_version_folder, parse_path, version_folder_name};

// ============================================================================
// Parse Handler
// ============================================================================

/// Handler for the `parse` command.
pub struct ParseHandler;

impl CommandHandler for ParseHandler {
    type Args = ParseArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        print_components(ctx.output, &parse_path(&args.path));
        Ok(())
    }
}

// ============================================================================
// Next Version Handler
// ============================================================================

/// Handler for the `next-version` command.
pub struct NextVersionHandler;

impl CommandHandler for NextVersionHandler {
    type Args = NextVersionArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        if args.folders {
            let version = next_version_folder(&args.folder)?;
            ctx.output
                .println(&format!("{}  {}", version, version_folder_name(version)));
            return Ok(());
        }

        let prefix = args.prefix.ok_or_else(|| {
            CliError::InvalidArgument("--prefix is required unless --folders is given".to_string())
        })?;
        let extension = args.extension.trim_start_matches('.');
        let version = next_version(&args.folder, &prefix, extension)?;
        ctx.output.println(&version.to_string());
        Ok(())
    }
}

// ============================================================================
// Resolve Handler
// ============================================================================

/// Handler for the `resolve` command.
pub struct ResolveHandler;

impl CommandHandler for ResolveHandler {
    type Args = ResolveArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let root = args.root.unwrap_or_else(|| parent_or_current(&args.source));
        let resolution = ctx.publisher.resolve(&args.source, &root, args.layout)?;
        print_resolution(ctx.output, &resolution);
        Ok(())
    }
}

// ============================================================================
// Publish Handler
// ============================================================================

/// Handler for the `publish` command.
pub struct PublishHandler;

impl CommandHandler for PublishHandler {
    type Args = PublishArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        if args.dry_run {
            ctx.output.println("Dry run: validating only");
            ctx.output.newline();
        }

        let report = ctx.publisher.publish(&args)?;
        print_report(ctx.output, &report);

        let failed = report.failures().count();
        if failed > 0 {
            return Err(CliError::TasksFailed(failed));
        }
        Ok(())
    }
}

// ============================================================================
// Version Up Handler
// ============================================================================

/// Handler for the `version-up` command.
pub struct VersionUpHandler;

impl CommandHandler for VersionUpHandler {
    type Args = VersionUpArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let report = ctx.publisher.version_up(&args)?;

        if let Some(failed) = report.failures().next() {
            ctx.output.println(&format!(
                "Could not version up {}: {}",
                args.path.display(),
                failed.error.as_deref().unwrap_or("unknown error")
            ));
            return Err(CliError::TasksFailed(report.failures().count()));
        }

        let saved: Vec<&PathBuf> = report
            .tasks
            .iter()
            .filter_map(|t| t.destination.as_ref())
            .collect();
        if report.completed() == 0 || saved.is_empty() {
            ctx.output.println(&format!(
                "Nothing to version up: {} has no version number",
                args.path.display()
            ));
            return Ok(());
        }

        for path in saved {
            ctx.output.println(&format!("Saved {}", path.display()));
        }
        Ok(())
    }
}

// ============================================================================
// Records Handler
// ============================================================================

/// Handler for the `records` command.
pub struct RecordsHandler;

impl CommandHandler for RecordsHandler {
    type Args = RecordsArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let mut records = ctx.publisher.records()?;
        if let Some(name) = &args.name {
            records.retain(|r| &r.record.name == name);
        }
        print_records(ctx.output, &records);
        Ok(())
    }
}

fn parent_or_current(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
