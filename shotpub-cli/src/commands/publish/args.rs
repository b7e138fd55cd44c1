//! Argument types and CLI definitions for publish commands.
//!
//! This module contains the clap-derived argument types and enums used
//! for parsing command-line arguments.

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use shotpub::collector::Host;
use shotpub::config::LayoutKind;
use shotpub::publisher::PublishErrorPolicy;

/// Host application argument for CLI.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HostArg {
    /// Autodesk Maya
    Maya,
    /// Autodesk 3ds Max
    Max,
    /// SideFX Houdini
    Houdini,
    /// Foundry Nuke
    Nuke,
    /// Adobe Photoshop
    Photoshop,
}

impl From<HostArg> for Host {
    fn from(arg: HostArg) -> Self {
        match arg {
            HostArg::Maya => Host::Maya,
            HostArg::Max => Host::Max,
            HostArg::Houdini => Host::Houdini,
            HostArg::Nuke => Host::Nuke,
            HostArg::Photoshop => Host::Photoshop,
        }
    }
}

/// Publish layout argument for CLI.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    /// Versioned files side by side in one publish folder
    Flat,
    /// One v### sub-folder per publish
    Nested,
}

impl From<LayoutArg> for LayoutKind {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Flat => LayoutKind::Flat,
            LayoutArg::Nested => LayoutKind::Nested,
        }
    }
}

/// Publish subcommands.
#[derive(Debug, Subcommand)]
pub enum PublishCommands {
    /// Show the prefix, version and extension detected in a path
    Parse {
        /// Path to inspect (nothing is read from disk)
        path: PathBuf,
    },

    /// Print the next free version number in a folder
    NextVersion {
        /// Folder to scan
        folder: PathBuf,

        /// File prefix to match, e.g. "shot010"
        #[arg(long, required_unless_present = "folders")]
        prefix: Option<String>,

        /// Extension to match, without the dot
        #[arg(long, default_value = "")]
        ext: String,

        /// Scan v### sub-folders instead of files
        #[arg(long, conflicts_with = "prefix")]
        folders: bool,
    },

    /// Show where a file would be published, without copying it
    Resolve {
        /// Work file to resolve
        source: PathBuf,

        /// Folder that holds the publish folder (defaults to the file's folder)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Override the configured layout
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,
    },

    /// Publish a saved session and any extra files
    Publish {
        /// Host application that produced the session
        #[arg(long, value_enum, default_value = "maya")]
        host: HostArg,

        /// Saved session file to publish
        #[arg(long)]
        session: Option<PathBuf>,

        /// Extra files, folders or image sequences to publish in place
        files: Vec<PathBuf>,

        /// Project root (defaults to the host's convention)
        #[arg(long)]
        project_root: Option<PathBuf>,

        /// Comment attached to every published record
        #[arg(short = 'm', long)]
        comment: Option<String>,

        /// Keep publishing remaining items after a failure
        #[arg(long)]
        continue_on_error: bool,

        /// Validate only; nothing is copied or registered
        #[arg(long)]
        dry_run: bool,
    },

    /// Save a copy of a work file as its next free version
    VersionUp {
        /// Versioned work file
        path: PathBuf,

        /// Host application that owns the file
        #[arg(long, value_enum, default_value = "maya")]
        host: HostArg,
    },

    /// List registered publish records
    Records {
        /// Only records with this publish name
        #[arg(long)]
        name: Option<String>,
    },
}

// ============================================================================
// Handler argument structs
// ============================================================================

/// Arguments for the parse command.
pub struct ParseArgs {
    pub path: PathBuf,
}

/// Arguments for the next-version command.
pub struct NextVersionArgs {
    pub folder: PathBuf,
    pub prefix: Option<String>,
    pub extension: String,
    pub folders: bool,
}

/// Arguments for the resolve command.
pub struct ResolveArgs {
    pub source: PathBuf,
    pub root: Option<PathBuf>,
    pub layout: Option<LayoutKind>,
}

/// Arguments for the publish command.
pub struct PublishArgs {
    pub host: Host,
    pub session: Option<PathBuf>,
    pub files: Vec<PathBuf>,
    pub project_root: Option<PathBuf>,
    pub comment: Option<String>,
    pub policy: PublishErrorPolicy,
    pub dry_run: bool,
}

/// Arguments for the version-up command.
pub struct VersionUpArgs {
    pub path: PathBuf,
    pub host: Host,
}

/// Arguments for the records command.
pub struct RecordsArgs {
    pub name: Option<String>,
}
