//! shotpub CLI - Command-line interface
//!
//! Resolves publish versions and publishes saved work files with the
//! shotpub library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shotpub::config::{config_file_path, ConfigFile};
use shotpub::logging::{init_logging, LoggingGuard, DEFAULT_LOG_FILE};

mod commands;
mod error;

use commands::config::ConfigCommands;
use commands::publish::PublishCommands;
use error::CliError;

#[derive(Parser)]
#[command(name = "shotpub")]
#[command(version = shotpub::VERSION)]
#[command(about = "Publish versioned work files from DCC applications", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.shotpub/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Publish(PublishCommands),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(config_file_path);

    match cli.command {
        Commands::Config(command) => commands::config::run(command, &config_path),
        Commands::Publish(command) => {
            let config = ConfigFile::load_from(&config_path)?;
            let _guard = start_logging(&config, cli.verbose)?;
            tracing::debug!(config = %config_path.display(), "Configuration loaded");
            commands::publish::run(command, config)
        }
    }
}

fn start_logging(config: &ConfigFile, verbose: bool) -> Result<LoggingGuard, CliError> {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    init_logging(&config.logging.directory, DEFAULT_LOG_FILE, level)
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}
