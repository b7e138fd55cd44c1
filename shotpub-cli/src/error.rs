//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and exit codes.

use std::fmt;
use std::process;

use shotpub::config::ConfigFileError;
use shotpub::publisher::{PublishError, RegistrarError};
use shotpub::version::ResolveError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Invalid combination of arguments
    InvalidArgument(String),
    /// Version or destination resolution failed
    Resolve(ResolveError),
    /// The publish session could not run
    Publish(PublishError),
    /// Reading or writing publish records failed
    Registrar(RegistrarError),
    /// The run completed but some tasks failed
    TasksFailed(usize),
}

impl CliError {
    /// Exit the process with an error message and code 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Resolve(ResolveError::DestinationCollision { .. }) => {
                eprintln!();
                eprintln!("Published versions are never overwritten.");
                eprintln!("Save your work file as a new version and publish again.");
            }
            CliError::Registrar(RegistrarError::Corrupt { .. }) => {
                eprintln!();
                eprintln!("The ledger could not be parsed. Restore it from a backup or");
                eprintln!("point [registrar] ledger at a new file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "{}", msg),
            CliError::Resolve(e) => write!(f, "{}", e),
            CliError::Publish(e) => write!(f, "Publish failed: {}", e),
            CliError::Registrar(e) => write!(f, "{}", e),
            CliError::TasksFailed(count) => write!(f, "{} publish task(s) failed", count),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Resolve(e) => Some(e),
            CliError::Publish(e) => Some(e),
            CliError::Registrar(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ResolveError> for CliError {
    fn from(e: ResolveError) -> Self {
        CliError::Resolve(e)
    }
}

impl From<PublishError> for CliError {
    fn from(e: PublishError) -> Self {
        CliError::Publish(e)
    }
}

impl From<RegistrarError> for CliError {
    fn from(e: RegistrarError) -> Self {
        CliError::Registrar(e)
    }
}
