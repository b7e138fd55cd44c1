//! CLI command implementations.
//!
//! - [`config`] - Configuration management (init, show, path)
//! - [`publish`] - Version resolution and publishing

pub mod config;
pub mod publish;
