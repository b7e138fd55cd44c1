//! User configuration (`~/.shotpub/config.ini`).
//!
//! Settings are read once, validated, and handed to the publish session as
//! typed structs. Nothing downstream looks values up by key.
//!
//! - [`settings`] holds the section structs
//! - [`defaults`] holds every default value
//! - `parser` maps INI keys onto the structs
//! - `writer` renders a commented INI file

pub mod defaults;
mod file;
mod parser;
pub mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, FileTypeRule, LayoutKind, LoggingSettings, PublishSettings, RegistrarSettings,
};
