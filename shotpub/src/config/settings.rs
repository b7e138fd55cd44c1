//! Settings structs, one per INI section.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::version::{Layout, VersionPolicy, VersionedPublishResolver};

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub publish: PublishSettings,
    pub registrar: RegistrarSettings,
    pub logging: LoggingSettings,
}

/// Publish folder convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutKind {
    #[default]
    Flat,
    Nested,
}

impl LayoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Flat => "flat",
            LayoutKind::Nested => "nested",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat" => Ok(LayoutKind::Flat),
            "nested" => Ok(LayoutKind::Nested),
            other => Err(format!(
                "unknown layout '{}', expected 'flat' or 'nested'",
                other
            )),
        }
    }
}

/// A publish type and the extensions registered under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypeRule {
    pub publish_type: String,
    /// Lower-case, without the leading dot.
    pub extensions: Vec<String>,
}

impl FileTypeRule {
    pub fn new(publish_type: &str, extensions: &[&str]) -> Self {
        Self {
            publish_type: publish_type.to_string(),
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }
}

/// `[publish]` and `[file_types]` sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    pub layout: LayoutKind,
    /// Publish folder name; `None` means `publishes` (flat) or `publish` (nested).
    pub publish_folder: Option<String>,
    /// Sub-folder recreated inside nested version folders, e.g. `scenes`.
    pub mirror_subfolder: Option<String>,
    pub default_padding: usize,
    pub version_policy: VersionPolicy,
    /// Save the work file to its next version after publishing.
    pub auto_version: bool,
    /// Register files whose extension has no rule as `<Ext> File`.
    pub publish_all_file_types: bool,
    /// Delete source caches once they are published.
    pub remove_published_caches: bool,
    pub file_types: Vec<FileTypeRule>,
}

impl PublishSettings {
    pub fn layout(&self) -> Layout {
        match self.layout {
            LayoutKind::Flat => Layout::Flat {
                folder: self
                    .publish_folder
                    .clone()
                    .unwrap_or_else(|| super::defaults::DEFAULT_FLAT_FOLDER.to_string()),
            },
            LayoutKind::Nested => Layout::Nested {
                folder: self
                    .publish_folder
                    .clone()
                    .unwrap_or_else(|| super::defaults::DEFAULT_NESTED_FOLDER.to_string()),
                mirror_subfolder: self.mirror_subfolder.clone(),
            },
        }
    }

    /// Resolver configured from these settings.
    pub fn resolver(&self) -> VersionedPublishResolver {
        VersionedPublishResolver::new(self.layout())
            .with_policy(self.version_policy)
            .with_default_padding(self.default_padding)
    }

    /// Publish type for a file extension, if it may be published at all.
    pub fn publish_type_for(&self, extension: &str) -> Option<String> {
        let extension = extension.trim_start_matches('.').to_lowercase();
        if let Some(rule) = self
            .file_types
            .iter()
            .find(|rule| rule.extensions.contains(&extension))
        {
            return Some(rule.publish_type.clone());
        }
        if self.publish_all_file_types && !extension.is_empty() {
            return Some(format!("{} File", capitalize(&extension)));
        }
        None
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `[registrar]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrarSettings {
    /// JSON ledger the local registrar appends to.
    pub ledger: PathBuf,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}
