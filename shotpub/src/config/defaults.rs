//! Default values for every setting.

use std::path::PathBuf;

use super::settings::*;
use crate::version::{VersionPolicy, DEFAULT_VERSION_PADDING};

pub const DEFAULT_FLAT_FOLDER: &str = "publishes";
pub const DEFAULT_NESTED_FOLDER: &str = "publish";
pub const DEFAULT_LEDGER_FILE: &str = "ledger.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_AUTO_VERSION: bool = true;
pub const DEFAULT_PUBLISH_ALL_FILE_TYPES: bool = false;
pub const DEFAULT_REMOVE_PUBLISHED_CACHES: bool = false;

/// Publish types registered out of the box.
pub fn default_file_types() -> Vec<FileTypeRule> {
    vec![
        FileTypeRule::new("Alembic Cache", &["abc"]),
        FileTypeRule::new("3dsMax Scene", &["max"]),
        FileTypeRule::new("Hiero Project", &["hrox"]),
        FileTypeRule::new("Houdini Scene", &["hip", "hipnc"]),
        FileTypeRule::new("Maya Scene", &["ma", "mb"]),
        FileTypeRule::new("Nuke Script", &["nk"]),
        FileTypeRule::new("Photoshop Image", &["psd", "psb"]),
        FileTypeRule::new("Rendered Image", &["dpx", "exr"]),
        FileTypeRule::new("Texture", &["tiff", "tx", "tga", "dds"]),
        FileTypeRule::new("Movie", &["mov", "mp4"]),
    ]
}

/// Default ledger location (~/.shotpub/ledger.json).
pub fn default_ledger_path() -> PathBuf {
    super::config_directory().join(DEFAULT_LEDGER_FILE)
}

/// Default log directory (~/.shotpub/logs).
pub fn default_log_directory() -> PathBuf {
    super::config_directory().join("logs")
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            layout: LayoutKind::Flat,
            publish_folder: None,
            mirror_subfolder: None,
            default_padding: DEFAULT_VERSION_PADDING,
            version_policy: VersionPolicy::FromSource,
            auto_version: DEFAULT_AUTO_VERSION,
            publish_all_file_types: DEFAULT_PUBLISH_ALL_FILE_TYPES,
            remove_published_caches: DEFAULT_REMOVE_PUBLISHED_CACHES,
            file_types: default_file_types(),
        }
    }
}

impl Default for RegistrarSettings {
    fn default() -> Self {
        Self {
            ledger: default_ledger_path(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            publish: PublishSettings::default(),
            registrar: RegistrarSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}
