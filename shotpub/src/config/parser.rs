//! INI parsing: the one place INI key names map onto settings fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::{ConfigFile, FileTypeRule};

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [publish] section
    if let Some(section) = ini.section(Some("publish")) {
        let publish = &mut config.publish;
        if let Some(v) = section.get("layout") {
            publish.layout = v
                .parse()
                .map_err(|_| invalid("publish", "layout", v, "must be one of: flat, nested"))?;
        }
        if let Some(v) = section.get("publish_folder") {
            if v.contains(['/', '\\']) {
                return Err(invalid(
                    "publish",
                    "publish_folder",
                    v,
                    "must be a single folder name",
                ));
            }
            publish.publish_folder = non_empty(v);
        }
        if let Some(v) = section.get("mirror_subfolder") {
            publish.mirror_subfolder = non_empty(v);
        }
        if let Some(v) = section.get("default_padding") {
            let padding: usize = v.trim().parse().map_err(|_| {
                invalid("publish", "default_padding", v, "must be a whole number")
            })?;
            if !(1..=10).contains(&padding) {
                return Err(invalid(
                    "publish",
                    "default_padding",
                    v,
                    "must be between 1 and 10",
                ));
            }
            publish.default_padding = padding;
        }
        if let Some(v) = section.get("version_policy") {
            publish.version_policy = v.parse().map_err(|_| {
                invalid("publish", "version_policy", v, "must be one of: source, next")
            })?;
        }
        if let Some(v) = section.get("auto_version") {
            publish.auto_version = parse_bool(v);
        }
        if let Some(v) = section.get("publish_all_file_types") {
            publish.publish_all_file_types = parse_bool(v);
        }
        if let Some(v) = section.get("remove_published_caches") {
            publish.remove_published_caches = parse_bool(v);
        }
    }

    // [file_types] section replaces the built-in table when present
    if let Some(section) = ini.section(Some("file_types")) {
        let mut rules = Vec::new();
        for (publish_type, v) in section.iter() {
            let extensions: Vec<String> = v
                .split(',')
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
            if extensions.is_empty() {
                return Err(invalid(
                    "file_types",
                    publish_type,
                    v,
                    "expected a comma-separated list of extensions",
                ));
            }
            rules.push(FileTypeRule {
                publish_type: publish_type.trim().to_string(),
                extensions,
            });
        }
        config.publish.file_types = rules;
    }

    // [registrar] section
    if let Some(section) = ini.section(Some("registrar")) {
        if let Some(v) = section.get("ledger") {
            if let Some(v) = non_empty(v) {
                config.registrar.ledger = expand_tilde(&v);
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            if let Some(v) = non_empty(v) {
                config.logging.directory = expand_tilde(&v);
            }
        }
        if let Some(v) = section.get("level") {
            let level = v.trim().to_lowercase();
            let valid = ["trace", "debug", "info", "warn", "error"];
            if !valid.contains(&level.as_str()) {
                return Err(invalid(
                    "logging",
                    "level",
                    v,
                    "must be one of: trace, debug, info, warn, error",
                ));
            }
            config.logging.level = level;
        }
    }

    Ok(config)
}

/// Parse a boolean value from a string.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
