//! INI serialization: renders the commented config.ini.

use std::path::Path;

use super::settings::ConfigFile;

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let publish = &config.publish;
    let file_types: String = publish
        .file_types
        .iter()
        .map(|rule| format!("{} = {}\n", rule.publish_type, rule.extensions.join(", ")))
        .collect();

    format!(
        r#"[publish]
; Publish folder layout:
;   flat   - <folder>/publishes/<name>.v<NNN>.<ext>
;   nested - <project>/publish/v<NNN>/[<mirror_subfolder>/]<filename>
layout = {}
; Publish folder name (empty: publishes for flat, publish for nested)
publish_folder = {}
; Sub-folder recreated inside each nested version folder, e.g. scenes
mirror_subfolder = {}
; Version digits when the source file carries no version token
default_padding = {}
; How the flat layout picks a version:
;   source - a versioned work file publishes under its own version
;   next   - always one above the highest published version
version_policy = {}
; Save the work file to its next version after a publish
auto_version = {}
; Publish files with no [file_types] entry as "<Ext> File"
publish_all_file_types = {}
; Delete source caches once they are published
remove_published_caches = {}

[file_types]
; <Publish Type> = <extension>, <extension>
{}
[registrar]
; JSON ledger receiving publish records
ledger = {}

[logging]
directory = {}
; trace, debug, info, warn or error (RUST_LOG overrides)
level = {}
"#,
        publish.layout,
        publish.publish_folder.as_deref().unwrap_or(""),
        publish.mirror_subfolder.as_deref().unwrap_or(""),
        publish.default_padding,
        publish.version_policy.as_str(),
        bool_str(publish.auto_version),
        bool_str(publish.publish_all_file_types),
        bool_str(publish.remove_published_caches),
        file_types,
        path_to_string(&config.registrar.ledger),
        path_to_string(&config.logging.directory),
        config.logging.level,
    )
}

fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_every_section() {
        let content = to_config_string(&ConfigFile::default());
        for section in ["[publish]", "[file_types]", "[registrar]", "[logging]"] {
            assert!(content.contains(section), "missing {section}");
        }
        assert!(content.contains("layout = flat"));
        assert!(content.contains("Maya Scene = ma, mb"));
        assert!(content.contains("version_policy = source"));
    }

    #[test]
    fn test_written_config_parses_back() {
        let config = ConfigFile::default();
        let parsed = ConfigFile::from_ini_str(&to_config_string(&config)).unwrap();
        assert_eq!(parsed, config);
    }
}
