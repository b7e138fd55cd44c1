//! Highest-version discovery inside a publish area.
//!
//! Only immediate children are inspected. Ordering, timestamps and case
//! duplicates do not matter: the result is the numeric maximum over every
//! matching name.

use std::fs;
use std::io;
use std::path::Path;

use regex::Regex;

use super::{successor, ResolveError};

/// Highest version among `<prefix>.v<digits>.<extension>` entries in `folder`.
///
/// Returns 0 when nothing matches or when `folder` does not exist.
/// `prefix` and `extension` are matched case-sensitively, as supplied.
pub fn highest_version(folder: &Path, prefix: &str, extension: &str) -> Result<u64, ResolveError> {
    let pattern = if extension.is_empty() {
        format!(r"^{}\.v([0-9]+)$", regex::escape(prefix))
    } else {
        format!(
            r"^{}\.v([0-9]+)\.{}$",
            regex::escape(prefix),
            regex::escape(extension)
        )
    };
    let regex = Regex::new(&pattern).map_err(|source| ResolveError::Pattern {
        prefix: prefix.to_string(),
        source,
    })?;

    highest_matching(folder, &regex, |_| true)
}

/// Highest version among `v<digits>` sub-folders of `folder`.
///
/// Returns 0 when there are none or when `folder` does not exist.
pub fn highest_version_folder(folder: &Path) -> Result<u64, ResolveError> {
    let regex = Regex::new(r"^v([0-9]+)$").expect("folder pattern is valid");
    highest_matching(folder, &regex, |entry_path| entry_path.is_dir())
}

/// Next free version for `<prefix>.v<digits>.<extension>` files in `folder`.
///
/// # Examples
///
/// ```
/// use shotpub::version::next_version;
///
/// let dir = tempfile::tempdir().unwrap();
/// assert_eq!(next_version(dir.path(), "shot", "abc").unwrap(), 1);
///
/// for name in ["shot.v001.abc", "shot.v003.abc", "shot.v002.abc"] {
///     std::fs::write(dir.path().join(name), b"").unwrap();
/// }
/// assert_eq!(next_version(dir.path(), "shot", "abc").unwrap(), 4);
/// ```
pub fn next_version(folder: &Path, prefix: &str, extension: &str) -> Result<u64, ResolveError> {
    successor(highest_version(folder, prefix, extension)?)
}

/// Next free `v<digits>` sub-folder number in `folder`.
pub fn next_version_folder(folder: &Path) -> Result<u64, ResolveError> {
    successor(highest_version_folder(folder)?)
}

fn highest_matching(
    folder: &Path,
    regex: &Regex,
    accept: impl Fn(&Path) -> bool,
) -> Result<u64, ResolveError> {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(ResolveError::Scan {
                path: folder.to_path_buf(),
                source: e,
            })
        }
    };

    let mut highest = 0;
    for entry in entries {
        let entry = entry.map_err(|e| ResolveError::Scan {
            path: folder.to_path_buf(),
            source: e,
        })?;

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(caps) = regex.captures(name) else {
            continue;
        };
        if !accept(&entry.path()) {
            continue;
        }
        if let Ok(version) = caps[1].parse::<u64>() {
            highest = highest.max(version);
        }
    }

    Ok(highest)
}
