//! Path and version-token parsing.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// A `v<digits>` token parsed from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionToken {
    /// Numeric value with leading zeros stripped.
    pub number: u64,
    /// Digit width as written, e.g. 3 for `v007`.
    pub padding: usize,
}

impl VersionToken {
    /// Format as `v<zero-padded number>`.
    pub fn format(&self) -> String {
        format!("v{:0width$}", self.number, width = self.padding)
    }
}

/// Semantic breakdown of a file system path.
///
/// Derived purely from the path string; nothing is read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathComponents {
    /// The path as given.
    pub path: PathBuf,
    /// Containing folder.
    pub directory: PathBuf,
    /// File name with extension.
    pub filename: String,
    /// File name without the final extension.
    pub filename_no_ext: String,
    /// Stem before a trailing version token, or the whole stem.
    pub prefix: String,
    /// Lower-cased extension without the leading dot. Empty for folders.
    pub extension: String,
    /// Parsed version token; `None` means no version could be detected,
    /// which is distinct from version 0.
    pub version: Option<VersionToken>,
    raw_extension: String,
}

impl PathComponents {
    /// Version number if one was detected.
    pub fn version_number(&self) -> Option<u64> {
        self.version.map(|v| v.number)
    }

    /// Digit width of the detected version token.
    pub fn version_padding(&self) -> Option<usize> {
        self.version.map(|v| v.padding)
    }

    /// Extension exactly as written in the file name.
    pub fn raw_extension(&self) -> &str {
        &self.raw_extension
    }

    /// File name for `version` in this lineage:
    /// `<prefix>.v<zero-padded version>.<ext>`.
    pub fn versioned_filename(&self, version: u64, padding: usize) -> String {
        let token = VersionToken {
            number: version,
            padding,
        };
        if self.raw_extension.is_empty() {
            format!("{}.{}", self.prefix, token.format())
        } else {
            format!("{}.{}.{}", self.prefix, token.format(), self.raw_extension)
        }
    }

    /// Name shared by every version of this file: `<prefix>.<ext>`.
    pub fn publish_name(&self) -> String {
        if self.extension.is_empty() {
            self.prefix.clone()
        } else {
            format!("{}.{}", self.prefix, self.extension)
        }
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<prefix>.+)\.v(?P<digits>[0-9]+)\.(?P<ext>[^.]+)$")
            .expect("version pattern is valid")
    })
}

/// Break a path into its [`PathComponents`].
///
/// Trailing separators are ignored. A missing version token is a normal
/// outcome and yields `version: None`.
///
/// # Examples
///
/// ```
/// use shotpub::version::parse_path;
///
/// let c = parse_path("render.v7.exr");
/// assert_eq!(c.prefix, "render");
/// assert_eq!(c.extension, "exr");
/// assert_eq!(c.version_number(), Some(7));
/// assert_eq!(c.version_padding(), Some(1));
///
/// let c = parse_path("render.exr");
/// assert_eq!(c.prefix, "render");
/// assert_eq!(c.version, None);
/// ```
pub fn parse_path(path: impl AsRef<Path>) -> PathComponents {
    let path = path.as_ref();

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let directory = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let (filename_no_ext, raw_extension) = match filename.rfind('.') {
        Some(dot) => (filename[..dot].to_string(), filename[dot + 1..].to_string()),
        None => (filename.clone(), String::new()),
    };

    let version_match = version_pattern().captures(&filename).and_then(|caps| {
        let digits = &caps["digits"];
        digits.parse::<u64>().ok().map(|number| {
            (
                caps["prefix"].to_string(),
                VersionToken {
                    number,
                    padding: digits.len(),
                },
            )
        })
    });

    let (prefix, version) = match version_match {
        Some((prefix, token)) => (prefix, Some(token)),
        None => (filename_no_ext.clone(), None),
    };

    PathComponents {
        path: path.to_path_buf(),
        directory,
        extension: raw_extension.to_lowercase(),
        filename,
        filename_no_ext,
        prefix,
        version,
        raw_extension,
    }
}
