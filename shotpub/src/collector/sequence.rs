//! Image sequence detection inside a folder.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use super::FileTypeTable;

/// A run of frames sharing a base name, extension and frame padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSequence {
    /// Printf-style path, e.g. `/renders/beauty.%04d.exr`.
    pub path: PathBuf,
    pub first_frame: u64,
    pub last_frame: u64,
    pub frame_count: usize,
}

impl ImageSequence {
    /// File name part of [`ImageSequence::path`].
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn frame_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<base>.+)\.(?P<frame>[0-9]+)\.(?P<ext>[A-Za-z0-9]+)$")
            .expect("frame pattern is valid")
    })
}

/// Find image sequences among the immediate children of `folder`.
///
/// Results are ordered by sequence path.
pub fn image_sequences(folder: &Path) -> io::Result<Vec<ImageSequence>> {
    let mut groups: BTreeMap<(String, usize, String), Vec<u64>> = BTreeMap::new();

    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(caps) = frame_pattern().captures(name) else {
            continue;
        };
        if !FileTypeTable::is_image_extension(&caps["ext"]) {
            continue;
        }
        let Ok(frame) = caps["frame"].parse::<u64>() else {
            continue;
        };

        groups
            .entry((
                caps["base"].to_string(),
                caps["frame"].len(),
                caps["ext"].to_string(),
            ))
            .or_default()
            .push(frame);
    }

    Ok(groups
        .into_iter()
        .map(|((base, padding, ext), frames)| {
            let first_frame = frames.iter().copied().min().unwrap_or(0);
            let last_frame = frames.iter().copied().max().unwrap_or(0);
            ImageSequence {
                path: folder.join(format!("{}.%0{}d.{}", base, padding, ext)),
                first_frame,
                last_frame,
                frame_count: frames.len(),
            }
        })
        .collect())
}
