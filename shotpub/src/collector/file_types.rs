//! Extension to item-type table.

use std::path::Path;

/// How a file is presented and which plugins see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypeInfo {
    pub display_name: String,
    /// Item type such as `file.maya`, matched against plugin filters.
    pub item_type: String,
}

impl FileTypeInfo {
    fn new(display_name: &str, item_type: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            item_type: item_type.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    info: FileTypeInfo,
    extensions: Vec<String>,
}

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tif", "webp", "exr", "dpx", "tga", "tiff",
];
const VIDEO_EXTENSIONS: &[&str] = &["mov", "mp4", "m4v", "avi", "mkv", "webm", "mpg", "mpeg"];
const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "aac", "aif", "aiff", "flac", "ogg"];

/// Common pipeline file types, checked before the generic categories.
#[derive(Debug, Clone)]
pub struct FileTypeTable {
    entries: Vec<Entry>,
}

impl Default for FileTypeTable {
    fn default() -> Self {
        let common: &[(&str, &[&str], &str)] = &[
            ("Alembic Cache", &["abc"], "file.alembic"),
            ("3dsmax Scene", &["max"], "file.3dsmax"),
            ("Hiero Project", &["hrox"], "file.hiero"),
            ("Houdini Scene", &["hip", "hipnc"], "file.houdini"),
            ("Maya Scene", &["ma", "mb"], "file.maya"),
            ("Nuke Script", &["nk"], "file.nuke"),
            ("Photoshop Image", &["psd", "psb"], "file.photoshop"),
            ("Rendered Image", &["dpx", "exr"], "file.image"),
            ("Texture", &["tiff", "tx", "tga", "dds"], "file.texture"),
        ];

        Self {
            entries: common
                .iter()
                .map(|(display, extensions, item_type)| Entry {
                    info: FileTypeInfo::new(display, item_type),
                    extensions: extensions.iter().map(|e| e.to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl FileTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identify `filename` by its extension.
    ///
    /// Common types win; otherwise the file falls into a generic image,
    /// movie, audio or unknown category.
    pub fn info_for(&self, filename: &str) -> FileTypeInfo {
        let extension = Path::new(filename)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| entry.extensions.iter().any(|e| *e == extension))
        {
            return entry.info.clone();
        }

        let ext = extension.as_str();
        if IMAGE_EXTENSIONS.contains(&ext) {
            FileTypeInfo::new("Image", "file.image")
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            FileTypeInfo::new("Movie", "file.video")
        } else if AUDIO_EXTENSIONS.contains(&ext) {
            FileTypeInfo::new("Audio", "file.audio")
        } else {
            FileTypeInfo::new("File", "file.unknown")
        }
    }

    /// True for extensions that can make up an image sequence.
    pub fn is_image_extension(extension: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&extension.to_lowercase().as_str())
    }
}
