//! Host applications a session can come from.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Digital-content-creation application that owns the current session.
///
/// Only scene inspection differs per host. Version and path resolution is
/// shared and lives in [`crate::version`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Host {
    Maya,
    Max,
    Houdini,
    Nuke,
    Photoshop,
}

impl Host {
    pub const ALL: [Host; 5] = [
        Host::Maya,
        Host::Max,
        Host::Houdini,
        Host::Nuke,
        Host::Photoshop,
    ];

    /// Short identifier used on the command line and in item types.
    pub fn code(&self) -> &'static str {
        match self {
            Host::Maya => "maya",
            Host::Max => "3dsmax",
            Host::Houdini => "houdini",
            Host::Nuke => "nuke",
            Host::Photoshop => "photoshop",
        }
    }

    /// Item type of the session item, e.g. `maya.session`.
    pub fn session_item_type(&self) -> String {
        format!("{}.session", self.code())
    }

    pub fn session_display_type(&self) -> &'static str {
        match self {
            Host::Maya => "Maya Session",
            Host::Max => "3dsMax Scene",
            Host::Houdini => "Houdini File",
            Host::Nuke => "Nuke Script",
            Host::Photoshop => "Photoshop Document",
        }
    }

    /// Display name used when the session has never been saved.
    pub fn unsaved_name(&self) -> &'static str {
        match self {
            Host::Maya => "Current Maya Session",
            Host::Max => "Untitled Scene",
            Host::Houdini => "Current Houdini Session",
            Host::Nuke => "Current Nuke Script",
            Host::Photoshop => "Untitled Document",
        }
    }

    /// Publish type registered for the session file.
    pub fn default_publish_type(&self) -> &'static str {
        match self {
            Host::Maya => "Maya Scene",
            Host::Max => "3dsMax Scene",
            Host::Houdini => "Houdini Scene",
            Host::Nuke => "Nuke Script",
            Host::Photoshop => "Photoshop Image",
        }
    }

    pub fn scene_extensions(&self) -> &'static [&'static str] {
        match self {
            Host::Maya => &["ma", "mb"],
            Host::Max => &["max"],
            Host::Houdini => &["hip", "hipnc", "hiplc"],
            Host::Nuke => &["nk"],
            Host::Photoshop => &["psd", "psb"],
        }
    }

    /// Project root implied by a session path.
    ///
    /// Maya and 3dsMax projects keep scenes in `<root>/scenes/`; a Houdini
    /// job is the folder holding the hip file. Nuke and Photoshop have no
    /// project convention.
    pub fn project_root_for(&self, session: &Path) -> Option<PathBuf> {
        let folder = session.parent()?;
        match self {
            Host::Maya | Host::Max => {
                if folder.file_name().is_some_and(|name| name == "scenes") {
                    folder.parent().map(Path::to_path_buf)
                } else {
                    None
                }
            }
            Host::Houdini => Some(folder.to_path_buf()),
            Host::Nuke | Host::Photoshop => None,
        }
    }

    /// Project sub-folders scanned for alembic caches.
    pub fn cache_folders(&self) -> &'static [&'static str] {
        match self {
            Host::Maya | Host::Houdini => &["cache/alembic"],
            _ => &[],
        }
    }

    /// Project sub-folders scanned for playblast movies.
    pub fn movie_folders(&self) -> &'static [&'static str] {
        match self {
            Host::Maya => &["movies"],
            _ => &[],
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Host {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "maya" => Ok(Host::Maya),
            "3dsmax" | "max" => Ok(Host::Max),
            "houdini" => Ok(Host::Houdini),
            "nuke" => Ok(Host::Nuke),
            "photoshop" | "photoshopcc" => Ok(Host::Photoshop),
            other => Err(format!("unknown host '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maya_project_root_from_scenes_folder() {
        let root = Host::Maya.project_root_for(Path::new("/jobs/demo/scenes/shot.v001.ma"));
        assert_eq!(root, Some(PathBuf::from("/jobs/demo")));
    }

    #[test]
    fn test_maya_outside_project() {
        let root = Host::Maya.project_root_for(Path::new("/tmp/shot.v001.ma"));
        assert_eq!(root, None);
    }

    #[test]
    fn test_max_shares_scenes_convention() {
        let root = Host::Max.project_root_for(Path::new("/p/scenes/layout.max"));
        assert_eq!(root, Some(PathBuf::from("/p")));
    }

    #[test]
    fn test_houdini_root_is_hip_folder() {
        let root = Host::Houdini.project_root_for(Path::new("/job/fx/sim.v003.hip"));
        assert_eq!(root, Some(PathBuf::from("/job/fx")));
    }

    #[test]
    fn test_nuke_has_no_project_root() {
        assert_eq!(Host::Nuke.project_root_for(Path::new("/p/scenes/comp.nk")), None);
    }

    #[test]
    fn test_parse_and_display_round_trip_codes() {
        for host in Host::ALL {
            assert_eq!(host.code().parse::<Host>().unwrap(), host);
        }
        assert_eq!("MAX".parse::<Host>().unwrap(), Host::Max);
        assert!("blender".parse::<Host>().is_err());
    }

    #[test]
    fn test_session_item_type() {
        assert_eq!(Host::Maya.session_item_type(), "maya.session");
        assert_eq!(Host::Max.session_item_type(), "3dsmax.session");
    }
}
