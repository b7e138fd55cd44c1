//! Scene inspection boundary.

use std::fs;
use std::path::{Path, PathBuf};

use super::Host;

/// A file the host reports alongside the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// Item type to use instead of the extension-based one.
    pub type_hint: Option<String>,
}

/// What a host application can tell about its open session.
pub trait SceneInspector {
    fn host(&self) -> Host;

    /// Path of the open document; `None` if it was never saved.
    fn current_session(&self) -> Option<PathBuf>;

    /// Project the session belongs to.
    fn project_root(&self) -> Option<PathBuf> {
        self.current_session()
            .and_then(|session| self.host().project_root_for(&session))
    }

    /// Other artifacts to offer for publishing.
    fn candidates(&self) -> Vec<Candidate>;
}

/// Inspector for a session file on disk.
///
/// Finds caches and movies by the host's project folder conventions.
#[derive(Debug, Clone)]
pub struct FilesystemInspector {
    host: Host,
    session: Option<PathBuf>,
    project_root: Option<PathBuf>,
}

impl FilesystemInspector {
    pub fn new(host: Host, session: Option<PathBuf>) -> Self {
        Self {
            host,
            session,
            project_root: None,
        }
    }

    /// Use `root` instead of the host's convention.
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    fn files_in(folder: &Path, extensions: &[&str]) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(folder) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .filter(|path| {
                extensions.is_empty()
                    || path
                        .extension()
                        .map(|e| e.to_string_lossy().to_lowercase())
                        .is_some_and(|e| extensions.contains(&e.as_str()))
            })
            .collect();
        files.sort();
        files
    }
}

impl SceneInspector for FilesystemInspector {
    fn host(&self) -> Host {
        self.host
    }

    fn current_session(&self) -> Option<PathBuf> {
        self.session.clone()
    }

    fn project_root(&self) -> Option<PathBuf> {
        self.project_root.clone().or_else(|| {
            self.session
                .as_deref()
                .and_then(|session| self.host.project_root_for(session))
        })
    }

    fn candidates(&self) -> Vec<Candidate> {
        let Some(root) = self.project_root() else {
            return Vec::new();
        };
        let code = self.host.code();
        let mut candidates = Vec::new();

        for folder in self.host.cache_folders() {
            for path in Self::files_in(&root.join(folder), &["abc"]) {
                candidates.push(Candidate {
                    path,
                    type_hint: Some(format!("{}.alembic", code)),
                });
            }
        }
        for folder in self.host.movie_folders() {
            for path in Self::files_in(&root.join(folder), &["mov", "mp4", "avi"]) {
                candidates.push(Candidate {
                    path,
                    type_hint: Some(format!("{}.playblast", code)),
                });
            }
        }
        candidates
    }
}
