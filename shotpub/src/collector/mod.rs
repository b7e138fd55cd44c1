//! Collection: turning a host session into publish items.
//!
//! Host differences are confined to [`Host`] and the [`SceneInspector`]
//! that reports on the open session; everything downstream is shared.

mod file_types;
mod host;
mod inspector;
mod sequence;

pub use file_types::{FileTypeInfo, FileTypeTable};
pub use host::Host;
pub use inspector::{Candidate, FilesystemInspector, SceneInspector};
pub use sequence::{image_sequences, ImageSequence};

use std::path::{Path, PathBuf};

use crate::context::{ContextStore, PipelineContext};
use crate::log::Logger;
use crate::publisher::{ItemId, ItemTree};
use crate::version::parse_path;
use crate::{log_debug, log_info, log_warn};

/// Builds an [`ItemTree`] from an inspector and dropped paths.
pub struct Collector<'a> {
    logger: &'a dyn Logger,
    file_types: FileTypeTable,
    context: PipelineContext,
}

impl<'a> Collector<'a> {
    pub fn new(logger: &'a dyn Logger) -> Self {
        Self {
            logger,
            file_types: FileTypeTable::default(),
            context: PipelineContext::default(),
        }
    }

    /// Context used when no `shotgun.context` is found in the project.
    pub fn with_context(mut self, context: PipelineContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_file_types(mut self, file_types: FileTypeTable) -> Self {
        self.file_types = file_types;
        self
    }

    /// Add the session item and its candidates.
    pub fn collect_session(&self, tree: &mut ItemTree, inspector: &dyn SceneInspector) -> ItemId {
        let host = inspector.host();
        let session = inspector.current_session();
        let project_root = inspector.project_root();

        let name = session
            .as_deref()
            .map(|path| parse_path(path).filename)
            .unwrap_or_else(|| host.unsaved_name().to_string());
        let context = project_root
            .as_ref()
            .and_then(|root| ContextStore::new(root).restore(self.logger))
            .unwrap_or_else(|| self.context.clone());

        let id = tree.create_item(
            None,
            host.session_item_type(),
            host.session_display_type(),
            name.as_str(),
        );
        if let Some(item) = tree.get_mut(id) {
            item.path = session.clone();
            item.project_root = project_root.clone();
            item.context = context;
            item.publish_type = Some(host.default_publish_type().to_string());
        }

        match &session {
            Some(path) => log_info!(self.logger, "Collected {} session {}", host, path.display()),
            None => log_warn!(self.logger, "The {} session has not been saved", host),
        }

        for candidate in inspector.candidates() {
            let info = self.file_types.info_for(&candidate.path.to_string_lossy());
            let item_type = candidate.type_hint.unwrap_or(info.item_type);
            let name = parse_path(&candidate.path).filename;
            let child = tree.create_item(Some(id), item_type.as_str(), info.display_name, name);
            if let Some(item) = tree.get_mut(child) {
                item.path = Some(candidate.path.clone());
                item.project_root = project_root.clone();
            }
            log_debug!(self.logger, "Collected {} ({})", candidate.path.display(), item_type);
        }
        id
    }

    /// Add items for a dropped file or folder.
    ///
    /// A folder yields one item per image sequence in it, or a single
    /// folder item when it holds none.
    pub fn collect_path(&self, tree: &mut ItemTree, parent: Option<ItemId>, path: &Path) -> Vec<ItemId> {
        if path.is_dir() {
            return self.collect_folder(tree, parent, path);
        }
        if !path.exists() {
            log_warn!(self.logger, "Skipping {}: no such file", path.display());
            return Vec::new();
        }

        let info = self.file_types.info_for(&path.to_string_lossy());
        let id = tree.create_item(
            parent,
            info.item_type.as_str(),
            info.display_name,
            parse_path(path).filename,
        );
        self.fill_file_item(tree, id, path.to_path_buf(), &info.item_type);
        log_info!(self.logger, "Collected file {} ({})", path.display(), info.item_type);
        vec![id]
    }

    fn collect_folder(&self, tree: &mut ItemTree, parent: Option<ItemId>, folder: &Path) -> Vec<ItemId> {
        let sequences = match image_sequences(folder) {
            Ok(sequences) => sequences,
            Err(e) => {
                log_warn!(self.logger, "Cannot list {}: {}", folder.display(), e);
                return Vec::new();
            }
        };

        if sequences.is_empty() {
            let name = folder
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| folder.display().to_string());
            let id = tree.create_item(parent, "file.folder", "Folder", name);
            self.fill_file_item(tree, id, folder.to_path_buf(), "file.folder");
            return vec![id];
        }

        sequences
            .into_iter()
            .map(|sequence| {
                let id = tree.create_item(
                    parent,
                    "file.image.sequence",
                    "Image Sequence",
                    sequence.name(),
                );
                self.fill_file_item(tree, id, sequence.path.clone(), "file.image.sequence");
                log_info!(
                    self.logger,
                    "Collected sequence {} ({} frames, {}-{})",
                    sequence.name(),
                    sequence.frame_count,
                    sequence.first_frame,
                    sequence.last_frame
                );
                id
            })
            .collect()
    }

    fn fill_file_item(&self, tree: &mut ItemTree, id: ItemId, path: PathBuf, item_type: &str) {
        let inherits_context = tree.get(id).is_some_and(|item| item.parent_id().is_some());
        if let Some(item) = tree.get_mut(id) {
            if item_type == "file.image" {
                item.thumbnail = Some(path.clone());
            }
            item.path = Some(path);
            if !inherits_context {
                item.context = self.context.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{EntityRef, CONTEXT_FILENAME};
    use crate::log::{CapturingLogger, LogLevel};
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_collect_maya_session() {
        let temp = TempDir::new().unwrap();
        let scene = temp.path().join("scenes").join("shot.v003.ma");
        touch(&scene);
        touch(&temp.path().join("cache").join("alembic").join("hero.abc"));

        let logger = CapturingLogger::new();
        let mut tree = ItemTree::new();
        let inspector = FilesystemInspector::new(Host::Maya, Some(scene.clone()));
        let session = Collector::new(&logger).collect_session(&mut tree, &inspector);

        let item = tree.get(session).unwrap();
        assert_eq!(item.item_type, "maya.session");
        assert_eq!(item.name, "shot.v003.ma");
        assert_eq!(item.path.as_deref(), Some(scene.as_path()));
        assert_eq!(item.project_root.as_deref(), Some(temp.path()));
        assert_eq!(item.publish_type.as_deref(), Some("Maya Scene"));

        let children: Vec<_> = tree.children(session).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].item_type, "maya.alembic");
        assert_eq!(children[0].display_type, "Alembic Cache");
    }

    #[test]
    fn test_unsaved_session() {
        let logger = CapturingLogger::new();
        let mut tree = ItemTree::new();
        let inspector = FilesystemInspector::new(Host::Nuke, None);
        let id = Collector::new(&logger).collect_session(&mut tree, &inspector);

        let item = tree.get(id).unwrap();
        assert_eq!(item.name, "Current Nuke Script");
        assert!(item.path.is_none());
        assert!(logger.contains(LogLevel::Warn, "not been saved"));
    }

    #[test]
    fn test_context_restored_from_project() {
        let temp = TempDir::new().unwrap();
        let scene = temp.path().join("scenes").join("shot.v001.ma");
        touch(&scene);
        let saved = PipelineContext::new().with_entity(EntityRef::new("Shot", 7, "sh070"));
        ContextStore::new(temp.path()).save(&saved).unwrap();

        let logger = CapturingLogger::new();
        let mut tree = ItemTree::new();
        let inspector = FilesystemInspector::new(Host::Maya, Some(scene));
        let id = Collector::new(&logger)
            .with_context(PipelineContext::new().with_entity(EntityRef::new("Shot", 1, "other")))
            .collect_session(&mut tree, &inspector);

        assert_eq!(tree.get(id).unwrap().context, saved);
    }

    #[test]
    fn test_corrupt_context_falls_back() {
        let temp = TempDir::new().unwrap();
        let scene = temp.path().join("scenes").join("shot.v001.ma");
        touch(&scene);
        fs::write(temp.path().join(CONTEXT_FILENAME), "not json").unwrap();

        let logger = CapturingLogger::new();
        let mut tree = ItemTree::new();
        let inspector = FilesystemInspector::new(Host::Maya, Some(scene));
        let id = Collector::new(&logger).collect_session(&mut tree, &inspector);

        assert!(tree.get(id).unwrap().context.is_empty());
        assert!(logger.contains(LogLevel::Warn, "Could not read saved context"));
    }

    #[test]
    fn test_collect_dropped_files_and_folders() {
        let temp = TempDir::new().unwrap();
        let texture = temp.path().join("wood.tx");
        let image = temp.path().join("ref.jpg");
        let renders = temp.path().join("renders");
        let empty = temp.path().join("empty");
        touch(&texture);
        touch(&image);
        for frame in 1..=3 {
            touch(&renders.join(format!("beauty.{:04}.exr", frame)));
        }
        fs::create_dir_all(&empty).unwrap();

        let logger = CapturingLogger::new();
        let collector = Collector::new(&logger);
        let mut tree = ItemTree::new();

        let tx = collector.collect_path(&mut tree, None, &texture)[0];
        let jpg = collector.collect_path(&mut tree, None, &image)[0];
        let seq = collector.collect_path(&mut tree, None, &renders);
        let folder = collector.collect_path(&mut tree, None, &empty);
        let missing = collector.collect_path(&mut tree, None, &temp.path().join("nope.ma"));

        assert_eq!(tree.get(tx).unwrap().item_type, "file.texture");
        assert_eq!(tree.get(jpg).unwrap().thumbnail.as_deref(), Some(image.as_path()));
        assert_eq!(seq.len(), 1);
        let seq_item = tree.get(seq[0]).unwrap();
        assert_eq!(seq_item.item_type, "file.image.sequence");
        assert_eq!(seq_item.name, "beauty.%04d.exr");
        assert_eq!(tree.get(folder[0]).unwrap().item_type, "file.folder");
        assert!(missing.is_empty());
    }
}
