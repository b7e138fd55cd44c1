//! Collected publish items.
//!
//! Items live in an [`ItemTree`] arena and refer to their parent by
//! [`ItemId`]. Children are always inserted after their parent, so
//! iterating the tree in order visits parents first.

use std::path::{Path, PathBuf};

use crate::context::PipelineContext;
use crate::version::{Layout, PublishVersionState};

use super::registrar::RecordHandle;

/// Index of an item inside its [`ItemTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

impl ItemId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a successful publish produced for an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedFile {
    pub record: RecordHandle,
    pub path: PathBuf,
    pub version: u64,
}

/// A candidate artifact and everything plugins learn about it.
#[derive(Debug, Clone)]
pub struct PublishItem {
    id: ItemId,
    parent: Option<ItemId>,
    /// Type string matched against plugin filters, e.g. `maya.session`.
    pub item_type: String,
    pub display_type: String,
    pub name: String,
    /// File on disk; `None` for an unsaved session.
    pub path: Option<PathBuf>,
    pub project_root: Option<PathBuf>,
    pub context: PipelineContext,
    /// Publish comment.
    pub description: Option<String>,
    pub thumbnail: Option<PathBuf>,
    /// Publish type suggested by the collector.
    pub publish_type: Option<String>,
    /// Version chosen at validation, shared with child artifacts.
    pub version_state: Option<PublishVersionState>,
    pub published: Option<PublishedFile>,
}

impl PublishItem {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn parent_id(&self) -> Option<ItemId> {
        self.parent
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Root that the publish folder of `layout` hangs off.
    ///
    /// Flat publishes sit next to the file. Nested publishes go under the
    /// project root when one is known, otherwise next to the file.
    pub fn publish_root(&self, layout: &Layout) -> Option<PathBuf> {
        let file_dir = || self.path.as_ref()?.parent().map(Path::to_path_buf);
        match layout {
            Layout::Flat { .. } => file_dir(),
            Layout::Nested { .. } => self.project_root.clone().or_else(file_dir),
        }
    }
}

/// Arena of items produced by a collector.
#[derive(Debug, Clone, Default)]
pub struct ItemTree {
    items: Vec<PublishItem>,
}

impl ItemTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item under `parent` (or at the top level) and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn create_item(
        &mut self,
        parent: Option<ItemId>,
        item_type: impl Into<String>,
        display_type: impl Into<String>,
        name: impl Into<String>,
    ) -> ItemId {
        if let Some(parent) = parent {
            assert!(parent.0 < self.items.len(), "unknown parent item");
        }
        let id = ItemId(self.items.len());
        let context = parent
            .map(|p| self.items[p.0].context.clone())
            .unwrap_or_default();
        self.items.push(PublishItem {
            id,
            parent,
            item_type: item_type.into(),
            display_type: display_type.into(),
            name: name.into(),
            path: None,
            project_root: None,
            context,
            description: None,
            thumbnail: None,
            publish_type: None,
            version_state: None,
            published: None,
        });
        id
    }

    pub fn get(&self, id: ItemId) -> Option<&PublishItem> {
        self.items.get(id.0)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut PublishItem> {
        self.items.get_mut(id.0)
    }

    pub fn parent(&self, id: ItemId) -> Option<&PublishItem> {
        self.get(id)?.parent.and_then(|p| self.get(p))
    }

    pub fn children(&self, id: ItemId) -> impl Iterator<Item = &PublishItem> {
        self.items.iter().filter(move |item| item.parent == Some(id))
    }

    /// Items in insertion order (parents before children).
    pub fn iter(&self) -> impl Iterator<Item = &PublishItem> {
        self.items.iter()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Apply `description` to every item that has none yet.
    pub fn set_description(&mut self, description: &str) {
        for item in &mut self.items {
            if item.description.is_none() {
                item.description = Some(description.to_string());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EntityRef;

    #[test]
    fn test_children_follow_parent() {
        let mut tree = ItemTree::new();
        let session = tree.create_item(None, "maya.session", "Maya Session", "shot.ma");
        let cache = tree.create_item(Some(session), "file.alembic", "Alembic Cache", "a.abc");
        let movie = tree.create_item(Some(session), "file.video", "Movie", "pb.mov");

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.parent(cache).unwrap().id(), session);
        assert!(tree.parent(session).is_none());
        let children: Vec<_> = tree.children(session).map(|c| c.id()).collect();
        assert_eq!(children, vec![cache, movie]);
        assert!(session < cache);
    }

    #[test]
    fn test_child_inherits_context() {
        let mut tree = ItemTree::new();
        let session = tree.create_item(None, "maya.session", "Maya Session", "shot.ma");
        tree.get_mut(session).unwrap().context =
            PipelineContext::new().with_project(EntityRef::new("Project", 1, "Demo"));

        let cache = tree.create_item(Some(session), "file.alembic", "Alembic Cache", "a.abc");
        assert_eq!(tree.get(cache).unwrap().context.project.as_ref().unwrap().id, 1);
    }

    #[test]
    fn test_publish_root_depends_on_layout() {
        let mut tree = ItemTree::new();
        let id = tree.create_item(None, "file.maya", "Maya Scene", "a.ma");
        let item = tree.get_mut(id).unwrap();
        item.path = Some(PathBuf::from("/proj/scenes/a.ma"));
        let flat = Layout::flat();
        let nested = Layout::nested();
        assert_eq!(item.publish_root(&nested), Some(PathBuf::from("/proj/scenes")));

        item.project_root = Some(PathBuf::from("/proj"));
        assert_eq!(item.publish_root(&nested), Some(PathBuf::from("/proj")));
        // flat publishes stay next to the file even inside a project
        assert_eq!(item.publish_root(&flat), Some(PathBuf::from("/proj/scenes")));
    }

    #[test]
    fn test_unsaved_item_has_no_publish_root() {
        let mut tree = ItemTree::new();
        let id = tree.create_item(None, "maya.session", "Maya Session", "untitled");
        assert_eq!(tree.get(id).unwrap().publish_root(&Layout::flat()), None);
        assert_eq!(tree.get(id).unwrap().publish_root(&Layout::nested()), None);
    }

    #[test]
    fn test_set_description_keeps_existing() {
        let mut tree = ItemTree::new();
        let a = tree.create_item(None, "file.maya", "Maya Scene", "a.ma");
        let b = tree.create_item(None, "file.maya", "Maya Scene", "b.ma");
        tree.get_mut(a).unwrap().description = Some("keep".to_string());
        tree.set_description("new");
        assert_eq!(tree.get(a).unwrap().description.as_deref(), Some("keep"));
        assert_eq!(tree.get(b).unwrap().description.as_deref(), Some("new"));
    }
}
