//! Arena-backed bookmark hierarchy.
//!
//! [`BookmarkTree`] owns every [`Node`] in a slot vector and records each node's parent, so a
//! node belongs to exactly one folder at any time. Slots of removed nodes are left empty rather
//! than reused, which makes a stale [`NodeId`] detectable instead of silently aliasing a newer
//! node.
//!
//! Structural edits (`append`, `detach`, `remove_subtree`) are crate-private: the public way to
//! change a tree is [`BookmarkEditor`](crate::editor::BookmarkEditor), which owns the invariant
//! checks.

use serde::{Deserialize, Serialize};

use crate::{
    error::BookmarkError,
    node::{Bookmark, Node, NodeId},
};

/// Deepest level a node may sit at, counted in folders below the root.
///
/// Edits that would go deeper are rejected, and the Netscape reader skips lists nested past it,
/// so every tree an editor can build survives a write and re-read.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct BookmarkTree {
    slots: Vec<Option<Slot>>,
    root: NodeId,
}

impl Default for BookmarkTree {
    fn default() -> Self {
        BookmarkTree::new("Bookmarks")
    }
}

impl BookmarkTree {
    /// A tree holding only an empty root folder.
    pub fn new(root_name: impl Into<String>) -> Self {
        BookmarkTree {
            slots: vec![Some(Slot {
                node: Node::folder(root_name),
                parent: None,
            })],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.0)
            .and_then(|slot| slot.as_ref())
            .map(|slot| &slot.node)
    }

    /// Like [`BookmarkTree::get`], but a missing node is an error.
    pub fn node(&self, id: NodeId) -> Result<&Node, BookmarkError> {
        self.get(id).ok_or(BookmarkError::UnknownNode(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_folder(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_folder)
    }

    /// Parent recorded in the arena. `None` for the root and for unknown ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots
            .get(id.0)
            .and_then(|slot| slot.as_ref())
            .and_then(|slot| slot.parent)
    }

    /// Children in stored order. Empty for bookmarks and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// A tree always has its root, so it is empty when the root has no children.
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    /// All nodes below `id` in pre-order, `id` itself excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Folders between `id` and the root. Zero for the root and for unknown ids.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Levels below `id`. Zero for bookmarks and empty folders.
    pub fn height(&self, id: NodeId) -> usize {
        let mut tallest = 0;
        let mut stack = vec![(id, 0)];
        while let Some((current, level)) = stack.pop() {
            tallest = tallest.max(level);
            stack.extend(self.children(current).iter().map(|child| (*child, level + 1)));
        }
        tallest
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, BookmarkError> {
        self.slots
            .get_mut(id.0)
            .and_then(|slot| slot.as_mut())
            .map(|slot| &mut slot.node)
            .ok_or(BookmarkError::UnknownNode(id))
    }

    fn children_mut(&mut self, id: NodeId) -> Result<&mut Vec<NodeId>, BookmarkError> {
        match self.node_mut(id)? {
            Node::Folder(folder) => Ok(&mut folder.children),
            Node::Bookmark(_) => Err(BookmarkError::NotAFolder(id)),
        }
    }

    /// Allocate `node` and append it to `parent`'s children.
    ///
    /// Any child ids carried by a folder `node` are dropped: children are attached through the
    /// arena only.
    pub(crate) fn append(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId, BookmarkError> {
        if !self.is_folder(parent) {
            return Err(match self.get(parent) {
                Some(_) => BookmarkError::NotAFolder(parent),
                None => BookmarkError::UnknownNode(parent),
            });
        }
        if let Node::Folder(folder) = &mut node {
            folder.children.clear();
        }
        let id = NodeId(self.slots.len());
        self.slots.push(Some(Slot {
            node,
            parent: Some(parent),
        }));
        self.children_mut(parent)?.push(id);
        Ok(id)
    }

    /// Unlink `id` from its parent, returning the former parent and position.
    ///
    /// The node stays allocated and must be re-attached with [`BookmarkTree::attach`] or
    /// released with [`BookmarkTree::remove_subtree`].
    pub(crate) fn detach(&mut self, id: NodeId) -> Result<(NodeId, usize), BookmarkError> {
        let parent = self.parent(id).ok_or_else(|| {
            if id == self.root {
                BookmarkError::RootImmutable("detached".to_string())
            } else {
                BookmarkError::UnknownNode(id)
            }
        })?;
        let siblings = self.children_mut(parent)?;
        let position = siblings
            .iter()
            .position(|child| *child == id)
            .ok_or(BookmarkError::UnknownNode(id))?;
        siblings.remove(position);
        if let Some(Some(slot)) = self.slots.get_mut(id.0) {
            slot.parent = None;
        }
        Ok((parent, position))
    }

    /// Append an allocated, parentless node to `parent`.
    pub(crate) fn attach(&mut self, parent: NodeId, id: NodeId) -> Result<(), BookmarkError> {
        if !self.contains(id) {
            return Err(BookmarkError::UnknownNode(id));
        }
        self.children_mut(parent)?.push(id);
        if let Some(Some(slot)) = self.slots.get_mut(id.0) {
            slot.parent = Some(parent);
        }
        Ok(())
    }

    /// Detach `id` and release it and everything below it.
    pub(crate) fn remove_subtree(&mut self, id: NodeId) -> Result<usize, BookmarkError> {
        let mut doomed = self.descendants(id);
        self.detach(id)?;
        doomed.push(id);
        for gone in doomed.iter() {
            if let Some(slot) = self.slots.get_mut(gone.0) {
                *slot = None;
            }
        }
        Ok(doomed.len())
    }

    /// Owned nested copy of the subtree at `id`.
    pub fn outline_of(&self, id: NodeId) -> Option<Outline> {
        let top = match self.get(id)? {
            Node::Folder(folder) => folder,
            Node::Bookmark(bookmark) => return Some(bookmark_outline(bookmark)),
        };
        // One frame per open folder: its name, the children still to visit, the finished ones.
        let mut frames = vec![(top.name.clone(), top.children.iter(), Vec::new())];
        loop {
            let (_, pending, _) = frames.last_mut()?;
            let Some(child) = pending.next() else {
                let (name, _, children) = frames.pop()?;
                let folder = Outline::Folder { name, children };
                match frames.last_mut() {
                    Some((_, _, done)) => done.push(folder),
                    None => return Some(folder),
                }
                continue;
            };
            match self.get(*child) {
                Some(Node::Folder(folder)) => {
                    frames.push((folder.name.clone(), folder.children.iter(), Vec::new()));
                }
                Some(Node::Bookmark(bookmark)) => {
                    if let Some((_, _, done)) = frames.last_mut() {
                        done.push(bookmark_outline(bookmark));
                    }
                }
                None => {}
            }
        }
    }

    /// Owned nested copy of the whole tree.
    pub fn outline(&self) -> Outline {
        self.outline_of(self.root)
            .unwrap_or_else(|| Outline::folder("", Vec::new()))
    }

    /// Rebuild a tree from an outline whose top level must be a folder.
    pub fn from_outline(outline: &Outline) -> Result<Self, BookmarkError> {
        let Outline::Folder { name, children } = outline else {
            return Err(BookmarkError::Codec(
                "the top level of a bookmark outline must be a folder".to_string(),
            ));
        };
        if outline.height() > MAX_DEPTH {
            return Err(BookmarkError::TooDeep(MAX_DEPTH));
        }
        let mut tree = BookmarkTree::new(name.clone());
        let root = tree.root();
        for child in children {
            tree.append_outline(root, child)?;
        }
        Ok(tree)
    }

    /// Allocate every node of `outline` below `parent`, returning the id of its top node.
    pub(crate) fn append_outline(
        &mut self,
        parent: NodeId,
        outline: &Outline,
    ) -> Result<NodeId, BookmarkError> {
        let mut pending = vec![(parent, outline)];
        let mut top = None;
        while let Some((under, item)) = pending.pop() {
            let id = match item {
                Outline::Folder { name, .. } => self.append(under, Node::folder(name.clone()))?,
                Outline::Bookmark { name, url, icon } => self.append(
                    under,
                    Node::bookmark(name.clone(), url.clone(), icon.clone()),
                )?,
            };
            top.get_or_insert(id);
            if let Outline::Folder { children, .. } = item {
                // Reverse so the stack pops children in stored order.
                pending.extend(children.iter().rev().map(|child| (id, child)));
            }
        }
        top.ok_or(BookmarkError::UnknownNode(parent))
    }
}

fn bookmark_outline(bookmark: &Bookmark) -> Outline {
    Outline::Bookmark {
        name: bookmark.name.clone(),
        url: bookmark.url.clone(),
        icon: bookmark.icon.clone(),
    }
}

/// Owned, nested representation of a subtree.
///
/// Used to compare trees structurally, to describe subtrees to insert, and as the JSON
/// interchange shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Outline {
    Folder {
        name: String,
        #[serde(default)]
        children: Vec<Outline>,
    },
    Bookmark {
        name: String,
        url: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        icon: String,
    },
}

impl Outline {
    pub fn folder(name: impl Into<String>, children: Vec<Outline>) -> Self {
        Outline::Folder {
            name: name.into(),
            children,
        }
    }

    pub fn bookmark(name: impl Into<String>, url: impl Into<String>) -> Self {
        Outline::Bookmark {
            name: name.into(),
            url: url.into(),
            icon: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Outline::Folder { name, .. } | Outline::Bookmark { name, .. } => name,
        }
    }

    /// Levels below the top node, as [`BookmarkTree::height`] counts them.
    pub fn height(&self) -> usize {
        let mut tallest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((current, level)) = stack.pop() {
            tallest = tallest.max(level);
            if let Outline::Folder { children, .. } = current {
                stack.extend(children.iter().map(|child| (child, level + 1)));
            }
        }
        tallest
    }
}
