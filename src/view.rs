//! Presentation state kept alongside a tree: collapsed folders, favorites and compact mode.
//!
//! Nothing here changes the tree. Sorting for display works on a copy of a folder's child list,
//! and [`ViewState::visible_rows`] flattens the tree into what a folder outline would show.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{
    node::{Node, NodeId, NodeKind},
    tree::BookmarkTree,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    collapsed: BTreeSet<NodeId>,
    favorites: BTreeSet<NodeId>,
    pub compact: bool,
}

/// One line of the flattened folder outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: NodeId,
    pub kind: NodeKind,
    pub depth: usize,
    /// Whether an expand arrow applies. In compact mode only subfolders count.
    pub has_children: bool,
    pub collapsed: bool,
    /// Bookmark badge for folders, counted through every level.
    pub bookmarks: usize,
}

impl ViewState {
    pub fn new(compact: bool) -> Self {
        ViewState {
            compact,
            ..Default::default()
        }
    }

    /// Collapse every folder that has any children, folders or bookmarks.
    pub fn collapse_all(&mut self, tree: &BookmarkTree) {
        let root = tree.root();
        self.collapsed.extend(
            std::iter::once(root)
                .chain(tree.descendants(root))
                .filter(|id| tree.is_folder(*id) && !tree.children(*id).is_empty()),
        );
        tracing::debug!("collapsed {} folders", self.collapsed.len());
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Flip the collapsed flag of `folder`, returning the new state.
    pub fn toggle_collapsed(&mut self, folder: NodeId) -> bool {
        if self.collapsed.remove(&folder) {
            false
        } else {
            self.collapsed.insert(folder);
            true
        }
    }

    pub fn is_collapsed(&self, folder: NodeId) -> bool {
        self.collapsed.contains(&folder)
    }

    pub fn toggle_compact(&mut self) -> bool {
        self.compact = !self.compact;
        self.compact
    }

    /// Flip the favorite flag of a folder, returning the new state. The root and bookmarks are
    /// never favorites.
    pub fn toggle_favorite(&mut self, tree: &BookmarkTree, folder: NodeId) -> bool {
        if folder == tree.root() || !tree.is_folder(folder) {
            return false;
        }
        if self.favorites.remove(&folder) {
            false
        } else {
            self.favorites.insert(folder);
            true
        }
    }

    pub fn is_favorite(&self, folder: NodeId) -> bool {
        self.favorites.contains(&folder)
    }

    /// Favorite folders still present in `tree`, in id order.
    pub fn favorites<'a>(&'a self, tree: &'a BookmarkTree) -> impl Iterator<Item = NodeId> + 'a {
        self.favorites
            .iter()
            .copied()
            .filter(|id| tree.is_folder(*id))
    }

    /// Forget ids that no longer name a folder in `tree`.
    pub fn prune(&mut self, tree: &BookmarkTree) {
        self.collapsed.retain(|id| tree.is_folder(*id));
        self.favorites.retain(|id| tree.is_folder(*id));
    }

    /// Flatten the tree the way the folder outline shows it.
    ///
    /// Each folder row is followed, unless the folder is collapsed, by its subfolders and then
    /// (outside compact mode) its bookmarks.
    pub fn visible_rows(&self, tree: &BookmarkTree) -> Vec<Row> {
        let mut rows = Vec::new();
        let mut stack = vec![(tree.root(), 0)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = tree.get(id) else {
                continue;
            };
            match node {
                Node::Bookmark(_) => rows.push(Row {
                    id,
                    kind: NodeKind::Bookmark,
                    depth,
                    has_children: false,
                    collapsed: false,
                    bookmarks: 0,
                }),
                Node::Folder(_) => {
                    let children = sorted_children(tree, id);
                    let has_children = children
                        .iter()
                        .any(|child| !self.compact || tree.is_folder(*child));
                    let collapsed = self.is_collapsed(id);
                    rows.push(Row {
                        id,
                        kind: NodeKind::Folder,
                        depth,
                        has_children,
                        collapsed,
                        bookmarks: tree.count_descendant_bookmarks(id).bookmarks,
                    });
                    if !collapsed {
                        stack.extend(
                            children
                                .into_iter()
                                .filter(|child| !self.compact || tree.is_folder(*child))
                                .rev()
                                .map(|child| (child, depth + 1)),
                        );
                    }
                }
            }
        }
        rows
    }
}

/// Children of `folder` with folders ahead of bookmarks, each group in stored order.
pub fn sorted_children(tree: &BookmarkTree, folder: NodeId) -> Vec<NodeId> {
    let mut children = tree.children(folder).to_vec();
    // Stable, so equal kinds keep their stored order.
    children.sort_by_key(|child| !tree.is_folder(*child));
    children
}
