//! Read-only queries over a [`BookmarkTree`].
//!
//! Everything here is computed fresh on each call from the current tree state; nothing is
//! cached between mutations.

use serde::{Deserialize, Serialize};

use crate::{
    node::{Node, NodeId},
    tree::BookmarkTree,
};

/// Separator used in path ids (`/Bookmarks/Dev/Rust`).
pub const PATH_DELIMITER: char = '/';

/// Aggregate returned by [`BookmarkTree::count_descendant_bookmarks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderCounts {
    /// Bookmarks anywhere below the folder.
    pub bookmarks: usize,
    /// Folders directly inside the folder.
    pub folders: usize,
}

impl BookmarkTree {
    /// Path id of a node: the names from the root down to `id`, each prefixed with `/`.
    ///
    /// Display and breadcrumb purposes only. Two sibling folders with the same name share a
    /// path, and renaming an ancestor changes it; use [`NodeId`] as the lookup key.
    pub fn resolve_path(&self, id: NodeId) -> String {
        self.breadcrumb(id)
            .iter()
            .filter_map(|ancestor| self.get(*ancestor))
            .fold(String::new(), |mut path, node| {
                path.push(PATH_DELIMITER);
                path.push_str(node.name());
                path
            })
    }

    /// Ids from the root down to and including `id`. Empty when `id` is unknown.
    pub fn breadcrumb(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut chain = vec![id];
        let mut cursor = id;
        while let Some(parent) = self.parent(cursor) {
            chain.push(parent);
            cursor = parent;
        }
        chain.reverse();
        chain
    }

    /// Depth-first search for the first folder whose recomputed path id equals `path`.
    pub fn find_folder(&self, path: &str) -> Option<NodeId> {
        self.find_folder_from(self.root(), "", path)
    }

    fn find_folder_from(&self, folder: NodeId, parent_path: &str, path: &str) -> Option<NodeId> {
        let node = self.get(folder)?;
        let current = format!("{parent_path}{PATH_DELIMITER}{}", node.name());
        if current == path {
            return Some(folder);
        }
        // Path ids only grow, so a non-prefix cannot lead to a match.
        if !path.starts_with(&current) {
            return None;
        }
        self.children(folder)
            .iter()
            .filter(|child| self.is_folder(**child))
            .find_map(|child| self.find_folder_from(*child, &current, path))
    }

    /// Resolve a folder path optionally followed by one more component naming any child.
    ///
    /// `"/Bookmarks/Dev"` resolves the folder, `"/Bookmarks/Dev/GitHub"` resolves the first
    /// child of `Dev` named `GitHub`, folder or bookmark. Components are matched in stored
    /// order, so names containing the delimiter cannot be addressed this way.
    pub fn find_by_path(&self, path: &str) -> Option<NodeId> {
        let mut components = path
            .trim_start_matches(PATH_DELIMITER)
            .split(PATH_DELIMITER)
            .filter(|component| !component.is_empty());
        let root = self.root();
        if components.next()? != self.get(root)?.name() {
            return None;
        }
        components.try_fold(root, |cursor, component| {
            self.children(cursor)
                .iter()
                .copied()
                .find(|child| self.get(*child).is_some_and(|n| n.name() == component))
        })
    }

    /// Depth-first search for the folder whose children directly contain `id`.
    ///
    /// Agrees with [`BookmarkTree::parent`]; kept as an explicit structural search so callers
    /// can verify the parent links.
    pub fn find_parent(&self, id: NodeId) -> Option<NodeId> {
        let mut stack = vec![self.root()];
        while let Some(folder) = stack.pop() {
            let children = self.children(folder);
            if children.contains(&id) {
                return Some(folder);
            }
            stack.extend(
                children
                    .iter()
                    .rev()
                    .filter(|child| self.is_folder(**child))
                    .copied(),
            );
        }
        None
    }

    /// True when `node` is `ancestor` or lies anywhere below it.
    pub fn is_descendant(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.contains(ancestor) {
            return false;
        }
        let mut stack = vec![ancestor];
        while let Some(current) = stack.pop() {
            if current == node {
                return true;
            }
            stack.extend(
                self.children(current)
                    .iter()
                    .filter(|child| self.is_folder(**child) || **child == node),
            );
        }
        false
    }

    /// Bookmarks counted through every level, folders counted at the first level only.
    pub fn count_descendant_bookmarks(&self, folder: NodeId) -> FolderCounts {
        FolderCounts {
            folders: self
                .children(folder)
                .iter()
                .filter(|child| self.is_folder(**child))
                .count(),
            bookmarks: self
                .descendants(folder)
                .into_iter()
                .filter(|id| self.get(*id).is_some_and(Node::is_bookmark))
                .count(),
        }
    }

    /// Every node below `folder`, folders and bookmarks alike.
    pub fn count_items(&self, folder: NodeId) -> usize {
        self.descendants(folder).len()
    }

    /// Direct bookmark children of `folder`, in stored order.
    pub fn bookmarks_in(&self, folder: NodeId) -> Vec<NodeId> {
        self.children(folder)
            .iter()
            .copied()
            .filter(|child| self.get(*child).is_some_and(Node::is_bookmark))
            .collect()
    }

    /// Case-insensitive substring search over bookmark names and urls below `folder`.
    ///
    /// Results come back in pre-order. A blank query matches nothing; callers that want to
    /// show everything in that case should list the folder instead.
    pub fn search(&self, folder: NodeId, query: &str) -> Vec<NodeId> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let hits = self
            .descendants(folder)
            .into_iter()
            .filter(|id| match self.get(*id) {
                Some(Node::Bookmark(bookmark)) => {
                    bookmark.name.to_lowercase().contains(&needle)
                        || bookmark.url.to_lowercase().contains(&needle)
                }
                _ => false,
            })
            .collect::<Vec<_>>();
        tracing::debug!("search for {query:?} under {folder} found {} bookmarks", hits.len());
        hits
    }
}
