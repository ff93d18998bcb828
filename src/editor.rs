//! Validated edits over a [`BookmarkTree`] with one step of undo.
//!
//! Every operation either succeeds completely or returns an error and leaves the tree exactly as
//! it was. Only moves are undoable; the undo slot holds the inverse of the most recent move and
//! is overwritten by the next one.

use serde::{Deserialize, Serialize};

use crate::{
    commands::{Op, OpResult},
    error::BookmarkError,
    node::{Node, NodeId},
    tree::{BookmarkTree, Outline, MAX_DEPTH},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UndoOperation {
    Move,
}

/// Inverse of the last move: put `item` back into `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoRecord {
    pub operation: UndoOperation,
    pub item: NodeId,
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct BookmarkEditor {
    tree: BookmarkTree,
    undo: Option<UndoRecord>,
}

impl From<BookmarkTree> for BookmarkEditor {
    fn from(tree: BookmarkTree) -> Self {
        BookmarkEditor::new(tree)
    }
}

impl BookmarkEditor {
    pub fn new(tree: BookmarkTree) -> Self {
        BookmarkEditor { tree, undo: None }
    }

    pub fn tree(&self) -> &BookmarkTree {
        &self.tree
    }

    pub fn into_tree(self) -> BookmarkTree {
        self.tree
    }

    pub fn undo_record(&self) -> Option<&UndoRecord> {
        self.undo.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Append `node` to `parent`. Names and urls are trimmed and must not be blank.
    pub fn insert(&mut self, parent: NodeId, node: Node) -> Result<NodeId, BookmarkError> {
        let node = normalized(node)?;
        self.check_depth(parent, 0)?;
        let description = node.to_string();
        let id = self.tree.append(parent, node)?;
        tracing::debug!("Inserted {description} as {id} into {parent}");
        Ok(id)
    }

    /// Append a whole subtree to `parent`. Every name and url in it is validated first.
    pub fn insert_outline(
        &mut self,
        parent: NodeId,
        outline: &Outline,
    ) -> Result<NodeId, BookmarkError> {
        if !self.tree.is_folder(parent) {
            self.tree.node(parent)?;
            return Err(BookmarkError::NotAFolder(parent));
        }
        let outline = normalized_outline(outline)?;
        self.check_depth(parent, outline.height())?;
        let id = self.tree.append_outline(parent, &outline)?;
        tracing::debug!("Inserted outline \"{}\" as {id} into {parent}", outline.name());
        Ok(id)
    }

    pub fn rename(&mut self, node: NodeId, name: &str) -> Result<(), BookmarkError> {
        let name = required(name, BookmarkError::EmptyName).inspect_err(|e| {
            tracing::debug!("rejected rename of {node}: {e}");
        })?;
        let current = self.tree.node_mut(node)?.name_mut();
        tracing::debug!("Renamed {node} from \"{current}\" to \"{name}\"");
        *current = name;
        Ok(())
    }

    pub fn set_url(&mut self, node: NodeId, url: &str) -> Result<(), BookmarkError> {
        let url = required(url, BookmarkError::EmptyUrl).inspect_err(|e| {
            tracing::debug!("rejected url change of {node}: {e}");
        })?;
        match self.tree.node_mut(node)? {
            Node::Bookmark(bookmark) => {
                tracing::debug!("Changed url of {node} to {url}");
                bookmark.url = url;
                Ok(())
            }
            Node::Folder(_) => Err(BookmarkError::NotABookmark(node)),
        }
    }

    /// Remove `target` and its subtree, returning how many nodes were released.
    pub fn delete(&mut self, target: NodeId) -> Result<usize, BookmarkError> {
        if target == self.tree.root() {
            tracing::debug!("rejected delete of the root folder");
            return Err(BookmarkError::RootImmutable("deleted".to_string()));
        }
        let parent = self
            .tree
            .find_parent(target)
            .ok_or(BookmarkError::UnknownNode(target))?;
        debug_assert_eq!(Some(parent), self.tree.parent(target));
        let description = self.tree.node(target)?.to_string();
        let removed = self.tree.remove_subtree(target)?;
        tracing::debug!("Deleted {description} from {parent} ({removed} nodes)");
        Ok(removed)
    }

    /// Move `item` to the end of `target`'s children.
    ///
    /// Moving a node into the folder it already lives in is allowed and re-appends it.
    pub fn move_item(&mut self, item: NodeId, target: NodeId) -> Result<(), BookmarkError> {
        self.check_move(item, target).inspect_err(|e| {
            tracing::debug!("rejected move: {e}");
        })?;
        let (from, _) = self.tree.detach(item)?;
        self.tree.attach(target, item)?;
        self.undo = Some(UndoRecord {
            operation: UndoOperation::Move,
            item,
            from,
            to: target,
        });
        tracing::debug!(
            "Moved {} to folder \"{}\"",
            self.tree.node(item)?,
            self.tree.node(target)?.name()
        );
        Ok(())
    }

    fn check_move(&self, item: NodeId, target: NodeId) -> Result<(), BookmarkError> {
        let illegal = |reason: &str| BookmarkError::IllegalMove {
            item,
            target,
            reason: reason.to_string(),
        };
        if item == target {
            return Err(illegal("a node cannot be moved into itself"));
        }
        if item == self.tree.root() {
            return Err(BookmarkError::RootImmutable("moved".to_string()));
        }
        let moving = self.tree.node(item)?;
        if !self.tree.node(target)?.is_folder() {
            return Err(BookmarkError::NotAFolder(target));
        }
        if moving.is_folder() && self.tree.is_descendant(item, target) {
            return Err(illegal("the target folder is inside the moved folder"));
        }
        self.check_depth(target, self.tree.height(item))
    }

    /// A subtree `height` levels tall placed under `parent` must stay within [`MAX_DEPTH`].
    fn check_depth(&self, parent: NodeId, height: usize) -> Result<(), BookmarkError> {
        if self.tree.depth(parent) + 1 + height > MAX_DEPTH {
            tracing::debug!("rejected edit below {parent}: deeper than {MAX_DEPTH} levels");
            return Err(BookmarkError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    /// Revert the most recent move. Returns `false` when there was nothing to undo.
    ///
    /// The record is consumed either way, so a second call in a row is a no-op.
    pub fn undo(&mut self) -> bool {
        let Some(record) = self.undo.take() else {
            return false;
        };
        match record.operation {
            UndoOperation::Move => {
                let UndoRecord { item, from, .. } = record;
                let restorable = self.tree.contains(item)
                    && self.tree.is_folder(from)
                    && !self.tree.is_descendant(item, from);
                if !restorable {
                    tracing::warn!("cannot undo move of {item}: it or {from} was removed");
                    return false;
                }
                if let Err(e) = self
                    .tree
                    .detach(item)
                    .and_then(|_| self.tree.attach(from, item))
                {
                    tracing::warn!("undo of move of {item} failed: {e}");
                    return false;
                }
                tracing::debug!("Undid move: {item} back to {from}");
                true
            }
        }
    }

    pub fn apply(&mut self, op: Op) -> Result<OpResult, BookmarkError> {
        tracing::debug!("applying {op}");
        match op {
            Op::Insert { parent, node } => self
                .insert_outline(parent, &node)
                .map(OpResult::Inserted),
            Op::Rename { node, name } => self.rename(node, &name).map(|_| OpResult::Ok),
            Op::SetUrl { node, url } => self.set_url(node, &url).map(|_| OpResult::Ok),
            Op::Delete(node) => self.delete(node).map(|_| OpResult::Ok),
            Op::Move { item, target } => self.move_item(item, target).map(|_| OpResult::Ok),
            Op::Undo => Ok(OpResult::Undone(self.undo())),
        }
    }
}

fn required(value: &str, err: BookmarkError) -> Result<String, BookmarkError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(err)
    } else {
        Ok(trimmed.to_string())
    }
}

fn normalized(node: Node) -> Result<Node, BookmarkError> {
    match node {
        Node::Folder(folder) => Ok(Node::folder(required(&folder.name, BookmarkError::EmptyName)?)),
        Node::Bookmark(bookmark) => Ok(Node::bookmark(
            required(&bookmark.name, BookmarkError::EmptyName)?,
            required(&bookmark.url, BookmarkError::EmptyUrl)?,
            bookmark.icon,
        )),
    }
}

fn normalized_outline(outline: &Outline) -> Result<Outline, BookmarkError> {
    match outline {
        Outline::Folder { name, children } => Ok(Outline::Folder {
            name: required(name, BookmarkError::EmptyName)?,
            children: children
                .iter()
                .map(normalized_outline)
                .collect::<Result<Vec<_>, _>>()?,
        }),
        Outline::Bookmark { name, url, icon } => Ok(Outline::Bookmark {
            name: required(name, BookmarkError::EmptyName)?,
            url: required(url, BookmarkError::EmptyUrl)?,
            icon: icon.clone(),
        }),
    }
}
