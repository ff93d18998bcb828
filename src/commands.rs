use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{node::NodeId, tree::Outline};

/// Command interface between a front end and the [`BookmarkEditor`](crate::editor::BookmarkEditor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Op {
    /// Append a new node (a folder may carry its own children) to a folder.
    Insert { parent: NodeId, node: Outline },
    /// Give a folder or bookmark a new, non-blank name.
    Rename { node: NodeId, name: String },
    /// Point a bookmark at a new, non-blank url.
    SetUrl { node: NodeId, url: String },
    /// Remove a node and everything below it.
    Delete(NodeId),
    /// Re-parent a node at the end of a folder. Undoable.
    Move { item: NodeId, target: NodeId },
    /// Revert the most recent move.
    Undo,
}

impl Display for Op {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Op::Insert { parent, node } => write!(f, "Insert({} into {})", node.name(), parent),
            Op::Rename { node, name } => write!(f, "Rename({node} to {name})"),
            Op::SetUrl { node, url } => write!(f, "SetUrl({node} to {url})"),
            Op::Delete(node) => write!(f, "Delete({node})"),
            Op::Move { item, target } => write!(f, "Move({item} to {target})"),
            Op::Undo => write!(f, "Undo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OpResult {
    Ok,
    /// Id of the top node created by an insert.
    Inserted(NodeId),
    /// Whether an undo changed anything.
    Undone(bool),
}

impl Display for OpResult {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            OpResult::Ok => write!(f, "Ok"),
            OpResult::Inserted(id) => write!(f, "Inserted({id})"),
            OpResult::Undone(changed) => write!(f, "Undone({changed})"),
        }
    }
}
