//! Folder and bookmark entities.
//!
//! A [`Node`] is either a [`Folder`] holding an ordered list of child ids, or a [`Bookmark`]
//! leaf. Nodes live inside a [`BookmarkTree`](crate::tree::BookmarkTree) arena and are addressed
//! by [`NodeId`], which is assigned once at creation and never reused, so it survives renames and
//! moves.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Placeholder used when a parsed folder header has no text.
pub const UNNAMED_FOLDER: &str = "Unnamed Folder";
/// Placeholder used when a parsed link has neither text nor href.
pub const UNNAMED_BOOKMARK: &str = "Unnamed Bookmark";

/// Stable arena handle for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Bookmark,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            NodeKind::Folder => write!(f, "folder"),
            NodeKind::Bookmark => write!(f, "bookmark"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub name: String,
    pub(crate) children: Vec<NodeId>,
}

impl Folder {
    /// Child ids in stored order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub name: String,
    pub url: String,
    /// Icon reference, usually a `data:` URI. Empty when the source had none.
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Folder(Folder),
    Bookmark(Bookmark),
}

impl Node {
    /// A detached, empty folder.
    pub fn folder(name: impl Into<String>) -> Self {
        Node::Folder(Folder {
            name: name.into(),
            children: Vec::new(),
        })
    }

    pub fn bookmark(
        name: impl Into<String>,
        url: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Node::Bookmark(Bookmark {
            name: name.into(),
            url: url.into(),
            icon: icon.into(),
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Folder(_) => NodeKind::Folder,
            Node::Bookmark(_) => NodeKind::Bookmark,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Folder(folder) => &folder.name,
            Node::Bookmark(bookmark) => &bookmark.name,
        }
    }

    pub(crate) fn name_mut(&mut self) -> &mut String {
        match self {
            Node::Folder(folder) => &mut folder.name,
            Node::Bookmark(bookmark) => &mut bookmark.name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    pub fn is_bookmark(&self) -> bool {
        matches!(self, Node::Bookmark(_))
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::Bookmark(_) => None,
        }
    }

    pub fn as_bookmark(&self) -> Option<&Bookmark> {
        match self {
            Node::Folder(_) => None,
            Node::Bookmark(bookmark) => Some(bookmark),
        }
    }

    /// Children of a folder; bookmarks have none.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Folder(folder) => &folder.children,
            Node::Bookmark(_) => &[],
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Node::Folder(folder) => write!(f, "{} \"{}\"", NodeKind::Folder, folder.name),
            Node::Bookmark(bookmark) => write!(
                f,
                "{} \"{}\" <{}>",
                NodeKind::Bookmark,
                bookmark.name,
                bookmark.url
            ),
        }
    }
}
