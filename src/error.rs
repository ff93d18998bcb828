use std::{fmt, io, string::FromUtf8Error};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toml::{de::Error as TomlDeError, ser::Error as TomlSerError};

use serde_json::Error as JsonError;

use crate::node::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum BookmarkError {
    #[error("Bookmark codec error: {0}")]
    Codec(String),
    #[error("Unsupported file content: {0}")]
    Encoding(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("Node {0} does not exist in this tree")]
    UnknownNode(NodeId),
    #[error("Node {0} is not a folder")]
    NotAFolder(NodeId),
    #[error("Node {0} is not a bookmark")]
    NotABookmark(NodeId),
    #[error("Name is required")]
    EmptyName,
    #[error("URL is required for bookmarks")]
    EmptyUrl,
    #[error("The root folder cannot be {0}")]
    RootImmutable(String),
    #[error("Cannot move node {item} into {target}: {reason}")]
    IllegalMove {
        item: NodeId,
        target: NodeId,
        reason: String,
    },
    #[error("Folders cannot be nested more than {0} levels deep")]
    TooDeep(usize),
}

impl BookmarkError {
    /// True for rejected edit requests, as opposed to I/O or codec failures.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            BookmarkError::UnknownNode(_)
                | BookmarkError::NotAFolder(_)
                | BookmarkError::NotABookmark(_)
                | BookmarkError::EmptyName
                | BookmarkError::EmptyUrl
                | BookmarkError::RootImmutable(_)
                | BookmarkError::IllegalMove { .. }
                | BookmarkError::TooDeep(_)
        )
    }
}

impl From<io::Error> for BookmarkError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => BookmarkError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => BookmarkError::PermissionDenied,
            io::ErrorKind::InvalidData => BookmarkError::Encoding(format!("{x}")),
            _ => BookmarkError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<FromUtf8Error> for BookmarkError {
    fn from(src: FromUtf8Error) -> BookmarkError {
        BookmarkError::Encoding(format!(
            "content is not UTF-8 text (invalid byte at offset {})",
            src.utf8_error().valid_up_to()
        ))
    }
}

impl From<TomlDeError> for BookmarkError {
    fn from(src: TomlDeError) -> BookmarkError {
        BookmarkError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<TomlSerError> for BookmarkError {
    fn from(src: TomlSerError) -> BookmarkError {
        BookmarkError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for BookmarkError {
    fn from(src: JsonError) -> BookmarkError {
        BookmarkError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<fmt::Error> for BookmarkError {
    fn from(x: fmt::Error) -> Self {
        BookmarkError::Codec(format!("{x}"))
    }
}
