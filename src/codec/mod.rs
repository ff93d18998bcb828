//! Import and export of bookmark trees.
//!
//! ## Key Components
//!
//! - [`BookmarkCodec`] trait - converts between file content and a [`BookmarkTree`]
//! - [`netscape::NetscapeCodec`] - the Netscape Bookmark File dialect every browser exports
//! - [`json::JsonCodec`] - the nested [`Outline`](crate::tree::Outline) shape as JSON
//! - [`markup`] - the permissive HTML tokenizer and tree builder under the Netscape reader
//! - [`CodecMap`] - global registry of codecs by file extension (accessible via [`CODECS`])
//!
//! Register custom codecs via [`CodecMap::insert`]:
//!
//! ```rust
//! use bookmark_core::{
//!     codec::{BookmarkCodec, ParseOutcome, CODECS},
//!     config::EditorConfig,
//!     tree::BookmarkTree,
//!     BookmarkError,
//! };
//!
//! #[derive(Default)]
//! struct PlainList;
//!
//! impl BookmarkCodec for PlainList {
//!     fn parse(&self, content: &str, config: &EditorConfig) -> Result<ParseOutcome, BookmarkError> {
//!         Ok(ParseOutcome::new(BookmarkTree::new(config.root_name.clone())))
//!     }
//!
//!     fn generate_source(
//!         &self,
//!         tree: &BookmarkTree,
//!         config: &EditorConfig,
//!     ) -> Result<String, BookmarkError> {
//!         Ok(String::new())
//!     }
//! }
//! CODECS.insert("txt", PlainList);
//! assert!(CODECS.get("txt").is_some());
//! ```

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::{path::Path, result::Result, sync::Arc};

use crate::{config::EditorConfig, error::BookmarkError, tree::BookmarkTree};

pub mod json;
pub mod markup;
pub mod netscape;

pub use json::JsonCodec;
pub use netscape::NetscapeCodec;

/// Global codec registry with the builtin codecs (html, htm, json).
pub static CODECS: Lazy<CodecMap> = Lazy::new(CodecMap::create);

/// Extension used when a path has none or an unregistered one.
pub const DEFAULT_EXTENSION: &str = "html";

/// Result of reading a bookmark file.
///
/// A tree with no children is a valid, signaled empty result: the content was readable but
/// held nothing recognizable. Callers decide whether to warn about it.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub tree: BookmarkTree,
    /// True when no list structure was found and links were collected from the whole document.
    pub used_fallback: bool,
}

impl ParseOutcome {
    pub fn new(tree: BookmarkTree) -> Self {
        ParseOutcome {
            tree,
            used_fallback: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

pub trait BookmarkCodec: Send + Sync {
    fn parse(&self, content: &str, config: &EditorConfig) -> Result<ParseOutcome, BookmarkError>;

    fn generate_source(
        &self,
        tree: &BookmarkTree,
        config: &EditorConfig,
    ) -> Result<String, BookmarkError>;
}

#[derive(Clone)]
pub struct CodecMap(Arc<RwLock<Vec<(String, Arc<dyn BookmarkCodec>)>>>);

impl CodecMap {
    pub fn create() -> Self {
        let netscape: Arc<dyn BookmarkCodec> = Arc::new(NetscapeCodec);
        CodecMap(Arc::new(RwLock::new(vec![
            ("html".to_string(), netscape.clone()),
            ("htm".to_string(), netscape),
            ("json".to_string(), Arc::new(JsonCodec)),
        ])))
    }

    /// Register `codec` for `extension`, replacing any previous entry.
    pub fn insert<T: BookmarkCodec + 'static>(&self, extension: &str, codec: T) {
        let extension = extension.to_ascii_lowercase();
        let mut writer = self.0.write();
        if let Some(entry) = writer.iter_mut().find(|(ext, _)| *ext == extension) {
            tracing::debug!("[CodecMap::insert] replacing codec for .{extension}");
            entry.1 = Arc::new(codec);
        } else {
            writer.push((extension, Arc::new(codec)));
        }
    }

    pub fn get(&self, ext: &str) -> Option<Arc<dyn BookmarkCodec>> {
        let reader = self.0.read();
        reader
            .iter()
            .find(|(codec_ext, _)| codec_ext.eq_ignore_ascii_case(ext))
            .map(|(_, codec)| codec.clone())
    }

    /// Codec for the extension of `path`, falling back to [`DEFAULT_EXTENSION`].
    pub fn for_path<P: AsRef<Path>>(&self, path: P) -> Arc<dyn BookmarkCodec> {
        let ext = path
            .as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_string());
        match ext.as_deref().and_then(|ext| self.get(ext)) {
            Some(codec) => codec,
            None => {
                tracing::debug!(
                    "no codec registered for {:?}, using .{DEFAULT_EXTENSION}",
                    path.as_ref()
                );
                self.get(DEFAULT_EXTENSION)
                    .unwrap_or_else(|| Arc::new(NetscapeCodec))
            }
        }
    }

    pub fn extensions(&self) -> Vec<String> {
        let reader = self.0.read();
        reader.iter().map(|(codec_ext, _)| codec_ext.clone()).collect()
    }
}
