//! JSON interchange using the nested [`Outline`] shape.
//!
//! ```json
//! { "kind": "folder", "name": "Bookmarks", "children": [
//!     { "kind": "bookmark", "name": "Rust", "url": "https://www.rust-lang.org" }
//! ] }
//! ```

use crate::{
    codec::{BookmarkCodec, ParseOutcome},
    config::EditorConfig,
    error::BookmarkError,
    tree::{BookmarkTree, Outline},
};

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl BookmarkCodec for JsonCodec {
    fn parse(&self, content: &str, config: &EditorConfig) -> Result<ParseOutcome, BookmarkError> {
        if content.trim().is_empty() {
            return Ok(ParseOutcome::new(BookmarkTree::new(config.root_name.clone())));
        }
        let outline: Outline = serde_json::from_str(content)?;
        Ok(ParseOutcome::new(BookmarkTree::from_outline(&outline)?))
    }

    fn generate_source(
        &self,
        tree: &BookmarkTree,
        _config: &EditorConfig,
    ) -> Result<String, BookmarkError> {
        let mut out = serde_json::to_string_pretty(&tree.outline())?;
        out.push('\n');
        Ok(out)
    }
}
