//! # bookmark-core
//!
//! Reading, editing and writing browser bookmark exports.
//!
//! ## Overview
//!
//! Every major browser exports bookmarks as a "Netscape Bookmark File": loosely structured HTML in
//! which folders are `<H3>` headers followed by nested `<DL>` lists and bookmarks are `<A>`
//! anchors. bookmark-core reads such files into a [`tree::BookmarkTree`], validates edits made
//! through an [`editor::BookmarkEditor`], and writes the tree back out in the canonical dialect.
//!
//! ### Key Features
//!
//! - **Tolerant import**: folder lists inside, after, or wrapped next to their header are all
//!   recognized; markup without any list degrades to a flat list of links
//! - **Stable identifiers**: nodes live in an arena and are addressed by [`node::NodeId`], so
//!   renames never break references
//! - **Validated edits**: empty names, cyclic moves and root removal are rejected with a typed
//!   [`BookmarkError`] and leave the tree untouched
//! - **Single-step undo** for moves
//! - **Round trip**: exporting and re-importing preserves names, urls, icons and order
//!
//! ## Architecture
//!
//! - **[`node`]**: folders, bookmarks and their ids
//! - **[`tree`]**: the arena, plus the owned [`tree::Outline`] shape used for comparison and JSON
//! - **[`codec`]**: the [`codec::BookmarkCodec`] trait, the Netscape and JSON codecs, and the
//!   extension registry [`codec::CODECS`]
//! - **[`query`]**: path ids, lookups, counts and search
//! - **[`editor`]**: insert, rename, set url, delete, move and undo
//! - **[`commands`]**: the same edits as serializable [`commands::Op`] values
//! - **[`view`]**: collapsed folders, favorites and compact mode for a folder outline
//! - **[`session`]**: async load and save of a file with its settings
//!
//! ## Quick Start
//!
//! ```rust
//! use bookmark_core::{codec::netscape, config::EditorConfig, editor::BookmarkEditor};
//!
//! # fn main() -> Result<(), bookmark_core::BookmarkError> {
//! let config = EditorConfig::default();
//! let html = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
//! <DL><p>
//!     <DT><H3>Dev</H3>
//!     <DL><p>
//!         <DT><A HREF="https://github.com">GitHub</A>
//!     </DL><p>
//!     <DT><H3>Archive</H3>
//!     <DL><p>
//!     </DL><p>
//! </DL><p>"#;
//!
//! let mut editor = BookmarkEditor::new(netscape::parse_bookmarks(html, &config).tree);
//! let dev = editor.tree().find_folder("/Bookmarks/Dev").expect("parsed folder");
//! let archive = editor.tree().find_folder("/Bookmarks/Archive").expect("parsed folder");
//!
//! // A folder cannot be moved below itself.
//! assert!(editor.move_item(dev, dev).is_err());
//!
//! editor.move_item(archive, dev)?;
//! assert_eq!(editor.tree().resolve_path(archive), "/Bookmarks/Dev/Archive");
//! assert!(editor.undo());
//!
//! let exported = netscape::write_bookmarks(editor.tree(), &config)?;
//! assert!(exported.contains(r#"<DT><A HREF="https://github.com">GitHub</A>"#));
//! # Ok(())
//! # }
//! ```
//!
//! ### Loading and Saving Files
//!
//! ```rust,no_run
//! use bookmark_core::{config::EditorConfig, session::BookmarkSession};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = BookmarkSession::load("bookmarks.html", EditorConfig::default()).await?;
//!     let root = session.tree().root();
//!     for hit in session.tree().search(root, "rust") {
//!         println!("{}", session.tree().resolve_path(hit));
//!     }
//!     let folder = session.editor_mut().insert(root, bookmark_core::node::Node::folder("Inbox"))?;
//!     println!("created {folder}");
//!     session.save(Some("bookmarks.json".as_ref())).await?;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod node;
pub mod query;
pub mod session;
#[cfg(test)]
mod tests;
pub mod tree;
pub mod view;

pub use error::*;
