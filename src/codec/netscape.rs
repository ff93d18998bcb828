//! Netscape Bookmark File reader and writer.
//!
//! The dialect is a nested definition list:
//!
//! ```text
//! <DL><p>
//!     <DT><H3>Folder</H3>
//!     <DL><p>
//!         <DT><A HREF="https://example.com" ICON="data:...">Example</A>
//!     </DL><p>
//! </DL><p>
//! ```
//!
//! Exporters disagree on where a folder's list goes. It may sit inside the folder's `<DT>`, follow
//! it as a sibling `<DL>`, or be wrapped in a sibling `<DD>`. The reader accepts all three. When
//! a document has no list at all, every non-script link becomes a top-level bookmark.

use std::fmt::Write;

use crate::{
    codec::{
        markup::{escape, Dom, DomIndex},
        BookmarkCodec, ParseOutcome,
    },
    config::EditorConfig,
    error::BookmarkError,
    node::{Node, NodeId},
    tree::{BookmarkTree, MAX_DEPTH},
};

pub const DOCTYPE: &str = "<!DOCTYPE NETSCAPE-Bookmark-file-1>";

const PREAMBLE_COMMENT: &str = "<!-- This is an automatically generated file.
     It will be read and overwritten.
     DO NOT EDIT! -->";

const META: &str = r#"<META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=UTF-8">"#;

const INDENT: &str = "    ";

#[derive(Debug, Default, Clone, Copy)]
pub struct NetscapeCodec;

impl BookmarkCodec for NetscapeCodec {
    fn parse(&self, content: &str, config: &EditorConfig) -> Result<ParseOutcome, BookmarkError> {
        Ok(parse_bookmarks(content, config))
    }

    fn generate_source(
        &self,
        tree: &BookmarkTree,
        config: &EditorConfig,
    ) -> Result<String, BookmarkError> {
        write_bookmarks(tree, config)
    }
}

/// Read bookmark markup into a tree. Never fails: unrecognized input yields an empty root.
#[tracing::instrument(skip_all, fields(len = content.len()))]
pub fn parse_bookmarks(content: &str, config: &EditorConfig) -> ParseOutcome {
    let dom = Dom::parse(content);
    let mut reader = Reader {
        dom: &dom,
        config,
        tree: BookmarkTree::new(config.root_name.clone()),
    };
    let root = reader.tree.root();

    let lists = dom.find_all("dl");
    tracing::debug!("found {} DL elements", lists.len());
    let used_fallback = match lists.first() {
        Some(main_list) => {
            reader.read_list(*main_list, root, 0);
            false
        }
        None => {
            reader.read_loose_links(root);
            true
        }
    };

    let outcome = ParseOutcome {
        tree: reader.tree,
        used_fallback,
    };
    if outcome.is_empty() {
        tracing::warn!("no bookmarks found; the input may be empty or in an unsupported format");
    } else {
        tracing::debug!(
            "parsed {} items{}",
            outcome.tree.count_items(root),
            if used_fallback { " from loose links" } else { "" }
        );
    }
    outcome
}

struct Reader<'a> {
    dom: &'a Dom,
    config: &'a EditorConfig,
    tree: BookmarkTree,
}

impl Reader<'_> {
    fn read_list(&mut self, list: DomIndex, folder: NodeId, depth: usize) {
        let entries = self.dom.element_children(list);
        // A list at `depth` fills nodes one level further down.
        if depth >= MAX_DEPTH {
            if !entries.is_empty() {
                tracing::warn!("skipping list nested deeper than {MAX_DEPTH} levels");
            }
            return;
        }
        let mut idx = 0;
        while idx < entries.len() {
            let entry = entries[idx];
            match self.dom.tag(entry) {
                Some("dt") => {
                    if let Some(header) = self.dom.find_descendant(entry, "h3", &["dl"]) {
                        let nested = match self.dom.find_descendant(entry, "dl", &[]) {
                            Some(inner) => Some(inner),
                            None => match entries.get(idx + 1) {
                                Some(next) if self.dom.tag(*next) == Some("dl") => {
                                    idx += 1;
                                    Some(*next)
                                }
                                Some(next) if self.dom.tag(*next) == Some("dd") => {
                                    idx += 1;
                                    self.dom.find_descendant(*next, "dl", &[])
                                }
                                _ => None,
                            },
                        };
                        let node = self.folder_node(header);
                        let child = self.push(folder, node);
                        if let (Some(child), Some(nested)) = (child, nested) {
                            self.read_list(nested, child, depth + 1);
                        }
                    } else if let Some(anchor) = self.dom.find_descendant(entry, "a", &["dl"]) {
                        let node = self.bookmark_node(anchor);
                        self.push(folder, node);
                    }
                }
                Some("dl") => self.read_list(entry, folder, depth + 1),
                Some("dd") => {
                    if let Some(nested) = self.dom.find_descendant(entry, "dl", &[]) {
                        self.read_list(nested, folder, depth + 1);
                    }
                }
                _ => {}
            }
            idx += 1;
        }
    }

    fn read_loose_links(&mut self, root: NodeId) {
        let anchors = self.dom.find_all("a");
        tracing::warn!(
            "no list structure found, falling back to {} loose links",
            anchors.len()
        );
        for anchor in anchors {
            let href = self.dom.attribute(anchor, "href").unwrap_or("").trim();
            if href.is_empty() || href.to_ascii_lowercase().starts_with("javascript:") {
                continue;
            }
            let node = self.bookmark_node(anchor);
            self.push(root, node);
        }
    }

    fn push(&mut self, folder: NodeId, node: Node) -> Option<NodeId> {
        match self.tree.append(folder, node) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("dropping entry: {e}");
                None
            }
        }
    }

    fn folder_node(&self, header: DomIndex) -> Node {
        let name = self.dom.text_content(header).trim().to_string();
        Node::folder(if name.is_empty() {
            self.config.unnamed_folder.clone()
        } else {
            name
        })
    }

    fn bookmark_node(&self, anchor: DomIndex) -> Node {
        let href = self.dom.attribute(anchor, "href").unwrap_or("").trim();
        let text = self.dom.text_content(anchor).trim().to_string();
        let name = if !text.is_empty() {
            text
        } else if !href.is_empty() {
            href.to_string()
        } else {
            self.config.unnamed_bookmark.clone()
        };
        let url = if href.is_empty() { "#" } else { href };
        let icon = self.dom.attribute(anchor, "icon").unwrap_or("");
        Node::bookmark(name, url, icon)
    }
}

/// Render `tree` as a Netscape Bookmark File.
///
/// Children are written in stored order with four spaces of indentation per level, and the
/// `ICON` attribute is omitted for bookmarks without an icon.
#[tracing::instrument(skip_all)]
pub fn write_bookmarks(tree: &BookmarkTree, config: &EditorConfig) -> Result<String, BookmarkError> {
    let title = escape(&config.document_title);
    let mut out = String::new();
    writeln!(out, "{DOCTYPE}")?;
    writeln!(out, "{PREAMBLE_COMMENT}")?;
    writeln!(out, "{META}")?;
    writeln!(out, "<TITLE>{title}</TITLE>")?;
    writeln!(out, "<H1>{title}</H1>")?;
    writeln!(out, "<DL><p>")?;
    write_folder(tree, tree.root(), 1, &mut out)?;
    writeln!(out, "</DL><p>")?;
    tracing::debug!("wrote {} bytes", out.len());
    Ok(out)
}

fn write_folder(
    tree: &BookmarkTree,
    folder: NodeId,
    level: usize,
    out: &mut String,
) -> Result<(), BookmarkError> {
    let indent = INDENT.repeat(level);
    for child in tree.children(folder) {
        match tree.node(*child)? {
            Node::Folder(sub) => {
                writeln!(out, "{indent}<DT><H3>{}</H3>", escape(&sub.name))?;
                writeln!(out, "{indent}<DL><p>")?;
                write_folder(tree, *child, level + 1, out)?;
                writeln!(out, "{indent}</DL><p>")?;
            }
            Node::Bookmark(bookmark) => {
                let icon = if bookmark.icon.is_empty() {
                    String::new()
                } else {
                    format!(r#" ICON="{}""#, escape(&bookmark.icon))
                };
                writeln!(
                    out,
                    r#"{indent}<DT><A HREF="{}"{icon}>{}</A>"#,
                    escape(&bookmark.url),
                    escape(&bookmark.name)
                )?;
            }
        }
    }
    Ok(())
}
