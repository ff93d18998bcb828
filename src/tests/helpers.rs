//! Shared test utilities for tree and editor testing

use crate::{
    node::{Node, NodeId},
    tree::BookmarkTree,
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Ids of the nodes in [`create_sample_tree`].
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub root: NodeId,
    pub dev: NodeId,
    pub github: NodeId,
    pub tools: NodeId,
    pub gitea: NodeId,
    pub rust: NodeId,
    pub news: NodeId,
    pub hacker_news: NodeId,
    pub empty: NodeId,
    pub docs: NodeId,
}

/// Build the tree used across the unit tests:
///
/// ```text
/// Bookmarks
/// ├── Dev
/// │   ├── GitHub        https://github.com
/// │   ├── Tools
/// │   │   └── Gitea     https://gitea.io
/// │   └── Rust          https://www.rust-lang.org
/// ├── News
/// │   └── Hacker News   https://news.ycombinator.com
/// ├── Empty
/// └── Docs.rs           https://docs.rs
/// ```
pub fn create_sample_tree() -> (BookmarkTree, Sample) {
    init_logging();

    let mut tree = BookmarkTree::default();
    let root = tree.root();
    let dev = tree.append(root, Node::folder("Dev")).unwrap();
    let github = tree
        .append(dev, Node::bookmark("GitHub", "https://github.com", ""))
        .unwrap();
    let tools = tree.append(dev, Node::folder("Tools")).unwrap();
    let gitea = tree
        .append(tools, Node::bookmark("Gitea", "https://gitea.io", ""))
        .unwrap();
    let rust = tree
        .append(
            dev,
            Node::bookmark("Rust", "https://www.rust-lang.org", "data:image/png;base64,AAAA"),
        )
        .unwrap();
    let news = tree.append(root, Node::folder("News")).unwrap();
    let hacker_news = tree
        .append(
            news,
            Node::bookmark("Hacker News", "https://news.ycombinator.com", ""),
        )
        .unwrap();
    let empty = tree.append(root, Node::folder("Empty")).unwrap();
    let docs = tree
        .append(root, Node::bookmark("Docs.rs", "https://docs.rs", ""))
        .unwrap();

    (
        tree,
        Sample {
            root,
            dev,
            github,
            tools,
            gitea,
            rust,
            news,
            hacker_news,
            empty,
            docs,
        },
    )
}

/// Names of `folder`'s children in stored order.
pub fn child_names(tree: &BookmarkTree, folder: NodeId) -> Vec<String> {
    tree.children(folder)
        .iter()
        .map(|child| tree.node(*child).unwrap().name().to_string())
        .collect()
}
