//! Tests for path ids, lookups, counts and search

use super::helpers::*;
use crate::{node::NodeId, query::FolderCounts};
use test_log::test;

#[test]
fn test_search_returns_bookmarks_in_pre_order() {
    let (tree, ids) = create_sample_tree();

    assert_eq!(tree.search(ids.root, "git"), vec![ids.github, ids.gitea]);
    assert_eq!(tree.search(ids.root, "hub"), vec![ids.github]);
    // Case-insensitive, over urls as well as names.
    assert_eq!(tree.search(ids.root, "YCOMBINATOR"), vec![ids.hacker_news]);
    // Scoped to the folder.
    assert_eq!(tree.search(ids.tools, "git"), vec![ids.gitea]);
}

#[test]
fn test_search_never_matches_folders_or_blank_queries() {
    let (tree, ids) = create_sample_tree();

    assert!(tree.search(ids.root, "Tools").is_empty());
    assert!(tree.search(ids.root, "").is_empty());
    assert!(tree.search(ids.root, "   ").is_empty());
    assert!(tree.search(ids.root, "no such bookmark").is_empty());
}

#[test]
fn test_resolve_path_and_find_folder_agree() {
    let (tree, ids) = create_sample_tree();

    assert_eq!(tree.resolve_path(ids.root), "/Bookmarks");
    assert_eq!(tree.resolve_path(ids.tools), "/Bookmarks/Dev/Tools");
    assert_eq!(tree.resolve_path(ids.gitea), "/Bookmarks/Dev/Tools/Gitea");

    for folder in [ids.root, ids.dev, ids.tools, ids.news, ids.empty] {
        assert_eq!(tree.find_folder(&tree.resolve_path(folder)), Some(folder));
    }
    assert_eq!(tree.find_folder("/Bookmarks/Dev/Nope"), None);
    // Bookmarks are not folders.
    assert_eq!(tree.find_folder("/Bookmarks/Docs.rs"), None);
    assert_eq!(tree.find_folder("/Bookmarks/Dev/GitHub"), None);
}

#[test]
fn test_find_by_path_reaches_bookmarks() {
    let (tree, ids) = create_sample_tree();

    assert_eq!(tree.find_by_path("/Bookmarks"), Some(ids.root));
    assert_eq!(tree.find_by_path("/Bookmarks/Dev/GitHub"), Some(ids.github));
    assert_eq!(tree.find_by_path("Bookmarks/Dev/Tools/Gitea"), Some(ids.gitea));
    assert_eq!(tree.find_by_path("/Elsewhere/Dev"), None);
    assert_eq!(tree.find_by_path("/Bookmarks/Dev/GitHub/Deeper"), None);
    assert_eq!(tree.find_by_path(""), None);
}

#[test]
fn test_breadcrumb_runs_from_the_root() {
    let (tree, ids) = create_sample_tree();

    assert_eq!(tree.breadcrumb(ids.gitea), vec![ids.root, ids.dev, ids.tools, ids.gitea]);
    assert_eq!(tree.breadcrumb(ids.root), vec![ids.root]);
    assert!(tree.breadcrumb(NodeId(999)).is_empty());
}

#[test]
fn test_find_parent_matches_parent_links() {
    let (tree, ids) = create_sample_tree();

    for id in tree.descendants(ids.root) {
        assert_eq!(tree.find_parent(id), tree.parent(id), "parent of {id}");
    }
    assert_eq!(tree.find_parent(ids.gitea), Some(ids.tools));
    assert_eq!(tree.find_parent(ids.root), None);
    assert_eq!(tree.find_parent(NodeId(999)), None);
}

#[test]
fn test_is_descendant() {
    let (tree, ids) = create_sample_tree();

    assert!(tree.is_descendant(ids.dev, ids.dev));
    assert!(tree.is_descendant(ids.dev, ids.tools));
    assert!(tree.is_descendant(ids.dev, ids.gitea));
    assert!(tree.is_descendant(ids.root, ids.docs));
    assert!(!tree.is_descendant(ids.tools, ids.dev));
    assert!(!tree.is_descendant(ids.news, ids.gitea));
    assert!(!tree.is_descendant(NodeId(999), ids.dev));
}

#[test]
fn test_counts() {
    let (tree, ids) = create_sample_tree();

    assert_eq!(
        tree.count_descendant_bookmarks(ids.dev),
        FolderCounts {
            bookmarks: 3,
            folders: 1
        }
    );
    assert_eq!(
        tree.count_descendant_bookmarks(ids.root),
        FolderCounts {
            bookmarks: 5,
            folders: 3
        }
    );
    assert_eq!(tree.count_descendant_bookmarks(ids.empty), FolderCounts::default());
    assert_eq!(tree.count_items(ids.root), 9);
    assert_eq!(tree.count_items(ids.dev), 4);
    assert_eq!(tree.len(), 10);
}

#[test]
fn test_bookmarks_in_lists_direct_bookmarks_only() {
    let (tree, ids) = create_sample_tree();

    assert_eq!(tree.bookmarks_in(ids.dev), vec![ids.github, ids.rust]);
    assert_eq!(tree.bookmarks_in(ids.root), vec![ids.docs]);
    assert!(tree.bookmarks_in(ids.empty).is_empty());
}
