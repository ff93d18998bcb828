use test_log::test;

use bookmark_core::{
    codec::{
        netscape::{parse_bookmarks, write_bookmarks},
        BookmarkCodec, NetscapeCodec, CODECS,
    },
    config::EditorConfig,
    editor::BookmarkEditor,
    error::BookmarkError,
    node::Node,
    session::BookmarkSession,
    tree::{BookmarkTree, Outline, MAX_DEPTH},
};

mod common;
use common::{copy_fixture, fixture};

fn parse(content: &str) -> Outline {
    parse_bookmarks(content, &EditorConfig::default()).tree.outline()
}

fn bookmark_with_icon(name: &str, url: &str, icon: &str) -> Outline {
    Outline::Bookmark {
        name: name.to_string(),
        url: url.to_string(),
        icon: icon.to_string(),
    }
}

/// A tree exercising escaping, icons, empty folders and non-ASCII names.
fn awkward_tree() -> BookmarkTree {
    BookmarkTree::from_outline(&Outline::folder(
        "Bookmarks",
        vec![
            Outline::folder(
                "Dev & <Tools>",
                vec![
                    bookmark_with_icon(
                        "GitHub \"home\"",
                        "https://github.com/search?q=a&type=code",
                        "data:image/png;base64,iVBORw0KGgo=",
                    ),
                    Outline::folder("Empty", vec![]),
                    Outline::folder(
                        "Ünïcödé 書籤",
                        vec![Outline::bookmark("Wiki", "https://de.wikipedia.org/wiki/Lesezeichen")],
                    ),
                ],
            ),
            Outline::bookmark("Rust", "https://www.rust-lang.org"),
            Outline::folder("Trailing", vec![]),
        ],
    ))
    .unwrap()
}

#[test]
fn test_serialize_then_parse_reproduces_the_tree() {
    common::init_logging();
    let config = EditorConfig::default();
    let tree = awkward_tree();

    let text = write_bookmarks(&tree, &config).unwrap();
    let outcome = parse_bookmarks(&text, &config);
    assert!(!outcome.used_fallback);
    assert_eq!(outcome.tree.outline(), tree.outline());

    // Stable under a second pass.
    assert_eq!(write_bookmarks(&outcome.tree, &config).unwrap(), text);
}

#[test]
fn test_serialized_layout() {
    let tree = BookmarkTree::from_outline(&Outline::folder(
        "Bookmarks",
        vec![
            Outline::folder("Dev", vec![Outline::bookmark("GitHub", "https://github.com")]),
            bookmark_with_icon("Docs", "https://docs.rs", "data:x"),
        ],
    ))
    .unwrap();

    let expected = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file.
     It will be read and overwritten.
     DO NOT EDIT! -->
<META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=UTF-8">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
    <DT><H3>Dev</H3>
    <DL><p>
        <DT><A HREF="https://github.com">GitHub</A>
    </DL><p>
    <DT><A HREF="https://docs.rs" ICON="data:x">Docs</A>
</DL><p>
"#;
    assert_eq!(write_bookmarks(&tree, &EditorConfig::default()).unwrap(), expected);
}

#[test]
fn test_document_title_comes_from_config() {
    let config = EditorConfig {
        document_title: "Work & Play".to_string(),
        ..Default::default()
    };
    let text = write_bookmarks(&BookmarkTree::default(), &config).unwrap();
    assert!(text.contains("<TITLE>Work &amp; Play</TITLE>\n<H1>Work &amp; Play</H1>\n"));
    assert!(text.ends_with("<DL><p>\n</DL><p>\n"));
}

#[test]
fn test_chrome_export() {
    common::init_logging();
    let outline = parse(&fixture("chrome.html"));
    let expected = Outline::folder(
        "Bookmarks",
        vec![
            Outline::folder(
                "Bookmarks bar",
                vec![
                    bookmark_with_icon(
                        "GitHub",
                        "https://github.com/",
                        "data:image/png;base64,iVBORw0KGgo=",
                    ),
                    Outline::folder(
                        "Rust & Friends",
                        vec![
                            Outline::bookmark("Rust", "https://www.rust-lang.org/"),
                            Outline::bookmark("docs.rs <search>", "https://docs.rs/?q=a&b=c"),
                        ],
                    ),
                    Outline::folder("Empty", vec![]),
                ],
            ),
            Outline::bookmark("Gitea", "https://gitea.io/"),
            Outline::folder(
                "Other bookmarks",
                vec![Outline::bookmark(
                    "https://news.ycombinator.com/",
                    "https://news.ycombinator.com/",
                )],
            ),
        ],
    );
    assert_eq!(outline, expected);
}

#[test]
fn test_firefox_export_with_descriptions() {
    let outline = parse(&fixture("firefox.html"));
    let expected = Outline::folder(
        "Bookmarks",
        vec![
            Outline::folder(
                "Bookmarks Toolbar",
                vec![
                    bookmark_with_icon(
                        "Mozilla",
                        "https://www.mozilla.org/",
                        "data:image/png;base64,AAAA",
                    ),
                    // Inside a list, script links are kept as they are.
                    Outline::bookmark("Bookmarklet", "javascript:void(0)"),
                ],
            ),
            Outline::bookmark("MDN Web Docs", "https://developer.mozilla.org/"),
            Outline::folder(
                "Mozilla Firefox",
                vec![Outline::bookmark("Get Help", "https://support.mozilla.org/")],
            ),
        ],
    );
    assert_eq!(outline, expected);
}

#[test]
fn test_explicitly_closed_entries_and_placeholders() {
    let config = EditorConfig::default();
    let outline = parse(&fixture("closed_entries.html"));
    let expected = Outline::folder(
        "Bookmarks",
        vec![
            Outline::folder("Sibling", vec![Outline::bookmark("A", "https://a.example")]),
            Outline::folder("Unnamed below", vec![]),
            Outline::folder(
                config.unnamed_folder.clone(),
                vec![Outline::bookmark(config.unnamed_bookmark.clone(), "#")],
            ),
        ],
    );
    assert_eq!(outline, expected);
}

#[test]
fn test_header_without_following_list_is_an_empty_folder() {
    let outline = parse(
        r#"<DL><p>
        <DT><H3>Lonely</H3>
        <DT><A HREF="https://a.example">After</A>
        </DL>"#,
    );
    assert_eq!(
        outline,
        Outline::folder(
            "Bookmarks",
            vec![
                Outline::folder("Lonely", vec![]),
                Outline::bookmark("After", "https://a.example"),
            ],
        )
    );
}

#[test]
fn test_list_directly_inside_list_merges_into_the_folder() {
    let outline = parse(
        r#"<DL>
        <DT><A HREF="https://one.example">One</A></DT>
        <DL><DT><A HREF="https://two.example">Two</A></DL>
        <DT><A HREF="https://three.example">Three</A>
        </DL>"#,
    );
    let names: Vec<String> = match outline {
        Outline::Folder { children, .. } => {
            children.iter().map(|child| child.name().to_string()).collect()
        }
        other => panic!("expected a folder, got {other:?}"),
    };
    assert_eq!(names, vec!["One", "Two", "Three"]);
}

#[test]
fn test_fallback_without_lists() {
    let outcome = parse_bookmarks(
        r#"<A HREF="https://x.com">X</A>"#,
        &EditorConfig::default(),
    );
    assert!(outcome.used_fallback);
    assert_eq!(
        outcome.tree.outline(),
        Outline::folder("Bookmarks", vec![Outline::bookmark("X", "https://x.com")])
    );

    let outcome = parse_bookmarks(&fixture("loose_links.html"), &EditorConfig::default());
    assert!(outcome.used_fallback);
    assert_eq!(
        outcome.tree.outline(),
        Outline::folder(
            "Bookmarks",
            vec![
                Outline::bookmark("X", "https://x.com"),
                Outline::bookmark("https://y.com", "https://y.com"),
            ]
        )
    );
}

#[test]
fn test_empty_and_garbage_input_yield_an_empty_root() {
    for input in ["", "   \n", "just some text", "<<<>>>", "<DL>", "</DL></DT>", "<!-- open"] {
        let outcome = parse_bookmarks(input, &EditorConfig::default());
        assert!(outcome.is_empty(), "input {input:?}");
        assert_eq!(outcome.tree.len(), 1);
    }
}

#[test]
fn test_unclosed_deep_nesting_terminates() {
    let mut input = String::from("<DL><p>");
    for level in 0..2000 {
        input.push_str(&format!("<DT><H3>Level {level}</H3><DL><p>"));
    }
    let outcome = parse_bookmarks(&input, &EditorConfig::default());
    assert!(!outcome.is_empty());
    assert!(outcome.tree.len() < 2000);
    assert!(outcome.tree.height(outcome.tree.root()) <= MAX_DEPTH);
}

#[test]
fn test_tree_at_max_depth_survives_write_and_parse() {
    let config = EditorConfig::default();
    let mut editor = BookmarkEditor::default();
    let mut folder = editor.tree().root();
    for level in 1..MAX_DEPTH {
        folder = editor
            .insert(folder, Node::folder(format!("Level {level}")))
            .unwrap();
    }
    editor
        .insert(folder, Node::bookmark("Bottom", "https://example.com/deep", ""))
        .unwrap();
    let bottom = editor.insert(folder, Node::folder("Bottom folder")).unwrap();
    assert_eq!(
        editor.insert(bottom, Node::folder("One too many")),
        Err(BookmarkError::TooDeep(MAX_DEPTH))
    );
    let tree = editor.into_tree();
    assert_eq!(tree.height(tree.root()), MAX_DEPTH);

    let html = write_bookmarks(&tree, &config).unwrap();
    let parsed = parse_bookmarks(&html, &config).tree;
    assert_eq!(parsed.len(), tree.len());
    assert_eq!(parsed.outline(), tree.outline());
    let hits = parsed.search(parsed.root(), "example.com/deep");
    assert_eq!(hits.len(), 1);
    assert_eq!(parsed.depth(hits[0]), MAX_DEPTH);
}

#[test]
fn test_outline_deeper_than_max_depth_is_refused() {
    let leaf = Outline::bookmark("Leaf", "https://x.com");
    let too_deep = (0..=MAX_DEPTH).fold(leaf, |inner, level| {
        Outline::folder(format!("Level {level}"), vec![inner])
    });
    assert_eq!(too_deep.height(), MAX_DEPTH + 1);
    assert_eq!(
        BookmarkTree::from_outline(&too_deep).unwrap_err(),
        BookmarkError::TooDeep(MAX_DEPTH)
    );
}

#[test]
fn test_root_name_comes_from_config() {
    let config = EditorConfig {
        root_name: "Imported".to_string(),
        ..Default::default()
    };
    let outcome = NetscapeCodec
        .parse(r#"<DL><DT><A HREF="https://x.com">X</A></DL>"#, &config)
        .unwrap();
    let tree = outcome.tree;
    assert_eq!(tree.node(tree.root()).unwrap().name(), "Imported");
    assert!(tree.find_by_path("/Imported/X").is_some());
}

#[test]
fn test_codec_registry_by_extension() {
    assert!(CODECS.get("HTML").is_some());
    assert!(CODECS.get("htm").is_some());
    assert!(CODECS.get("json").is_some());
    assert!(CODECS.get("xbel").is_none());
    for ext in ["html", "htm", "json"] {
        assert!(CODECS.extensions().contains(&ext.to_string()));
    }

    let tree = awkward_tree();
    let config = EditorConfig::default();
    let json = CODECS
        .for_path("export.json")
        .generate_source(&tree, &config)
        .unwrap();
    assert!(json.trim_start().starts_with('{'));
    // Unknown extensions fall back to the Netscape dialect.
    let html = CODECS
        .for_path("export.bak")
        .generate_source(&tree, &config)
        .unwrap();
    assert!(html.starts_with("<!DOCTYPE NETSCAPE-Bookmark-file-1>"));
}

#[test(tokio::test)]
async fn test_session_load_edit_save() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = copy_fixture(&temp_dir, "chrome.html");

    let mut session = BookmarkSession::load(&path, EditorConfig::default())
        .await
        .unwrap();
    assert_eq!(session.filename(), path.as_path());
    assert!(!session.used_fallback());
    let root = session.tree().root();
    assert!(session.view().is_collapsed(root));
    assert!(session.view_mut().toggle_compact());
    assert!(session.view().compact);

    let bar = session.tree().find_folder("/Bookmarks/Bookmarks bar").unwrap();
    let other = session.tree().find_folder("/Bookmarks/Other bookmarks").unwrap();
    let editor: &mut BookmarkEditor = session.editor_mut();
    let inbox = editor.insert(other, Node::folder("Inbox")).unwrap();
    editor.move_item(bar, inbox).unwrap();
    let expected = session.tree().outline();

    let written = session.save(None).await.unwrap();
    assert_eq!(written, path);

    let reloaded = BookmarkSession::load(&path, EditorConfig::default())
        .await
        .unwrap();
    assert_eq!(reloaded.tree().outline(), expected);
    assert!(reloaded
        .tree()
        .find_folder("/Bookmarks/Other bookmarks/Inbox/Bookmarks bar/Rust & Friends")
        .is_some());
}

#[test(tokio::test)]
async fn test_session_json_round_trip() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = copy_fixture(&temp_dir, "firefox.html");
    let session = BookmarkSession::load(&source, EditorConfig::default())
        .await
        .unwrap();

    let json_path = temp_dir.path().join("bookmarks.json");
    session.save(Some(json_path.as_path())).await.unwrap();
    let from_json = BookmarkSession::load(&json_path, EditorConfig::default())
        .await
        .unwrap();
    assert_eq!(from_json.tree().outline(), session.tree().outline());
    assert_eq!(
        session.export("json").unwrap(),
        std::fs::read_to_string(&json_path).unwrap()
    );
    assert!(matches!(
        session.export("xbel"),
        Err(BookmarkError::Codec(_))
    ));
}

#[test(tokio::test)]
async fn test_session_load_errors() {
    let temp_dir = tempfile::tempdir().unwrap();

    let missing = temp_dir.path().join("missing.html");
    assert!(matches!(
        BookmarkSession::load(&missing, EditorConfig::default()).await,
        Err(BookmarkError::NotFound(_))
    ));

    // Latin-1 encoded "Café" is not valid UTF-8.
    let latin1 = temp_dir.path().join("latin1.html");
    std::fs::write(
        &latin1,
        b"<DL><DT><A HREF=\"https://cafe.example\">Caf\xe9</A></DL>",
    )
    .unwrap();
    assert!(matches!(
        BookmarkSession::load(&latin1, EditorConfig::default()).await,
        Err(BookmarkError::Encoding(_))
    ));
}

#[test(tokio::test)]
async fn test_new_session_saves_to_default_filename() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = EditorConfig {
        default_filename: temp_dir
            .path()
            .join("fresh.html")
            .to_string_lossy()
            .to_string(),
        ..Default::default()
    };
    let mut session = BookmarkSession::new(config);
    let root = session.tree().root();
    session
        .editor_mut()
        .insert(root, Node::bookmark("Rust", "https://www.rust-lang.org", ""))
        .unwrap();

    let written = session.save(None).await.unwrap();
    assert_eq!(written, temp_dir.path().join("fresh.html"));
    let text = std::fs::read_to_string(&written).unwrap();
    assert!(text.contains(r#"<DT><A HREF="https://www.rust-lang.org">Rust</A>"#));
}
