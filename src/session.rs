//! A loaded bookmark file: the editor, the file it came from and the settings used to read it.

use std::path::{Path, PathBuf};

use crate::{
    codec::CODECS,
    config::{get_content, set_content, EditorConfig},
    editor::BookmarkEditor,
    error::BookmarkError,
    tree::BookmarkTree,
    view::ViewState,
};

#[derive(Debug, Clone)]
pub struct BookmarkSession {
    filename: PathBuf,
    editor: BookmarkEditor,
    config: EditorConfig,
    view: ViewState,
    used_fallback: bool,
}

impl BookmarkSession {
    /// An empty session that saves to the configured default filename.
    pub fn new(config: EditorConfig) -> Self {
        BookmarkSession {
            filename: PathBuf::from(&config.default_filename),
            editor: BookmarkEditor::new(BookmarkTree::new(config.root_name.clone())),
            view: ViewState::new(config.compact_mode),
            config,
            used_fallback: false,
        }
    }

    /// Read and parse `path`, choosing the codec by extension.
    ///
    /// The whole file is read before parsing starts, so a read or decoding failure returns an
    /// error without producing a session. Folders start collapsed.
    pub async fn load<P: AsRef<Path>>(path: P, config: EditorConfig) -> Result<Self, BookmarkError> {
        let path = path.as_ref();
        let content = get_content(path).await?;
        let outcome = CODECS.for_path(path).parse(&content, &config)?;
        if outcome.is_empty() {
            tracing::warn!("{path:?} contains no bookmarks");
        }
        let mut view = ViewState::new(config.compact_mode);
        view.collapse_all(&outcome.tree);
        tracing::info!(
            "Loaded {} items from {path:?}",
            outcome.tree.count_items(outcome.tree.root())
        );
        Ok(BookmarkSession {
            filename: path.to_path_buf(),
            editor: BookmarkEditor::new(outcome.tree),
            config,
            view,
            used_fallback: outcome.used_fallback,
        })
    }

    /// Write the tree to `path`, or back to the session's file when `None`.
    ///
    /// The codec follows the target's extension. Returns the path written.
    pub async fn save(&self, path: Option<&Path>) -> Result<PathBuf, BookmarkError> {
        let target = path.unwrap_or(self.filename.as_path()).to_path_buf();
        let text = CODECS
            .for_path(&target)
            .generate_source(self.editor.tree(), &self.config)?;
        set_content(&target, text).await?;
        tracing::info!("Saved {} items to {target:?}", self.item_count());
        Ok(target)
    }

    /// Serialize with the codec registered for `extension`.
    pub fn export(&self, extension: &str) -> Result<String, BookmarkError> {
        let codec = CODECS
            .get(extension)
            .ok_or_else(|| BookmarkError::Codec(format!("no codec for .{extension}")))?;
        codec.generate_source(self.editor.tree(), &self.config)
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tree(&self) -> &BookmarkTree {
        self.editor.tree()
    }

    pub fn editor(&self) -> &BookmarkEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut BookmarkEditor {
        &mut self.editor
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Whether the file had no list structure and was read as loose links.
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    fn item_count(&self) -> usize {
        let tree = self.editor.tree();
        tree.count_items(tree.root())
    }
}
