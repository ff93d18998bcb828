use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    error::BookmarkError,
    node::{UNNAMED_BOOKMARK, UNNAMED_FOLDER},
};

/// Editor settings, read from a TOML file.
///
/// Every field is optional in the file; missing ones take the dialect defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Name given to the root folder of a freshly parsed tree.
    pub root_name: String,
    /// Written into the `<TITLE>` and `<H1>` of exported files.
    pub document_title: String,
    pub unnamed_folder: String,
    pub unnamed_bookmark: String,
    /// Save target when a session was not loaded from a file.
    pub default_filename: String,
    /// Hide bookmarks from the folder outline, showing folders only.
    pub compact_mode: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            root_name: "Bookmarks".to_string(),
            document_title: "Bookmarks".to_string(),
            unnamed_folder: UNNAMED_FOLDER.to_string(),
            unnamed_bookmark: UNNAMED_BOOKMARK.to_string(),
            default_filename: "bookmarks.html".to_string(),
            compact_mode: false,
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn get_config(&self) -> Result<EditorConfig, BookmarkError>;
    fn set_config(&self, config: &EditorConfig) -> Result<(), BookmarkError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TomlConfigProvider {
    path: PathBuf,
}

impl TomlConfigProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigProvider { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn get_config(&self) -> Result<EditorConfig, BookmarkError> {
        tracing::debug!("Attempting to read config from: {:?}", &self.path);
        if !self.path.exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(EditorConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    fn set_config(&self, config: &EditorConfig) -> Result<(), BookmarkError> {
        tracing::debug!("Attempting to write config to: {:?}", &self.path);
        let toml_string = toml::to_string(config)?;
        std::fs::write(&self.path, toml_string)?;
        Ok(())
    }
}

/// Read a whole file as UTF-8 text.
pub async fn get_content<P: AsRef<Path>>(path: P) -> Result<String, BookmarkError> {
    tracing::debug!("Reading {:?}", path.as_ref());
    let bytes = tokio::fs::read(path).await?;
    Ok(String::from_utf8(bytes)?)
}

pub async fn set_content<P: AsRef<Path>>(path: P, text: String) -> Result<(), BookmarkError> {
    tracing::debug!("Writing {} bytes to {:?}", text.len(), path.as_ref());
    Ok(tokio::fs::write(path, text).await?)
}
