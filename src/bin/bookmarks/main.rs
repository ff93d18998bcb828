//! bookmarks CLI tool
//!
//! Command-line interface for inspecting and editing Netscape bookmark exports with
//! bookmark-core.
//!
//! ## Commands
//!
//! - `stats <file>`: item counts and whether the fallback link scan was needed
//! - `tree <file>`: folder outline, folders before bookmarks
//! - `search <file> <query>`: bookmarks whose name or url contains the query
//! - `export <file> <output>`: re-encode, choosing the format from the output extension
//! - `mkdir`, `add`, `rename`, `set-url`, `rm`, `mv`: edits, saved in place unless `--output`
//!   names another file
//!
//! Nodes are addressed by path: `/Bookmarks/Dev` names a folder, `/Bookmarks/Dev/GitHub` the
//! first child of `Dev` called `GitHub`.

use bookmark_core::{
    config::{ConfigProvider, EditorConfig, TomlConfigProvider},
    node::{Node, NodeId, NodeKind},
    session::BookmarkSession,
    tree::BookmarkTree,
    view::ViewState,
    BookmarkError,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bookmarks")]
#[command(author, version, about = "Inspect and edit browser bookmark exports", long_about = None)]
struct Cli {
    /// Editor settings (TOML); defaults apply when missing
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show item counts for a bookmark file
    Stats {
        file: PathBuf,
    },

    /// Print the folder outline
    Tree {
        file: PathBuf,

        /// Folders only
        #[arg(long)]
        compact: bool,
    },

    /// Search bookmark names and urls (case-insensitive)
    Search {
        file: PathBuf,
        query: String,

        /// Restrict the search to this folder
        #[arg(long)]
        folder: Option<String>,
    },

    /// Write the bookmarks to another file; `.json` selects JSON, anything else HTML
    Export {
        file: PathBuf,
        output: PathBuf,
    },

    /// Create a folder
    Mkdir {
        file: PathBuf,
        parent: String,
        name: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Add a bookmark
    Add {
        file: PathBuf,
        folder: String,
        name: String,
        url: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rename a folder or bookmark
    Rename {
        file: PathBuf,
        path: String,
        name: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Change a bookmark's url
    SetUrl {
        file: PathBuf,
        path: String,
        url: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a folder (with its contents) or a bookmark
    Rm {
        file: PathBuf,
        path: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Move a folder or bookmark to the end of another folder
    Mv {
        file: PathBuf,
        path: String,
        target: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => TomlConfigProvider::new(path.clone()).get_config()?,
        None => EditorConfig::default(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(cli.command, config))?;
    Ok(())
}

async fn run(command: Commands, config: EditorConfig) -> Result<(), BookmarkError> {
    match command {
        Commands::Stats { file } => {
            let session = BookmarkSession::load(&file, config).await?;
            let tree = session.tree();
            let counts = tree.count_descendant_bookmarks(tree.root());
            let folders = tree
                .descendants(tree.root())
                .into_iter()
                .filter(|id| tree.is_folder(*id))
                .count();
            println!("File: {}", file.display());
            println!("Bookmarks: {}", counts.bookmarks);
            println!("Folders: {folders}");
            println!("Top-level folders: {}", counts.folders);
            if session.used_fallback() {
                println!("Note: no folder lists found, links were collected from the whole page");
            }
        }

        Commands::Tree { file, compact } => {
            let session = BookmarkSession::load(&file, config.clone()).await?;
            let view = ViewState::new(compact || config.compact_mode);
            print_outline(session.tree(), &view);
        }

        Commands::Search {
            file,
            query,
            folder,
        } => {
            let session = BookmarkSession::load(&file, config).await?;
            let tree = session.tree();
            let scope = match folder {
                Some(path) => resolve(tree, &path)?,
                None => tree.root(),
            };
            let hits = tree.search(scope, &query);
            for hit in hits.iter() {
                if let Some(bookmark) = tree.get(*hit).and_then(Node::as_bookmark) {
                    println!("{}\t{}", tree.resolve_path(*hit), bookmark.url);
                }
            }
            println!("{} match(es)", hits.len());
        }

        Commands::Export { file, output } => {
            let session = BookmarkSession::load(&file, config).await?;
            let written = session.save(Some(output.as_path())).await?;
            println!("✓ Exported to {}", written.display());
        }

        Commands::Mkdir {
            file,
            parent,
            name,
            output,
        } => {
            edit(&file, output.as_deref(), config, |session| {
                let parent = resolve(session.tree(), &parent)?;
                let id = session.editor_mut().insert(parent, Node::folder(name))?;
                Ok(format!("Created {}", session.tree().resolve_path(id)))
            })
            .await?;
        }

        Commands::Add {
            file,
            folder,
            name,
            url,
            output,
        } => {
            edit(&file, output.as_deref(), config, |session| {
                let folder = resolve(session.tree(), &folder)?;
                let id = session
                    .editor_mut()
                    .insert(folder, Node::bookmark(name, url, ""))?;
                Ok(format!("Added {}", session.tree().resolve_path(id)))
            })
            .await?;
        }

        Commands::Rename {
            file,
            path,
            name,
            output,
        } => {
            edit(&file, output.as_deref(), config, |session| {
                let id = resolve(session.tree(), &path)?;
                session.editor_mut().rename(id, &name)?;
                Ok(format!("Renamed to {}", session.tree().resolve_path(id)))
            })
            .await?;
        }

        Commands::SetUrl {
            file,
            path,
            url,
            output,
        } => {
            edit(&file, output.as_deref(), config, |session| {
                let id = resolve(session.tree(), &path)?;
                session.editor_mut().set_url(id, &url)?;
                Ok(format!("Updated {path}"))
            })
            .await?;
        }

        Commands::Rm { file, path, output } => {
            edit(&file, output.as_deref(), config, |session| {
                let id = resolve(session.tree(), &path)?;
                let removed = session.editor_mut().delete(id)?;
                Ok(format!("Deleted {path} ({removed} item(s))"))
            })
            .await?;
        }

        Commands::Mv {
            file,
            path,
            target,
            output,
        } => {
            edit(&file, output.as_deref(), config, |session| {
                let id = resolve(session.tree(), &path)?;
                let target = resolve(session.tree(), &target)?;
                session.editor_mut().move_item(id, target)?;
                Ok(format!("Moved to {}", session.tree().resolve_path(id)))
            })
            .await?;
        }
    }
    Ok(())
}

/// Load `file`, apply one edit and save, to `output` when given.
async fn edit<F>(
    file: &Path,
    output: Option<&Path>,
    config: EditorConfig,
    change: F,
) -> Result<(), BookmarkError>
where
    F: FnOnce(&mut BookmarkSession) -> Result<String, BookmarkError>,
{
    let mut session = BookmarkSession::load(file, config).await?;
    let message = change(&mut session)?;
    let written = session.save(output).await?;
    println!("✓ {message}");
    println!("Saved {}", written.display());
    Ok(())
}

fn resolve(tree: &BookmarkTree, path: &str) -> Result<NodeId, BookmarkError> {
    tree.find_by_path(path)
        .ok_or_else(|| BookmarkError::NotFound(format!("no folder or bookmark at {path}")))
}

fn print_outline(tree: &BookmarkTree, view: &ViewState) {
    for row in view.visible_rows(tree) {
        let Some(node) = tree.get(row.id) else {
            continue;
        };
        let indent = "  ".repeat(row.depth);
        match row.kind {
            NodeKind::Folder => println!("{indent}📁 {} ({})", node.name(), row.bookmarks),
            NodeKind::Bookmark => {
                let url = node.as_bookmark().map(|b| b.url.as_str()).unwrap_or("");
                println!("{indent}🔖 {} <{url}>", node.name());
            }
        }
    }
}
