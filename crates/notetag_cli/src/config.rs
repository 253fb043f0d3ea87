//! Command-line and environment configuration.
//!
//! # Responsibility
//! - Parse flags, env overrides and subcommands.
//! - Resolve the effective database path and log level.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "notetag.sqlite3";

/// Tag-based note keeping in the terminal.
#[derive(Debug, Parser)]
#[command(name = "notetag", version)]
pub struct Cli {
    /// SQLite file holding notes and tags.
    #[arg(long, global = true, env = "NOTETAG_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Keep state in memory only; overrides `--db` and `NOTETAG_DB_PATH`.
    #[arg(long, global = true)]
    pub memory: bool,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, global = true, env = "NOTETAG_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. File logging is off when unset.
    #[arg(long, global = true, env = "NOTETAG_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Navigate to a path (`/`, `/new`, `/:id`, `/:id/edit`) and render it.
    Open {
        #[arg(default_value = "/")]
        path: String,
    },
    /// List notes, optionally filtered by title and tags.
    List {
        #[arg(long)]
        title: Option<String>,
        /// Required tag label; repeat for several.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Create a note. Unknown tag labels are created on the fly.
    New {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Add a tag with a generated id.
    AddTag { label: String },
    /// Print available tags.
    Tags,
    /// Print the core version.
    Version,
}

impl Cli {
    /// Database file in use, or `None` for an in-memory session.
    pub fn resolve_db_path(&self) -> Option<PathBuf> {
        if self.memory {
            return None;
        }
        let configured = self
            .db
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty());
        Some(
            configured
                .cloned()
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
        )
    }

    pub fn resolve_log_level(&self) -> String {
        self.log_level
            .as_deref()
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(notetag_core::default_log_level())
            .to_string()
    }
}
