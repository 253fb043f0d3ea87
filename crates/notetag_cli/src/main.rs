//! Terminal front-end for notetag.
//!
//! # Responsibility
//! - Wire configuration, logging and the store into a `NotebookService`.
//! - Map subcommands onto view renders and notebook mutations.

mod config;
mod render;

use clap::Parser;
use config::{Cli, Command};
use log::info;
use notetag_core::{
    filter_notes, init_logging, navigate, KeyValueStore, LoggingError, MemoryStore, NoteData,
    NoteFilter, NotebookError, NotebookService, SqliteStore, StoreError, Tag, TagId,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use std::process::ExitCode;

type Notebook = NotebookService<Box<dyn KeyValueStore>>;

#[derive(Debug)]
enum CliError {
    Logging(LoggingError),
    Store(StoreError),
    Notebook(NotebookError),
    UnknownTag(String),
    Io(io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Notebook(err) => write!(f, "{err}"),
            Self::UnknownTag(label) => write!(f, "unknown tag: `{label}`"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Notebook(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::UnknownTag(_) => None,
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<NotebookError> for CliError {
    fn from(value: NotebookError) -> Self {
        Self::Notebook(value)
    }
}

impl From<io::Error> for CliError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("notetag: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(log_dir) = &cli.log_dir {
        init_logging(&cli.resolve_log_level(), &log_dir.to_string_lossy())?;
    }

    if let Command::Version = cli.command {
        println!("notetag_core version={}", notetag_core::core_version());
        return Ok(());
    }

    let mut notebook = open_notebook(&cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Open { path } => {
            let navigation = navigate(&path, |id| notebook.has_note(id));
            info!(
                "event=cli_open module=cli status=ok location={} redirected={}",
                navigation.location,
                navigation.redirected_from.is_some()
            );
            let notes: Vec<_> = notebook.resolved_notes().iter().collect();
            render::render_navigation(&mut out, &navigation, &notes, notebook.tags())?;
        }
        Command::List { title, tags } => {
            let filter = NoteFilter {
                title,
                tag_ids: lookup_tag_ids(&notebook, &tags)?,
            };
            let notes = filter_notes(notebook.resolved_notes(), &filter);
            render::render_list(&mut out, &notes, notebook.tags())?;
        }
        Command::New { title, body, tags } => {
            let (tags, new_tags) = select_tags(&notebook, &tags);
            let note =
                notebook.create_note_with_new_tags(NoteData { title, body, tags }, new_tags)?;
            writeln!(out, "created {}", note.id)?;
        }
        Command::AddTag { label } => {
            let tag = notebook.create_tag(label)?;
            writeln!(out, "{}\t{}", tag.id, tag.label)?;
        }
        Command::Tags => render::render_tags(&mut out, notebook.tags())?,
        Command::Version => {}
    }

    out.flush()?;
    Ok(())
}

fn open_notebook(cli: &Cli) -> Result<Notebook, CliError> {
    let store: Box<dyn KeyValueStore> = match cli.resolve_db_path() {
        Some(path) => Box::new(SqliteStore::open(path)?),
        None => Box::new(MemoryStore::new()),
    };
    Ok(NotebookService::load(store))
}

fn lookup_tag_ids(notebook: &Notebook, labels: &[String]) -> Result<Vec<TagId>, CliError> {
    labels
        .iter()
        .map(|label| {
            notebook
                .find_tag_by_label(label)
                .map(|tag| tag.id.clone())
                .ok_or_else(|| CliError::UnknownTag(label.clone()))
        })
        .collect()
}

/// Splits labels into the selected tags and the subset that must be created.
///
/// Existing labels match case-insensitively; repeated labels are selected once.
fn select_tags(notebook: &Notebook, labels: &[String]) -> (Vec<Tag>, Vec<Tag>) {
    let mut selected: Vec<Tag> = Vec::with_capacity(labels.len());
    let mut new_tags: Vec<Tag> = Vec::new();
    for label in labels {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        let wanted = label.to_lowercase();
        if selected
            .iter()
            .any(|seen| seen.label.trim().to_lowercase() == wanted)
        {
            continue;
        }
        let tag = match notebook.find_tag_by_label(label) {
            Some(existing) => existing.clone(),
            None => {
                let tag = Tag::new(label);
                new_tags.push(tag.clone());
                tag
            }
        };
        selected.push(tag);
    }
    (selected, new_tags)
}
