//! Plain-text views for the terminal.

use notetag_core::{Navigation, ResolvedNote, Route, Tag};
use std::io::{self, Write};

/// Renders the list view: filter summary then one block per note.
pub fn render_list(out: &mut impl Write, notes: &[&ResolvedNote], tags: &[Tag]) -> io::Result<()> {
    writeln!(out, "Notes ({})", notes.len())?;
    writeln!(out, "Available tags: {}", join_labels(tags))?;
    if notes.is_empty() {
        writeln!(out, "  (no notes)")?;
        return Ok(());
    }

    for note in notes {
        let title = if note.title().is_empty() {
            "(untitled)"
        } else {
            note.title()
        };
        writeln!(out, "- {title}  [{}]", note.id())?;
        if !note.tags.is_empty() {
            writeln!(out, "    tags: {}", join_labels(&note.tags))?;
        }
    }
    Ok(())
}

/// Renders the creation view's form summary.
pub fn render_new_form(out: &mut impl Write, tags: &[Tag]) -> io::Result<()> {
    writeln!(out, "New Note")?;
    writeln!(out, "  fields: title, body, tags")?;
    writeln!(out, "  available tags: {}", join_labels(tags))?;
    writeln!(
        out,
        "  submit with: notetag new --title <TITLE> [--body <BODY>] [--tag <LABEL>]..."
    )
}

/// Renders whichever view `navigation` landed on.
pub fn render_navigation(
    out: &mut impl Write,
    navigation: &Navigation,
    notes: &[&ResolvedNote],
    tags: &[Tag],
) -> io::Result<()> {
    if let Some(from) = &navigation.redirected_from {
        writeln!(out, "redirected from {from} to {}", navigation.location)?;
    }

    match &navigation.route {
        Route::List => render_list(out, notes, tags),
        Route::New => render_new_form(out, tags),
        Route::Show { .. } => writeln!(out, "show"),
        Route::Edit { .. } => writeln!(out, "edit"),
    }
}

pub fn render_tags(out: &mut impl Write, tags: &[Tag]) -> io::Result<()> {
    for tag in tags {
        writeln!(out, "{}\t{}", tag.id, tag.label)?;
    }
    Ok(())
}

fn join_labels(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return "(none)".to_string();
    }
    tags.iter()
        .map(|tag| tag.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
