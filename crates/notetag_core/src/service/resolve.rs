//! Pure note/tag join and list filtering.
//!
//! # Invariants
//! - Resolved tags follow tag-collection order, not `tagIds` order.
//! - Orphan references are dropped silently.
//! - Tags sharing an id are all kept, in collection order.

use crate::model::note::{RawNote, ResolvedNote};
use crate::model::tag::{Tag, TagId};
use std::collections::HashSet;

/// Joins every note with the tags it references.
pub fn resolve_notes(notes: &[RawNote], tags: &[Tag]) -> Vec<ResolvedNote> {
    notes.iter().map(|note| resolve_note(note, tags)).collect()
}

/// Joins one note with the tags it references.
pub fn resolve_note(note: &RawNote, tags: &[Tag]) -> ResolvedNote {
    let wanted: HashSet<&str> = note.tag_ids.iter().map(String::as_str).collect();
    ResolvedNote {
        note: note.clone(),
        tags: tags
            .iter()
            .filter(|tag| wanted.contains(tag.id.as_str()))
            .cloned()
            .collect(),
    }
}

/// List-view filter: title query plus required tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Case-insensitive substring of the title; blank matches everything.
    pub title: Option<String>,
    /// Every id listed here must be present on the resolved note.
    pub tag_ids: Vec<TagId>,
}

impl NoteFilter {
    pub fn is_empty(&self) -> bool {
        self.title_query().is_none() && self.tag_ids.is_empty()
    }

    pub fn matches(&self, note: &ResolvedNote) -> bool {
        if let Some(query) = self.title_query() {
            if !note.note.title.to_lowercase().contains(&query) {
                return false;
            }
        }

        self.tag_ids
            .iter()
            .all(|wanted| note.tags.iter().any(|tag| &tag.id == wanted))
    }

    fn title_query(&self) -> Option<String> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase)
    }
}

/// Returns the resolved notes matching `filter`, preserving order.
pub fn filter_notes<'a>(notes: &'a [ResolvedNote], filter: &NoteFilter) -> Vec<&'a ResolvedNote> {
    if filter.is_empty() {
        return notes.iter().collect();
    }
    notes.iter().filter(|note| filter.matches(note)).collect()
}
