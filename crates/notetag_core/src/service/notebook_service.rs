//! Notebook state manager.
//!
//! # Responsibility
//! - Own the persisted note and tag collections for one store.
//! - Expose the derived resolved-note projection.
//! - Apply create-note and add-tag mutations with write-through persistence.
//!
//! # Invariants
//! - Every mutation takes `&mut self`, so read-modify-write of a collection
//!   is never interleaved with another mutation.
//! - A collection is swapped in memory only after the store accepted it; a
//!   failed write leaves the service state unchanged.
//! - `revision` increases on every successful mutation or reload, and the
//!   resolved-note cache is only valid for the revision it was built at.
//! - Tag ids are unique: `add_tag` rejects an id that already exists.

use crate::model::note::{NoteData, RawNote, ResolvedNote};
use crate::model::tag::{Tag, TagId};
use crate::service::resolve::resolve_notes;
use crate::store::{load_or_default, save_json, KeyValueStore, StoreError, NOTES_KEY, TAGS_KEY};
use log::{error, info};
use once_cell::unsync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for notebook mutations.
#[derive(Debug)]
pub enum NotebookError {
    /// A tag with the same id is already in the collection.
    DuplicateTagId(TagId),
    /// The store rejected the updated collection.
    Store(StoreError),
}

impl Display for NotebookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTagId(id) => write!(f, "tag id already exists: `{id}`"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NotebookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::DuplicateTagId(_) => None,
        }
    }
}

impl From<StoreError> for NotebookError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Note/tag state container bound to one key-value store.
pub struct NotebookService<S: KeyValueStore> {
    store: S,
    notes: Vec<RawNote>,
    tags: Vec<Tag>,
    revision: u64,
    resolved: OnceCell<Vec<ResolvedNote>>,
}

impl<S: KeyValueStore> NotebookService<S> {
    /// Loads both collections from `store`, defaulting each to empty.
    pub fn load(store: S) -> Self {
        let notes: Vec<RawNote> = load_or_default(&store, NOTES_KEY, Vec::new());
        let tags: Vec<Tag> = load_or_default(&store, TAGS_KEY, Vec::new());
        info!(
            "event=notebook_load module=service status=ok note_count={} tag_count={}",
            notes.len(),
            tags.len()
        );

        Self {
            store,
            notes,
            tags,
            revision: 0,
            resolved: OnceCell::new(),
        }
    }

    /// Raw notes in creation order.
    pub fn notes(&self) -> &[RawNote] {
        &self.notes
    }

    /// Available tags in insertion order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Version stamp of the current `(notes, tags)` pair.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Notes joined with their tags; recomputed once per revision.
    pub fn resolved_notes(&self) -> &[ResolvedNote] {
        self.resolved.get_or_init(|| resolve_notes(&self.notes, &self.tags))
    }

    /// Creates a note with a fresh random id and persists the collection.
    ///
    /// Title and body are accepted as-is, including empty strings.
    pub fn create_note(&mut self, data: NoteData) -> Result<RawNote, NotebookError> {
        let note = RawNote::from_data(Uuid::new_v4().to_string(), data);

        let mut next = Vec::with_capacity(self.notes.len() + 1);
        next.extend_from_slice(&self.notes);
        next.push(note.clone());
        if let Err(err) = save_json(&mut self.store, NOTES_KEY, &next) {
            error!(
                "event=note_create module=service status=error error_code=persist_failed error={err}"
            );
            return Err(err.into());
        }

        self.notes = next;
        self.bump_revision();
        info!(
            "event=note_create module=service status=ok note_id={} tag_count={}",
            note.id,
            note.tag_ids.len()
        );
        Ok(note)
    }

    /// Creates a note and adds the tags it introduces in one step.
    ///
    /// `data.tags` is the full selection; `new_tags` are the entries of that
    /// selection not yet in the collection. Tags are written first. When the
    /// note write then fails, the previous tag collection is written back and
    /// the in-memory state is left untouched.
    pub fn create_note_with_new_tags(
        &mut self,
        data: NoteData,
        new_tags: Vec<Tag>,
    ) -> Result<RawNote, NotebookError> {
        if new_tags.is_empty() {
            return self.create_note(data);
        }

        let mut next_tags = self.tags.clone();
        for tag in new_tags {
            if next_tags.iter().any(|existing| existing.id == tag.id) {
                return Err(NotebookError::DuplicateTagId(tag.id));
            }
            next_tags.push(tag);
        }

        let note = RawNote::from_data(Uuid::new_v4().to_string(), data);
        let mut next_notes = self.notes.clone();
        next_notes.push(note.clone());

        if let Err(err) = save_json(&mut self.store, TAGS_KEY, &next_tags) {
            error!(
                "event=note_create module=service status=error error_code=tag_persist_failed error={err}"
            );
            return Err(err.into());
        }
        if let Err(err) = save_json(&mut self.store, NOTES_KEY, &next_notes) {
            error!(
                "event=note_create module=service status=error error_code=persist_failed error={err}"
            );
            if let Err(rollback_err) = save_json(&mut self.store, TAGS_KEY, &self.tags) {
                error!(
                    "event=note_create module=service status=error error_code=tag_rollback_failed error={rollback_err}"
                );
            }
            return Err(err.into());
        }

        let added = next_tags.len() - self.tags.len();
        self.tags = next_tags;
        self.notes = next_notes;
        self.bump_revision();
        info!(
            "event=note_create module=service status=ok note_id={} tag_count={} new_tag_count={}",
            note.id,
            note.tag_ids.len(),
            added
        );
        Ok(note)
    }

    /// Appends a caller-built tag and persists the collection.
    pub fn add_tag(&mut self, tag: Tag) -> Result<(), NotebookError> {
        if self.tags.iter().any(|existing| existing.id == tag.id) {
            return Err(NotebookError::DuplicateTagId(tag.id));
        }

        let mut next = Vec::with_capacity(self.tags.len() + 1);
        next.extend_from_slice(&self.tags);
        next.push(tag);
        if let Err(err) = save_json(&mut self.store, TAGS_KEY, &next) {
            error!(
                "event=tag_add module=service status=error error_code=persist_failed error={err}"
            );
            return Err(err.into());
        }

        self.tags = next;
        self.bump_revision();
        info!(
            "event=tag_add module=service status=ok tag_count={}",
            self.tags.len()
        );
        Ok(())
    }

    /// Builds a tag with a generated id for `label` and adds it.
    pub fn create_tag(&mut self, label: impl Into<String>) -> Result<Tag, NotebookError> {
        let tag = Tag::new(label);
        self.add_tag(tag.clone())?;
        Ok(tag)
    }

    /// Returns whether a note with `id` exists.
    pub fn has_note(&self, id: &str) -> bool {
        self.notes.iter().any(|note| note.id == id)
    }

    /// Finds a tag by exact id.
    pub fn find_tag(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    /// Finds the first tag whose label matches case-insensitively.
    pub fn find_tag_by_label(&self, label: &str) -> Option<&Tag> {
        let wanted = label.trim().to_lowercase();
        self.tags
            .iter()
            .find(|tag| tag.label.trim().to_lowercase() == wanted)
    }

    /// Re-reads both collections from the store.
    pub fn reload(&mut self) {
        self.notes = load_or_default(&self.store, NOTES_KEY, Vec::new());
        self.tags = load_or_default(&self.store, TAGS_KEY, Vec::new());
        self.bump_revision();
        info!(
            "event=notebook_reload module=service status=ok note_count={} tag_count={}",
            self.notes.len(),
            self.tags.len()
        );
    }

    /// Releases the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn bump_revision(&mut self) {
        self.revision += 1;
        self.resolved = OnceCell::new();
    }
}
