//! Note domain models.
//!
//! # Responsibility
//! - Define the persisted `RawNote` shape (tag references by id).
//! - Define the creation input `NoteData` and the derived `ResolvedNote`.
//!
//! # Invariants
//! - `RawNote` serializes with the `textarea` and `tagIds` wire names.
//! - `ResolvedNote` is never persisted; it is recomputed from collections.

use crate::model::tag::{Tag, TagId};
use serde::{Deserialize, Serialize};

/// Opaque note identifier.
pub type NoteId = String;

/// Persisted note record holding tag references instead of tag objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNote {
    pub id: NoteId,
    pub title: String,
    /// Serialized as `textarea` to stay compatible with stored documents.
    #[serde(rename = "textarea")]
    pub body: String,
    /// Ordered references; may point at tags that no longer exist.
    #[serde(rename = "tagIds")]
    pub tag_ids: Vec<TagId>,
}

impl RawNote {
    /// Builds a raw note from creation input, keeping tag ids in input order.
    pub fn from_data(id: impl Into<NoteId>, data: NoteData) -> Self {
        let NoteData { title, body, tags } = data;
        Self {
            id: id.into(),
            title,
            body,
            tag_ids: tags.into_iter().map(|tag| tag.id).collect(),
        }
    }

    /// Returns whether this note references the given tag id.
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tag_ids.iter().any(|id| id == tag_id)
    }
}

/// Input submitted by the creation view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteData {
    pub title: String,
    #[serde(rename = "textarea")]
    pub body: String,
    pub tags: Vec<Tag>,
}

/// Raw note joined with the tag objects it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedNote {
    #[serde(flatten)]
    pub note: RawNote,
    /// Tags in tag-collection order, orphan references dropped.
    pub tags: Vec<Tag>,
}

impl ResolvedNote {
    pub fn id(&self) -> &str {
        &self.note.id
    }

    pub fn title(&self) -> &str {
        &self.note.title
    }

    pub fn body(&self) -> &str {
        &self.note.body
    }
}
