//! Tag domain model.
//!
//! # Responsibility
//! - Define the `{ id, label }` record stored under the `tags` key.
//!
//! # Invariants
//! - `id` is opaque; callers may supply any string.
//! - Tags are never mutated once added to the collection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque tag identifier.
pub type TagId = String;

/// Label attached to notes for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub label: String,
}

impl Tag {
    /// Creates a tag with a generated random id.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), label)
    }

    /// Creates a tag with a caller-provided id.
    pub fn with_id(id: impl Into<TagId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}
