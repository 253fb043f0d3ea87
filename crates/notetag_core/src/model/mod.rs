//! Domain model for notes and tags.
//!
//! # Responsibility
//! - Define the persisted collections' element shapes.
//! - Define the derived resolved-note projection.
//!
//! # Invariants
//! - Notes store tag references (ids), never tag objects.

pub mod note;
pub mod tag;
