//! Core use-case services.
//!
//! # Responsibility
//! - Own the note/tag collections and their mutations.
//! - Keep the view layer decoupled from storage details.

pub mod notebook_service;
pub mod resolve;
