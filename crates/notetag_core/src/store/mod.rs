//! Persisted key-value store contracts.
//!
//! # Responsibility
//! - Define the opaque string-keyed store holding JSON documents.
//! - Provide typed `load_or_default` / `save_json` helpers on top of it.
//!
//! # Invariants
//! - Reads never fail: backend errors, missing keys and malformed JSON all
//!   fall back to the caller's default.
//! - Writes never swallow errors: serialization and backend failures are
//!   returned to the caller unchanged.

use crate::db::DbError;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Store key holding the raw note collection.
pub const NOTES_KEY: &str = "notes";
/// Store key holding the tag collection.
pub const TAGS_KEY: &str = "tags";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by key-value store backends or JSON encoding.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialize(serde_json::Error),
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "store backend error: {err}"),
            Self::Serialize(err) => write!(f, "failed to encode store value: {err}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Synchronous string-keyed store holding JSON text values.
pub trait KeyValueStore {
    /// Returns the raw value for `key`, or `None` when absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the value for `key`.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

/// Reads and decodes `key`, returning `default` when unreadable.
pub fn load_or_default<S, T>(store: &S, key: &str, default: T) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=store_load module=store status=ok key={key} outcome=absent");
            return default;
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=error key={key} error_code=read_failed error={err}"
            );
            return default;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "event=store_load module=store status=error key={key} error_code=parse_failed error={err}"
            );
            default
        }
    }
}

/// Encodes `value` as JSON and writes it under `key`.
pub fn save_json<S, T>(store: &mut S, key: &str, value: &T) -> StoreResult<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value)?;
    store.set(key, &encoded)
}
