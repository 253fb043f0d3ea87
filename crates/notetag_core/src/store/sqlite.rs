//! SQLite-backed key-value store.
//!
//! # Invariants
//! - The wrapped connection has migrations applied (`kv_entries` exists).
//! - `set` is an upsert; one key maps to exactly one row.

use super::{KeyValueStore, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable store persisting each key as one row of `kv_entries`.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens (and migrates) a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let result = self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        );

        match result {
            Ok(_) => {
                debug!(
                    "event=store_write module=store status=ok key={key} bytes={}",
                    value.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_write module=store status=error key={key} error_code=write_failed error={err}"
                );
                Err(err.into())
            }
        }
    }
}
