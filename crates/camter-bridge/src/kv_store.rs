// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key-value store backed by SQLite.
//
// Stands in for SharedPreferences / UserDefaults on desktop runs. The shell
// only ever keeps one value in it (the cached push token), so the table is a
// plain key/value pair with an update timestamp.

use std::sync::{Mutex, MutexGuard};

use camter_core::error::{CamterError, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, instrument};

use crate::traits::NativeKeyValueStore;

/// SQLite schema for the key-value table.
const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
"#;

/// Persistent string store backed by a SQLite database.
///
/// `rusqlite::Connection` is `Send` but not `Sync`, so it sits behind a
/// mutex to satisfy the `NativeKeyValueStore` bounds.
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyValueStore {
    /// Open (or create) the store at the given path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| CamterError::Database(format!("open: {e}")))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| CamterError::Database(format!("WAL pragma: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| CamterError::Database(format!("create table: {e}")))?;

        info!("key-value store opened");
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CamterError::Database(format!("open in-memory: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| CamterError::Database(format!("create table: {e}")))?;

        debug!("in-memory key-value store opened");
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NativeKeyValueStore for SqliteKeyValueStore {
    fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.conn()
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()
            .map_err(|e| CamterError::Database(format!("get {key}: {e}")))
    }

    fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
                params![key, value],
            )
            .map_err(|e| CamterError::Database(format!("set {key}: {e}")))?;
        debug!(key, "value stored");
        Ok(())
    }

    /// Idempotent: removing a missing key succeeds.
    fn remove_value(&self, key: &str) -> Result<()> {
        self.conn()
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|e| CamterError::Database(format!("remove {key}: {e}")))?;
        debug!(key, "value removed");
        Ok(())
    }
}
