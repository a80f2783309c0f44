// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable queue stores.
//!
//! A store maps a key to an ordered list of [`SyncTask`]s and always reads
//! and writes the whole list. Three implementations are provided:
//!
//! - [`JsonlStore`]: one JSON Lines file per key, rewritten atomically
//! - [`SqliteStore`]: one row per key in a SQLite database
//! - [`MemoryStore`]: in-process map, for tests and embedding
//!
//! The durable stores run their file and database work on tokio's blocking
//! pool, so they must be polled inside a tokio runtime.

use std::collections::HashMap;
use std::future::{ready, Future};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use outbox_core::{jsonl, SyncTask};
use rusqlite::{params, Connection, OptionalExtension};

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Error from the JSONL layer.
    #[error(transparent)]
    Core(#[from] outbox_core::Error),

    /// Key cannot be used as a storage name.
    #[error("invalid queue key '{0}'\n  hint: keys may contain letters, digits, '-' and '_'")]
    InvalidKey(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Runs `work` on the blocking pool.
fn blocking<'a, T, F>(work: F) -> StoreFuture<'a, T>
where
    T: Send + 'static,
    F: FnOnce() -> StoreResult<T> + Send + 'static,
{
    Box::pin(async move {
        tokio::task::spawn_blocking(work)
            .await
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
    })
}

/// Key-value persistence for queues of pending tasks.
pub trait QueueStore: Send + Sync {
    /// Load the queue stored under `key`, or `None` if nothing was ever stored.
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Vec<SyncTask>>>;

    /// Replace the queue stored under `key`.
    fn set<'a>(&'a self, key: &'a str, tasks: &'a [SyncTask]) -> StoreFuture<'a, ()>;
}

fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Queue store keeping each key in `<dir>/<key>.jsonl`.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    dir: PathBuf,
}

impl JsonlStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(JsonlStore {
            dir: dir.to_path_buf(),
        })
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.jsonl")))
    }

    fn load(&self, key: &str) -> StoreResult<Option<Vec<SyncTask>>> {
        let path = self.path_for(key)?;
        Ok(jsonl::read_all(&path)?)
    }

    fn save(&self, key: &str, tasks: &[SyncTask]) -> StoreResult<()> {
        let path = self.path_for(key)?;
        jsonl::write_all(&path, tasks)?;
        Ok(())
    }
}

impl QueueStore for JsonlStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Vec<SyncTask>>> {
        let store = self.clone();
        let key = key.to_string();
        blocking(move || store.load(&key))
    }

    fn set<'a>(&'a self, key: &'a str, tasks: &'a [SyncTask]) -> StoreFuture<'a, ()> {
        let store = self.clone();
        let key = key.to_string();
        let tasks = tasks.to_vec();
        blocking(move || store.save(&key, &tasks))
    }
}

/// SQL schema for the queue database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS queues (
    key TEXT PRIMARY KEY,
    tasks TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Queue store keeping each key as a JSON array in a SQLite row.
/// Clones share the same connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;

        Ok(SqliteStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn load(&self, key: &str) -> StoreResult<Option<Vec<SyncTask>>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let json: Option<String> = conn
            .query_row(
                "SELECT tasks FROM queues WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, tasks: &[SyncTask]) -> StoreResult<()> {
        let json = serde_json::to_string(tasks)?;
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute(
            "INSERT INTO queues (key, tasks, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET tasks = excluded.tasks, updated_at = excluded.updated_at",
            params![key, json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl QueueStore for SqliteStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Vec<SyncTask>>> {
        let store = self.clone();
        let key = key.to_string();
        blocking(move || store.load(&key))
    }

    fn set<'a>(&'a self, key: &'a str, tasks: &'a [SyncTask]) -> StoreFuture<'a, ()> {
        let store = self.clone();
        let key = key.to_string();
        let tasks = tasks.to_vec();
        blocking(move || store.save(&key, &tasks))
    }
}

/// In-memory queue store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    queues: Arc<Mutex<HashMap<String, Vec<SyncTask>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the queue under `key` without going through the async API.
    pub fn snapshot(&self, key: &str) -> Option<Vec<SyncTask>> {
        let queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        queues.get(key).cloned()
    }
}

impl QueueStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Vec<SyncTask>>> {
        Box::pin(ready(Ok(self.snapshot(key))))
    }

    fn set<'a>(&'a self, key: &'a str, tasks: &'a [SyncTask]) -> StoreFuture<'a, ()> {
        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        queues.insert(key.to_string(), tasks.to_vec());
        Box::pin(ready(Ok(())))
    }
}

impl<S: QueueStore + ?Sized> QueueStore for Box<S> {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Vec<SyncTask>>> {
        (**self).get(key)
    }

    fn set<'a>(&'a self, key: &'a str, tasks: &'a [SyncTask]) -> StoreFuture<'a, ()> {
        (**self).set(key, tasks)
    }
}
