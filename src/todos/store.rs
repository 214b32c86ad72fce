//! The data directory and the five list operations.
//!
//! File existence is the only record of which lists exist; nothing about the
//! directory is cached in memory. Writes land in a hidden temp file that is
//! renamed over the target, so readers see either the old or the new document
//! and never a torn one.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::error::TodoError;
use super::id::ListId;
use crate::error::Error;

/// Todo-lists stored as `<id>.json` files in one flat directory.
///
/// Create, replace and delete on the same identifier are serialised through a
/// per-identifier lock; operations on different identifiers never contend.
/// The locks only coordinate requests within this process, and a lock lives
/// in the map only while some call holds or waits on it.
pub struct TodoStore {
    dir: PathBuf,
    locks: DashMap<ListId, Arc<Mutex<()>>>,
}

/// One call's claim on an identifier's lock.
///
/// Dropping the last lease removes the lock from the map, including when the
/// call is cancelled mid-way.
struct Lease<'a> {
    locks: &'a DashMap<ListId, Arc<Mutex<()>>>,
    id: &'a ListId,
    lock: Arc<Mutex<()>>,
}

impl Lease<'_> {
    async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        // Two references left: the map's and this lease's.
        self.locks.remove_if(self.id, |_, lock| Arc::strong_count(lock) == 2);
    }
}

impl TodoStore {
    /// Uses `dir` as the data directory, creating it if missing.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| Error::DataDir { path: dir.clone(), source })?;
        Ok(Self::new(dir))
    }

    /// Uses `dir` as-is; operations fail with `IOError` while it is missing.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), locks: DashMap::new() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, id: &ListId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    fn lease<'a>(&'a self, id: &'a ListId) -> Lease<'a> {
        let lock = self.locks.entry(id.clone()).or_default().value().clone();
        Lease { locks: &self.locks, id, lock }
    }

    /// Identifiers of every list file, in directory enumeration order.
    pub async fn list(&self) -> Result<Vec<String>, TodoError> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(id) = name.to_str().and_then(ListId::from_file_name) {
                ids.push(id.into_string());
            }
        }
        Ok(ids)
    }

    /// Stores a new list. Fails with `AlreadyExists` and leaves the file
    /// untouched if `id` is taken.
    pub async fn create(&self, id: &ListId, contents: &Value) -> Result<(), TodoError> {
        let lease = self.lease(id);
        let _guard = lease.acquire().await;

        let path = self.path(id);
        if fs::try_exists(&path).await? {
            return Err(TodoError::AlreadyExists);
        }
        self.write(id, &path, contents).await?;
        debug!(%id, "list created");
        Ok(())
    }

    pub async fn read(&self, id: &ListId) -> Result<Value, TodoError> {
        let text = fs::read_to_string(self.path(id)).await.map_err(not_found_or_io)?;
        serde_json::from_str(&text).map_err(TodoError::Corrupt)
    }

    /// Overwrites an existing list. Fails with `NotFound`, creating nothing,
    /// if `id` does not exist.
    pub async fn replace(&self, id: &ListId, contents: &Value) -> Result<(), TodoError> {
        let lease = self.lease(id);
        let _guard = lease.acquire().await;

        let path = self.path(id);
        if !fs::try_exists(&path).await? {
            return Err(TodoError::NotFound);
        }
        self.write(id, &path, contents).await?;
        debug!(%id, "list replaced");
        Ok(())
    }

    pub async fn delete(&self, id: &ListId) -> Result<(), TodoError> {
        let lease = self.lease(id);
        let _guard = lease.acquire().await;

        fs::remove_file(self.path(id)).await.map_err(not_found_or_io)?;
        debug!(%id, "list deleted");
        Ok(())
    }

    async fn write(&self, id: &ListId, path: &Path, contents: &Value) -> Result<(), TodoError> {
        let tmp = self.dir.join(id.temp_file_name());
        fs::write(&tmp, to_tab_indented(contents)?).await?;
        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

/// Pretty-prints `value` with one tab per indentation level.
fn to_tab_indented(value: &Value) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;
    Ok(buf)
}

fn not_found_or_io(e: io::Error) -> TodoError {
    if e.kind() == io::ErrorKind::NotFound {
        TodoError::NotFound
    } else {
        TodoError::Io(e)
    }
}
