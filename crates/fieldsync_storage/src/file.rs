//! File-based storage backend for persistent storage.

use crate::backend::{checked_index, KeyValueStorage};
use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use parking_lot::RwLock;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A file-based key-value backend.
///
/// All entries live in memory and are written through to a single JSON
/// file (an array of `[key, value]` pairs, in insertion order) on every
/// mutation. Data survives process restarts.
///
/// # Durability
///
/// Each write goes to `<file>.tmp`, is synced, then renamed over the
/// storage file. When a mutating call returns, the new contents are on disk.
///
/// # Locking
///
/// An advisory lock on `<file>.lock` is held for the lifetime of the
/// backend. A second `FileStorage` on the same path fails with
/// [`StorageError::Locked`].
///
/// # Example
///
/// ```no_run
/// use fieldsync_storage::{FileStorage, KeyValueStorage};
/// use std::path::Path;
///
/// let storage = FileStorage::open(Path::new("state.json")).unwrap();
/// storage.set_item("count", "1").unwrap();
/// ```
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<Vec<(String, String)>>,
    _lock_file: File,
}

impl FileStorage {
    /// Opens or creates a file backend at the given path.
    ///
    /// If the file exists, its entries are loaded. If it doesn't exist,
    /// it is created on the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The lock is held by another process (`Locked`)
    /// - The existing file is not a valid storage file (`Corrupted`)
    /// - I/O errors occur
    pub fn open(path: &Path) -> StorageResult<Self> {
        let lock_path = sibling(path, "lock");
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(StorageError::Locked(path.to_path_buf()));
        }

        let entries = if path.exists() {
            let data = fs::read_to_string(path)?;
            if data.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<(String, String)>>(&data).map_err(|e| {
                    StorageError::Corrupted {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    }
                })?
            }
        } else {
            Vec::new()
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "opened file storage");

        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
            _lock_file: lock_file,
        })
    }

    /// Opens or creates a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot
    /// be opened.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `entries` to disk with the write-then-rename pattern.
    fn persist(&self, entries: &[(String, String)]) -> StorageResult<()> {
        let temp_path = sibling(&self.path, "tmp");
        let data = serde_json::to_vec(entries).map_err(|e| StorageError::Corrupted {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self
            .entries
            .read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        match next.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => next.push((key.to_string(), value.to_string())),
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write();
        if !entries.iter().any(|(k, _)| k == key) {
            return Ok(());
        }
        let next: Vec<_> = entries.iter().filter(|(k, _)| k != key).cloned().collect();
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut entries = self.entries.write();
        self.persist(&[])?;
        entries.clear();
        Ok(())
    }

    fn key(&self, index: i64) -> StorageResult<Option<String>> {
        let entries = self.entries.read();
        Ok(checked_index(index, entries.len()).map(|i| entries[i].0.clone()))
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.entries.read().len())
    }
}

/// Returns `<path>.<suffix>`, keeping any existing extension.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
