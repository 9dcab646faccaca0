//! Test fixtures and storage helpers.
//!
//! Provides the small host states the tests attach the sync plugin to,
//! the transitions they commit, and storage wrappers for observing writes.

use fieldsync_core::{Store, SyncResult};
use fieldsync_storage::{FileStorage, InMemoryStorage, KeyValueStorage, StorageResult};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A state with a single counter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterState {
    /// The counter.
    pub count: u64,
}

/// A state with a single string field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameState {
    /// The name.
    pub name: String,
}

/// A todo list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Identifier, unique within a list.
    pub id: u64,
    /// Item text.
    pub text: String,
    /// Whether the item is done.
    pub done: bool,
}

impl Todo {
    /// Creates an open item.
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            done: false,
        }
    }
}

/// A todo list with an id counter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoState {
    /// The items, in insertion order.
    pub todos: Vec<Todo>,
    /// The last id handed out.
    pub last_id: u64,
}

/// A traffic light.
#[derive(Debug, Clone, PartialEq)]
pub struct StoplightState {
    /// Current color.
    pub color: String,
}

impl Default for StoplightState {
    fn default() -> Self {
        Self {
            color: "green".into(),
        }
    }
}

/// Commits `count` and adds one.
pub fn increment(store: &Store<CounterState>) -> SyncResult<()> {
    store.commit("count", |s| s.count += 1)
}

/// Commits `addTodo`, appending an item with the next id.
pub fn add_todo(store: &Store<TodoState>, text: &str) -> SyncResult<u64> {
    let mut id = 0;
    store.commit("addTodo", |s| {
        s.last_id += 1;
        id = s.last_id;
        s.todos.push(Todo::new(id, text));
    })?;
    Ok(id)
}

/// Commits `toggleTodo`, flipping `done` on the item with `id`.
pub fn toggle_todo(store: &Store<TodoState>, id: u64) -> SyncResult<()> {
    store.commit("toggleTodo", |s| {
        if let Some(todo) = s.todos.iter_mut().find(|t| t.id == id) {
            todo.done = !todo.done;
        }
    })
}

/// Commits `CHANGE`, cycling green, yellow, red.
pub fn change_light(store: &Store<StoplightState>) -> SyncResult<()> {
    store.commit("CHANGE", |s| {
        s.color = match s.color.as_str() {
            "green" => "yellow",
            "yellow" => "red",
            _ => "green",
        }
        .into();
    })
}

/// In-memory storage that records every `set_item` call.
#[derive(Debug, Default)]
pub struct RecordingStorage {
    inner: InMemoryStorage,
    writes: Mutex<Vec<(String, String)>>,
}

impl RecordingStorage {
    /// Creates an empty recording backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recording backend pre-seeded with entries. Seeding is not
    /// recorded.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner: InMemoryStorage::with_entries(entries),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Returns every recorded write, oldest first.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().clone()
    }

    /// Returns the number of recorded writes.
    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }

    /// Returns the number of recorded writes to `key`.
    pub fn writes_to(&self, key: &str) -> usize {
        self.writes.lock().iter().filter(|(k, _)| k == key).count()
    }

    /// Returns the value stored under `key`, panicking on backend errors.
    pub fn value(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).expect("in-memory read failed")
    }
}

impl KeyValueStorage for RecordingStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.writes.lock().push((key.to_string(), value.to_string()));
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.inner.remove_item(key)
    }

    fn clear(&self) -> StorageResult<()> {
        self.inner.clear()
    }

    fn key(&self, index: i64) -> StorageResult<Option<String>> {
        self.inner.key(index)
    }

    fn len(&self) -> StorageResult<usize> {
        self.inner.len()
    }
}

/// A storage file in a temporary directory, removed on drop.
pub struct TempStorageFile {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TempStorageFile {
    /// Creates a temporary directory holding `storage.json`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self {
            path: temp_dir.path().join("storage.json"),
            _temp_dir: temp_dir,
        }
    }

    /// Returns the storage file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file. Only one handle may be open at a time.
    pub fn open(&self) -> FileStorage {
        FileStorage::open(&self.path).expect("Failed to open file storage")
    }
}

impl Default for TempStorageFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a test with a fresh file storage in a temporary directory.
pub fn with_file_storage<F, R>(f: F) -> R
where
    F: FnOnce(&TempStorageFile) -> R,
{
    let file = TempStorageFile::new();
    f(&file)
}
