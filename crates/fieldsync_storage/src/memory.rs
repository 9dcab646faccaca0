//! In-memory storage backend for testing.

use crate::backend::{checked_index, KeyValueStorage};
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;

/// An in-memory key-value backend.
///
/// Entries are kept in insertion order, so `key(i)` enumerates keys in the
/// order they were first written. Overwriting a key keeps its position.
///
/// This backend is suitable for:
/// - Unit tests
/// - Integration tests
/// - Hosts that want tracked fields without persistence
///
/// An optional byte quota (sum of key and value lengths) makes
/// quota-exceeded failures reproducible in tests.
///
/// # Example
///
/// ```rust
/// use fieldsync_storage::{InMemoryStorage, KeyValueStorage};
///
/// let storage = InMemoryStorage::new();
/// storage.set_item("a", "1").unwrap();
/// storage.set_item("b", "2").unwrap();
/// assert_eq!(storage.key(1).unwrap().as_deref(), Some("b"));
/// assert_eq!(storage.len().unwrap(), 2);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: RwLock<Vec<(String, String)>>,
    quota: Option<usize>,
}

impl InMemoryStorage {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-seeded with entries.
    ///
    /// Useful for testing hydration. Later duplicates overwrite earlier ones.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut seeded: Vec<(String, String)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            match seeded.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => seeded.push((key, value)),
            }
        }
        Self {
            entries: RwLock::new(seeded),
            quota: None,
        }
    }

    /// Limits the total size of keys and values to `bytes`.
    #[must_use]
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Returns a copy of all entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries.read().clone()
    }

    fn used_bytes(entries: &[(String, String)]) -> usize {
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStorage for InMemoryStorage {
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
        let position = entries.iter().position(|(k, _)| k == key);

        if let Some(quota) = self.quota {
            let previous = position.map_or(0, |i| key.len() + entries[i].1.len());
            let needed = Self::used_bytes(&entries) - previous + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        match position {
            Some(i) => entries[i].1 = value.to_string(),
            None => entries.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.entries.write().retain(|(k, _)| k != key);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.entries.write().clear();
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
