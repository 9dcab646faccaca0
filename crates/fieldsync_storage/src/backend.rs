//! Storage trait definition.

use crate::error::StorageResult;

/// A string-keyed, string-valued durable store.
///
/// This mirrors the contract of a browser-style local storage: values are
/// opaque strings, operations are synchronous and local, and keys can be
/// enumerated by ordinal.
///
/// # Invariants
///
/// - `get_item` returns `None` for a missing key, never `Some("")`
/// - `set_item` overwrites any previous value under the same key
/// - `key(i)` returns `Some` only for `0 <= i < len()`
/// - Backends must be `Send + Sync`; all methods take `&self`
///
/// # Implementors
///
/// - [`super::InMemoryStorage`] - For testing
/// - [`super::FileStorage`] - For persistent storage
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the backend is full.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes the value stored under `key`. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Removes every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn clear(&self) -> StorageResult<()>;

    /// Returns the key at position `index`.
    ///
    /// Negative or out-of-range indices return `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn key(&self, index: i64) -> StorageResult<Option<String>>;

    /// Returns the number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn len(&self) -> StorageResult<usize>;

    /// Returns true if no entries are stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Converts a possibly negative ordinal into a slice index below `len`.
pub(crate) fn checked_index(index: i64, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_index_rejects_negative() {
        assert_eq!(checked_index(-1, 3), None);
        assert_eq!(checked_index(i64::MIN, 3), None);
    }

    #[test]
    fn checked_index_bounds() {
        assert_eq!(checked_index(0, 0), None);
        assert_eq!(checked_index(0, 1), Some(0));
        assert_eq!(checked_index(2, 3), Some(2));
        assert_eq!(checked_index(3, 3), None);
    }
}
