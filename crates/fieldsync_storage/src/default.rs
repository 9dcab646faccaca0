//! Process-wide default storage.

use crate::backend::KeyValueStorage;
use crate::error::StorageResult;
use crate::file::FileStorage;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// Environment variable naming the default storage file.
pub const STORAGE_PATH_ENV: &str = "FIELDSYNC_STORAGE_PATH";

/// Default storage file, relative to the working directory.
pub const DEFAULT_STORAGE_FILE: &str = ".fieldsync/storage.json";

static DEFAULT: Mutex<Option<Arc<FileStorage>>> = Mutex::new(None);

/// Returns the process-wide durable storage.
///
/// The backing [`FileStorage`] is opened on first call, at
/// `$FIELDSYNC_STORAGE_PATH` when set and [`DEFAULT_STORAGE_FILE`]
/// otherwise. Later calls return the same handle. Nothing is opened until a
/// caller asks for it, so hosts that always pass their own backend never
/// touch the filesystem.
///
/// # Errors
///
/// Returns an error if the storage file cannot be opened or locked.
pub fn default_storage() -> StorageResult<Arc<dyn KeyValueStorage>> {
    let mut slot = DEFAULT.lock();
    if let Some(storage) = slot.as_ref() {
        return Ok(storage.clone());
    }

    let path = std::env::var_os(STORAGE_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_FILE));
    tracing::debug!(path = %path.display(), "opening default storage");

    let storage = Arc::new(FileStorage::open_with_create_dirs(&path)?);
    *slot = Some(storage.clone());
    Ok(storage)
}
