//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The storage file could not be parsed.
    #[error("storage corrupted at {path}: {message}")]
    Corrupted {
        /// Path of the storage file.
        path: PathBuf,
        /// Description of the corruption.
        message: String,
    },

    /// Another process holds the storage lock.
    #[error("storage is locked by another process: {0}")]
    Locked(PathBuf),

    /// The write would exceed the configured capacity.
    #[error("storage quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
    QuotaExceeded {
        /// Total bytes the store would occupy after the write.
        needed: usize,
        /// The configured limit.
        quota: usize,
    },
}
