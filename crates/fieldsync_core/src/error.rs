//! Error types for fieldsync core.

use fieldsync_storage::StorageError;
use thiserror::Error;

/// Boxed error returned by host-supplied codec functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for core operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while hydrating or persisting tracked fields.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored value could not be decoded with the default codec.
    #[error("failed to decode stored value at {key:?}: {source}")]
    Decode {
        /// Storage key holding the value.
        key: String,
        /// The JSON error.
        source: serde_json::Error,
    },

    /// A field value could not be encoded with the default codec.
    #[error("failed to encode value for {key:?}: {source}")]
    Encode {
        /// Storage key the value was headed for.
        key: String,
        /// The JSON error.
        source: serde_json::Error,
    },

    /// A host-supplied serialize or deserialize function failed.
    #[error("custom codec failed for {key:?}: {source}")]
    Codec {
        /// Storage key involved.
        key: String,
        /// The error returned by the host function.
        source: BoxError,
    },
}

impl SyncError {
    /// Returns the storage key involved, if the error concerns one field.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Storage(_) => None,
            Self::Decode { key, .. } | Self::Encode { key, .. } | Self::Codec { key, .. } => {
                Some(key)
            }
        }
    }
}
