//! # fieldsync Storage
//!
//! Key-value storage trait and implementations for fieldsync.
//!
//! This crate provides the storage abstraction that persisted state fields
//! are written to. Backends are **opaque string stores** - they do not
//! interpret the values they hold.
//!
//! ## Design Principles
//!
//! - Backends are simple string maps (get, set, remove, clear, key, len)
//! - A missing key is distinct from a key holding the empty string
//! - Backends must be `Send + Sync` so one handle can be shared
//! - Writes are synchronous; when a call returns, the value is stored
//!
//! ## Available Backends
//!
//! - [`InMemoryStorage`] - For testing and ephemeral state
//! - [`FileStorage`] - Durable storage in a single JSON file
//!
//! [`default_storage`] returns the process-wide durable medium used when a
//! host does not pick a backend itself.
//!
//! ## Example
//!
//! ```rust
//! use fieldsync_storage::{InMemoryStorage, KeyValueStorage};
//!
//! let storage = InMemoryStorage::new();
//! storage.set_item("count", "1").unwrap();
//! assert_eq!(storage.get_item("count").unwrap().as_deref(), Some("1"));
//! assert_eq!(storage.get_item("missing").unwrap(), None);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod default;
mod error;
mod file;
mod memory;

pub use backend::KeyValueStorage;
pub use default::{default_storage, DEFAULT_STORAGE_FILE, STORAGE_PATH_ENV};
pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::InMemoryStorage;
