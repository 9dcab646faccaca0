//! # fieldsync Testkit
//!
//! Test utilities for fieldsync.
//!
//! This crate provides:
//! - Fixture states (counter, name, todo list, stoplight) and the
//!   transitions the tests commit against them
//! - A recording storage wrapper for counting writes
//! - Temporary file-backed storage helpers
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use fieldsync_core::{field, FieldMap, Store, SyncConfig, SyncPlugin};
//! use fieldsync_testkit::prelude::*;
//! use std::sync::Arc;
//!
//! let storage = Arc::new(RecordingStorage::new());
//! let plugin = SyncPlugin::new(
//!     FieldMap::new().track(field!(CounterState, count)),
//!     SyncConfig::new().storage(storage.clone()),
//! );
//! let store = Store::builder(CounterState::default()).plugin(plugin).build().unwrap();
//!
//! increment(&store).unwrap();
//! assert_eq!(storage.write_count(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
