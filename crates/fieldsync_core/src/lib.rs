//! # fieldsync Core
//!
//! Keeps selected fields of an observable store mirrored into key-value
//! storage, so they survive process restarts.
//!
//! This crate provides:
//! - [`Field`] and [`FieldMap`] for declaring which fields are tracked and
//!   how their values become strings
//! - [`SyncPlugin`], which loads stored values when attached to a store and
//!   writes fields back as they change
//! - [`Store`], a small synchronous observable container the plugin
//!   attaches to
//!
//! Attaching happens in three steps:
//!
//! 1. **Resolve** - each declared field gets its storage key
//!    (`key_prefix + name`), codec and trigger name, once
//! 2. **Hydrate** - stored values replace initial values before the host
//!    reads the store
//! 3. **Persist** - every commit that changes a tracked field writes it
//!    back before `commit` returns
//!
//! ## Example
//!
//! ```rust
//! use fieldsync_core::{field, Field, FieldMap, Store, SyncConfig, SyncPlugin};
//! use fieldsync_storage::{InMemoryStorage, KeyValueStorage};
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Todo {
//!     id: u32,
//!     text: String,
//!     done: bool,
//! }
//!
//! struct App {
//!     count: u64,
//!     todos: Vec<Todo>,
//! }
//!
//! let storage = Arc::new(InMemoryStorage::new());
//! let fields = FieldMap::new()
//!     .track(Field::custom(
//!         "count",
//!         |s: &App| &s.count,
//!         |s: &mut App, v| s.count = v,
//!         |n: &u64| Ok(n.to_string()),
//!         |raw: &str| Ok(raw.parse()?),
//!     ))
//!     .track(field!(App, todos));
//!
//! let store = Store::builder(App { count: 0, todos: Vec::new() })
//!     .plugin(SyncPlugin::new(fields, SyncConfig::new().storage(storage.clone())))
//!     .build()
//!     .unwrap();
//!
//! store
//!     .commit("addTodo", |s| {
//!         s.todos.push(Todo { id: 1, text: "write tests".into(), done: false })
//!     })
//!     .unwrap();
//! store.commit("toggle", |s| s.todos[0].done = true).unwrap();
//!
//! let stored = storage.get_item("todos").unwrap().unwrap();
//! assert!(stored.contains("\"done\":true"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod field;
mod hydrator;
mod persister;
mod plugin;
mod resolver;
mod store;

pub use config::{SyncConfig, TriggerStrategy};
pub use error::{BoxError, SyncError, SyncResult};
pub use field::{Codec, CodecKind, Field};
pub use hydrator::hydrate;
pub use persister::{attach_persistence, persist_field};
pub use plugin::{create_sync_plugin, Attachment, SyncPlugin};
pub use resolver::{resolve, FieldMap, FieldSpec};
pub use store::{Plugin, Store, StoreBuilder, Subscription, Transition};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
