//! Demo state and its sync setup.

use fieldsync_core::{
    field, Field, FieldMap, Store, SyncConfig, SyncError, SyncPlugin, TriggerStrategy,
};
use fieldsync_storage::{FileStorage, KeyValueStorage, StorageError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by demo commands.
#[derive(Debug, Error)]
pub enum AppError {
    /// Hydration or persistence failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// The storage file could not be opened.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// State could not be rendered.
    #[error("failed to render state: {0}")]
    Render(#[from] serde_json::Error),

    /// No todo carries the requested id.
    #[error("no todo with id {0}")]
    UnknownTodo(u64),

    /// Unsupported `--format` value.
    #[error("unknown output format {0:?} (expected text or json)")]
    UnknownFormat(String),
}

/// Result type for demo commands.
pub type AppResult<T> = Result<T, AppError>;

/// A todo list item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    /// Identifier, unique within the list.
    pub id: u64,
    /// Item text.
    pub text: String,
    /// Whether the item is done.
    pub done: bool,
}

/// Everything the demo keeps in its store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppState {
    /// The counter, stored as a bare decimal.
    pub count: u64,
    /// The todo list.
    pub todos: Vec<Todo>,
    /// Last id handed to a todo.
    pub last_id: u64,
    /// Commits made during this run. Not persisted.
    pub session_commits: u64,
}

/// Where and how state is persisted.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Storage file. `None` uses the process-wide default.
    pub storage: Option<PathBuf>,
    /// Storage key prefix.
    pub prefix: String,
    /// Persist on matching transition names instead of on value changes.
    pub named_transitions: bool,
}

/// A hydrated store wired to its storage.
pub struct App {
    /// The store. Tracked fields are written back on every commit.
    pub store: Store<AppState>,
}

fn fields() -> FieldMap<AppState> {
    FieldMap::new()
        .track(
            Field::custom(
                "count",
                |s: &AppState| &s.count,
                |s: &mut AppState, v| s.count = v,
                |n: &u64| Ok(n.to_string()),
                |raw: &str| Ok(raw.trim().parse()?),
            )
            .on_transition("increment"),
        )
        .track(field!(AppState, todos).on_transition("todos"))
        .track(field!(AppState, last_id).on_transition("todos"))
        .untracked("session_commits")
}

fn plugin(options: &Options) -> AppResult<SyncPlugin<AppState>> {
    let mut config = SyncConfig::new().key_prefix(options.prefix.clone());
    if options.named_transitions {
        config = config.strategy(TriggerStrategy::NamedTransition);
    }
    if let Some(path) = &options.storage {
        config = config.storage(Arc::new(FileStorage::open_with_create_dirs(path)?));
    }
    Ok(SyncPlugin::new(fields(), config))
}

/// Opens storage and builds a hydrated store.
pub fn open(options: &Options) -> AppResult<App> {
    let store = Store::builder(AppState::default())
        .plugin(plugin(options)?)
        .build()?;
    store.with_state(|s| {
        tracing::debug!(count = s.count, todos = s.todos.len(), "loaded state");
    });
    Ok(App { store })
}

/// Removes every value this demo stores under the configured prefix.
pub fn reset(options: &Options) -> AppResult<()> {
    let plugin = plugin(options)?;
    let storage = plugin.config().resolve_storage()?;
    for spec in plugin.specs() {
        storage.remove_item(spec.storage_key())?;
        tracing::info!(key = spec.storage_key(), "removed");
    }
    Ok(())
}
