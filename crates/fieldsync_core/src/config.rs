//! Sync plugin configuration.

use crate::error::SyncResult;
use fieldsync_storage::{default_storage, KeyValueStorage};
use std::fmt;
use std::sync::Arc;

/// What makes a tracked field get written back to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerStrategy {
    /// Write whenever the field's value changes, whatever transition
    /// changed it. Nested changes count.
    #[default]
    ValueWatch,
    /// Write when a transition named after the field's trigger is
    /// committed, whether or not the value changed.
    NamedTransition,
}

/// Configuration for a [`crate::SyncPlugin`].
#[derive(Clone, Default)]
pub struct SyncConfig {
    /// Backend to read and write. `None` means [`default_storage`], opened
    /// when the plugin is attached.
    pub storage: Option<Arc<dyn KeyValueStorage>>,

    /// Prepended to every field name to form its storage key.
    pub key_prefix: String,

    /// When fields are written back.
    pub strategy: TriggerStrategy,
}

impl SyncConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `storage` instead of the default backend.
    #[must_use]
    pub fn storage<B: KeyValueStorage + 'static>(mut self, storage: Arc<B>) -> Self {
        self.storage = Some(storage as Arc<dyn KeyValueStorage>);
        self
    }

    /// Uses an already type-erased backend.
    #[must_use]
    pub fn shared_storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Sets the storage key prefix.
    #[must_use]
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Sets the trigger strategy.
    #[must_use]
    pub fn strategy(mut self, strategy: TriggerStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the configured backend, or opens the default one.
    ///
    /// # Errors
    ///
    /// Returns an error if the default backend cannot be opened.
    pub fn resolve_storage(&self) -> SyncResult<Arc<dyn KeyValueStorage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => Ok(default_storage()?),
        }
    }
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("storage", &self.storage.as_ref().map(|_| "custom"))
            .field("key_prefix", &self.key_prefix)
            .field("strategy", &self.strategy)
            .finish()
    }
}
