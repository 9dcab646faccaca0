//! The sync plugin: resolver, hydrator and persister wired together.

use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::hydrator::hydrate;
use crate::persister::attach_persistence;
use crate::resolver::{resolve, FieldMap, FieldSpec};
use crate::store::{Plugin, Store, Subscription};
use std::sync::Arc;

/// Keeps the fields named in a [`FieldMap`] in sync with key-value storage.
///
/// Fields are resolved once, here. The plugin can then be attached to
/// stores: attaching loads stored values into the store and registers the
/// observers that write changes back.
///
/// # Example
///
/// ```rust
/// use fieldsync_core::{field, FieldMap, Store, SyncConfig, SyncPlugin};
/// use fieldsync_storage::{InMemoryStorage, KeyValueStorage};
/// use std::sync::Arc;
///
/// struct Counter {
///     count: u64,
/// }
///
/// let storage = Arc::new(InMemoryStorage::with_entries([("count", "41")]));
/// let plugin = SyncPlugin::new(
///     FieldMap::new().track(field!(Counter, count)),
///     SyncConfig::new().storage(storage.clone()),
/// );
///
/// let store = Store::builder(Counter { count: 0 }).plugin(plugin).build().unwrap();
/// assert_eq!(store.state().count, 41);
///
/// store.commit("increment", |s| s.count += 1).unwrap();
/// assert_eq!(storage.get_item("count").unwrap().as_deref(), Some("42"));
/// ```
pub struct SyncPlugin<S> {
    specs: Arc<[FieldSpec<S>]>,
    config: SyncConfig,
}

impl<S: Send + Sync + 'static> SyncPlugin<S> {
    /// Resolves `fields` against `config.key_prefix`.
    pub fn new(fields: FieldMap<S>, config: SyncConfig) -> Self {
        let specs: Arc<[FieldSpec<S>]> = resolve(&fields, &config.key_prefix).into();
        tracing::debug!(
            fields = specs.len(),
            prefix = %config.key_prefix,
            strategy = ?config.strategy,
            "created sync plugin"
        );
        Self { specs, config }
    }

    /// Returns the resolved field specs.
    #[must_use]
    pub fn specs(&self) -> &[FieldSpec<S>] {
        &self.specs
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Hydrates `store` from storage, then starts persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the default storage cannot be opened, or if a
    /// stored value cannot be read or decoded. No observer is registered
    /// when hydration fails.
    pub fn attach(&self, store: &Store<S>) -> SyncResult<Attachment> {
        let storage = self.config.resolve_storage()?;
        let hydrated = hydrate(&self.specs, storage.as_ref(), store)?;
        let subscriptions = attach_persistence(&self.specs, storage, store, self.config.strategy);
        tracing::debug!(
            hydrated,
            observers = subscriptions.len(),
            "attached sync plugin"
        );
        Ok(Attachment {
            hydrated,
            subscriptions,
        })
    }
}

impl<S: Send + Sync + 'static> Plugin<S> for SyncPlugin<S> {
    fn install(&self, store: &Store<S>) -> SyncResult<()> {
        self.attach(store).map(|_| ())
    }
}

impl<S> Clone for SyncPlugin<S> {
    fn clone(&self) -> Self {
        Self {
            specs: self.specs.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S> std::fmt::Debug for SyncPlugin<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncPlugin")
            .field("specs", &self.specs)
            .field("config", &self.config)
            .finish()
    }
}

/// Shorthand for [`SyncPlugin::new`].
pub fn create_sync_plugin<S: Send + Sync + 'static>(
    fields: FieldMap<S>,
    config: SyncConfig,
) -> SyncPlugin<S> {
    SyncPlugin::new(fields, config)
}

/// A plugin attached to one store.
///
/// Dropping it leaves persistence running for the life of the store.
#[derive(Debug)]
#[must_use]
pub struct Attachment {
    hydrated: usize,
    subscriptions: Vec<Subscription>,
}

impl Attachment {
    /// Number of fields loaded from storage.
    pub fn hydrated(&self) -> usize {
        self.hydrated
    }

    /// Number of observers registered on the store.
    pub fn observers(&self) -> usize {
        self.subscriptions.len()
    }

    /// Stops persisting. Values already written stay in storage.
    pub fn detach(self) {
        for subscription in self.subscriptions {
            subscription.cancel();
        }
    }
}
