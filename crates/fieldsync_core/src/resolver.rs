//! Field resolution.
//!
//! Turns the host's [`FieldMap`] into a fixed list of [`FieldSpec`]s, each
//! carrying its final storage key, codec and trigger name. Resolution
//! happens once, when the plugin is built; hydration and persistence only
//! ever iterate the resolved list.

use crate::error::SyncResult;
use crate::field::{CodecKind, Field};
use crate::store::{Store, Subscription};
use fieldsync_storage::KeyValueStorage;
use std::fmt;
use std::sync::Arc;

/// Type-erased operations on one declared field.
pub(crate) trait FieldBinding<S>: Send + Sync {
    fn name(&self) -> &str;
    fn trigger(&self) -> Option<&str>;
    fn codec_kind(&self) -> CodecKind;
    fn encode(&self, state: &S, key: &str) -> SyncResult<String>;
    fn decode_into(&self, state: &mut S, raw: &str, key: &str) -> SyncResult<()>;
    fn watch(
        &self,
        store: &Store<S>,
        storage: Arc<dyn KeyValueStorage>,
        key: String,
    ) -> Subscription;
}

impl<S, T> FieldBinding<S> for Field<S, T>
where
    S: Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn trigger(&self) -> Option<&str> {
        self.trigger.as_deref()
    }

    fn codec_kind(&self) -> CodecKind {
        self.codec.kind()
    }

    fn encode(&self, state: &S, key: &str) -> SyncResult<String> {
        self.codec.encode((self.get)(state), key)
    }

    fn decode_into(&self, state: &mut S, raw: &str, key: &str) -> SyncResult<()> {
        let value = self.codec.decode(raw, key)?;
        (self.set)(state, value);
        Ok(())
    }

    fn watch(
        &self,
        store: &Store<S>,
        storage: Arc<dyn KeyValueStorage>,
        key: String,
    ) -> Subscription {
        let get = self.get.clone();
        let codec = self.codec.clone();
        store.watch(
            move |state: &S| get(state),
            move |value: &T| {
                let encoded = codec.encode(value, &key)?;
                storage.set_item(&key, &encoded)?;
                tracing::debug!(key = %key, bytes = encoded.len(), "persisted field on change");
                Ok(())
            },
        )
    }
}

/// Ordered declaration of which state fields are tracked.
///
/// Each name appears at most once. Declaring a name again replaces the
/// earlier entry in place. An entry declared with
/// [`FieldMap::untracked`] is kept in the map but resolves to nothing.
pub struct FieldMap<S> {
    entries: Vec<(String, Option<Arc<dyn FieldBinding<S>>>)>,
}

impl<S: Send + Sync + 'static> FieldMap<S> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Tracks `field`.
    #[must_use]
    pub fn track<T>(self, field: Field<S, T>) -> Self
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        let name = field.name.clone();
        let binding: Arc<dyn FieldBinding<S>> = Arc::new(field);
        self.insert(name, Some(binding))
    }

    /// Tracks `field` if present. `None` declares nothing.
    #[must_use]
    pub fn track_opt<T>(self, field: Option<Field<S, T>>) -> Self
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        match field {
            Some(field) => self.track(field),
            None => self,
        }
    }

    /// Declares `name` without tracking it.
    #[must_use]
    pub fn untracked(self, name: impl Into<String>) -> Self {
        self.insert(name.into(), None)
    }

    /// Returns the number of declared names, tracked or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the declared names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    fn insert(mut self, name: String, binding: Option<Arc<dyn FieldBinding<S>>>) -> Self {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = binding,
            None => self.entries.push((name, binding)),
        }
        self
    }
}

impl<S: Send + Sync + 'static> Default for FieldMap<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for FieldMap<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(name, binding)| (name, binding.as_ref().map(|b| b.codec_kind()))),
            )
            .finish()
    }
}

/// A resolved, immutable field descriptor.
pub struct FieldSpec<S> {
    storage_key: String,
    trigger: String,
    binding: Arc<dyn FieldBinding<S>>,
}

impl<S> FieldSpec<S> {
    /// Returns the state field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.binding.name()
    }

    /// Returns the key this field is stored under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Returns the transition name that triggers a write under
    /// [`crate::TriggerStrategy::NamedTransition`].
    #[must_use]
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Returns the codec kind.
    #[must_use]
    pub fn codec_kind(&self) -> CodecKind {
        self.binding.codec_kind()
    }

    pub(crate) fn encode(&self, state: &S) -> SyncResult<String> {
        self.binding.encode(state, &self.storage_key)
    }

    pub(crate) fn decode_into(&self, state: &mut S, raw: &str) -> SyncResult<()> {
        self.binding.decode_into(state, raw, &self.storage_key)
    }

    pub(crate) fn watch(&self, store: &Store<S>, storage: Arc<dyn KeyValueStorage>) -> Subscription {
        self.binding.watch(store, storage, self.storage_key.clone())
    }
}

impl<S> Clone for FieldSpec<S> {
    fn clone(&self) -> Self {
        Self {
            storage_key: self.storage_key.clone(),
            trigger: self.trigger.clone(),
            binding: self.binding.clone(),
        }
    }
}

impl<S> fmt::Debug for FieldSpec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name())
            .field("storage_key", &self.storage_key)
            .field("trigger", &self.trigger)
            .field("codec", &self.codec_kind())
            .finish()
    }
}

/// Resolves `fields` against `key_prefix`.
///
/// Untracked entries are dropped. The result keeps declaration order.
pub fn resolve<S>(fields: &FieldMap<S>, key_prefix: &str) -> Vec<FieldSpec<S>> {
    fields
        .entries
        .iter()
        .filter_map(|(name, binding)| {
            let Some(binding) = binding else {
                tracing::trace!(field = %name, "skipping untracked field");
                return None;
            };
            Some(FieldSpec {
                storage_key: format!("{key_prefix}{name}"),
                trigger: binding.trigger().unwrap_or(name).to_string(),
                binding: binding.clone(),
            })
        })
        .collect()
}
