//! A minimal observable state container.
//!
//! [`Store`] holds one state value and exposes the three things the sync
//! engine relies on:
//!
//! - named transitions ([`Store::commit`]) that notify observers
//!   synchronously, before `commit` returns
//! - a transition stream ([`Store::subscribe`]) delivering each committed
//!   [`Transition`] with the resulting state
//! - a field watch ([`Store::watch`]) that compares a projected value
//!   structurally and fires only when it changed
//!
//! Plugins are installed while the store is built, so they can prepare
//! state before the host ever reads it.
//!
//! # Usage
//!
//! ```rust
//! use fieldsync_core::Store;
//!
//! struct Counter {
//!     count: u64,
//! }
//!
//! let store = Store::builder(Counter { count: 0 }).build().unwrap();
//! store.commit("increment", |s| s.count += 1).unwrap();
//! assert_eq!(store.state().count, 1);
//! ```
//!
//! Observers run while the store holds its locks. They must not commit to,
//! subscribe to or watch the same store.

use crate::error::SyncResult;
use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// A committed named transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Sequence number of the commit, starting at 1.
    pub sequence: u64,
    /// Name the transition was committed under.
    pub name: String,
}

/// Installs behaviour on a store while it is being built.
pub trait Plugin<S>: Send + Sync {
    /// Called once per store, in registration order, before `build` returns.
    ///
    /// # Errors
    ///
    /// Any error aborts the build and is returned from
    /// [`StoreBuilder::build`].
    fn install(&self, store: &Store<S>) -> SyncResult<()>;
}

type Observer<S> = Box<dyn FnMut(&Transition, &S) -> SyncResult<()> + Send>;

struct Registry<S> {
    observers: Mutex<Vec<(u64, Observer<S>)>>,
    next_id: AtomicU64,
}

impl<S> Registry<S> {
    fn register(&self, observer: Observer<S>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers.lock().push((id, observer));
        id
    }

    /// Runs every observer; all run even if one fails, the first error wins.
    fn notify(&self, transition: &Transition, state: &S) -> SyncResult<()> {
        let mut first_error = None;
        for (_, observer) in self.observers.lock().iter_mut() {
            if let Err(e) = observer(transition, state) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

trait Unregister: Send + Sync {
    fn unregister(&self, id: u64) -> bool;
}

impl<S> Unregister for Registry<S> {
    fn unregister(&self, id: u64) -> bool {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|(oid, _)| *oid != id);
        observers.len() != before
    }
}

/// Handle to one registered observer.
///
/// Dropping the handle does not cancel the observer; it stays active for as
/// long as the store lives. Call [`Subscription::cancel`] to release it
/// early.
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Unregister>,
}

impl Subscription {
    /// Removes the observer. Returns false if it was already gone.
    pub fn cancel(self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.unregister(self.id))
    }

    /// Returns the observer id, unique within its store.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// An observable state container.
pub struct Store<S> {
    state: RwLock<S>,
    registry: Arc<Registry<S>>,
    sequence: AtomicU64,
}

impl<S: Send + Sync + 'static> Store<S> {
    /// Starts building a store around `initial`.
    pub fn builder(initial: S) -> StoreBuilder<S> {
        StoreBuilder::new(initial)
    }

    fn new(initial: S) -> Self {
        Self {
            state: RwLock::new(initial),
            registry: Arc::new(Registry {
                observers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
            sequence: AtomicU64::new(0),
        }
    }

    /// Returns a read guard over the current state.
    pub fn state(&self) -> RwLockReadGuard<'_, S> {
        self.state.read()
    }

    /// Runs `f` against the current state.
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&*self.state.read())
    }

    /// Applies `mutation` as the transition `name`, then notifies observers.
    ///
    /// Every observer has run by the time this returns. The mutation is kept
    /// even when an observer fails.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an observer.
    pub fn commit(&self, name: &str, mutation: impl FnOnce(&mut S)) -> SyncResult<()> {
        let mut state = self.state.write();
        mutation(&mut *state);
        let state = RwLockWriteGuard::downgrade(state);

        let transition = Transition {
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            name: name.to_string(),
        };
        tracing::trace!(sequence = transition.sequence, name, "commit");
        self.registry.notify(&transition, &*state)
    }

    /// Changes state without a transition.
    ///
    /// No observer is notified. Watchers registered afterwards take the new
    /// value as their baseline; watchers registered earlier report the
    /// difference on the next commit. Meant for loading state before the
    /// host starts using the store.
    pub fn replace_untracked<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut *self.state.write())
    }

    /// Calls `observer` after every committed transition.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: FnMut(&Transition, &S) -> SyncResult<()> + Send + 'static,
    {
        self.register(Box::new(observer))
    }

    /// Calls `callback` whenever the value selected by `getter` changes.
    ///
    /// After each commit the selected value is compared with the last seen
    /// one using `PartialEq`, so changes anywhere inside nested collections
    /// or structs are seen, not just replacement of the whole value. The
    /// baseline is taken now, from the current state.
    pub fn watch<T, G, C>(&self, getter: G, mut callback: C) -> Subscription
    where
        T: Clone + PartialEq + Send + 'static,
        G: Fn(&S) -> &T + Send + 'static,
        C: FnMut(&T) -> SyncResult<()> + Send + 'static,
    {
        let mut last = getter(&*self.state.read()).clone();
        self.register(Box::new(move |_: &Transition, state: &S| {
            let current = getter(state);
            if *current == last {
                return Ok(());
            }
            last = current.clone();
            callback(&last)
        }))
    }

    /// Returns the number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.registry.observers.lock().len()
    }

    /// Returns the sequence number of the last commit, 0 if none.
    pub fn last_sequence(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    fn register(&self, observer: Observer<S>) -> Subscription {
        let id = self.registry.register(observer);
        let registry: Arc<dyn Unregister> = self.registry.clone();
        Subscription {
            id,
            registry: Arc::downgrade(&registry),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.state.read())
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Builder that installs plugins before handing out a [`Store`].
pub struct StoreBuilder<S> {
    initial: S,
    plugins: Vec<Box<dyn Plugin<S>>>,
}

impl<S: Send + Sync + 'static> StoreBuilder<S> {
    /// Creates a builder around the initial state.
    pub fn new(initial: S) -> Self {
        Self {
            initial,
            plugins: Vec::new(),
        }
    }

    /// Adds a plugin. Plugins are installed in the order they were added.
    #[must_use]
    pub fn plugin(mut self, plugin: impl Plugin<S> + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Builds the store and installs every plugin.
    ///
    /// # Errors
    ///
    /// Returns the first plugin installation error.
    pub fn build(self) -> SyncResult<Store<S>> {
        let store = Store::new(self.initial);
        for plugin in &self.plugins {
            plugin.install(&store)?;
        }
        Ok(store)
    }
}
