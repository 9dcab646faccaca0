//! Persist-on-change.

use crate::config::TriggerStrategy;
use crate::error::SyncResult;
use crate::resolver::FieldSpec;
use crate::store::{Store, Subscription, Transition};
use fieldsync_storage::KeyValueStorage;
use std::sync::Arc;

/// Registers the observers that write tracked fields back to `storage`.
///
/// With [`TriggerStrategy::ValueWatch`] every spec gets its own watcher,
/// which writes when the field's value differs from the last one seen. With
/// [`TriggerStrategy::NamedTransition`] a single subscriber writes every
/// spec whose trigger equals the committed transition's name.
///
/// Writes happen inside [`Store::commit`], one per qualifying field, before
/// the commit returns. Encode and storage errors come back out of `commit`.
pub fn attach_persistence<S>(
    specs: &[FieldSpec<S>],
    storage: Arc<dyn KeyValueStorage>,
    store: &Store<S>,
    strategy: TriggerStrategy,
) -> Vec<Subscription>
where
    S: Send + Sync + 'static,
{
    match strategy {
        TriggerStrategy::ValueWatch => specs
            .iter()
            .map(|spec| spec.watch(store, storage.clone()))
            .collect(),
        TriggerStrategy::NamedTransition => {
            if specs.is_empty() {
                return Vec::new();
            }
            let specs = specs.to_vec();
            let subscription = store.subscribe(move |transition: &Transition, state: &S| {
                let mut first_error = None;
                for spec in specs.iter().filter(|s| s.trigger() == transition.name) {
                    if let Err(e) = persist_field(spec, state, storage.as_ref()) {
                        first_error.get_or_insert(e);
                    }
                }
                first_error.map_or(Ok(()), Err)
            });
            vec![subscription]
        }
    }
}

/// Encodes the field from `state` and writes it under its storage key.
///
/// # Errors
///
/// Returns encode errors and storage errors unchanged.
pub fn persist_field<S>(
    spec: &FieldSpec<S>,
    state: &S,
    storage: &dyn KeyValueStorage,
) -> SyncResult<()> {
    let encoded = spec.encode(state)?;
    storage.set_item(spec.storage_key(), &encoded)?;
    tracing::debug!(
        key = spec.storage_key(),
        bytes = encoded.len(),
        "persisted field"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use crate::resolver::{resolve, FieldMap};
    use fieldsync_storage::InMemoryStorage;

    #[derive(Debug, Default)]
    struct State {
        count: u64,
        color: String,
    }

    fn setup(strategy: TriggerStrategy) -> (Store<State>, Arc<InMemoryStorage>, Vec<Subscription>) {
        let map = FieldMap::new()
            .track(field!(State, count))
            .track(field!(State, color).on_transition("CHANGE"));
        let specs = resolve(&map, "");
        let storage = Arc::new(InMemoryStorage::new());
        let store = Store::builder(State::default()).build().unwrap();
        let subs = attach_persistence(&specs, storage.clone(), &store, strategy);
        (store, storage, subs)
    }

    #[test]
    fn value_watch_registers_one_watcher_per_field() {
        let (store, _, subs) = setup(TriggerStrategy::ValueWatch);
        assert_eq!(subs.len(), 2);
        assert_eq!(store.observer_count(), 2);
    }

    #[test]
    fn value_watch_writes_on_any_transition() {
        let (store, storage, _) = setup(TriggerStrategy::ValueWatch);

        store.commit("increment", |s| s.count += 1).unwrap();
        assert_eq!(storage.get_item("count").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.get_item("color").unwrap(), None);
    }

    #[test]
    fn named_transition_needs_matching_name() {
        let (store, storage, subs) = setup(TriggerStrategy::NamedTransition);
        assert_eq!(subs.len(), 1);

        store.commit("increment", |s| s.count += 1).unwrap();
        assert_eq!(storage.get_item("count").unwrap(), None);

        store.commit("count", |s| s.count += 1).unwrap();
        assert_eq!(storage.get_item("count").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn named_transition_uses_trigger_override() {
        let (store, storage, _) = setup(TriggerStrategy::NamedTransition);

        store.commit("color", |s| s.color = "red".into()).unwrap();
        assert_eq!(storage.get_item("color").unwrap(), None);

        store.commit("CHANGE", |s| s.color = "yellow".into()).unwrap();
        assert_eq!(
            storage.get_item("color").unwrap().as_deref(),
            Some("\"yellow\"")
        );
    }

    #[test]
    fn named_transition_writes_even_without_change() {
        let (store, storage, _) = setup(TriggerStrategy::NamedTransition);
        store.commit("count", |_| {}).unwrap();
        assert_eq!(storage.get_item("count").unwrap().as_deref(), Some("0"));
    }

    #[test]
    fn storage_errors_surface_from_commit() {
        let map = FieldMap::new().track(field!(State, color));
        let specs = resolve(&map, "");
        let storage = Arc::new(InMemoryStorage::new().with_quota(8));
        let store = Store::builder(State::default()).build().unwrap();
        attach_persistence(&specs, storage.clone(), &store, TriggerStrategy::ValueWatch);

        let result = store.commit("color", |s| s.color = "a very long colour".into());
        assert!(matches!(result, Err(crate::SyncError::Storage(_))));
        assert_eq!(store.state().color, "a very long colour");
        assert_eq!(storage.get_item("color").unwrap(), None);
    }

    #[test]
    fn cancelled_subscriptions_stop_writing() {
        let (store, storage, subs) = setup(TriggerStrategy::ValueWatch);
        for sub in subs {
            assert!(sub.cancel());
        }
        store.commit("count", |s| s.count = 5).unwrap();
        assert!(storage.is_empty().unwrap());
    }
}
