//! Load-on-attach.

use crate::error::SyncResult;
use crate::resolver::FieldSpec;
use crate::store::Store;
use fieldsync_storage::KeyValueStorage;

/// Loads stored values into `store`.
///
/// For each spec, a missing key leaves the field at its initial value; a
/// present key is decoded and assigned without a transition, so nothing is
/// written back. Returns the number of fields loaded.
///
/// # Errors
///
/// Stops at and returns the first read or decode error. Fields before it
/// stay loaded; a corrupt value is never silently replaced.
pub fn hydrate<S>(
    specs: &[FieldSpec<S>],
    storage: &dyn KeyValueStorage,
    store: &Store<S>,
) -> SyncResult<usize>
where
    S: Send + Sync + 'static,
{
    let mut loaded = 0;
    for spec in specs {
        let Some(raw) = storage.get_item(spec.storage_key())? else {
            tracing::trace!(key = spec.storage_key(), "no stored value, keeping initial");
            continue;
        };

        store.replace_untracked(|state| spec.decode_into(state, &raw))?;
        tracing::debug!(key = spec.storage_key(), "hydrated field");
        loaded += 1;
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::field;
    use crate::resolver::{resolve, FieldMap};
    use fieldsync_storage::InMemoryStorage;

    #[derive(Debug, Default)]
    struct State {
        count: u64,
        name: String,
    }

    fn specs(prefix: &str) -> Vec<FieldSpec<State>> {
        let map = FieldMap::new()
            .track(field!(State, count))
            .track(field!(State, name));
        resolve(&map, prefix)
    }

    fn store() -> Store<State> {
        Store::builder(State::default()).build().unwrap()
    }

    #[test]
    fn empty_storage_keeps_initial() {
        let store = store();
        let loaded = hydrate(&specs(""), &InMemoryStorage::new(), &store).unwrap();
        assert_eq!(loaded, 0);
        assert_eq!(store.state().count, 0);
        assert_eq!(store.state().name, "");
    }

    #[test]
    fn present_values_are_loaded() {
        let storage = InMemoryStorage::with_entries([("count", "41"), ("name", "\"Schmo\"")]);
        let store = store();

        let loaded = hydrate(&specs(""), &storage, &store).unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(store.state().count, 41);
        assert_eq!(store.state().name, "Schmo");
        assert_eq!(store.last_sequence(), 0);
    }

    #[test]
    fn prefixed_key_wins() {
        let storage = InMemoryStorage::with_entries([("TEST-count", "41"), ("count", "99")]);
        let store = store();

        hydrate(&specs("TEST-"), &storage, &store).unwrap();
        assert_eq!(store.state().count, 41);
    }

    #[test]
    fn decode_error_propagates() {
        let storage = InMemoryStorage::with_entries([("count", "forty-one")]);
        let store = store();

        let err = hydrate(&specs(""), &storage, &store).unwrap_err();
        assert!(matches!(err, SyncError::Decode { ref key, .. } if key == "count"));
        assert_eq!(store.state().count, 0);
    }
}
