//! Property tests for values carried through storage by the default codec.

use fieldsync_core::{field, FieldMap, Store, SyncConfig, SyncPlugin};
use fieldsync_storage::InMemoryStorage;
use fieldsync_testkit::prelude::*;
use proptest::prelude::*;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
struct Document {
    value: Value,
}

fn document_store(storage: Arc<InMemoryStorage>, prefix: &str) -> Store<Document> {
    Store::builder(Document::default())
        .plugin(SyncPlugin::new(
            FieldMap::new().track(field!(Document, value)),
            SyncConfig::new().storage(storage).key_prefix(prefix),
        ))
        .build()
        .unwrap()
}

fn todo_store(storage: Arc<RecordingStorage>) -> Store<TodoState> {
    Store::builder(TodoState::default())
        .plugin(SyncPlugin::new(
            FieldMap::new()
                .track(field!(TodoState, todos))
                .track(field!(TodoState, last_id)),
            SyncConfig::new().storage(storage),
        ))
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A value written by one store is what a fresh store loads.
    #[test]
    fn json_values_survive_restart(value in json_value_strategy(), prefix in key_prefix_strategy()) {
        let storage = Arc::new(InMemoryStorage::new());

        let store = document_store(storage.clone(), &prefix);
        store.commit("value", |s| s.value = value.clone()).unwrap();

        let restarted = document_store(storage, &prefix);
        prop_assert_eq!(&restarted.state().value, &value);
    }

    /// Todo lists round-trip, including their nested flags.
    #[test]
    fn todo_lists_survive_restart(todos in todos_strategy()) {
        let storage = Arc::new(RecordingStorage::new());

        let store = todo_store(storage.clone());
        store.commit("load", |s| s.todos = todos.clone()).unwrap();

        let restarted = todo_store(storage);
        prop_assert_eq!(&restarted.state().todos, &todos);
    }

    /// Storage always holds the encoding of the current state, and a
    /// transition that changes nothing writes nothing.
    #[test]
    fn storage_tracks_state(ops in todo_operations_strategy(24)) {
        let storage = Arc::new(RecordingStorage::new());
        let store = todo_store(storage.clone());

        for op in ops {
            let before = storage.write_count();
            match op {
                TodoOperation::Add { text } => {
                    add_todo(&store, &text).unwrap();
                }
                TodoOperation::Toggle { index } => {
                    let id = store.with_state(|s| {
                        (!s.todos.is_empty()).then(|| s.todos[index % s.todos.len()].id)
                    });
                    if let Some(id) = id {
                        toggle_todo(&store, id).unwrap();
                    }
                }
                TodoOperation::Noop => {
                    store.commit("noop", |_| {}).unwrap();
                    prop_assert_eq!(storage.write_count(), before);
                }
            }

            let state = store.state();
            if !state.todos.is_empty() {
                let stored = storage.value("todos").unwrap();
                prop_assert_eq!(stored, serde_json::to_string(&state.todos).unwrap());
            }
            prop_assert_eq!(
                storage.value("last_id"),
                (state.last_id > 0).then(|| state.last_id.to_string())
            );
        }
    }
}
