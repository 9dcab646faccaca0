//! Property tests: every backend behaves like an insertion-ordered map.

use fieldsync_storage::{FileStorage, InMemoryStorage, KeyValueStorage};
use proptest::prelude::*;
use tempfile::tempdir;

#[derive(Debug, Clone)]
enum Op {
    Set(String, String),
    Remove(String),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let key = prop::sample::select(vec!["a", "b", "count", "todos", "P-x"]).prop_map(String::from);
    prop_oneof![
        6 => (key.clone(), ".{0,12}").prop_map(|(k, v)| Op::Set(k, v)),
        2 => key.prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

fn apply_model(model: &mut Vec<(String, String)>, op: &Op) {
    match op {
        Op::Set(k, v) => match model.iter_mut().find(|(mk, _)| mk == k) {
            Some(entry) => entry.1 = v.clone(),
            None => model.push((k.clone(), v.clone())),
        },
        Op::Remove(k) => model.retain(|(mk, _)| mk != k),
        Op::Clear => model.clear(),
    }
}

fn apply_storage(storage: &dyn KeyValueStorage, op: &Op) {
    match op {
        Op::Set(k, v) => storage.set_item(k, v).unwrap(),
        Op::Remove(k) => storage.remove_item(k).unwrap(),
        Op::Clear => storage.clear().unwrap(),
    }
}

fn assert_matches_model(storage: &dyn KeyValueStorage, model: &[(String, String)]) {
    assert_eq!(storage.len().unwrap(), model.len());
    for (i, (k, v)) in model.iter().enumerate() {
        assert_eq!(storage.key(i as i64).unwrap().as_deref(), Some(k.as_str()));
        assert_eq!(storage.get_item(k).unwrap().as_deref(), Some(v.as_str()));
    }
    assert_eq!(storage.key(model.len() as i64).unwrap(), None);
    assert_eq!(storage.key(-1).unwrap(), None);
}

proptest! {
    #[test]
    fn memory_storage_matches_model(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let storage = InMemoryStorage::new();
        let mut model = Vec::new();
        for op in &ops {
            apply_storage(&storage, op);
            apply_model(&mut model, op);
        }
        assert_matches_model(&storage, &model);
    }

    #[test]
    fn file_storage_survives_reopen(ops in prop::collection::vec(op_strategy(), 0..12)) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut model = Vec::new();
        {
            let storage = FileStorage::open(&path).unwrap();
            for op in &ops {
                apply_storage(&storage, op);
                apply_model(&mut model, op);
            }
        }
        let reopened = FileStorage::open(&path).unwrap();
        assert_matches_model(&reopened, &model);
    }
}
