//! Hydration and persist-on-change benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fieldsync_bench::generate_todos;
use fieldsync_core::{field, FieldMap, Store, SyncConfig, SyncPlugin, TriggerStrategy};
use fieldsync_storage::{InMemoryStorage, KeyValueStorage};
use fieldsync_testkit::{CounterState, TodoState};
use std::sync::Arc;

fn todo_plugin(storage: Arc<InMemoryStorage>, strategy: TriggerStrategy) -> SyncPlugin<TodoState> {
    SyncPlugin::new(
        FieldMap::new()
            .track(field!(TodoState, todos).on_transition("toggleTodo"))
            .track(field!(TodoState, last_id)),
        SyncConfig::new().storage(storage).strategy(strategy),
    )
}

/// Benchmark a counter commit under each trigger strategy.
fn bench_commit_counter(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit_counter");

    for strategy in [TriggerStrategy::ValueWatch, TriggerStrategy::NamedTransition] {
        group.bench_function(format!("{strategy:?}"), |b| {
            let storage = Arc::new(InMemoryStorage::new());
            let store = Store::builder(CounterState::default())
                .plugin(SyncPlugin::new(
                    FieldMap::new().track(field!(CounterState, count)),
                    SyncConfig::new().storage(storage).strategy(strategy),
                ))
                .build()
                .unwrap();

            b.iter(|| {
                store.commit("count", |s| s.count += 1).unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark toggling one item in lists of growing size.
///
/// Value watching compares and re-encodes the whole list on every commit.
fn bench_toggle_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggle_in_list");

    for count in [10usize, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let storage = Arc::new(InMemoryStorage::new());
            let store = Store::builder(TodoState {
                todos: generate_todos(count, 32),
                last_id: count as u64,
            })
            .plugin(todo_plugin(storage, TriggerStrategy::ValueWatch))
            .build()
            .unwrap();

            b.iter(|| {
                store
                    .commit("toggleTodo", |s| {
                        let todo = &mut s.todos[count / 2];
                        todo.done = !todo.done;
                    })
                    .unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark building a store that hydrates a stored list.
fn bench_hydrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("hydrate");

    for count in [10usize, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let storage = Arc::new(InMemoryStorage::new());
            let todos = serde_json::to_string(&generate_todos(count, 32)).unwrap();
            storage.set_item("todos", &todos).unwrap();
            storage.set_item("last_id", &count.to_string()).unwrap();
            let plugin = todo_plugin(storage, TriggerStrategy::ValueWatch);

            b.iter(|| {
                let store = Store::builder(TodoState::default())
                    .plugin(plugin.clone())
                    .build()
                    .unwrap();
                black_box(store.state().todos.len());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_commit_counter,
    bench_toggle_in_list,
    bench_hydrate,
);

criterion_main!(benches);
