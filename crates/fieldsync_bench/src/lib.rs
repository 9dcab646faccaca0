//! Benchmark utilities.

use fieldsync_testkit::Todo;

/// Generate a todo list of `count` items with `text_len`-byte texts.
pub fn generate_todos(count: usize, text_len: usize) -> Vec<Todo> {
    (0..count)
        .map(|i| Todo {
            id: i as u64 + 1,
            text: "x".repeat(text_len),
            done: i % 2 == 0,
        })
        .collect()
}
