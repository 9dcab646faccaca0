//! Property-based test generators using proptest.
//!
//! Provides strategies for generating field values that the default codec
//! must carry through storage unchanged.

use crate::fixtures::Todo;
use proptest::prelude::*;
use serde_json::Value;

/// Strategy for generating storage key prefixes, including the empty one.
pub fn key_prefix_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("([A-Z]{1,6}-)?").expect("Invalid regex")
}

/// Strategy for generating storage keys.
pub fn storage_key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_-]{0,15}").expect("Invalid regex")
}

/// Strategy for generating todo items.
pub fn todo_strategy() -> impl Strategy<Value = Todo> {
    (any::<u64>(), ".{0,32}", any::<bool>()).prop_map(|(id, text, done)| Todo { id, text, done })
}

/// Strategy for generating todo lists.
pub fn todos_strategy() -> impl Strategy<Value = Vec<Todo>> {
    prop::collection::vec(todo_strategy(), 0..16)
}

/// Strategy for generating arbitrary JSON documents.
///
/// Floats are quarter steps, so their decimal text is exact.
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        (-4_000_000i32..4_000_000).prop_map(|n| Value::from(f64::from(n) / 4.0)),
        ".{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..8)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// A store operation for model-based tests.
#[derive(Debug, Clone)]
pub enum TodoOperation {
    /// Append an item.
    Add {
        /// Item text
        text: String,
    },
    /// Flip `done` on the item at this position, modulo the list length.
    Toggle {
        /// Position
        index: usize,
    },
    /// Commit a transition that changes nothing.
    Noop,
}

/// Strategy for generating todo list operations.
pub fn todo_operation_strategy() -> impl Strategy<Value = TodoOperation> {
    prop_oneof![
        "[a-z ]{1,12}".prop_map(|text| TodoOperation::Add { text }),
        any::<usize>().prop_map(|index| TodoOperation::Toggle { index }),
        Just(TodoOperation::Noop),
    ]
}

/// Strategy for generating sequences of todo list operations.
pub fn todo_operations_strategy(max_ops: usize) -> impl Strategy<Value = Vec<TodoOperation>> {
    prop::collection::vec(todo_operation_strategy(), 1..max_ops)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn keys_are_non_empty(key in storage_key_strategy()) {
            prop_assert!(!key.is_empty());
        }

        #[test]
        fn prefixes_end_with_dash(prefix in key_prefix_strategy()) {
            prop_assert!(prefix.is_empty() || prefix.ends_with('-'));
        }
    }
}
