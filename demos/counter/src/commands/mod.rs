//! Command implementations.

pub mod counter;
pub mod todo;
