//! Counter commands.

use crate::app::{App, AppError, AppResult};

/// Prints the state.
pub fn show(app: &App, format: &str) -> AppResult<()> {
    let state = app.store.state();
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&*state)?);
        }
        "text" => {
            println!("count: {}", state.count);
            let done = state.todos.iter().filter(|t| t.done).count();
            println!("todos: {} ({done} done)", state.todos.len());
        }
        other => return Err(AppError::UnknownFormat(other.to_string())),
    }
    Ok(())
}

/// Adds `by` to the counter.
pub fn increment(app: &App, by: u64) -> AppResult<()> {
    app.store.commit("increment", |s| {
        s.count += by;
        s.session_commits += 1;
    })?;
    tracing::info!(count = app.store.state().count, "incremented");
    Ok(())
}
