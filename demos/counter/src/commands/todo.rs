//! Todo list commands.

use crate::app::{App, AppError, AppResult, Todo};

/// Appends an item and prints its id.
pub fn add(app: &App, text: &str) -> AppResult<()> {
    let mut id = 0;
    app.store.commit("todos", |s| {
        s.last_id += 1;
        id = s.last_id;
        s.todos.push(Todo {
            id,
            text: text.to_string(),
            done: false,
        });
        s.session_commits += 1;
    })?;
    println!("added #{id}");
    Ok(())
}

/// Flips `done` on the item with `id`.
pub fn toggle(app: &App, id: u64) -> AppResult<()> {
    if !app.store.with_state(|s| s.todos.iter().any(|t| t.id == id)) {
        return Err(AppError::UnknownTodo(id));
    }
    app.store.commit("todos", |s| {
        if let Some(todo) = s.todos.iter_mut().find(|t| t.id == id) {
            todo.done = !todo.done;
        }
        s.session_commits += 1;
    })?;
    tracing::info!(id, "toggled");
    Ok(())
}

/// Prints the list.
pub fn list(app: &App) {
    let state = app.store.state();
    if state.todos.is_empty() {
        println!("nothing to do");
        return;
    }
    for todo in &state.todos {
        let mark = if todo.done { 'x' } else { ' ' };
        println!("[{mark}] #{} {}", todo.id, todo.text);
    }
}
