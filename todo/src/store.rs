//! `TodoStore`: the call surface a view layer uses.
//!
//! Each operation sends the matching command through the runtime
//! [`Store`] and reads the outcome back from state. Invalid input and lookup
//! misses are reported as `None`, never as errors.

use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{TodoAction, TodoId, TodoItem, TodoRejection, TodoState};
use composable_todo_core::environment::SystemClock;
use composable_todo_runtime::{Store, StoreConfig};
use std::sync::Arc;

type TodoRuntime = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// In-memory to-do list for one session
///
/// # Example
///
/// ```
/// use todo::TodoStore;
///
/// let mut todos = TodoStore::new();
/// let item = todos.add("Buy milk").unwrap();
/// assert_eq!(item.id.value(), 1);
///
/// assert!(todos.toggle(item.id).unwrap().completed);
/// assert!(todos.add("   ").is_none());
/// assert_eq!(todos.list().len(), 1);
/// ```
pub struct TodoStore {
    runtime: TodoRuntime,
}

impl TodoStore {
    /// Creates an empty store using the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_environment(TodoEnvironment::new(Arc::new(SystemClock)))
    }

    /// Creates an empty store with the given environment
    #[must_use]
    pub fn with_environment(env: TodoEnvironment) -> Self {
        Self::with_config(env, StoreConfig::default())
    }

    /// Creates an empty store with the given environment and runtime configuration
    ///
    /// Every successful command feeds one event back, so the feedback depth
    /// must be at least 1.
    #[must_use]
    pub fn with_config(env: TodoEnvironment, config: StoreConfig) -> Self {
        Self {
            runtime: Store::with_config(TodoState::new(), TodoReducer::new(), env, config),
        }
    }

    /// Adds a todo
    ///
    /// The title is trimmed. Returns the created item, or `None` when the
    /// trimmed title is empty; in that case nothing changes.
    pub fn add(&mut self, title: &str) -> Option<TodoItem> {
        let id = self.runtime.state(|s| s.next_id);
        self.dispatch(TodoAction::AddTodo {
            title: title.to_string(),
        });
        self.get(id)
    }

    /// Flips a todo between open and completed
    ///
    /// Returns the updated item, or `None` if no todo has this id.
    pub fn toggle(&mut self, id: TodoId) -> Option<TodoItem> {
        self.dispatch(TodoAction::ToggleTodo { id });
        self.get(id)
    }

    /// Removes a todo; unknown ids are ignored
    pub fn remove(&mut self, id: TodoId) {
        self.dispatch(TodoAction::RemoveTodo { id });
    }

    /// Returns a copy of all todos in display order
    #[must_use]
    pub fn list(&self) -> Vec<TodoItem> {
        self.runtime.state(|s| s.items.clone())
    }

    /// Removes every todo and restarts identifiers at 1
    pub fn clear(&mut self) {
        self.dispatch(TodoAction::ClearTodos);
    }

    /// Returns a copy of one todo
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<TodoItem> {
        self.runtime.state(|s| s.get(id).cloned())
    }

    /// Number of todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.runtime.state(TodoState::count)
    }

    /// Whether the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.runtime.state(TodoState::completed_count)
    }

    /// Why the most recent operation did nothing, if it was rejected
    #[must_use]
    pub fn last_rejection(&self) -> Option<TodoRejection> {
        self.runtime.state(|s| s.last_error.clone())
    }

    fn dispatch(&mut self, action: TodoAction) {
        if let Err(error) = self.runtime.send(action) {
            tracing::error!(%error, "Todo command failed");
            return;
        }
        if let Some(reason) = self.last_rejection() {
            tracing::debug!(%reason, "Todo command rejected");
        }
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("runtime", &self.runtime)
            .finish()
    }
}
