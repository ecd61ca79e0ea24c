//! In-memory to-do list built with Composable Todo.
//!
//! The list is a reducer: commands (`AddTodo`, `ToggleTodo`, `RemoveTodo`,
//! `ClearTodos`) are validated against state and turned into events, which
//! the runtime feeds back into the reducer to update an ordered `Vec` of
//! items. [`TodoStore`] wraps the runtime
//! `Store` and exposes the plain call surface a view layer needs:
//!
//! - `add(title)`: trims the title, returns the new item or `None` if blank
//! - `toggle(id)`: flips completion, returns the item or `None` if unknown
//! - `remove(id)`: removes the item; unknown ids are ignored
//! - `list()`: owned snapshot in display order
//! - `clear()`: empties the list and restarts identifiers at 1
//!
//! Identifiers start at 1, grow by one per successful add and are never
//! reused until `clear()`.
//!
//! # Quick Start
//!
//! ```
//! use todo::TodoStore;
//!
//! let mut todos = TodoStore::new();
//! let a = todos.add("A").unwrap();
//! let b = todos.add("B").unwrap();
//! todos.remove(a.id);
//!
//! assert_eq!(todos.list(), vec![b]);
//!
//! todos.clear();
//! assert_eq!(todos.add("C").unwrap().id.value(), 1);
//! ```

pub mod command;
pub mod config;
pub mod reducer;
pub mod shell;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use command::{Command, CommandError};
pub use config::ShellConfig;
pub use reducer::{TodoEnvironment, TodoReducer};
pub use shell::run_shell;
pub use store::TodoStore;
pub use types::{TodoAction, TodoId, TodoItem, TodoRejection, TodoState};
