//! Domain types for the to-do list.
//!
//! A to-do list is an ordered collection of items that can be added,
//! toggled between open and completed, removed, and cleared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a todo item
///
/// Identifiers are positive and handed out in increasing order by the list
/// that owns the item. They are never reused until the list is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TodoId(u64);

impl TodoId {
    /// The first identifier a fresh list assigns
    pub const FIRST: Self = Self(1);

    /// Creates a `TodoId` from a raw number
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw number
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The identifier assigned after this one, or `None` at the end of the range
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Trimmed, non-empty title
    pub title: String,
    /// Whether the todo is completed
    pub completed: bool,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
    /// When the todo was last completed (if currently completed)
    pub completed_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    /// Creates a new, open todo item
    #[must_use]
    pub const fn new(id: TodoId, title: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            completed: false,
            created_at,
            completed_at: None,
        }
    }

    /// Sets the completion flag, stamping or clearing `completed_at`
    pub fn set_completed(&mut self, completed: bool, at: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = completed.then_some(at);
    }
}

impl std::fmt::Display for TodoItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = if self.completed { 'X' } else { ' ' };
        write!(f, "[{mark}] {}", self.title)
    }
}

/// Why a todo command was not applied
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoRejection {
    /// The title was empty or whitespace only
    #[error("Todo title cannot be empty")]
    EmptyTitle,

    /// No todo has the requested identifier
    #[error("Todo {0} not found")]
    NotFound(TodoId),

    /// Every identifier has been handed out since the last clear
    #[error("No todo identifiers left; clear the list to start over")]
    IdsExhausted,
}

/// State of the to-do list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    /// All todos, in display order
    pub items: Vec<TodoItem>,
    /// Identifier the next added todo receives
    pub next_id: TodoId,
    /// Rejection of the most recent command, if it was rejected
    pub last_error: Option<TodoRejection>,
}

impl TodoState {
    /// Creates a new empty todo state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|t| t.completed).count()
    }

    /// Returns the number of open todos
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.count() - self.completed_count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|t| t.id == id)
    }

    /// Returns a mutable todo by ID
    pub fn get_mut(&mut self, id: TodoId) -> Option<&mut TodoItem> {
        self.items.iter_mut().find(|t| t.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }
}

/// Actions representing commands and events for todos
///
/// Commands are validated by the reducer and produce events. Events describe
/// what changed and are applied to state; they can also be replayed directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Add a todo with the given (untrimmed) title
    AddTodo {
        /// Raw title text
        title: String,
    },

    /// Command: Flip a todo between open and completed
    ToggleTodo {
        /// Todo to toggle
        id: TodoId,
    },

    /// Command: Remove a todo
    RemoveTodo {
        /// Todo to remove
        id: TodoId,
    },

    /// Command: Remove every todo and restart identifiers at 1
    ClearTodos,

    // ========== Events ==========
    /// Event: Todo was added
    TodoAdded {
        /// The new item
        item: TodoItem,
    },

    /// Event: Todo completion changed
    TodoToggled {
        /// Todo identifier
        id: TodoId,
        /// New completion flag
        completed: bool,
        /// When the change happened
        at: DateTime<Utc>,
    },

    /// Event: Todo was removed
    TodoRemoved {
        /// Todo identifier
        id: TodoId,
    },

    /// Event: List was cleared
    TodosCleared,

    /// Event: A command was rejected
    CommandRejected {
        /// Why it was rejected
        reason: TodoRejection,
    },
}

impl TodoAction {
    /// Returns `true` for commands
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::AddTodo { .. } | Self::ToggleTodo { .. } | Self::RemoveTodo { .. } | Self::ClearTodos
        )
    }

    /// Returns `true` for events
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }
}
