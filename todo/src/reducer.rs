//! Reducer logic for the to-do list.
//!
//! A command is validated against the current state and answered with the
//! event it produces, sent back through the Store as an `Effect::Send`.
//! Events are applied to state. Rejected commands leave the list untouched
//! and record the reason in `last_error`.

use crate::types::{TodoAction, TodoId, TodoItem, TodoRejection, TodoState};
use composable_todo_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};
use std::sync::Arc;

/// Environment dependencies for the Todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for generating timestamps
    pub clock: Arc<dyn Clock>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the to-do list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_add<'a>(state: &TodoState, title: &'a str) -> Result<&'a str, TodoRejection> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TodoRejection::EmptyTitle);
        }
        // next_id must be able to move past the id handed out now
        if state.next_id.next().is_none() {
            return Err(TodoRejection::IdsExhausted);
        }
        Ok(title)
    }

    fn validate_toggle(state: &TodoState, id: TodoId) -> Result<&TodoItem, TodoRejection> {
        state.get(id).ok_or(TodoRejection::NotFound(id))
    }

    /// Counter value after `item` joins the list, or `None` if it may not
    ///
    /// Items already in the list all sit below `next_id`, so an id below it
    /// is either a duplicate or a reused one.
    fn admit(state: &TodoState, item: &TodoItem) -> Option<TodoId> {
        if item.id < state.next_id || item.title.trim().is_empty() {
            return None;
        }
        item.id.next()
    }

    /// Applies an event to state
    fn apply_event(state: &mut TodoState, event: &TodoAction) {
        match event {
            TodoAction::TodoAdded { item } => match Self::admit(state, item) {
                Some(next_id) => {
                    state.next_id = next_id;
                    state.items.push(item.clone());
                    state.last_error = None;
                },
                None => {
                    tracing::warn!(
                        id = %item.id,
                        next_id = %state.next_id,
                        "Ignoring out-of-sequence TodoAdded"
                    );
                },
            },
            TodoAction::TodoToggled { id, completed, at } => {
                if let Some(todo) = state.get_mut(*id) {
                    todo.set_completed(*completed, *at);
                }
                state.last_error = None;
            },
            TodoAction::TodoRemoved { id } => {
                if let Some(index) = state.items.iter().position(|t| t.id == *id) {
                    state.items.remove(index);
                }
                state.last_error = None;
            },
            TodoAction::TodosCleared => {
                state.items.clear();
                state.next_id = TodoId::FIRST;
                state.last_error = None;
            },
            TodoAction::CommandRejected { reason } => {
                state.last_error = Some(reason.clone());
            },
            // Commands are not applied to state
            TodoAction::AddTodo { .. }
            | TodoAction::ToggleTodo { .. }
            | TodoAction::RemoveTodo { .. }
            | TodoAction::ClearTodos => {},
        }
    }

    /// Turns a command into the event it produces
    ///
    /// Returns `None` when the command has nothing to do.
    fn decide(state: &TodoState, command: TodoAction, env: &TodoEnvironment) -> Option<TodoAction> {
        let event = match command {
            TodoAction::AddTodo { title } => match Self::validate_add(state, &title) {
                Ok(title) => TodoAction::TodoAdded {
                    item: TodoItem::new(state.next_id, title.to_string(), env.clock.now()),
                },
                Err(reason) => TodoAction::CommandRejected { reason },
            },
            TodoAction::ToggleTodo { id } => match Self::validate_toggle(state, id) {
                Ok(todo) => TodoAction::TodoToggled {
                    id,
                    completed: !todo.completed,
                    at: env.clock.now(),
                },
                Err(reason) => TodoAction::CommandRejected { reason },
            },
            // Removing an unknown todo is a no-op, not a rejection
            TodoAction::RemoveTodo { id } => {
                if !state.exists(id) {
                    return None;
                }
                TodoAction::TodoRemoved { id }
            },
            TodoAction::ClearTodos => TodoAction::TodosCleared,
            TodoAction::TodoAdded { .. }
            | TodoAction::TodoToggled { .. }
            | TodoAction::TodoRemoved { .. }
            | TodoAction::TodosCleared
            | TodoAction::CommandRejected { .. } => return None,
        };
        Some(event)
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if action.is_event() {
            Self::apply_event(state, &action);
            return SmallVec::new();
        }

        // last_error only describes the most recent command
        state.last_error = None;

        match Self::decide(state, action, env) {
            Some(event) => smallvec![Effect::send(event)],
            None => SmallVec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use composable_todo_testing::{ReducerTest, assertions, stepping_clock, test_clock};

    fn create_test_env() -> TodoEnvironment {
        TodoEnvironment::new(Arc::new(test_clock()))
    }

    fn state_with(titles: &[&str]) -> TodoState {
        let mut state = TodoState::new();
        for title in titles {
            let item = TodoItem::new(state.next_id, (*title).to_string(), test_clock().now());
            state.next_id = state.next_id.next().unwrap();
            state.items.push(item);
        }
        state
    }

    fn add(title: &str) -> TodoAction {
        TodoAction::AddTodo {
            title: title.to_string(),
        }
    }

    fn added(id: u64, title: &str) -> TodoAction {
        TodoAction::TodoAdded {
            item: TodoItem::new(TodoId::new(id), title.to_string(), test_clock().now()),
        }
    }

    fn ids(state: &TodoState) -> Vec<u64> {
        state.items.iter().map(|t| t.id.value()).collect()
    }

    #[test]
    fn test_add_todo_emits_added_event() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(add("Buy milk"))
            .then_state(|state| {
                // The event has not been fed back yet
                assert_eq!(state.count(), 0);
            })
            .then_effects(|effects| {
                assert_eq!(assertions::sent_actions(effects), vec![added(1, "Buy milk")]);
            })
            .run();
    }

    #[test]
    fn test_add_todo_success() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(add("Buy milk"))
            .then_state(|state| {
                assert_eq!(state.count(), 1);
                let todo = state.get(TodoId::FIRST).unwrap();
                assert_eq!(todo.title, "Buy milk");
                assert!(!todo.completed);
                assert_eq!(todo.created_at, test_clock().now());
                assert_eq!(state.next_id, TodoId::new(2));
                assert!(state.last_error.is_none());
            })
            .then_effects(assertions::assert_has_send_effect)
            .run_following_sends();
    }

    #[test]
    fn test_add_todo_trims_title() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(add("  \tWrite docs \n"))
            .then_state(|state| {
                assert_eq!(state.items[0].title, "Write docs");
            })
            .run_following_sends();
    }

    #[test]
    fn test_add_todo_empty_title() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(add("   "))
            .then_state(|state| {
                assert_eq!(state.count(), 0);
                assert_eq!(state.next_id, TodoId::FIRST);
                assert_eq!(state.last_error, Some(TodoRejection::EmptyTitle));
            })
            .then_effects(|effects| {
                assert_eq!(
                    assertions::sent_actions(effects),
                    vec![TodoAction::CommandRejected {
                        reason: TodoRejection::EmptyTitle
                    }]
                );
            })
            .run_following_sends();
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["A", "B"]))
            .when_action(TodoAction::RemoveTodo { id: TodoId::new(2) })
            .when_action(add("C"))
            .then_state(|state| {
                assert_eq!(ids(state), vec![1, 3]);
            })
            .run_following_sends();
    }

    #[test]
    fn test_toggle_todo_twice() {
        let env = TodoEnvironment::new(Arc::new(stepping_clock()));

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(state_with(&["A"]))
            .when_action(TodoAction::ToggleTodo { id: TodoId::FIRST })
            .then_state(|state| {
                let todo = state.get(TodoId::FIRST).unwrap();
                assert!(todo.completed);
                assert!(todo.completed_at.is_some());
            })
            .run_following_sends();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["A"]))
            .when_action(TodoAction::ToggleTodo { id: TodoId::FIRST })
            .when_action(TodoAction::ToggleTodo { id: TodoId::FIRST })
            .then_state(|state| {
                let todo = state.get(TodoId::FIRST).unwrap();
                assert!(!todo.completed);
                assert_eq!(todo.completed_at, None);
            })
            .run_following_sends();
    }

    #[test]
    fn test_toggle_todo_not_found() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["A"]))
            .when_action(TodoAction::ToggleTodo { id: TodoId::new(9) })
            .then_state(|state| {
                assert_eq!(*state, {
                    let mut expected = state_with(&["A"]);
                    expected.last_error = Some(TodoRejection::NotFound(TodoId::new(9)));
                    expected
                });
            })
            .run_following_sends();
    }

    #[test]
    fn test_remove_todo_preserves_order() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["A", "B", "C"]))
            .when_action(TodoAction::RemoveTodo { id: TodoId::new(2) })
            .then_state(|state| {
                let titles: Vec<&str> = state.items.iter().map(|t| t.title.as_str()).collect();
                assert_eq!(titles, vec!["A", "C"]);
            })
            .run_following_sends();
    }

    #[test]
    fn test_remove_todo_not_found_is_silent() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["A"]))
            .when_action(TodoAction::RemoveTodo { id: TodoId::new(5) })
            .then_state(|state| {
                assert_eq!(*state, state_with(&["A"]));
            })
            .then_effects(assertions::assert_no_effects)
            .run_following_sends();
    }

    #[test]
    fn test_clear_resets_ids() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["A", "B"]))
            .when_action(TodoAction::ClearTodos)
            .when_action(add("C"))
            .then_state(|state| {
                assert_eq!(state.count(), 1);
                assert_eq!(state.items[0].id, TodoId::FIRST);
                assert_eq!(state.items[0].title, "C");
            })
            .run_following_sends();
    }

    #[test]
    fn test_success_clears_last_error() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(add(""))
            .when_action(TodoAction::RemoveTodo { id: TodoId::new(1) })
            .then_state(|state| {
                assert!(state.last_error.is_none());
            })
            .run_following_sends();
    }

    #[test]
    fn test_event_application() {
        let item = TodoItem::new(TodoId::new(7), "Replayed".to_string(), test_clock().now());

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(TodoAction::TodoAdded { item: item.clone() })
            .then_state(move |state| {
                assert_eq!(state.items, vec![item]);
                // Replayed ids still push the counter forward
                assert_eq!(state.next_id, TodoId::new(8));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_replayed_duplicate_or_blank_item_is_ignored() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["A", "B"]))
            .when_action(added(1, "again"))
            .when_action(added(3, "  "))
            .then_state(|state| {
                assert_eq!(*state, state_with(&["A", "B"]));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_replayed_removed_id_is_not_reused() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["A", "B"]))
            .when_action(TodoAction::TodoRemoved { id: TodoId::new(2) })
            .when_action(added(2, "B again"))
            .when_action(add("C"))
            .then_state(|state| {
                assert_eq!(ids(state), vec![1, 3]);
            })
            .run_following_sends();
    }

    #[test]
    fn test_replayed_max_id_is_ignored() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["A"]))
            .when_action(added(u64::MAX, "last"))
            .when_action(add("N"))
            .then_state(|state| {
                assert_eq!(ids(state), vec![1, 2]);
            })
            .run_following_sends();
    }

    #[test]
    fn test_add_rejected_when_ids_exhausted() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(added(u64::MAX - 1, "second to last"))
            .when_action(add("N"))
            .then_state(|state| {
                assert_eq!(ids(state), vec![u64::MAX - 1]);
                assert_eq!(state.next_id, TodoId::new(u64::MAX));
                assert_eq!(state.last_error, Some(TodoRejection::IdsExhausted));
            })
            .run_following_sends();
    }

    #[test]
    fn test_ids_exhausted_until_cleared() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(added(u64::MAX - 1, "second to last"))
            .when_action(TodoAction::ClearTodos)
            .when_action(add("fresh"))
            .then_state(|state| {
                assert_eq!(ids(state), vec![1]);
                assert!(state.last_error.is_none());
            })
            .run_following_sends();
    }
}
