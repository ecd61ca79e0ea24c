//! # Composable Todo Runtime
//!
//! Runtime implementation for the Composable Todo architecture.
//!
//! This crate provides the [`Store`] that owns a feature's state, runs its
//! reducer and executes the effects the reducer returns.
//!
//! ## Core Components
//!
//! - **Store**: Owns state and drives the action → reducer → effects loop
//! - **Effect execution**: `Effect::Send` actions are fed back into the reducer
//!   depth-first, before `send` returns
//! - **`StoreConfig`**: Bounds the feedback loop
//!
//! Everything runs on the caller's thread. `send` takes `&mut self`, so the
//! borrow checker guarantees a single writer without locks.
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use composable_todo_core::{effect::Effect, reducer::Reducer};

pub use error::StoreError;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// An effect chain fed actions back deeper than the configured limit
        ///
        /// State changes made before the limit was hit stay applied.
        #[error("Effect feedback exceeded the maximum depth of {max_depth}")]
        FeedbackLimitExceeded {
            /// The configured limit
            max_depth: usize,
        },
    }
}

/// Configuration for Store behavior
///
/// # Example
///
/// ```
/// use composable_todo_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_max_feedback_depth(8);
/// assert_eq!(config.max_feedback_depth, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// How many `Effect::Send` hops a single `send` may follow
    pub max_feedback_depth: usize,
}

impl StoreConfig {
    /// Default feedback depth
    pub const DEFAULT_MAX_FEEDBACK_DEPTH: usize = 32;

    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(max_feedback_depth: usize) -> Self {
        Self { max_feedback_depth }
    }

    /// Set the maximum feedback depth
    #[must_use]
    pub const fn with_max_feedback_depth(mut self, depth: usize) -> Self {
        self.max_feedback_depth = depth;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_FEEDBACK_DEPTH)
    }
}

/// The Store - runtime for reducer execution
///
/// The Store owns:
/// - Current state
/// - Reducer implementation
/// - Environment (injected dependencies)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: S,
    reducer: R,
    environment: E,
    config: StoreConfig,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_config(initial_state, reducer, environment, StoreConfig::default())
    }

    /// Create a new store with custom configuration
    #[must_use]
    pub const fn with_config(
        initial_state: S,
        reducer: R,
        environment: E,
        config: StoreConfig,
    ) -> Self {
        Self {
            state: initial_state,
            reducer,
            environment,
            config,
        }
    }

    /// The configuration this store was built with
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Send an action to the store
    ///
    /// Runs the reducer, then executes the returned effects in order. Actions
    /// fed back through `Effect::Send` are reduced immediately, depth-first.
    ///
    /// Returns the number of actions reduced, including the one sent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::FeedbackLimitExceeded`] when a chain of fed-back
    /// actions grows deeper than [`StoreConfig::max_feedback_depth`].
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub fn send(&mut self, action: A) -> Result<usize, StoreError> {
        tracing::debug!("Processing action");
        let mut reduced = 0;
        let result = self.dispatch(action, 0, &mut reduced);
        tracing::debug!(reduced, "Action processing completed");
        result.map(|()| reduced)
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let open = store.state(|s| s.items.len());
    /// ```
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&self.state)
    }

    /// Consume the store and return its state
    #[must_use]
    pub fn into_state(self) -> S {
        self.state
    }

    fn dispatch(&mut self, action: A, depth: usize, reduced: &mut usize) -> Result<(), StoreError> {
        if depth > self.config.max_feedback_depth {
            tracing::warn!(
                max_depth = self.config.max_feedback_depth,
                "Dropping fed-back action: feedback depth exceeded"
            );
            metrics::counter!("store.feedback.overflow").increment(1);
            return Err(StoreError::FeedbackLimitExceeded {
                max_depth: self.config.max_feedback_depth,
            });
        }

        metrics::counter!("store.actions.total").increment(1);

        let effects = {
            let span = tracing::debug_span!("reducer_execution", depth);
            let _enter = span.enter();
            self.reducer.reduce(&mut self.state, action, &self.environment)
        };
        *reduced += 1;

        tracing::trace!("Reducer completed, returned {} effects", effects.len());
        for effect in effects {
            self.execute_effect(effect, depth, reduced)?;
        }
        Ok(())
    }

    fn execute_effect(
        &mut self,
        effect: Effect<A>,
        depth: usize,
        reduced: &mut usize,
    ) -> Result<(), StoreError> {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
            },
            Effect::Send(action) => {
                tracing::trace!("Executing Effect::Send");
                metrics::counter!("store.effects.total").increment(1);
                self.dispatch(*action, depth + 1, reduced)?;
            },
            Effect::Sequential(effects) => {
                tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                for effect in effects {
                    self.execute_effect(effect, depth, reduced)?;
                }
            },
        }
        Ok(())
    }
}

impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
