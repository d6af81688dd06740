//! State updater for custom state merge semantics.
//!
//! Nodes return an update of type `U`; the graph's `StateUpdater<S, U>` folds it
//! into the current `S`. Per-field strategies (append this list, replace that
//! value, write this field once) live in the updater, so nodes never need to know
//! how their output is combined.
//!
//! # Example
//!
//! ```rust
//! use retrieval_graph::channels::StateUpdater;
//!
//! #[derive(Clone, Debug, Default)]
//! struct Log { lines: Vec<String>, last: Option<String> }
//!
//! #[derive(Debug)]
//! struct LogUpdate(String);
//!
//! #[derive(Debug)]
//! struct AppendLines;
//!
//! impl StateUpdater<Log, LogUpdate> for AppendLines {
//!     fn apply_update(&self, current: &mut Log, update: LogUpdate) {
//!         current.lines.push(update.0.clone());
//!         current.last = Some(update.0);
//!     }
//! }
//! ```

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

/// Folds a node's update into the current state.
pub trait StateUpdater<S, U = S>: Send + Sync + Debug
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Send + Sync + Debug + 'static,
{
    /// Called once after each node completes, before routing is evaluated.
    fn apply_update(&self, current: &mut S, update: U);
}

/// Shared, type-erased updater stored by the graph.
pub type BoxedStateUpdater<S, U = S> = Arc<dyn StateUpdater<S, U>>;

/// Replaces the entire state with the node's output. Only meaningful when `U = S`.
#[derive(Debug, Clone, Default)]
pub struct ReplaceUpdater;

impl<S> StateUpdater<S, S> for ReplaceUpdater
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn apply_update(&self, current: &mut S, update: S) {
        *current = update;
    }
}

/// Updater backed by a closure, for ad hoc per-field merge rules.
pub struct FieldBasedUpdater<S, U, F>
where
    F: Fn(&mut S, U) + Send + Sync + 'static,
{
    updater_fn: F,
    _marker: PhantomData<fn(S, U)>,
}

impl<S, U, F> Debug for FieldBasedUpdater<S, U, F>
where
    F: Fn(&mut S, U) + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBasedUpdater")
            .field("updater_fn", &"<function>")
            .finish()
    }
}

impl<S, U, F> FieldBasedUpdater<S, U, F>
where
    F: Fn(&mut S, U) + Send + Sync + 'static,
{
    pub fn new(updater_fn: F) -> Self {
        Self {
            updater_fn,
            _marker: PhantomData,
        }
    }
}

impl<S, U, F> StateUpdater<S, U> for FieldBasedUpdater<S, U, F>
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Send + Sync + Debug + 'static,
    F: Fn(&mut S, U) + Send + Sync + 'static,
{
    fn apply_update(&self, current: &mut S, update: U) {
        (self.updater_fn)(current, update)
    }
}
