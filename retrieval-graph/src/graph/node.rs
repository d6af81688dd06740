//! Graph node trait: one step in a StateGraph.
//!
//! Receives a snapshot of state `S` and returns an update `U` plus routing.
//! The compiled graph merges `U` into `S` with its [`StateUpdater`](crate::channels::StateUpdater).
//! When `U = S` (the default) a node returns the whole next state.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::AgentError;

use super::{Next, RunContext};

/// One step in a graph: state in, (update out, next step).
///
/// Nodes never mutate shared state; they read the snapshot they are given and
/// return a delta. See `StateGraph::add_node` and `CompiledStateGraph::invoke`.
#[async_trait]
pub trait Node<S, U = S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Send + Sync + Debug + 'static,
{
    /// Node id (e.g. `"respond"`). Must be unique within a graph.
    fn id(&self) -> &str;

    /// One step: state in, (update out, next step).
    async fn run(&self, state: S) -> Result<(U, Next), AgentError>;

    /// Variant with run context (streaming, config).
    ///
    /// Default implementation calls `run` and ignores the context.
    async fn run_with_context(
        &self,
        state: S,
        _ctx: &RunContext<S>,
    ) -> Result<(U, Next), AgentError> {
        self.run(state).await
    }
}
