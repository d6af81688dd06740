//! Streaming types for graph runs.
//!
//! `CompiledStateGraph::stream` sends [`StreamEvent`]s over a bounded channel
//! while the run progresses. Nodes that want to report intermediate progress use
//! a [`StreamWriter`] built from their run context.

use serde_json::Value;
use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::graph::RunContext;

/// Which events a stream subscriber wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Full merged state after each node.
    Values,
    /// Node id plus merged state after each node.
    Updates,
    /// Custom JSON payloads emitted by nodes.
    Custom,
    /// Task start/end per node execution.
    Tasks,
}

impl StreamMode {
    /// All modes; what the CLI subscribes to in verbose mode.
    pub fn all() -> HashSet<StreamMode> {
        [
            StreamMode::Values,
            StreamMode::Updates,
            StreamMode::Custom,
            StreamMode::Tasks,
        ]
        .into_iter()
        .collect()
    }
}

/// One streamed item.
#[derive(Clone, Debug)]
pub enum StreamEvent<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Full state snapshot after a node finishes.
    Values(S),
    /// Node id and the state after that node's update was merged.
    Updates { node_id: String, state: S },
    /// Custom JSON payload from a node.
    Custom(Value),
    /// A node began executing.
    TaskStart { node_id: String },
    /// A node finished: Ok(()) on success, Err(message) on failure.
    TaskEnd {
        node_id: String,
        result: Result<(), String>,
    },
    /// The run aborted; no further events follow.
    Failed { error: String },
}

/// Emits custom events from inside a node.
///
/// A no-op when the run is not streaming or `StreamMode::Custom` is not selected.
#[derive(Clone)]
pub struct StreamWriter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    tx: Option<mpsc::Sender<StreamEvent<S>>>,
    modes: Arc<HashSet<StreamMode>>,
}

impl<S> StreamWriter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new(tx: Option<mpsc::Sender<StreamEvent<S>>>, modes: HashSet<StreamMode>) -> Self {
        Self {
            tx,
            modes: Arc::new(modes),
        }
    }

    pub fn noop() -> Self {
        Self::new(None, HashSet::new())
    }

    pub fn from_context(ctx: &RunContext<S>) -> Self {
        Self::new(ctx.stream_tx.clone(), ctx.stream_mode.clone())
    }

    pub fn is_mode_enabled(&self, mode: StreamMode) -> bool {
        self.modes.contains(&mode)
    }

    /// Sends a custom payload. Returns `true` if it was delivered to the channel.
    pub async fn emit_custom(&self, value: Value) -> bool {
        if !self.modes.contains(&StreamMode::Custom) {
            return false;
        }
        match &self.tx {
            Some(tx) => tx.send(StreamEvent::Custom(value)).await.is_ok(),
            None => false,
        }
    }
}
