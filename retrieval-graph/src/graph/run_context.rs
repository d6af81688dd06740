//! Per-run configuration and the context handed to nodes.

use std::collections::HashSet;
use std::fmt::Debug;

use tokio::sync::mpsc;

use crate::stream::{StreamEvent, StreamMode, StreamWriter};

/// Step budget applied when a run does not set one.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Config for a single invoke.
#[derive(Debug, Clone)]
pub struct RunnableConfig {
    /// Conversation id; carried into logs so one thread's runs can be correlated.
    pub thread_id: Option<String>,
    /// When set, the graph starts from this node instead of the entry node.
    pub resume_from_node_id: Option<String>,
    /// Maximum number of node executions before the run fails with `RecursionLimit`.
    pub recursion_limit: usize,
}

impl Default for RunnableConfig {
    fn default() -> Self {
        Self {
            thread_id: None,
            resume_from_node_id: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl RunnableConfig {
    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }
}

/// Run context passed into nodes: config plus the optional stream sender.
#[derive(Clone)]
pub struct RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub config: RunnableConfig,
    pub stream_tx: Option<mpsc::Sender<StreamEvent<S>>>,
    pub stream_mode: HashSet<StreamMode>,
}

impl<S> RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new(config: RunnableConfig) -> Self {
        Self {
            config,
            stream_tx: None,
            stream_mode: HashSet::new(),
        }
    }

    pub fn with_stream(
        mut self,
        tx: mpsc::Sender<StreamEvent<S>>,
        modes: HashSet<StreamMode>,
    ) -> Self {
        self.stream_tx = Some(tx);
        self.stream_mode = modes;
        self
    }

    pub fn stream_writer(&self) -> StreamWriter<S> {
        StreamWriter::from_context(self)
    }

    /// Sends `event` if streaming is active and `mode` was selected.
    pub(crate) async fn emit(&self, mode: StreamMode, event: StreamEvent<S>) {
        if let Some(tx) = &self.stream_tx {
            if self.stream_mode.contains(&mode) {
                let _ = tx.send(event).await;
            }
        }
    }

    /// Sends `event` whenever streaming is active, regardless of mode.
    pub(crate) async fn emit_always(&self, event: StreamEvent<S>) {
        if let Some(tx) = &self.stream_tx {
            let _ = tx.send(event).await;
        }
    }
}
