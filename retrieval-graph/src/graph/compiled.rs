//! Compiled state graph: immutable, supports invoke and stream.
//!
//! Built by `StateGraph::compile`. Each step runs one node on a snapshot of the
//! state, merges the node's update with the graph's state updater, then resolves
//! the next node (conditional router, wired edge, or the node's own `Next`).
//! A run ends on `END`, or fails on the first node error, router error, or when
//! the step budget in `RunnableConfig::recursion_limit` is exhausted.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

use crate::channels::BoxedStateUpdater;
use crate::error::AgentError;
use crate::stream::{StreamEvent, StreamMode};

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state, log_state_update,
};
use super::node_middleware::NodeMiddleware;
use super::retry::RetryPolicy;
use super::run_context::RunnableConfig;
use super::state_graph::END;
use super::{Next, NextEntry, Node, RunContext};

/// Compiled graph: immutable structure; cheap to clone and share across runs.
pub struct CompiledStateGraph<S, U = S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S, U>>>,
    /// Entry node (target of the START edge).
    pub(super) first_node_id: String,
    /// Node id to how its successor is chosen.
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware<S, U>>>,
    pub(super) state_updater: BoxedStateUpdater<S, U>,
    pub(super) retry_policy: RetryPolicy,
}

impl<S: Clone, U> Clone for CompiledStateGraph<S, U> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            first_node_id: self.first_node_id.clone(),
            next_map: self.next_map.clone(),
            middleware: self.middleware.clone(),
            state_updater: self.state_updater.clone(),
            retry_policy: self.retry_policy.clone(),
        }
    }
}

impl<S, U> CompiledStateGraph<S, U>
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Send + Sync + Debug + 'static,
{
    /// Ids of all registered nodes, sorted.
    pub fn node_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.nodes.keys().cloned().collect();
        ids.sort();
        ids
    }

    async fn execute_node_with_retry(
        &self,
        node: Arc<dyn Node<S, U>>,
        state: &S,
        run_ctx: &RunContext<S>,
    ) -> Result<(U, Next), AgentError> {
        let mut attempt = 0;
        loop {
            let snapshot = state.clone();
            let result = if let Some(middleware) = &self.middleware {
                let node_id = node.id().to_string();
                let ctx = run_ctx.clone();
                let inner_node = node.clone();
                middleware
                    .around_run(
                        &node_id,
                        snapshot,
                        Box::new(move |s| {
                            Box::pin(async move { inner_node.run_with_context(s, &ctx).await })
                        }),
                    )
                    .await
            } else {
                node.run_with_context(snapshot, run_ctx).await
            };

            match result {
                Ok(output) => return Ok(output),
                Err(e) if self.retry_policy.should_retry(attempt, &e) => {
                    let delay = self.retry_policy.delay(attempt);
                    tracing::warn!(
                        node_id = node.id(),
                        attempt = attempt + 1,
                        error = %e,
                        ?delay,
                        "node failed; retrying"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Resolves the successor of `current_id` after its update was merged.
    /// `None` means the run is over.
    fn resolve_next(
        &self,
        current_id: &str,
        state: &S,
        next: Next,
    ) -> Result<Option<String>, AgentError> {
        let target = match self.next_map.get(current_id) {
            Some(NextEntry::Conditional(router)) => {
                let target = router.resolve_next(state)?;
                tracing::debug!(from = %current_id, to = %target, "conditional routing");
                Some(target)
            }
            Some(NextEntry::Unconditional(to)) => match next {
                Next::End => None,
                Next::Node(id) => Some(id),
                Next::Continue => Some(to.clone()),
            },
            None => match next {
                Next::Node(id) => Some(id),
                Next::End | Next::Continue => None,
            },
        };
        match target {
            Some(id) if id == END => Ok(None),
            Some(id) if !self.nodes.contains_key(&id) => Err(AgentError::ExecutionFailed(
                format!("node {} routed to unknown node {}", current_id, id),
            )),
            other => Ok(other),
        }
    }

    /// Shared run loop used by invoke() and stream().
    async fn run_loop_inner(
        &self,
        state: &mut S,
        run_ctx: &RunContext<S>,
        run_id: &str,
    ) -> Result<(), AgentError> {
        let mut current_id = run_ctx
            .config
            .resume_from_node_id
            .as_ref()
            .filter(|id| self.nodes.contains_key(id.as_str()))
            .cloned()
            .unwrap_or_else(|| self.first_node_id.clone());
        let limit = run_ctx.config.recursion_limit;
        let mut steps = 0usize;

        loop {
            if steps >= limit {
                return Err(AgentError::RecursionLimit(limit));
            }
            steps += 1;

            let node = self.nodes.get(&current_id).cloned().ok_or_else(|| {
                AgentError::ExecutionFailed(format!("node not found: {}", current_id))
            })?;

            log_node_start(&current_id);
            log_node_state(&current_id, &*state);
            run_ctx
                .emit(
                    StreamMode::Tasks,
                    StreamEvent::TaskStart {
                        node_id: current_id.clone(),
                    },
                )
                .await;

            let (update, next) = match self.execute_node_with_retry(node, state, run_ctx).await {
                Ok(output) => output,
                Err(e) => {
                    run_ctx
                        .emit(
                            StreamMode::Tasks,
                            StreamEvent::TaskEnd {
                                node_id: current_id.clone(),
                                result: Err(e.to_string()),
                            },
                        )
                        .await;
                    return Err(e);
                }
            };

            run_ctx
                .emit(
                    StreamMode::Tasks,
                    StreamEvent::TaskEnd {
                        node_id: current_id.clone(),
                        result: Ok(()),
                    },
                )
                .await;
            log_node_complete(&current_id, &next);

            log_state_update(&current_id, &update);
            self.state_updater.apply_update(state, update);

            run_ctx
                .emit(StreamMode::Values, StreamEvent::Values(state.clone()))
                .await;
            run_ctx
                .emit(
                    StreamMode::Updates,
                    StreamEvent::Updates {
                        node_id: current_id.clone(),
                        state: state.clone(),
                    },
                )
                .await;

            match self.resolve_next(&current_id, state, next)? {
                Some(id) => current_id = id,
                None => {
                    log_graph_complete(run_id, steps);
                    return Ok(());
                }
            }
        }
    }

    async fn run(&self, mut state: S, run_ctx: RunContext<S>) -> Result<S, AgentError> {
        if self.nodes.is_empty() || !self.nodes.contains_key(&self.first_node_id) {
            return Err(AgentError::ExecutionFailed("empty graph".into()));
        }
        let run_id = uuid::Uuid::new_v4().to_string();
        let thread_id = run_ctx.config.thread_id.clone().unwrap_or_default();
        let span = tracing::info_span!("graph_run", %run_id, %thread_id);
        span.in_scope(|| log_graph_start(&run_id));

        let result = self
            .run_loop_inner(&mut state, &run_ctx, &run_id)
            .instrument(span.clone())
            .await;
        match result {
            Ok(()) => Ok(state),
            Err(e) => {
                span.in_scope(|| log_graph_error(&run_id, &e));
                Err(e)
            }
        }
    }

    /// Runs the graph from the entry node (or `config.resume_from_node_id`) to END.
    ///
    /// Returns the final merged state. On any node failure the run stops and the
    /// error is returned; partial state is discarded.
    pub async fn invoke(&self, state: S, config: Option<RunnableConfig>) -> Result<S, AgentError> {
        self.run(state, RunContext::new(config.unwrap_or_default()))
            .await
    }

    /// Runs the graph with a caller-built run context.
    pub async fn invoke_with_context(
        &self,
        state: S,
        run_ctx: RunContext<S>,
    ) -> Result<S, AgentError> {
        self.run(state, run_ctx).await
    }

    /// Streams graph execution, emitting the selected events through a channel-backed stream.
    ///
    /// When the run fails a final `StreamEvent::Failed` is sent before the stream closes.
    pub fn stream(
        &self,
        state: S,
        config: Option<RunnableConfig>,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent<S>> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let run_ctx = RunContext::new(config.unwrap_or_default()).with_stream(tx, stream_mode.into());

        tokio::spawn(async move {
            if let Err(e) = graph.run(state, run_ctx.clone()).await {
                run_ctx
                    .emit_always(StreamEvent::Failed {
                        error: e.to_string(),
                    })
                    .await;
            }
        });

        ReceiverStream::new(rx)
    }
}
