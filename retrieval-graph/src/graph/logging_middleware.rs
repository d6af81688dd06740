//! Logging middleware that records node enter/exit around each node.run call.

use async_trait::async_trait;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Instant;

use crate::error::AgentError;
use crate::graph::Next;

use super::node_middleware::{NodeMiddleware, NodeRunFn};

/// Middleware that logs node enter/exit (with elapsed time) through `tracing`.
///
/// Generic over state and update types; only node_id, next and errors are logged.
pub struct LoggingNodeMiddleware<S, U = S> {
    _phantom: PhantomData<fn(S) -> U>,
}

impl<S, U> Default for LoggingNodeMiddleware<S, U> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<S, U> NodeMiddleware<S, U> for LoggingNodeMiddleware<S, U>
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Send + Sync + Debug + 'static,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: NodeRunFn<S, U>,
    ) -> Result<(U, Next), AgentError> {
        tracing::info!(node_id, "node enter");
        let started = Instant::now();
        let result = inner(state).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok((_, next)) => tracing::info!(node_id, ?next, elapsed_ms, "node exit"),
            Err(e) => tracing::warn!(node_id, error = %e, elapsed_ms, "node exit with error"),
        }
        result
    }
}
