//! Node middleware: wrap node.run with external async logic (around pattern).
//!
//! Set via `StateGraph::with_middleware`.

use async_trait::async_trait;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use crate::error::AgentError;

use super::Next;

/// Boxed inner call handed to [`NodeMiddleware::around_run`].
pub type NodeRunFn<S, U> = Box<
    dyn FnOnce(S) -> Pin<Box<dyn Future<Output = Result<(U, Next), AgentError>> + Send>> + Send,
>;

/// Async middleware that wraps node.run.
///
/// Implementations decide when to call `inner`, and may inspect or rewrite its result.
#[async_trait]
pub trait NodeMiddleware<S, U = S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Send + Sync + Debug + 'static,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: NodeRunFn<S, U>,
    ) -> Result<(U, Next), AgentError>;
}
