//! Backend abstraction used by the `docs-chat` CLI.
//!
//! `main.rs` and `repl.rs` only depend on [`RunBackend`]; the in-process
//! [`LocalBackend`] is the one production implementation and tests plug in
//! their own.

mod local;

pub use local::LocalBackend;

use async_trait::async_trait;
use retrieval_graph::AgentState;

use crate::run::{RunError, RunOptions, TurnOutput};

#[async_trait]
pub trait RunBackend: Send + Sync {
    /// Executes one conversational turn over `state`.
    ///
    /// With `opts.output_json` the backend collects every stream event into
    /// [`TurnOutput::events`]; otherwise `events` is `None`.
    async fn run(&self, state: AgentState, opts: &RunOptions) -> Result<TurnOutput, RunError>;
}
