//! Run options, errors and the per-turn output shared by the binary and backends.

mod display;

use std::path::PathBuf;

use retrieval_graph::{AgentError, AgentState, Router};
use serde_json::Value;
use thiserror::Error;

pub use display::{
    event_to_json, format_agent_state_display, format_message_truncated, truncate_display,
};

/// Options for one CLI session (shared by every turn in interactive mode).
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// JSON array of documents backing the in-memory retriever.
    pub docs: PathBuf,
    /// Pre-seeded router for the first turn; skips classification.
    pub router: Option<Router>,
    /// Print node enter/exit and per-node state on stderr.
    pub verbose: bool,
    /// Collect stream events and print the final state as JSON.
    pub output_json: bool,
    /// Max chars per message in verbose state dumps.
    pub display_max_len: usize,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("config: {0}")]
    Config(#[from] config::LoadError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of one turn: the final graph state and, with `--json`, the stream events.
#[derive(Debug, Clone)]
pub struct TurnOutput {
    pub state: AgentState,
    pub events: Option<Vec<Value>>,
}

impl TurnOutput {
    /// Last assistant message, or `""` if the run produced none.
    pub fn reply(&self) -> &str {
        self.state.last_assistant_reply().unwrap_or_default()
    }

    /// `{"reply", "state", "events"}`; `events` only when they were collected.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        let mut out = serde_json::json!({
            "reply": self.reply(),
            "state": serde_json::to_value(&self.state)?,
        });
        if let Some(events) = &self.events {
            out["events"] = Value::Array(events.clone());
        }
        Ok(out)
    }
}
