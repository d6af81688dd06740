//! Library side of the `docs-chat` CLI: backends, run options and output rendering.

mod backend;
mod run;

pub use backend::{LocalBackend, RunBackend};
pub use run::{
    event_to_json, format_agent_state_display, format_message_truncated, truncate_display,
    RunError, RunOptions, TurnOutput,
};
