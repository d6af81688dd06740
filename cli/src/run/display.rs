//! Stderr display and JSON rendering for retrieval graph runs.

use retrieval_graph::{AgentState, Message, StreamEvent};
use serde_json::{json, Value};

const INDENT: &str = "  ";

/// Truncates to at most `max` chars, ending in "..." when cut. UTF-8 safe.
pub fn truncate_display(s: &str, max: usize) -> String {
    const SUFFIX: &str = "...";
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= SUFFIX.len() {
        return s.chars().take(max).collect();
    }
    let head: String = s.chars().take(max - SUFFIX.len()).collect();
    format!("{}{}", head, SUFFIX)
}

pub fn format_message_truncated(m: &Message, max: usize) -> String {
    match m {
        Message::System(s) => format!("System({})", truncate_display(s, max)),
        Message::User(s) => format!("User({})", truncate_display(s, max)),
        Message::Assistant(s) => format!("Assistant({})", truncate_display(s, max)),
    }
}

/// Multi-line dump of the state for `--verbose`: one field per line, one item per line.
pub fn format_agent_state_display(state: &AgentState, max: usize) -> String {
    let mut lines = vec!["AgentState {".to_string()];

    lines.push(format!("{}messages:", INDENT));
    for m in &state.messages {
        lines.push(format!("{0}{0}{1}", INDENT, format_message_truncated(m, max)));
    }

    match &state.router {
        Some(r) => lines.push(format!(
            "{}router: {} ({})",
            INDENT,
            r.route_type,
            truncate_display(&r.logic, max)
        )),
        None => lines.push(format!("{}router: none", INDENT)),
    }

    lines.push(format!("{}plan_steps:", INDENT));
    for step in &state.plan_steps {
        lines.push(format!("{0}{0}- {1}", INDENT, truncate_display(step, max)));
    }

    lines.push(format!("{}documents: {}", INDENT, state.documents.len()));
    for d in &state.documents {
        lines.push(format!(
            "{0}{0}[{1}] {2}",
            INDENT,
            d.source,
            truncate_display(&d.text, max)
        ));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

/// One stream event as a `{"type": ...}` JSON object. `Values` snapshots are
/// not rendered (the final state is printed once at the end).
pub fn event_to_json(event: &StreamEvent<AgentState>) -> Option<Value> {
    let v = match event {
        StreamEvent::TaskStart { node_id } => json!({"type": "node_enter", "id": node_id}),
        StreamEvent::TaskEnd { node_id, result } => match result {
            Ok(()) => json!({"type": "node_exit", "id": node_id, "result": "ok"}),
            Err(e) => json!({"type": "node_exit", "id": node_id, "error": e}),
        },
        StreamEvent::Updates { node_id, state } => json!({
            "type": "updates",
            "id": node_id,
            "plan_steps": state.plan_steps,
            "documents": state.documents.len(),
            "messages": state.messages.len(),
        }),
        StreamEvent::Custom(value) => json!({"type": "custom", "value": value}),
        StreamEvent::Failed { error } => json!({"type": "error", "error": error}),
        StreamEvent::Values(_) => return None,
    };
    Some(v)
}
