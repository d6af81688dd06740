//! Logging utilities for graph execution.

use std::fmt::Debug;

use crate::error::AgentError;
use crate::graph::Next;

pub fn log_node_start(node_id: &str) {
    tracing::debug!(node_id = node_id, "Starting node execution");
}

/// Logs the input state of a node (debug level; states can be large).
pub fn log_node_state<S: Debug>(node_id: &str, state: &S) {
    tracing::trace!(node_id = node_id, state = ?state, "Node execution: state");
}

pub fn log_node_complete(node_id: &str, next: &Next) {
    tracing::debug!(node_id = node_id, ?next, "Node execution complete");
}

/// Logs the delta a node returned, right before it is merged.
pub fn log_state_update<U: Debug>(node_id: &str, update: &U) {
    tracing::debug!(node_id = node_id, update = ?update, "State updated");
}

pub fn log_graph_start(run_id: &str) {
    tracing::info!(run_id, "Starting graph execution");
}

pub fn log_graph_complete(run_id: &str, steps: usize) {
    tracing::info!(run_id, steps, "Graph execution complete");
}

pub fn log_graph_error(run_id: &str, error: &AgentError) {
    tracing::error!(run_id, %error, "Graph execution error");
}
