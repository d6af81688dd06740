//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when edges reference unknown nodes or the
//! wiring is ambiguous.

use thiserror::Error;

/// Error when compiling a state graph.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge has from_id == START.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// Nothing in the graph leads to END.
    #[error("graph must have at least one edge to END")]
    MissingEnd,

    /// Edges branch or loop without a conditional router.
    #[error("invalid edge wiring: {0}")]
    InvalidChain(String),

    /// A node has both an outgoing edge and conditional edges; it must have exactly one.
    #[error("node has both edge and conditional edges: {0}")]
    NodeHasBothEdgeAndConditional(String),

    /// A value in a conditional path_map is not a valid node id or END.
    #[error("conditional path_map invalid target: {0}")]
    InvalidConditionalPathMap(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display of NodeNotFound contains "node not found" and the node id.
    #[test]
    fn compilation_error_display_node_not_found() {
        let s = CompilationError::NodeNotFound("respond".to_string()).to_string();
        assert!(s.contains("node not found"), "{}", s);
        assert!(s.contains("respond"), "{}", s);
    }

    /// **Scenario**: Display of InvalidConditionalPathMap names the bad target.
    #[test]
    fn compilation_error_display_invalid_path_map() {
        let s = CompilationError::InvalidConditionalPathMap("nowhere".into()).to_string();
        assert!(s.contains("nowhere"), "{}", s);
    }
}
