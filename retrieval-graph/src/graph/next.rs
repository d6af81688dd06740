//! Next-step result from a graph node: continue along the wired edge, jump to a node, or end.

/// Next step after running a node.
///
/// - **Continue**: follow the node's outgoing edge (or its conditional router).
/// - **Node(id)**: jump to the given node.
/// - **End**: stop; return current state as final result.
///
/// Ignored when the node has conditional edges: the router decides.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Next {
    /// Follow the outgoing edge; if the node has none, equivalent to End.
    Continue,
    /// Run the node with the given id next.
    Node(String),
    /// Stop and return the current state.
    End,
}
