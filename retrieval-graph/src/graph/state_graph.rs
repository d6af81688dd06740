//! State graph: nodes + explicit edges (from → to) and optional conditional edges.
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` using `START`
//! and `END` for entry and exit, and use `add_conditional_edges` where the next
//! node depends on state. `compile` validates the wiring and returns a
//! [`CompiledStateGraph`].
//!
//! # State updates
//!
//! Nodes return an update `U`. The graph's [`StateUpdater`](crate::channels::StateUpdater)
//! folds it into the state. `StateGraph::<S>::new()` uses [`ReplaceUpdater`]
//! (`U = S`); graphs with delta updates are built with [`StateGraph::with_reducer`].

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::channels::{BoxedStateUpdater, ReplaceUpdater};
use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
use crate::graph::node::Node;
use crate::graph::node_middleware::NodeMiddleware;
use crate::graph::retry::RetryPolicy;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` in `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

/// State graph builder, generic over state `S` and node update `U`.
pub struct StateGraph<S, U = S> {
    nodes: HashMap<String, Arc<dyn Node<S, U>>>,
    /// Edges (from_id, to_id). A node may have one outgoing edge or conditional edges, not both.
    edges: Vec<(String, String)>,
    conditional_edges: HashMap<String, ConditionalRouter<S>>,
    middleware: Option<Arc<dyn NodeMiddleware<S, U>>>,
    state_updater: BoxedStateUpdater<S, U>,
    retry_policy: RetryPolicy,
}

impl<S> Default for StateGraph<S, S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S, S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Creates an empty graph whose nodes return the full next state.
    pub fn new() -> Self {
        Self::with_reducer(Arc::new(ReplaceUpdater))
    }
}

impl<S, U> StateGraph<S, U>
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Send + Sync + Debug + 'static,
{
    /// Creates an empty graph that merges node updates with `updater`.
    pub fn with_reducer(updater: BoxedStateUpdater<S, U>) -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            conditional_edges: HashMap::new(),
            middleware: None,
            state_updater: updater,
            retry_policy: RetryPolicy::None,
        }
    }

    /// Attaches node middleware; `compile()` will wrap every node.run with it.
    pub fn with_middleware(self, middleware: Arc<dyn NodeMiddleware<S, U>>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    /// Replaces the state updater chosen at construction.
    pub fn with_state_updater(self, updater: BoxedStateUpdater<S, U>) -> Self {
        Self {
            state_updater: updater,
            ..self
        }
    }

    /// Attaches a retry policy for node execution. Default is `RetryPolicy::None`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use retrieval_graph::graph::{RetryPolicy, StateGraph};
    /// use std::time::Duration;
    ///
    /// let graph = StateGraph::<String>::new()
    ///     .with_retry_policy(RetryPolicy::fixed(2, Duration::from_millis(200)));
    /// ```
    pub fn with_retry_policy(self, retry_policy: RetryPolicy) -> Self {
        Self {
            retry_policy,
            ..self
        }
    }

    /// Adds a node; replaces any node registered under the same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S, U>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds an edge from `from_id` to `to_id`. Use `START` and `END` for entry and exit.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Adds conditional edges from `source`: after it runs, `path(state)` picks the next node.
    ///
    /// `path` sees the state after the source node's update was merged. Its key is
    /// looked up in `path_map` when provided, otherwise used as the node id. Every
    /// path_map target must be a registered node or `END`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// graph.add_conditional_edges(
    ///     "plan",
    ///     Arc::new(|s: &Plan| Ok(if s.steps.is_empty() { "finish".into() } else { "work".into() })),
    ///     Some([("work".into(), "work".into()), ("finish".into(), END.into())].into_iter().collect()),
    /// );
    /// ```
    pub fn add_conditional_edges(
        &mut self,
        source: impl Into<String>,
        path: ConditionalRouterFn<S>,
        path_map: Option<HashMap<String, String>>,
    ) -> &mut Self {
        self.conditional_edges
            .insert(source.into(), ConditionalRouter::new(path, path_map));
        self
    }

    /// Validates the wiring and builds the executable graph.
    ///
    /// Graphs without conditional edges must form a single chain from START to END;
    /// with conditional edges, loops are allowed (bounded at run time by the
    /// recursion limit).
    pub fn compile(self) -> Result<CompiledStateGraph<S, U>, CompilationError> {
        for (from, to) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
        }
        for (source, router) in &self.conditional_edges {
            if !self.nodes.contains_key(source) {
                return Err(CompilationError::NodeNotFound(source.clone()));
            }
            if let Some(ref path_map) = router.path_map {
                for target in path_map.values() {
                    if target != END && !self.nodes.contains_key(target) {
                        return Err(CompilationError::InvalidConditionalPathMap(target.clone()));
                    }
                }
            }
        }

        let mut start_edges = self
            .edges
            .iter()
            .filter(|(f, _)| f == START)
            .map(|(_, t)| t.clone());
        let first = start_edges.next().ok_or(CompilationError::MissingStart)?;
        if start_edges.next().is_some() {
            return Err(CompilationError::InvalidChain(
                "multiple edges from START (branch)".into(),
            ));
        }

        let has_end = self.edges.iter().any(|(_, t)| t == END)
            || self.conditional_edges.values().any(|r| {
                r.path_map
                    .as_ref()
                    .map_or(true, |m| m.values().any(|v| v == END))
            });
        if !has_end {
            return Err(CompilationError::MissingEnd);
        }

        let mut edge_froms = HashSet::new();
        for (from, _) in self.edges.iter().filter(|(f, _)| f.as_str() != START) {
            if !edge_froms.insert(from.clone()) {
                return Err(CompilationError::InvalidChain(format!(
                    "duplicate outgoing edge from {}",
                    from
                )));
            }
        }
        for source in self.conditional_edges.keys() {
            if edge_froms.contains(source) {
                return Err(CompilationError::NodeHasBothEdgeAndConditional(
                    source.clone(),
                ));
            }
        }

        let mut next_map: HashMap<String, NextEntry<S>> = self
            .edges
            .iter()
            .filter(|(f, _)| f.as_str() != START)
            .map(|(f, t)| (f.clone(), NextEntry::Unconditional(t.clone())))
            .collect();

        if self.conditional_edges.is_empty() {
            let mut current = first.clone();
            let mut visited = HashSet::from([current.clone()]);
            while let Some(NextEntry::Unconditional(next)) = next_map.get(&current) {
                if next == END {
                    break;
                }
                if !visited.insert(next.clone()) {
                    return Err(CompilationError::InvalidChain("cycle detected".into()));
                }
                current = next.clone();
            }
        }

        for (source, router) in self.conditional_edges {
            next_map.insert(source, NextEntry::Conditional(router));
        }

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            first_node_id: first,
            next_map,
            middleware: self.middleware,
            state_updater: self.state_updater,
            retry_policy: self.retry_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::error::AgentError;
    use crate::graph::Next;

    #[derive(Clone, Debug)]
    struct DummyState(i32);

    struct DummyNode(&'static str);

    #[async_trait]
    impl Node<DummyState> for DummyNode {
        fn id(&self) -> &str {
            self.0
        }
        async fn run(&self, state: DummyState) -> Result<(DummyState, Next), AgentError> {
            Ok((state, Next::Continue))
        }
    }

    /// **Scenario**: Compile fails when a node has both an outgoing edge and conditional edges.
    #[test]
    fn compile_fails_when_node_has_both_edge_and_conditional() {
        let mut graph = StateGraph::<DummyState>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_node("b", Arc::new(DummyNode("b")));
        graph.add_edge(START, "a");
        graph.add_edge("a", "b");
        graph.add_edge("b", END);
        graph.add_conditional_edges(
            "a",
            Arc::new(|_| Ok("b".to_string())),
            Some([("b".to_string(), "b".to_string())].into_iter().collect()),
        );
        match graph.compile() {
            Err(CompilationError::NodeHasBothEdgeAndConditional(id)) => assert_eq!(id, "a"),
            Err(e) => panic!("expected NodeHasBothEdgeAndConditional(a), got {:?}", e),
            Ok(_) => panic!("expected compile error"),
        }
    }

    /// **Scenario**: Compile fails when conditional path_map references a non-existent node.
    #[test]
    fn compile_fails_when_conditional_path_map_has_invalid_target() {
        let mut graph = StateGraph::<DummyState>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_edge(START, "a");
        graph.add_conditional_edges(
            "a",
            Arc::new(|_| Ok("x".to_string())),
            Some(
                [("x".to_string(), "nonexistent".to_string())]
                    .into_iter()
                    .collect(),
            ),
        );
        match graph.compile() {
            Err(CompilationError::InvalidConditionalPathMap(id)) => assert_eq!(id, "nonexistent"),
            Err(e) => panic!("expected InvalidConditionalPathMap, got {:?}", e),
            Ok(_) => panic!("expected compile error"),
        }
    }

    /// **Scenario**: A graph without an edge from START does not compile.
    #[test]
    fn compile_fails_without_start_edge() {
        let mut graph = StateGraph::<DummyState>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_edge("a", END);
        assert!(matches!(
            graph.compile(),
            Err(CompilationError::MissingStart)
        ));
    }

    /// **Scenario**: An unconditional loop is rejected; only routers may loop.
    #[test]
    fn compile_fails_on_unconditional_cycle() {
        let mut graph = StateGraph::<DummyState>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_node("b", Arc::new(DummyNode("b")));
        graph.add_node("c", Arc::new(DummyNode("c")));
        graph.add_edge(START, "a");
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");
        graph.add_edge("c", END);
        assert!(matches!(
            graph.compile(),
            Err(CompilationError::InvalidChain(_))
        ));
    }

    /// **Scenario**: A self-loop through a conditional router compiles.
    #[test]
    fn compile_allows_loop_through_router() {
        let mut graph = StateGraph::<DummyState>::new();
        graph.add_node("work", Arc::new(DummyNode("work")));
        graph.add_edge(START, "work");
        graph.add_conditional_edges(
            "work",
            Arc::new(|s: &DummyState| Ok(if s.0 > 0 { "work".into() } else { END.into() })),
            None,
        );
        assert!(graph.compile().is_ok());
    }
}
