//! State graph: nodes, edges and conditional routing; compile, then invoke or stream.
//!
//! Both the top-level conversational graph and the per-step research subgraph
//! are built on this engine.

mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod logging_middleware;
mod next;
mod node;
mod node_middleware;
mod retry;
mod run_context;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
pub use logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_state_update,
};
pub use logging_middleware::LoggingNodeMiddleware;
pub use next::Next;
pub use node::Node;
pub use node_middleware::{NodeMiddleware, NodeRunFn};
pub use retry::RetryPolicy;
pub use run_context::{RunContext, RunnableConfig, DEFAULT_RECURSION_LIMIT};
pub use state_graph::{StateGraph, END, START};
