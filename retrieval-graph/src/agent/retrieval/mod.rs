//! Conversational retrieval graph.
//!
//! ```text
//! START → analyze_and_route_query ─┬─ more-info ─→ ask_for_more_info ────────→ END
//!                                  ├─ general ───→ respond_to_general_query ─→ END
//!                                  └─ langchain ─→ create_research_plan
//!                                                     │
//!                              ┌──── steps left ──────┤
//!                              ▼                      │ no steps
//!                       conduct_research ─ steps left ┐│
//!                              │  (loop)              ││
//!                              └── no steps ──────────┴┴→ respond → END
//! ```
//!
//! Every node returns an [`AgentUpdate`](crate::state::AgentUpdate) that
//! [`AgentStateReducer`](crate::state::AgentStateReducer) merges into
//! [`AgentState`](crate::state::AgentState).

mod format;
mod graph;
mod plan_node;
mod research_node;
mod respond_node;
mod responder_node;
mod route_node;
mod routing;
mod runner;

pub use format::format_docs;
pub use graph::{build_retrieval_graph, RetrievalGraphDeps};
pub use plan_node::{research_plan_schema, CreateResearchPlanNode};
pub use research_node::ConductResearchNode;
pub use respond_node::RespondNode;
pub use responder_node::RouterLogicResponderNode;
pub use route_node::{router_schema, AnalyzeAndRouteQueryNode};
pub use routing::{check_finished, route_query};
pub use runner::RetrievalRunner;

pub const ANALYZE_AND_ROUTE_QUERY: &str = "analyze_and_route_query";
pub const ASK_FOR_MORE_INFO: &str = "ask_for_more_info";
pub const RESPOND_TO_GENERAL_QUERY: &str = "respond_to_general_query";
pub const CREATE_RESEARCH_PLAN: &str = "create_research_plan";
pub const CONDUCT_RESEARCH: &str = "conduct_research";
pub const RESPOND: &str = "respond";
