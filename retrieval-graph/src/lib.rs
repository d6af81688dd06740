//! # Retrieval Graph
//!
//! A conversational retrieval agent built on a small state-graph engine. Each
//! turn is classified, then either answered directly, answered with a
//! clarifying question, or researched step by step before a grounded answer.
//!
//! ## Flow
//!
//! - **Route**: [`AnalyzeAndRouteQueryNode`] classifies the latest user message
//!   into `more-info`, `general` or `langchain`. A pre-seeded [`Router`] with
//!   non-empty logic skips the model call.
//! - **Clarify / answer**: [`RouterLogicResponderNode`] renders the router's
//!   logic into a system prompt and replies.
//! - **Plan**: [`CreateResearchPlanNode`] writes ordered research steps.
//! - **Research loop**: [`ConductResearchNode`] pops one step per iteration and
//!   hands it to a [`Researcher`]; the production [`ResearchGraph`] generates
//!   search queries and retrieves for all of them concurrently.
//! - **Respond**: [`RespondNode`] answers with the accumulated documents in context.
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`],
//!   [`RunnableConfig`]; conditional edges, middleware, retry, streaming.
//! - [`state`]: [`AgentState`], [`AgentUpdate`], [`AgentStateReducer`],
//!   [`Router`], [`Document`], [`ResearcherState`].
//! - [`llm`]: [`LlmClient`], [`ChatOpenAI`], [`MockLlm`], structured output.
//! - [`retriever`]: [`Retriever`], [`InMemoryRetriever`].
//! - [`prompts`]: embedded templates, directory overrides, `{name}` rendering.
//! - [`configuration`]: [`AgentConfiguration`] from the environment.
//! - [`agent`]: the research sub-workflow and the top-level retrieval graph,
//!   with [`RetrievalRunner`] as the entry point.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use retrieval_graph::{
//!     AgentConfiguration, InMemoryRetriever, Message, RetrievalRunner,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), retrieval_graph::AgentError> {
//! let config = AgentConfiguration::from_env()?;
//! let retriever = InMemoryRetriever::from_json_file("docs.json".as_ref())?
//!     .with_top_k(config.search_k);
//! let runner = RetrievalRunner::from_configuration(&config, Arc::new(retriever), false)?;
//! let state = runner
//!     .invoke(vec![Message::user("How do I build a retriever?")], None)
//!     .await?;
//! println!("{}", state.last_assistant_reply().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod channels;
pub mod configuration;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod prompts;
pub mod retriever;
pub mod state;
pub mod stream;

pub use agent::researcher::{
    build_researcher_graph, GenerateQueriesNode, ResearchGraph, Researcher,
    RetrieveDocumentsNode,
};
pub use agent::retrieval::{
    build_retrieval_graph, check_finished, format_docs, route_query, AnalyzeAndRouteQueryNode,
    ConductResearchNode, CreateResearchPlanNode, RespondNode, RetrievalGraphDeps,
    RetrievalRunner, RouterLogicResponderNode,
};
pub use channels::{FieldBasedUpdater, ReplaceUpdater, StateUpdater};
pub use configuration::AgentConfiguration;
pub use error::AgentError;
pub use graph::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_state_update, CompilationError, CompiledStateGraph, LoggingNodeMiddleware, Next, Node,
    NodeMiddleware, RetryPolicy, RunContext, RunnableConfig, StateGraph, END, START,
};
pub use llm::{
    load_chat_model, ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm, OutputSchema,
    StructuredOutputMethod,
};
pub use message::Message;
pub use prompts::RetrievalPrompts;
pub use retriever::{InMemoryRetriever, Retriever};
pub use state::{
    AgentState, AgentStateReducer, AgentUpdate, Document, ResearcherState, RouteType, Router,
};
pub use stream::{StreamEvent, StreamMode, StreamWriter};
