//! Retrieval graph runner: build from configuration, invoke and stream.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::agent::researcher::ResearchGraph;
use crate::configuration::AgentConfiguration;
use crate::error::AgentError;
use crate::graph::{CompiledStateGraph, LoggingNodeMiddleware, RunContext, RunnableConfig};
use crate::llm::{load_chat_model, LlmClient};
use crate::message::Message;
use crate::retriever::Retriever;
use crate::state::{AgentState, AgentUpdate, Router};
use crate::stream::{StreamEvent, StreamMode};

use super::graph::{retrieval_state_graph, RetrievalGraphDeps};

/// Compiled retrieval graph plus the run config applied to every call.
#[derive(Clone)]
pub struct RetrievalRunner {
    compiled: CompiledStateGraph<AgentState, AgentUpdate>,
    runnable_config: RunnableConfig,
}

impl RetrievalRunner {
    /// Compiles the graph. With `verbose`, node enter/exit is logged through
    /// [`LoggingNodeMiddleware`].
    pub fn new(deps: RetrievalGraphDeps, verbose: bool) -> Result<Self, AgentError> {
        let graph = retrieval_state_graph(deps);
        let graph = if verbose {
            graph.with_middleware(Arc::new(
                LoggingNodeMiddleware::<AgentState, AgentUpdate>::default(),
            ))
        } else {
            graph
        };
        Ok(Self {
            compiled: graph.compile()?,
            runnable_config: RunnableConfig::default(),
        })
    }

    /// Builds OpenAI-compatible clients for both model roles, the research
    /// sub-graph over `retriever`, and applies the configured limits.
    pub fn from_configuration(
        config: &AgentConfiguration,
        retriever: Arc<dyn Retriever>,
        verbose: bool,
    ) -> Result<Self, AgentError> {
        let query_llm: Arc<dyn LlmClient> =
            Arc::new(load_chat_model(&config.query_model, config.structured_output)?);
        let response_llm: Arc<dyn LlmClient> =
            Arc::new(load_chat_model(&config.response_model, config.structured_output)?);
        let researcher = ResearchGraph::new(
            query_llm.clone(),
            retriever,
            config.prompts.generate_queries.clone(),
        )?;

        let deps = RetrievalGraphDeps::new(query_llm, Arc::new(researcher))
            .with_response_llm(response_llm)
            .with_prompts(config.prompts.clone())
            .with_max_context_chars(config.max_context_chars);
        Ok(Self::new(deps, verbose)?.with_runnable_config(
            RunnableConfig::default().with_recursion_limit(config.recursion_limit),
        ))
    }

    pub fn with_runnable_config(mut self, config: RunnableConfig) -> Self {
        self.runnable_config = config;
        self
    }

    pub fn runnable_config(&self) -> &RunnableConfig {
        &self.runnable_config
    }

    /// Runs one turn over `messages`. A `router` with non-empty logic skips classification.
    pub async fn invoke(
        &self,
        messages: Vec<Message>,
        router: Option<Router>,
    ) -> Result<AgentState, AgentError> {
        let mut state = AgentState::from_messages(messages);
        state.router = router;
        self.invoke_state(state).await
    }

    pub async fn invoke_state(&self, state: AgentState) -> Result<AgentState, AgentError> {
        self.compiled
            .invoke(state, Some(self.runnable_config.clone()))
            .await
    }

    /// Streams a run; a failure ends the stream with `StreamEvent::Failed`.
    pub fn stream(
        &self,
        state: AgentState,
        modes: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent<AgentState>> {
        self.compiled
            .stream(state, Some(self.runnable_config.clone()), modes)
    }

    /// Runs with every stream mode enabled, handing each event to `on_event`,
    /// and returns the final state or the run's error unchanged.
    pub async fn stream_with_callback<F>(
        &self,
        state: AgentState,
        mut on_event: F,
    ) -> Result<AgentState, AgentError>
    where
        F: FnMut(StreamEvent<AgentState>),
    {
        let (tx, mut rx) = mpsc::channel(128);
        let ctx =
            RunContext::new(self.runnable_config.clone()).with_stream(tx, StreamMode::all());
        let run = self.compiled.invoke_with_context(state, ctx);
        let drain = async {
            while let Some(event) = rx.recv().await {
                on_event(event);
            }
        };
        let (result, ()) = tokio::join!(run, drain);
        result
    }
}
