//! Research graph builder and the `Researcher` seam used by the research loop.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{CompilationError, CompiledStateGraph, RunnableConfig, StateGraph, END, START};
use crate::llm::LlmClient;
use crate::retriever::Retriever;
use crate::state::{Document, ResearcherState};

use super::{GenerateQueriesNode, RetrieveDocumentsNode, GENERATE_QUERIES, RETRIEVE_DOCUMENTS};

/// Researches one plan step and returns the documents found for it.
///
/// The top-level research loop only sees this trait, so tests can substitute a
/// stub and deployments can swap in a different retrieval strategy.
#[async_trait]
pub trait Researcher: Send + Sync {
    async fn research(&self, question: &str) -> Result<Vec<Document>, AgentError>;
}

/// Compiles START → generate_queries → retrieve_documents → END.
pub fn build_researcher_graph(
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    generate_queries_prompt: impl Into<String>,
) -> Result<CompiledStateGraph<ResearcherState>, CompilationError> {
    let mut graph = StateGraph::<ResearcherState>::new();
    graph
        .add_node(
            GENERATE_QUERIES,
            Arc::new(GenerateQueriesNode::new(llm, generate_queries_prompt)),
        )
        .add_node(
            RETRIEVE_DOCUMENTS,
            Arc::new(RetrieveDocumentsNode::new(retriever)),
        )
        .add_edge(START, GENERATE_QUERIES)
        .add_edge(GENERATE_QUERIES, RETRIEVE_DOCUMENTS)
        .add_edge(RETRIEVE_DOCUMENTS, END);
    graph.compile()
}

/// Production [`Researcher`]: runs the compiled research graph once per step.
#[derive(Clone)]
pub struct ResearchGraph {
    compiled: CompiledStateGraph<ResearcherState>,
}

impl ResearchGraph {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        retriever: Arc<dyn Retriever>,
        generate_queries_prompt: impl Into<String>,
    ) -> Result<Self, CompilationError> {
        Ok(Self {
            compiled: build_researcher_graph(llm, retriever, generate_queries_prompt)?,
        })
    }

    /// Runs the sub-workflow and returns its whole final state (queries included).
    pub async fn run(&self, question: &str) -> Result<ResearcherState, AgentError> {
        self.compiled
            .invoke(ResearcherState::new(question), Some(RunnableConfig::default()))
            .await
    }
}

#[async_trait]
impl Researcher for ResearchGraph {
    async fn research(&self, question: &str) -> Result<Vec<Document>, AgentError> {
        Ok(self.run(question).await?.documents)
    }
}
