//! Wiring of the top-level retrieval graph.

use std::collections::HashMap;
use std::sync::Arc;

use crate::agent::researcher::Researcher;
use crate::graph::{CompilationError, CompiledStateGraph, StateGraph, END, START};
use crate::llm::LlmClient;
use crate::prompts::RetrievalPrompts;
use crate::state::{AgentState, AgentStateReducer, AgentUpdate};

use super::{
    check_finished, route_query, AnalyzeAndRouteQueryNode, ConductResearchNode,
    CreateResearchPlanNode, RespondNode, RouterLogicResponderNode, ANALYZE_AND_ROUTE_QUERY,
    ASK_FOR_MORE_INFO, CONDUCT_RESEARCH, CREATE_RESEARCH_PLAN, RESPOND, RESPOND_TO_GENERAL_QUERY,
};

/// Everything the graph's nodes are built from.
///
/// `query_llm` classifies, plans, asks for more information and answers
/// general queries; `response_llm` only writes the researched answer in `respond`.
/// The researcher carries its own model for search queries.
#[derive(Clone)]
pub struct RetrievalGraphDeps {
    pub query_llm: Arc<dyn LlmClient>,
    pub response_llm: Arc<dyn LlmClient>,
    pub researcher: Arc<dyn Researcher>,
    pub prompts: RetrievalPrompts,
    pub max_context_chars: usize,
}

impl RetrievalGraphDeps {
    /// One model for both roles, embedded prompts, unlimited context.
    pub fn new(llm: Arc<dyn LlmClient>, researcher: Arc<dyn Researcher>) -> Self {
        Self {
            query_llm: llm.clone(),
            response_llm: llm,
            researcher,
            prompts: RetrievalPrompts::default(),
            max_context_chars: 0,
        }
    }

    pub fn with_response_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.response_llm = llm;
        self
    }

    pub fn with_prompts(mut self, prompts: RetrievalPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_max_context_chars(mut self, max_context_chars: usize) -> Self {
        self.max_context_chars = max_context_chars;
        self
    }
}

fn identity_map(targets: &[&str]) -> HashMap<String, String> {
    targets
        .iter()
        .map(|t| (t.to_string(), t.to_string()))
        .collect()
}

/// Builds the uncompiled graph so callers can still attach middleware or a retry policy.
pub(crate) fn retrieval_state_graph(
    deps: RetrievalGraphDeps,
) -> StateGraph<AgentState, AgentUpdate> {
    let RetrievalGraphDeps {
        query_llm,
        response_llm,
        researcher,
        prompts,
        max_context_chars,
    } = deps;

    let mut graph =
        StateGraph::<AgentState, AgentUpdate>::with_reducer(Arc::new(AgentStateReducer));
    graph
        .add_node(
            ANALYZE_AND_ROUTE_QUERY,
            Arc::new(AnalyzeAndRouteQueryNode::new(query_llm.clone(), prompts.router)),
        )
        .add_node(
            ASK_FOR_MORE_INFO,
            Arc::new(RouterLogicResponderNode::ask_for_more_info(
                query_llm.clone(),
                prompts.more_info,
            )),
        )
        .add_node(
            RESPOND_TO_GENERAL_QUERY,
            Arc::new(RouterLogicResponderNode::respond_to_general_query(
                query_llm.clone(),
                prompts.general,
            )),
        )
        .add_node(
            CREATE_RESEARCH_PLAN,
            Arc::new(CreateResearchPlanNode::new(query_llm, prompts.research_plan)),
        )
        .add_node(
            CONDUCT_RESEARCH,
            Arc::new(ConductResearchNode::new(researcher)),
        )
        .add_node(
            RESPOND,
            Arc::new(
                RespondNode::new(response_llm, prompts.response)
                    .with_max_context_chars(max_context_chars),
            ),
        )
        .add_edge(START, ANALYZE_AND_ROUTE_QUERY)
        .add_conditional_edges(
            ANALYZE_AND_ROUTE_QUERY,
            Arc::new(route_query),
            Some(identity_map(&[
                ASK_FOR_MORE_INFO,
                RESPOND_TO_GENERAL_QUERY,
                CREATE_RESEARCH_PLAN,
            ])),
        )
        .add_edge(ASK_FOR_MORE_INFO, END)
        .add_edge(RESPOND_TO_GENERAL_QUERY, END)
        .add_conditional_edges(
            CREATE_RESEARCH_PLAN,
            Arc::new(check_finished),
            Some(identity_map(&[CONDUCT_RESEARCH, RESPOND])),
        )
        .add_conditional_edges(
            CONDUCT_RESEARCH,
            Arc::new(check_finished),
            Some(identity_map(&[CONDUCT_RESEARCH, RESPOND])),
        )
        .add_edge(RESPOND, END);
    graph
}

/// Compiles the retrieval graph with [`AgentStateReducer`] merging node updates.
pub fn build_retrieval_graph(
    deps: RetrievalGraphDeps,
) -> Result<CompiledStateGraph<AgentState, AgentUpdate>, CompilationError> {
    retrieval_state_graph(deps).compile()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::error::AgentError;
    use crate::llm::MockLlm;
    use crate::message::Message;
    use crate::state::Document;
    use serde_json::json;

    struct NoResearch;

    #[async_trait]
    impl Researcher for NoResearch {
        async fn research(&self, _question: &str) -> Result<Vec<Document>, AgentError> {
            Ok(vec![])
        }
    }

    #[test]
    fn compiles_with_all_six_nodes() {
        let deps = RetrievalGraphDeps::new(Arc::new(MockLlm::new()), Arc::new(NoResearch));
        let compiled = build_retrieval_graph(deps).unwrap();
        let mut expected = vec![
            ANALYZE_AND_ROUTE_QUERY,
            ASK_FOR_MORE_INFO,
            CONDUCT_RESEARCH,
            CREATE_RESEARCH_PLAN,
            RESPOND,
            RESPOND_TO_GENERAL_QUERY,
        ];
        expected.sort();
        assert_eq!(compiled.node_ids(), expected);
    }

    #[tokio::test]
    async fn clarify_and_general_replies_use_query_model() {
        for route in ["more-info", "general"] {
            let query = Arc::new(
                MockLlm::with_reply("from the query model")
                    .with_structured(json!({"type": route, "logic": "because"})),
            );
            let response = Arc::new(MockLlm::with_reply("from the response model"));
            let deps = RetrievalGraphDeps::new(query.clone(), Arc::new(NoResearch))
                .with_response_llm(response.clone());
            let compiled = build_retrieval_graph(deps).unwrap();

            let state = AgentState::from_messages(vec![Message::user("hi")]);
            let out = compiled.invoke(state, None).await.unwrap();
            assert_eq!(out.last_assistant_reply(), Some("from the query model"), "{route}");
            assert_eq!(query.invocation_count(), 2, "{route}");
            assert_eq!(response.invocation_count(), 0, "{route}");
        }
    }

    #[tokio::test]
    async fn researched_answer_uses_response_model() {
        let query = Arc::new(
            MockLlm::with_reply("from the query model")
                .with_structured(json!({"type": "langchain", "logic": "library question"}))
                .with_structured(json!({"steps": []})),
        );
        let response = Arc::new(MockLlm::with_reply("from the response model"));
        let deps = RetrievalGraphDeps::new(query.clone(), Arc::new(NoResearch))
            .with_response_llm(response.clone());
        let compiled = build_retrieval_graph(deps).unwrap();

        let state = AgentState::from_messages(vec![Message::user("what is LCEL?")]);
        let out = compiled.invoke(state, None).await.unwrap();
        assert_eq!(out.last_assistant_reply(), Some("from the response model"));
        assert_eq!(response.invocation_count(), 1);
        assert_eq!(query.invocation_count(), 2);
    }
}
