//! GenerateQueries node: one structured model call turns the question into search queries.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::AgentError;
use crate::graph::Next;
use crate::llm::{invoke_typed, LlmClient, OutputSchema};
use crate::message::Message;
use crate::state::ResearcherState;
use crate::Node;

use super::GENERATE_QUERIES;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeneratedQueries {
    queries: Vec<String>,
}

/// Schema for the query list: `{"queries": [string]}`.
pub fn queries_schema() -> OutputSchema {
    OutputSchema::new(
        "search_queries",
        "Search queries that together cover the research step",
        json!({
            "type": "object",
            "properties": {
                "queries": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["queries"],
            "additionalProperties": false
        }),
    )
}

/// Writes `state.queries` from the model's answer, trimmed and with blank queries
/// dropped; output that is not a list of strings is `AgentError::QueryGeneration`.
pub struct GenerateQueriesNode {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl GenerateQueriesNode {
    pub fn new(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
        }
    }
}

#[async_trait]
impl Node<ResearcherState> for GenerateQueriesNode {
    fn id(&self) -> &str {
        GENERATE_QUERIES
    }

    async fn run(&self, state: ResearcherState) -> Result<(ResearcherState, Next), AgentError> {
        let messages = [
            Message::system(self.system_prompt.clone()),
            Message::user(state.question.clone()),
        ];
        let generated: GeneratedQueries =
            invoke_typed(self.llm.as_ref(), &messages, &queries_schema())
                .await
                .map_err(|e| e.map_structured(AgentError::QueryGeneration))?;
        let queries: Vec<String> = generated
            .queries
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        tracing::debug!(
            question = %state.question,
            count = queries.len(),
            "generated search queries"
        );
        Ok((
            ResearcherState {
                queries,
                ..state
            },
            Next::Continue,
        ))
    }
}
