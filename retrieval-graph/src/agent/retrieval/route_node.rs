//! AnalyzeAndRouteQuery node: classify the latest user message.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::AgentError;
use crate::graph::Next;
use crate::llm::{invoke_typed, LlmClient, OutputSchema};
use crate::message::{last_user_message, Message};
use crate::state::{AgentState, AgentUpdate, RouteType, Router};
use crate::Node;

use super::ANALYZE_AND_ROUTE_QUERY;

/// What the model may answer; anything outside these three is a classification failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum Category {
    MoreInfo,
    Langchain,
    General,
}

impl From<Category> for RouteType {
    fn from(c: Category) -> Self {
        match c {
            Category::MoreInfo => RouteType::MoreInfo,
            Category::Langchain => RouteType::Langchain,
            Category::General => RouteType::General,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Classification {
    #[serde(rename = "type")]
    category: Category,
    logic: String,
}

/// Schema for the router: `{"type": "more-info" | "langchain" | "general", "logic": string}`.
pub fn router_schema() -> OutputSchema {
    OutputSchema::new(
        "router",
        "Classify the user query",
        json!({
            "type": "object",
            "properties": {
                "type": {"type": "string", "enum": ["more-info", "langchain", "general"]},
                "logic": {"type": "string"}
            },
            "required": ["type", "logic"],
            "additionalProperties": false
        }),
    )
}

/// Classifies the most recent user message into a [`Router`].
///
/// When the state already carries a set router (non-empty logic), that router
/// is returned unchanged and the model is not called.
pub struct AnalyzeAndRouteQueryNode {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl AnalyzeAndRouteQueryNode {
    pub fn new(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
        }
    }
}

#[async_trait]
impl Node<AgentState, AgentUpdate> for AnalyzeAndRouteQueryNode {
    fn id(&self) -> &str {
        ANALYZE_AND_ROUTE_QUERY
    }

    async fn run(&self, state: AgentState) -> Result<(AgentUpdate, Next), AgentError> {
        if let Some(router) = state.router.filter(Router::is_set) {
            tracing::debug!(
                route = %router.route_type,
                "router pre-seeded; skipping classification"
            );
            return Ok((AgentUpdate::router(router), Next::Continue));
        }

        let question = last_user_message(&state.messages).ok_or_else(|| {
            AgentError::Classification("conversation has no user message to classify".into())
        })?;
        let messages = [
            Message::system(self.system_prompt.clone()),
            Message::user(question),
        ];
        let classified: Classification =
            invoke_typed(self.llm.as_ref(), &messages, &router_schema())
                .await
                .map_err(|e| e.map_structured(AgentError::Classification))?;

        let router = Router::new(classified.category.into(), classified.logic);
        tracing::info!(route = %router.route_type, logic = %router.logic, "query classified");
        Ok((AgentUpdate::router(router), Next::Continue))
    }
}
