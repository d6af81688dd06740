//! CreateResearchPlan node: turn the question into ordered research steps.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::AgentError;
use crate::graph::Next;
use crate::llm::{invoke_typed, LlmClient, OutputSchema};
use crate::message::{last_user_message, Message};
use crate::state::{AgentState, AgentUpdate};
use crate::Node;

use super::CREATE_RESEARCH_PLAN;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Plan {
    steps: Vec<String>,
}

/// Schema for the planner: `{"steps": [string]}`.
pub fn research_plan_schema() -> OutputSchema {
    OutputSchema::new(
        "research_plan",
        "Ordered research steps",
        json!({
            "type": "object",
            "properties": {
                "steps": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["steps"],
            "additionalProperties": false
        }),
    )
}

/// Asks the model for a research plan for the latest user message and replaces
/// `plan_steps` with it. Steps are trimmed and blank ones dropped; an empty plan is valid.
pub struct CreateResearchPlanNode {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl CreateResearchPlanNode {
    pub fn new(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
        }
    }
}

#[async_trait]
impl Node<AgentState, AgentUpdate> for CreateResearchPlanNode {
    fn id(&self) -> &str {
        CREATE_RESEARCH_PLAN
    }

    async fn run(&self, state: AgentState) -> Result<(AgentUpdate, Next), AgentError> {
        let question = last_user_message(&state.messages).ok_or_else(|| {
            AgentError::PlanGeneration("conversation has no user message to plan for".into())
        })?;
        let prompt = [
            Message::system(self.system_prompt.clone()),
            Message::user(question),
        ];

        let plan: Plan = invoke_typed(self.llm.as_ref(), &prompt, &research_plan_schema())
            .await
            .map_err(|e| e.map_structured(AgentError::PlanGeneration))?;
        let steps: Vec<String> = plan
            .steps
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        tracing::info!(steps = steps.len(), "research plan created");
        Ok((AgentUpdate::plan_steps(steps), Next::Continue))
    }
}
