//! ConductResearch node: one iteration of the research loop.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::agent::researcher::Researcher;
use crate::error::AgentError;
use crate::graph::{Next, RunContext};
use crate::state::{AgentState, AgentUpdate};
use crate::stream::StreamWriter;
use crate::Node;

use super::CONDUCT_RESEARCH;

/// Researches the head of `plan_steps`, appends what it found and drops the step.
///
/// With no steps left the node returns an empty update. When streaming with
/// `StreamMode::Custom`, each iteration emits
/// `{"event": "research_step", "step", "documents", "remaining"}`.
pub struct ConductResearchNode {
    researcher: Arc<dyn Researcher>,
}

impl ConductResearchNode {
    pub fn new(researcher: Arc<dyn Researcher>) -> Self {
        Self { researcher }
    }

    async fn research_head(
        &self,
        state: AgentState,
        writer: &StreamWriter<AgentState>,
    ) -> Result<(AgentUpdate, Next), AgentError> {
        let mut steps = state.plan_steps.into_iter();
        let Some(step) = steps.next() else {
            tracing::debug!("no research steps left");
            return Ok((AgentUpdate::default(), Next::Continue));
        };
        let remaining: Vec<String> = steps.collect();

        let documents = self.researcher.research(&step).await?;
        tracing::info!(
            step = %step,
            documents = documents.len(),
            remaining = remaining.len(),
            "research step complete"
        );
        writer
            .emit_custom(json!({
                "event": "research_step",
                "step": step,
                "documents": documents.len(),
                "remaining": remaining.len(),
            }))
            .await;

        Ok((
            AgentUpdate {
                plan_steps: Some(remaining),
                documents,
                ..Default::default()
            },
            Next::Continue,
        ))
    }
}

#[async_trait]
impl Node<AgentState, AgentUpdate> for ConductResearchNode {
    fn id(&self) -> &str {
        CONDUCT_RESEARCH
    }

    async fn run(&self, state: AgentState) -> Result<(AgentUpdate, Next), AgentError> {
        self.research_head(state, &StreamWriter::noop()).await
    }

    async fn run_with_context(
        &self,
        state: AgentState,
        ctx: &RunContext<AgentState>,
    ) -> Result<(AgentUpdate, Next), AgentError> {
        self.research_head(state, &ctx.stream_writer()).await
    }
}
