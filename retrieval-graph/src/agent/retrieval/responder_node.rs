//! Router-logic responders: the clarifying question and the general answer.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::Next;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::prompts::render_template;
use crate::state::{AgentState, AgentUpdate};
use crate::Node;

use super::{ASK_FOR_MORE_INFO, RESPOND_TO_GENERAL_QUERY};

/// Answers straight from the conversation, with the router's `logic` rendered
/// into the system prompt. No retrieval is involved.
///
/// Backs both `ask_for_more_info` and `respond_to_general_query`; they differ
/// only in node id and template.
pub struct RouterLogicResponderNode {
    id: &'static str,
    llm: Arc<dyn LlmClient>,
    template: String,
}

impl RouterLogicResponderNode {
    pub fn ask_for_more_info(llm: Arc<dyn LlmClient>, template: impl Into<String>) -> Self {
        Self {
            id: ASK_FOR_MORE_INFO,
            llm,
            template: template.into(),
        }
    }

    pub fn respond_to_general_query(llm: Arc<dyn LlmClient>, template: impl Into<String>) -> Self {
        Self {
            id: RESPOND_TO_GENERAL_QUERY,
            llm,
            template: template.into(),
        }
    }
}

#[async_trait]
impl Node<AgentState, AgentUpdate> for RouterLogicResponderNode {
    fn id(&self) -> &str {
        self.id
    }

    async fn run(&self, state: AgentState) -> Result<(AgentUpdate, Next), AgentError> {
        let logic = state.router.as_ref().map(|r| r.logic.as_str()).unwrap_or("");
        let system = render_template(&self.template, &[("logic", logic)]);

        let mut prompt = Vec::with_capacity(state.messages.len() + 1);
        prompt.push(Message::system(system));
        prompt.extend(state.messages.iter().cloned());

        let response = self.llm.invoke(&prompt).await?;
        Ok((
            AgentUpdate::message(Message::assistant(response.content)),
            Next::Continue,
        ))
    }
}
