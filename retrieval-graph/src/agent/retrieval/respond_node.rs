//! Respond node: the final answer grounded in the researched documents.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::Next;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::prompts::render_template;
use crate::state::{AgentState, AgentUpdate};
use crate::Node;

use super::{format_docs, RESPOND};

/// Renders `{logic}` and `{docs}` into the response template and answers
/// over the whole conversation.
pub struct RespondNode {
    llm: Arc<dyn LlmClient>,
    template: String,
    max_context_chars: usize,
}

impl RespondNode {
    pub fn new(llm: Arc<dyn LlmClient>, template: impl Into<String>) -> Self {
        Self {
            llm,
            template: template.into(),
            max_context_chars: 0,
        }
    }

    /// Character budget for the rendered documents; 0 means unlimited.
    pub fn with_max_context_chars(mut self, max_context_chars: usize) -> Self {
        self.max_context_chars = max_context_chars;
        self
    }
}

#[async_trait]
impl Node<AgentState, AgentUpdate> for RespondNode {
    fn id(&self) -> &str {
        RESPOND
    }

    async fn run(&self, state: AgentState) -> Result<(AgentUpdate, Next), AgentError> {
        let logic = state.router.as_ref().map(|r| r.logic.as_str()).unwrap_or("");
        let docs = format_docs(&state.documents, self.max_context_chars);
        let system = render_template(
            &self.template,
            &[("logic", logic), ("docs", docs.as_str())],
        );

        let mut prompt = Vec::with_capacity(state.messages.len() + 1);
        prompt.push(Message::system(system));
        prompt.extend(state.messages.iter().cloned());

        tracing::debug!(documents = state.documents.len(), "responding with research context");
        let response = self.llm.invoke(&prompt).await?;
        Ok((
            AgentUpdate::message(Message::assistant(response.content)),
            Next::Continue,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::state::{Document, RouteType, Router};

    #[tokio::test]
    async fn renders_docs_and_logic_into_system_prompt() {
        let llm = Arc::new(MockLlm::with_reply("LCEL pipes runnables."));
        let node = RespondNode::new(llm.clone(), "Logic: {logic}\n{docs}");
        let mut state = AgentState::from_messages(vec![Message::user("what is LCEL?")])
            .with_router(Router::new(RouteType::Langchain, "library question"));
        state.documents = vec![Document::new("LCEL is the expression language.", "lcel.md")];

        let (update, _) = node.run(state).await.unwrap();
        assert_eq!(update.messages, vec![Message::assistant("LCEL pipes runnables.")]);

        let system = llm.invocations()[0].messages[0].content().to_string();
        assert!(system.starts_with("Logic: library question\n<documents>"));
        assert!(system.contains("<document source=\"lcel.md\">"));
    }

    /// **Scenario**: A document containing `{logic}` is inserted verbatim.
    #[tokio::test]
    async fn document_text_is_not_re_rendered() {
        let llm = Arc::new(MockLlm::with_reply("ok"));
        let node = RespondNode::new(llm.clone(), "{docs}|{logic}");
        let mut state = AgentState::default().with_router(Router::new(RouteType::Langchain, "L"));
        state.documents = vec![Document::new("literal {logic}", "s")];

        node.run(state).await.unwrap();
        let system = llm.invocations()[0].messages[0].content().to_string();
        assert!(system.contains("literal {logic}"));
        assert!(system.ends_with("|L"));
    }

    #[tokio::test]
    async fn no_documents_renders_empty_docs() {
        let llm = Arc::new(MockLlm::with_reply("ok"));
        let node = RespondNode::new(llm.clone(), "[{docs}]");
        node.run(AgentState::default()).await.unwrap();
        assert_eq!(llm.invocations()[0].messages[0], Message::system("[]"));
    }
}
