//! Mock LLM for tests and offline demos.
//!
//! Scripted: free-text replies and structured replies are two independent FIFO
//! queues. Each call pops the head of its queue; the last entry is never popped,
//! so it repeats. Every call is recorded so tests can assert what the graph
//! sent and how many model calls a run made.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse, OutputSchema};
use crate::message::Message;

/// One recorded call to the mock.
#[derive(Clone, Debug)]
pub struct MockInvocation {
    pub messages: Vec<Message>,
    /// Schema name for structured calls; `None` for free-text calls.
    pub schema: Option<String>,
}

enum Scripted<T> {
    Ok(T),
    Err(String),
}

impl<T: Clone> Scripted<T> {
    fn to_result(&self) -> Result<T, AgentError> {
        match self {
            Scripted::Ok(v) => Ok(v.clone()),
            Scripted::Err(msg) => Err(AgentError::ExecutionFailed(msg.clone())),
        }
    }
}

/// Scripted LLM client.
///
/// ```rust
/// use retrieval_graph::MockLlm;
/// use serde_json::json;
///
/// let llm = MockLlm::new()
///     .with_structured(json!({"type": "general", "logic": "small talk"}))
///     .with_text("Hi there!");
/// assert_eq!(llm.invocation_count(), 0);
/// ```
#[derive(Default)]
pub struct MockLlm {
    texts: Mutex<VecDeque<Scripted<String>>>,
    structured: Mutex<VecDeque<Scripted<Value>>>,
    invocations: Mutex<Vec<MockInvocation>>,
}

fn next<T: Clone>(queue: &Mutex<VecDeque<Scripted<T>>>) -> Option<Result<T, AgentError>> {
    let mut queue = queue.lock().unwrap_or_else(|p| p.into_inner());
    if queue.len() > 1 {
        queue.pop_front().map(|s| s.to_result())
    } else {
        queue.front().map(|s| s.to_result())
    }
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock whose every free-text call returns `content`.
    pub fn with_reply(content: impl Into<String>) -> Self {
        Self::new().with_text(content)
    }

    /// Queues a free-text reply.
    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.push_text(Scripted::Ok(content.into()))
    }

    /// Queues a free-text call that fails with `ExecutionFailed(message)`.
    pub fn with_text_error(self, message: impl Into<String>) -> Self {
        self.push_text(Scripted::Err(message.into()))
    }

    /// Queues a structured reply (returned as-is, before schema coercion).
    pub fn with_structured(self, value: Value) -> Self {
        self.push_structured(Scripted::Ok(value))
    }

    /// Queues a structured call that fails with `ExecutionFailed(message)`.
    pub fn with_structured_error(self, message: impl Into<String>) -> Self {
        self.push_structured(Scripted::Err(message.into()))
    }

    fn push_text(self, item: Scripted<String>) -> Self {
        self.texts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push_back(item);
        self
    }

    fn push_structured(self, item: Scripted<Value>) -> Self {
        self.structured
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push_back(item);
        self
    }

    fn record(&self, messages: &[Message], schema: Option<&OutputSchema>) {
        self.invocations
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(MockInvocation {
                messages: messages.to_vec(),
                schema: schema.map(|s| s.name.clone()),
            });
    }

    /// Number of calls made so far (free-text and structured).
    pub fn invocation_count(&self) -> usize {
        self.invocations
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .len()
    }

    /// Copies of all recorded calls, oldest first.
    pub fn invocations(&self) -> Vec<MockInvocation> {
        self.invocations
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        self.record(messages, None);
        let content = next(&self.texts).unwrap_or_else(|| Ok(String::new()))?;
        Ok(LlmResponse {
            content,
            usage: None,
        })
    }

    async fn invoke_structured(
        &self,
        messages: &[Message],
        schema: &OutputSchema,
    ) -> Result<Value, AgentError> {
        self.record(messages, Some(schema));
        next(&self.structured).unwrap_or_else(|| {
            Err(AgentError::StructuredOutput(format!(
                "no structured reply scripted for {}",
                schema.name
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> OutputSchema {
        OutputSchema::new("s", "d", json!({"type": "object"}))
    }

    /// **Scenario**: Queued replies are returned in order and the last one repeats.
    #[tokio::test]
    async fn text_queue_is_fifo_and_last_repeats() {
        let llm = MockLlm::new().with_text("one").with_text("two");
        let m = [Message::user("q")];
        assert_eq!(llm.invoke(&m).await.unwrap().content, "one");
        assert_eq!(llm.invoke(&m).await.unwrap().content, "two");
        assert_eq!(llm.invoke(&m).await.unwrap().content, "two");
        assert_eq!(llm.invocation_count(), 3);
    }

    /// **Scenario**: Text and structured queues are independent.
    #[tokio::test]
    async fn queues_are_independent() {
        let llm = MockLlm::new()
            .with_structured(json!({"n": 1}))
            .with_text("hello");
        let m = [Message::user("q")];
        assert_eq!(llm.invoke_structured(&m, &schema()).await.unwrap()["n"], 1);
        assert_eq!(llm.invoke(&m).await.unwrap().content, "hello");
        let calls = llm.invocations();
        assert_eq!(calls[0].schema.as_deref(), Some("s"));
        assert_eq!(calls[1].schema, None);
    }

    #[tokio::test]
    async fn unscripted_structured_call_fails() {
        let llm = MockLlm::new();
        let err = llm
            .invoke_structured(&[Message::user("q")], &schema())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::StructuredOutput(_)));
    }

    #[tokio::test]
    async fn scripted_errors_are_execution_failures() {
        let llm = MockLlm::new().with_text_error("rate limited");
        match llm.invoke(&[Message::user("q")]).await {
            Err(AgentError::ExecutionFailed(msg)) => assert_eq!(msg, "rate limited"),
            other => panic!("expected ExecutionFailed, got {:?}", other.map(|r| r.content)),
        }
    }
}
