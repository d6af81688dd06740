//! LLM client abstraction for the retrieval graph.
//!
//! Nodes make two kinds of calls: free-text completions (clarification,
//! general answers, the final response) and structured completions whose
//! output must fit a JSON Schema (routing, research plans, search queries).
//! [`LlmClient`] covers both; [`OutputSchema`] describes the expected shape and
//! [`parse_structured`] turns the returned JSON into a typed value.
//!
//! How structured output is requested from the provider is a
//! [`StructuredOutputMethod`] fixed when the client is built.

mod mock;
mod openai;
mod schema;

pub use mock::{MockInvocation, MockLlm};
pub use openai::ChatOpenAI;
pub use schema::{extract_json, parse_structured, OutputSchema, StructuredOutputMethod};

use std::str::FromStr;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::AgentError;
use crate::message::Message;

/// Token usage for one LLM call (prompt + completion).
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from a free-text completion.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    /// Assistant message content (plain text).
    pub content: String,
    /// Token usage for this call, when the provider reports it.
    pub usage: Option<LlmUsage>,
}

/// LLM client: given messages, returns assistant text or a schema-shaped JSON value.
///
/// Implementations: [`ChatOpenAI`] (OpenAI-compatible API), [`MockLlm`] (scripted, for tests).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// One free-text completion.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;

    /// One completion whose output must be a JSON object matching `schema`.
    ///
    /// The default implementation asks for JSON in the system prompt and parses
    /// the free-text reply. Output that is not JSON is `AgentError::StructuredOutput`.
    async fn invoke_structured(
        &self,
        messages: &[Message],
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, AgentError> {
        let prompted = schema.with_instructions(messages);
        let response = self.invoke(&prompted).await?;
        extract_json(&response.content)
    }
}

/// Structured call plus typed parse; coercion failures are `AgentError::StructuredOutput`.
pub async fn invoke_typed<T: DeserializeOwned>(
    llm: &dyn LlmClient,
    messages: &[Message],
    schema: &OutputSchema,
) -> Result<T, AgentError> {
    let value = llm.invoke_structured(messages, schema).await?;
    parse_structured(value)
}

/// A `provider/model` identifier such as `openai/gpt-4o-mini`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelId {
    pub provider: String,
    pub model: String,
}

impl FromStr for ModelId {
    type Err = AgentError;

    /// A bare model name (no `/`) is taken as an OpenAI model.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (provider, model) = match s.split_once('/') {
            Some((p, m)) => (p.trim(), m.trim()),
            None => ("openai", s),
        };
        if provider.is_empty() || model.is_empty() {
            return Err(AgentError::Config(format!(
                "invalid model id {:?}: expected provider/model",
                s
            )));
        }
        Ok(ModelId {
            provider: provider.to_lowercase(),
            model: model.to_string(),
        })
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

/// Builds a chat client for a `provider/model` id. Only `openai` is supported.
pub fn load_chat_model(
    model_id: &str,
    method: StructuredOutputMethod,
) -> Result<ChatOpenAI, AgentError> {
    let id: ModelId = model_id.parse()?;
    match id.provider.as_str() {
        "openai" => Ok(ChatOpenAI::new(id.model)
            .with_temperature(0.0)
            .with_structured_output(method)),
        other => Err(AgentError::Config(format!(
            "unsupported model provider {:?} in {}",
            other, id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_id_parses_provider_and_model() {
        let id: ModelId = "openai/gpt-4o-mini".parse().unwrap();
        assert_eq!(id.provider, "openai");
        assert_eq!(id.model, "gpt-4o-mini");
        assert_eq!(id.to_string(), "openai/gpt-4o-mini");
    }

    #[test]
    fn model_id_without_provider_defaults_to_openai() {
        let id: ModelId = "gpt-4o".parse().unwrap();
        assert_eq!(id.provider, "openai");
    }

    #[test]
    fn model_id_rejects_empty_parts() {
        assert!(matches!("openai/".parse::<ModelId>(), Err(AgentError::Config(_))));
        assert!(matches!("/gpt".parse::<ModelId>(), Err(AgentError::Config(_))));
    }

    /// **Scenario**: Providers other than openai are a configuration error.
    #[test]
    fn load_chat_model_rejects_unknown_provider() {
        match load_chat_model("anthropic/claude", StructuredOutputMethod::JsonSchema) {
            Err(AgentError::Config(msg)) => assert!(msg.contains("anthropic"), "{}", msg),
            Err(e) => panic!("expected Config error, got {:?}", e),
            Ok(_) => panic!("expected Config error"),
        }
    }

    /// **Scenario**: The default structured path parses JSON out of a fenced free-text reply.
    #[tokio::test]
    async fn default_invoke_structured_parses_reply() {
        struct FencedJson;

        #[async_trait]
        impl LlmClient for FencedJson {
            async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
                assert!(messages[0].content().contains("\"steps\""));
                Ok(LlmResponse {
                    content: "```json\n{\"steps\": [\"a\"]}\n```".into(),
                    usage: None,
                })
            }
        }

        let schema = OutputSchema::new(
            "plan",
            "A plan",
            serde_json::json!({"type": "object", "properties": {"steps": {"type": "array"}}}),
        );
        let value = FencedJson
            .invoke_structured(&[Message::system("plan it"), Message::user("q")], &schema)
            .await
            .unwrap();
        assert_eq!(value["steps"][0], "a");
    }
}
