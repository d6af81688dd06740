//! OpenAI Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Requires `OPENAI_API_KEY`; `OPENAI_BASE_URL` points it at any compatible
//! endpoint. Structured calls use the [`StructuredOutputMethod`] chosen at
//! construction: a strict `json_schema` response format, or JSON object mode
//! with the schema spelled out in the system prompt.

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::error::AgentError;
use crate::llm::{
    extract_json, LlmClient, LlmResponse, LlmUsage, OutputSchema, StructuredOutputMethod,
};
use crate::message::Message;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
    },
    Client,
};

/// OpenAI Chat Completions client.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
    structured_output: StructuredOutputMethod,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY`, base from `OPENAI_BASE_URL`).
    pub fn new(model: impl Into<String>) -> Self {
        let mut config = OpenAIConfig::new();
        if let Ok(base) = std::env::var("OPENAI_BASE_URL") {
            config = config.with_api_base(base);
        }
        Self::with_config(config, model)
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: None,
            structured_output: StructuredOutputMethod::default(),
        }
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_structured_output(mut self, method: StructuredOutputMethod) -> Self {
        self.structured_output = method;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_completions_url() -> String {
        let base = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }

    fn messages_to_request(messages: &[Message]) -> Vec<ChatCompletionRequestMessage> {
        messages
            .iter()
            .map(|m| match m {
                Message::System(s) => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(s.as_str()),
                ),
                Message::User(s) => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(s.as_str()),
                ),
                Message::Assistant(s) => {
                    ChatCompletionRequestMessage::Assistant((s.as_str()).into())
                }
            })
            .collect()
    }

    fn build_request(
        &self,
        messages: &[Message],
        response_format: Option<ResponseFormat>,
    ) -> Result<CreateChatCompletionRequest, AgentError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(Self::messages_to_request(messages));
        if let Some(t) = self.temperature {
            args.temperature(t);
        }
        if let Some(format) = response_format {
            args.response_format(format);
        }
        args.build().map_err(|e| {
            AgentError::ExecutionFailed(format!("OpenAI request build failed: {}", e))
        })
    }

    async fn send(
        &self,
        request: CreateChatCompletionRequest,
        message_count: usize,
        schema: Option<&str>,
    ) -> Result<LlmResponse, AgentError> {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let url = Self::chat_completions_url();
        debug!(
            trace_id = %trace_id,
            url = %url,
            model = %self.model,
            message_count,
            schema = ?schema,
            temperature = ?self.temperature,
            "OpenAI chat create"
        );
        if let Ok(js) = serde_json::to_string_pretty(&request) {
            trace!(trace_id = %trace_id, request = %js, "OpenAI request body");
        }

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI API error: {}", e)))?;

        if let Ok(js) = serde_json::to_string_pretty(&response) {
            trace!(trace_id = %trace_id, response = %js, "OpenAI response body");
        }

        let usage = response.usage.as_ref().map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            AgentError::ExecutionFailed("OpenAI returned no choices".to_string())
        })?;
        if let Some(refusal) = choice.message.refusal {
            return Err(AgentError::StructuredOutput(format!(
                "model refused: {}",
                refusal
            )));
        }
        debug!(
            trace_id = %trace_id,
            total_tokens = usage.as_ref().map(|u| u.total_tokens),
            "OpenAI chat complete"
        );
        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
        })
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let request = self.build_request(messages, None)?;
        self.send(request, messages.len(), None).await
    }

    async fn invoke_structured(
        &self,
        messages: &[Message],
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, AgentError> {
        let request = match self.structured_output {
            StructuredOutputMethod::JsonSchema => self.build_request(
                messages,
                Some(ResponseFormat::JsonSchema {
                    json_schema: ResponseFormatJsonSchema {
                        name: schema.name.clone(),
                        description: Some(schema.description.clone()),
                        schema: Some(schema.schema.clone()),
                        strict: Some(true),
                    },
                }),
            )?,
            StructuredOutputMethod::JsonMode => self.build_request(
                &schema.with_instructions(messages),
                Some(ResponseFormat::JsonObject),
            )?,
        };
        let response = self
            .send(request, messages.len(), Some(&schema.name))
            .await?;
        extract_json(&response.content)
    }
}
