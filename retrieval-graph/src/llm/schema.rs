//! Structured output: schema description, request method, and JSON coercion.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AgentError;
use crate::message::Message;

/// How a client asks the provider for schema-shaped output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StructuredOutputMethod {
    /// Provider-enforced JSON Schema (`response_format: json_schema`, strict).
    #[default]
    JsonSchema,
    /// JSON object mode; the schema is described in the system prompt.
    JsonMode,
}

impl FromStr for StructuredOutputMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "json_schema" => Ok(Self::JsonSchema),
            "json_mode" => Ok(Self::JsonMode),
            _ => Err(format!(
                "unknown structured output method: {} (use json_schema or json_mode)",
                s
            )),
        }
    }
}

/// Name, description and JSON Schema of an expected structured output.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub description: String,
    pub schema: Value,
}

impl OutputSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
        }
    }

    /// Prompt text asking for a bare JSON object matching this schema.
    pub fn instructions(&self) -> String {
        let schema = serde_json::to_string_pretty(&self.schema)
            .unwrap_or_else(|_| self.schema.to_string());
        format!(
            "Respond only with a JSON object ({}: {}) that matches this JSON Schema:\n{}",
            self.name, self.description, schema
        )
    }

    /// Copy of `messages` with [`Self::instructions`] appended to the leading
    /// system message, or inserted as one when there is none.
    pub fn with_instructions(&self, messages: &[Message]) -> Vec<Message> {
        let mut out = messages.to_vec();
        match out.first_mut() {
            Some(Message::System(prompt)) => {
                prompt.push_str("\n\n");
                prompt.push_str(&self.instructions());
            }
            _ => out.insert(0, Message::system(self.instructions())),
        }
        out
    }
}

/// Parses model text as JSON, tolerating Markdown code fences and surrounding prose.
pub fn extract_json(text: &str) -> Result<Value, AgentError> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);
    if let Ok(value) = serde_json::from_str(unfenced) {
        return Ok(value);
    }
    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => serde_json::from_str(&unfenced[start..=end])
            .map_err(|e| AgentError::StructuredOutput(format!("invalid JSON: {}", e))),
        _ => Err(AgentError::StructuredOutput(format!(
            "no JSON object in model output: {:?}",
            truncate(trimmed, 200)
        ))),
    }
}

/// Coerces a JSON value into `T`; shape mismatches are `AgentError::StructuredOutput`.
pub fn parse_structured<T: DeserializeOwned>(value: Value) -> Result<T, AgentError> {
    serde_json::from_value(value).map_err(|e| AgentError::StructuredOutput(e.to_string()))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
