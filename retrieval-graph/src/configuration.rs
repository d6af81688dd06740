//! Per-run configuration resolved from the environment.
//!
//! | Variable                   | Default              |
//! |----------------------------|----------------------|
//! | `QUERY_MODEL`              | `openai/gpt-4o-mini` |
//! | `RESPONSE_MODEL`           | `openai/gpt-4o-mini` |
//! | `STRUCTURED_OUTPUT_METHOD` | `json_schema`        |
//! | `SEARCH_K`                 | `4`                  |
//! | `MAX_CONTEXT_CHARS`        | `0` (unlimited)      |
//! | `RECURSION_LIMIT`          | `25`                 |
//! | `PROMPTS_DIR`              | embedded prompts     |
//!
//! Call `config::load_and_apply` first if `.env` / XDG config files should count.

use std::path::Path;
use std::str::FromStr;

use crate::error::AgentError;
use crate::graph::DEFAULT_RECURSION_LIMIT;
use crate::llm::{ModelId, StructuredOutputMethod};
use crate::prompts::{self, RetrievalPrompts};
use crate::retriever::DEFAULT_SEARCH_K;

pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Everything a retrieval run needs besides its clients and retriever.
#[derive(Clone, Debug)]
pub struct AgentConfiguration {
    /// Model for every step except the researched answer.
    pub query_model: String,
    /// Model for the researched answer written by `respond`.
    pub response_model: String,
    pub structured_output: StructuredOutputMethod,
    pub prompts: RetrievalPrompts,
    /// Documents returned per search query.
    pub search_k: usize,
    /// Character budget for the formatted documents in the response prompt; 0 disables it.
    pub max_context_chars: usize,
    pub recursion_limit: usize,
}

impl Default for AgentConfiguration {
    fn default() -> Self {
        Self {
            query_model: DEFAULT_MODEL.to_string(),
            response_model: DEFAULT_MODEL.to_string(),
            structured_output: StructuredOutputMethod::default(),
            prompts: RetrievalPrompts::default(),
            search_k: DEFAULT_SEARCH_K,
            max_context_chars: 0,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T, AgentError>
where
    T::Err: std::fmt::Display,
{
    match raw.filter(|v| !v.trim().is_empty()) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| AgentError::Config(format!("invalid {}={:?}: {}", name, v, e))),
        None => Ok(default),
    }
}

impl AgentConfiguration {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from any key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AgentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let query_model = lookup("QUERY_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.query_model);
        let response_model = lookup("RESPONSE_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.response_model);
        for id in [&query_model, &response_model] {
            ModelId::from_str(id)?;
        }

        let structured_output = parse_var(
            "STRUCTURED_OUTPUT_METHOD",
            lookup("STRUCTURED_OUTPUT_METHOD"),
            defaults.structured_output,
        )?;
        let search_k = parse_var("SEARCH_K", lookup("SEARCH_K"), defaults.search_k)?;
        if search_k == 0 {
            return Err(AgentError::Config("SEARCH_K must be at least 1".into()));
        }
        let max_context_chars = parse_var(
            "MAX_CONTEXT_CHARS",
            lookup("MAX_CONTEXT_CHARS"),
            defaults.max_context_chars,
        )?;
        let recursion_limit = parse_var(
            "RECURSION_LIMIT",
            lookup("RECURSION_LIMIT"),
            defaults.recursion_limit,
        )?;

        let prompts_dir = lookup("PROMPTS_DIR");
        let prompts = prompts::resolve(None, prompts_dir.as_deref())
            .map_err(|e| AgentError::Config(e.to_string()))?;

        Ok(Self {
            query_model,
            response_model,
            structured_output,
            prompts,
            search_k,
            max_context_chars,
            recursion_limit,
        })
    }

    /// Replaces the prompts with those found in `dir`.
    pub fn with_prompts_dir(mut self, dir: &Path) -> Result<Self, AgentError> {
        self.prompts = prompts::load(dir).map_err(|e| AgentError::Config(e.to_string()))?;
        Ok(self)
    }
}
