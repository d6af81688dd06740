//! Agent execution error types.
//!
//! Every node, router and runner in the crate returns [`AgentError`]. Failures
//! are fatal to the run that raised them; nothing is partially committed.

use thiserror::Error;

use crate::graph::CompilationError;

/// Agent execution error.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Transport or provider failure (LLM call failed, task panicked, bad routing target).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// Model output could not be coerced to the requested JSON schema.
    ///
    /// Raised by the LLM layer; nodes re-tag it with the error kind of their step.
    #[error("structured output error: {0}")]
    StructuredOutput(String),

    /// The retrieval backend failed for one of the generated queries.
    #[error("retrieval failed: {0}")]
    Retrieval(String),

    /// The router model returned output that does not fit the route schema.
    #[error("query classification failed: {0}")]
    Classification(String),

    /// The planner model returned output that does not fit the plan schema.
    #[error("research plan generation failed: {0}")]
    PlanGeneration(String),

    /// The query generator returned output that does not fit the query-list schema.
    #[error("search query generation failed: {0}")]
    QueryGeneration(String),

    /// Routing saw a router type it has no branch for.
    #[error("unknown router type: {0}")]
    UnknownRoute(String),

    /// The run took more steps than `RunnableConfig::recursion_limit` allows.
    #[error("recursion limit of {0} steps reached without hitting END")]
    RecursionLimit(usize),

    /// Invalid environment, prompt files, model id or document corpus.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("graph compilation failed: {0}")]
    Compilation(#[from] CompilationError),
}

impl AgentError {
    /// Whether retrying the same step could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AgentError::ExecutionFailed(_) | AgentError::Retrieval(_))
    }

    /// Re-tags a structured-output failure with the caller's error kind; other errors pass through.
    pub(crate) fn map_structured(self, tag: fn(String) -> AgentError) -> AgentError {
        match self {
            AgentError::StructuredOutput(msg) => tag(msg),
            other => other,
        }
    }
}
