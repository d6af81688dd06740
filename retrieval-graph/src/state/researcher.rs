//! State for the per-step research sub-workflow.

use serde::{Deserialize, Serialize};

use super::Document;

/// Research sub-workflow state: one plan step in, documents out.
///
/// Nodes return the full next state (`ReplaceUpdater`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearcherState {
    /// The plan step being researched.
    pub question: String,
    /// Search queries generated for the question, in generation order.
    #[serde(default)]
    pub queries: Vec<String>,
    /// Documents retrieved for all queries, concatenated in query order.
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl ResearcherState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }
}
