//! Shared doubles for retrieval graph tests: a recording researcher and runner builders.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use retrieval_graph::{
    AgentError, AgentState, Document, Message, MockLlm, Researcher, RetrievalGraphDeps,
    RetrievalRunner, RouteType, Router,
};

/// Researcher that records every question and returns one document per step
/// (`<step>.md`) unless a batch was scripted for that step. Fails with
/// `AgentError::Retrieval` on `fail_on`.
#[derive(Default)]
pub struct StubResearcher {
    calls: Mutex<Vec<String>>,
    fail_on: Option<String>,
    batches: HashMap<String, Vec<Document>>,
}

impl StubResearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(step: &str) -> Self {
        Self {
            fail_on: Some(step.to_string()),
            ..Default::default()
        }
    }

    /// Returns exactly `docs` when researching `step`.
    pub fn with_batch(mut self, step: &str, docs: Vec<Document>) -> Self {
        self.batches.insert(step.to_string(), docs);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Researcher for StubResearcher {
    async fn research(&self, question: &str) -> Result<Vec<Document>, AgentError> {
        self.calls.lock().unwrap().push(question.to_string());
        if self.fail_on.as_deref() == Some(question) {
            return Err(AgentError::Retrieval(format!("index offline for {}", question)));
        }
        if let Some(docs) = self.batches.get(question) {
            return Ok(docs.clone());
        }
        Ok(vec![Document::new(
            format!("notes on {}", question),
            format!("{}.md", question),
        )])
    }
}

pub fn runner(llm: &Arc<MockLlm>, researcher: &Arc<StubResearcher>) -> RetrievalRunner {
    let deps = RetrievalGraphDeps::new(llm.clone(), researcher.clone());
    RetrievalRunner::new(deps, false).unwrap()
}

pub fn question(text: &str) -> AgentState {
    AgentState::from_messages(vec![Message::user(text)])
}

pub fn seeded(text: &str, route_type: RouteType) -> AgentState {
    question(text).with_router(Router::new(route_type, "seeded by caller"))
}
