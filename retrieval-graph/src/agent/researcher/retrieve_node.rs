//! RetrieveDocuments node: fan out one retrieval per query and fan the results back in.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::error::AgentError;
use crate::graph::Next;
use crate::retriever::Retriever;
use crate::state::ResearcherState;
use crate::Node;

use super::RETRIEVE_DOCUMENTS;

/// Runs every query concurrently and writes the concatenated results to
/// `state.documents`, in query order regardless of completion order. The first
/// failing retrieval aborts the step; no partial result is kept.
pub struct RetrieveDocumentsNode {
    retriever: Arc<dyn Retriever>,
}

impl RetrieveDocumentsNode {
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Node<ResearcherState> for RetrieveDocumentsNode {
    fn id(&self) -> &str {
        RETRIEVE_DOCUMENTS
    }

    async fn run(&self, state: ResearcherState) -> Result<(ResearcherState, Next), AgentError> {
        let retriever = self.retriever.as_ref();
        let per_query = try_join_all(state.queries.iter().map(|q| retriever.retrieve(q))).await?;
        let documents: Vec<_> = per_query.into_iter().flatten().collect();
        tracing::debug!(
            queries = state.queries.len(),
            documents = documents.len(),
            "retrieved documents"
        );
        Ok((
            ResearcherState {
                documents,
                ..state
            },
            Next::Continue,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::state::Document;

    /// Sleeps longer for earlier queries so completion order is reversed.
    struct SlowFirst;

    #[async_trait]
    impl Retriever for SlowFirst {
        async fn retrieve(&self, query: &str) -> Result<Vec<Document>, AgentError> {
            let delay = match query {
                "q1" => 30,
                "q2" => 10,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if query == "boom" {
                return Err(AgentError::Retrieval("index offline".into()));
            }
            Ok(vec![
                Document::new(format!("{}-a", query), "s"),
                Document::new(format!("{}-b", query), "s"),
            ])
        }
    }

    fn state(queries: &[&str]) -> ResearcherState {
        ResearcherState {
            question: "q".into(),
            queries: queries.iter().map(|s| s.to_string()).collect(),
            documents: vec![],
        }
    }

    /// **Scenario**: Results are concatenated in query order even when later queries finish first.
    #[tokio::test]
    async fn results_keep_query_order() {
        let node = RetrieveDocumentsNode::new(Arc::new(SlowFirst));
        let (out, _) = node.run(state(&["q1", "q2", "q3"])).await.unwrap();
        let texts: Vec<_> = out.documents.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["q1-a", "q1-b", "q2-a", "q2-b", "q3-a", "q3-b"]);
    }

    #[tokio::test]
    async fn no_queries_means_no_documents() {
        let node = RetrieveDocumentsNode::new(Arc::new(SlowFirst));
        let (out, _) = node.run(state(&[])).await.unwrap();
        assert!(out.documents.is_empty());
    }

    #[tokio::test]
    async fn one_failing_query_fails_the_step() {
        let node = RetrieveDocumentsNode::new(Arc::new(SlowFirst));
        let err = node.run(state(&["q1", "boom"])).await.unwrap_err();
        assert!(matches!(err, AgentError::Retrieval(_)));
    }
}
