//! Retrieval boundary: question text in, ranked documents out.
//!
//! The graph only depends on [`Retriever`]. [`InMemoryRetriever`] is a small
//! term-overlap ranker over a JSON corpus, enough to run the whole workflow
//! locally and in tests; production deployments plug in a vector store client.

mod in_memory;

pub use in_memory::{load_documents_json, InMemoryRetriever, DEFAULT_SEARCH_K};

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::Document;

/// Returns documents relevant to one search query, best first.
///
/// Called concurrently (one call per generated query), so implementations must
/// be safe to share across tasks.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>, AgentError>;
}
