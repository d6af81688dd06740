use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;

use super::Retriever;
use crate::error::AgentError;
use crate::state::Document;

/// Results per query when `SEARCH_K` is not set.
pub const DEFAULT_SEARCH_K: usize = 4;

/// Ranks an in-memory corpus by how many distinct query terms each document contains.
///
/// Terms are lowercase alphanumeric runs (plus `_`) of two or more characters.
/// Documents sharing no term with the query are never returned; ties keep
/// corpus order.
#[derive(Debug, Clone)]
pub struct InMemoryRetriever {
    documents: Vec<Document>,
    indexed: Vec<HashSet<String>>,
    top_k: usize,
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

impl InMemoryRetriever {
    pub fn new(documents: Vec<Document>) -> Self {
        let indexed = documents
            .iter()
            .map(|d| {
                let mut t = terms(&d.text);
                t.extend(terms(&d.source));
                t
            })
            .collect();
        Self {
            documents,
            indexed,
            top_k: DEFAULT_SEARCH_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Loads a corpus from a JSON file (see [`load_documents_json`]).
    pub fn from_json_file(path: &Path) -> Result<Self, AgentError> {
        Ok(Self::new(load_documents_json(path)?))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn search(&self, query: &str) -> Vec<Document> {
        let query_terms = terms(query);
        let mut scored: Vec<(usize, usize)> = self
            .indexed
            .iter()
            .enumerate()
            .map(|(i, doc_terms)| (i, query_terms.intersection(doc_terms).count()))
            .filter(|(_, score)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored
            .into_iter()
            .take(self.top_k)
            .map(|(i, _)| self.documents[i].clone())
            .collect()
    }
}

#[async_trait]
impl Retriever for InMemoryRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>, AgentError> {
        let docs = self.search(query);
        tracing::debug!(query, hits = docs.len(), "in-memory retrieval");
        Ok(docs)
    }
}

/// Reads a JSON array of documents (`{"text" | "page_content", "source"?, "metadata"?}`).
pub fn load_documents_json(path: &Path) -> Result<Vec<Document>, AgentError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AgentError::Config(format!("cannot read corpus {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        AgentError::Config(format!("invalid corpus JSON in {}: {}", path.display(), e))
    })
}
