//! Research sub-workflow: one plan step in, the documents that answer it out.
//!
//! Graph: START → generate_queries → retrieve_documents → END.

mod generate_queries_node;
mod graph;
mod retrieve_node;

pub use generate_queries_node::{queries_schema, GenerateQueriesNode};
pub use graph::{build_researcher_graph, ResearchGraph, Researcher};
pub use retrieve_node::RetrieveDocumentsNode;

pub const GENERATE_QUERIES: &str = "generate_queries";
pub const RETRIEVE_DOCUMENTS: &str = "retrieve_documents";
