//! Retrieved document chunk.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One retrieved chunk: its text, where it came from, and free-form metadata.
///
/// Treated as an opaque value by the graph; only response synthesis reads the
/// fields, when rendering the context block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(alias = "page_content")]
    pub text: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
