//! Document formatting for the response prompt.

use serde_json::Value;

use crate::state::Document;

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

fn format_doc(doc: &Document) -> String {
    let mut attrs = format!(" source=\"{}\"", escape_attr(&doc.source));
    for (key, value) in &doc.metadata {
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        attrs.push_str(&format!(" {}=\"{}\"", key, escape_attr(&rendered)));
    }
    format!("<document{}>\n{}\n</document>", attrs, doc.text)
}

const OPEN: &str = "<documents>\n";
const CLOSE: &str = "\n</documents>";

/// Renders documents as `<document source="...">` blocks inside one
/// `<documents>` element. Returns `""` for no documents.
///
/// `max_chars` bounds the length of the whole rendered block, wrapper and
/// separators included (0 = unlimited). Documents are kept in order until the
/// next one would exceed the budget; the remainder is dropped with a warning.
/// The empty wrapper is still emitted when not even the first document fits.
pub fn format_docs(docs: &[Document], max_chars: usize) -> String {
    if docs.is_empty() {
        return String::new();
    }

    let mut blocks = Vec::with_capacity(docs.len());
    let mut used = OPEN.chars().count() + CLOSE.chars().count();
    for doc in docs {
        let block = format_doc(doc);
        let separator = usize::from(!blocks.is_empty());
        let cost = block.chars().count() + separator;
        if max_chars > 0 && used + cost > max_chars {
            break;
        }
        used += cost;
        blocks.push(block);
    }

    let dropped = docs.len() - blocks.len();
    if dropped > 0 {
        tracing::warn!(
            kept = blocks.len(),
            dropped,
            max_chars,
            "document context over budget; dropping trailing documents"
        );
    }
    format!("{}{}{}", OPEN, blocks.join("\n"), CLOSE)
}
