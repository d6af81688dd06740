//! System prompt templates for the retrieval graph.
//!
//! Defaults are embedded from `retrieval-graph/prompts/retrieval.yaml`; a
//! directory (argument or `PROMPTS_DIR`) containing `retrieval.yaml` overrides
//! any subset of keys. See [`RetrievalPrompts`], [`load`] and [`render_template`].

mod load;

use serde::Deserialize;

pub use load::{default_from_embedded, load, resolve, LoadError, PROMPTS_FILE};

/// YAML shape of `retrieval.yaml`. All keys optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct RetrievalPromptsFile {
    pub router_system_prompt: Option<String>,
    pub generate_queries_system_prompt: Option<String>,
    pub more_info_system_prompt: Option<String>,
    pub research_plan_system_prompt: Option<String>,
    pub general_system_prompt: Option<String>,
    pub response_system_prompt: Option<String>,
}

/// The six resolved templates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetrievalPrompts {
    /// Query classifier.
    pub router: String,
    /// Search queries for one research step.
    pub generate_queries: String,
    /// Clarifying question; uses `{logic}`.
    pub more_info: String,
    /// Research plan.
    pub research_plan: String,
    /// Answer without research; uses `{logic}`.
    pub general: String,
    /// Final grounded answer; uses `{logic}` and `{docs}`.
    pub response: String,
}

impl Default for RetrievalPrompts {
    fn default() -> Self {
        default_from_embedded()
    }
}

impl RetrievalPrompts {
    /// Returns `self` with every key present in `file` replaced.
    pub fn overlay(mut self, file: RetrievalPromptsFile) -> Self {
        let fields = [
            (&mut self.router, file.router_system_prompt),
            (&mut self.generate_queries, file.generate_queries_system_prompt),
            (&mut self.more_info, file.more_info_system_prompt),
            (&mut self.research_plan, file.research_plan_system_prompt),
            (&mut self.general, file.general_system_prompt),
            (&mut self.response, file.response_system_prompt),
        ];
        for (slot, value) in fields {
            if let Some(v) = value {
                *slot = v;
            }
        }
        self
    }
}

/// Substitutes `{name}` placeholders in one pass.
///
/// Values are inserted verbatim and never rescanned, so a document containing
/// `{logic}` stays as written. Unknown placeholders and unmatched braces are kept.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
