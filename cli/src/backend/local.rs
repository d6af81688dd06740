//! LocalBackend: build the retrieval graph and run it in-process.

use std::sync::Arc;

use async_trait::async_trait;
use retrieval_graph::{
    AgentConfiguration, AgentState, InMemoryRetriever, RetrievalRunner, StreamEvent,
};

use super::RunBackend;
use crate::run::{event_to_json, format_agent_state_display, RunError, RunOptions, TurnOutput};

pub struct LocalBackend {
    runner: RetrievalRunner,
}

impl LocalBackend {
    pub fn new(runner: RetrievalRunner) -> Self {
        Self { runner }
    }

    /// Reads [`AgentConfiguration`] from the environment and loads the corpus at `opts.docs`.
    pub fn from_options(opts: &RunOptions) -> Result<Self, RunError> {
        let config = AgentConfiguration::from_env()?;
        let retriever = InMemoryRetriever::from_json_file(&opts.docs)?.with_top_k(config.search_k);
        tracing::info!(
            docs = %opts.docs.display(),
            documents = retriever.len(),
            query_model = %config.query_model,
            response_model = %config.response_model,
            "corpus loaded"
        );
        let runner = RetrievalRunner::from_configuration(&config, Arc::new(retriever), false)?;
        Ok(Self::new(runner))
    }
}

#[async_trait]
impl RunBackend for LocalBackend {
    async fn run(&self, state: AgentState, opts: &RunOptions) -> Result<TurnOutput, RunError> {
        let mut events = opts.output_json.then(Vec::new);
        let mut prev_node: Option<String> = None;
        let verbose = opts.verbose;
        let max_len = opts.display_max_len;

        let state = self
            .runner
            .stream_with_callback(state, |event| {
                if verbose {
                    print_verbose(&event, &mut prev_node, max_len);
                }
                if let Some(ev) = events.as_mut() {
                    ev.extend(event_to_json(&event));
                }
            })
            .await?;
        Ok(TurnOutput { state, events })
    }
}

fn print_verbose(event: &StreamEvent<AgentState>, prev: &mut Option<String>, max_len: usize) {
    match event {
        StreamEvent::TaskStart { node_id } => {
            match prev.as_deref() {
                Some(p) => eprintln!("Entering: {} (from {})", node_id, p),
                None => eprintln!("Entering: {}", node_id),
            }
            *prev = Some(node_id.clone());
        }
        StreamEvent::TaskEnd { node_id, result } => match result {
            Ok(()) => eprintln!("Exiting: {}", node_id),
            Err(e) => eprintln!("Exiting: {} (error: {})", node_id, e),
        },
        StreamEvent::Updates { node_id, state } => {
            eprintln!("State after {}:", node_id);
            eprintln!("{}", format_agent_state_display(state, max_len));
        }
        StreamEvent::Custom(value) => eprintln!("{}", value),
        StreamEvent::Failed { error } => eprintln!("Run failed: {}", error),
        StreamEvent::Values(_) => {}
    }
}
