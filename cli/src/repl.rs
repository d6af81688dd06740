//! Interactive REPL loop: read stdin, run one turn, print the reply, repeat until EOF or quit.
//!
//! Conversation history carries over between turns; the router and retrieved
//! documents start fresh for every question.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use cli::{RunBackend, RunError, RunOptions, TurnOutput};
use retrieval_graph::{AgentState, Message};

use crate::JsonSink;

/// Exits on EOF (Ctrl+D) or `quit`/`exit`/`/quit`; blank lines are skipped.
/// A failed turn is reported on stderr and the loop continues with the history unchanged.
pub async fn run_repl_loop(
    backend: &Arc<dyn RunBackend>,
    opts: &RunOptions,
    mut state: AgentState,
    json: Option<&JsonSink>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match reader.next_line().await? {
            None => break,
            Some(s) if s.trim().is_empty() => continue,
            Some(s) if is_quit_command(&s) => break,
            Some(s) => s,
        };

        match run_one_turn(backend, opts, next_turn_state(&state, line)).await {
            Ok(out) => {
                match json {
                    Some(sink) => sink.write(&out.to_json()?)?,
                    None => println!("{}", out.reply()),
                }
                state = out.state;
            }
            Err(e) => eprintln!("error: {}", e),
        }
    }

    println!("Bye.");
    Ok(())
}

pub fn is_quit_command(s: &str) -> bool {
    let lower = s.trim().to_lowercase();
    matches!(lower.as_str(), "quit" | "exit" | "/quit")
}

/// The previous turn's history plus the new user message.
fn next_turn_state(prev: &AgentState, line: String) -> AgentState {
    let mut messages = prev.messages.clone();
    messages.push(Message::user(line));
    AgentState::from_messages(messages)
}

pub async fn run_one_turn(
    backend: &Arc<dyn RunBackend>,
    opts: &RunOptions,
    state: AgentState,
) -> Result<TurnOutput, RunError> {
    tracing::debug!(messages = state.messages.len(), "running turn");
    backend.run(state, opts).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use retrieval_graph::{Document, RouteType, Router};
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct DummyBackend {
        seen: Arc<Mutex<Vec<AgentState>>>,
    }

    #[async_trait]
    impl RunBackend for DummyBackend {
        async fn run(
            &self,
            mut state: AgentState,
            _opts: &RunOptions,
        ) -> Result<TurnOutput, RunError> {
            self.seen.lock().unwrap().push(state.clone());
            state.messages.push(Message::assistant("ok"));
            Ok(TurnOutput {
                state,
                events: None,
            })
        }
    }

    fn opts() -> RunOptions {
        RunOptions {
            docs: PathBuf::from("docs.json"),
            router: None,
            verbose: false,
            output_json: false,
            display_max_len: 100,
        }
    }

    #[test]
    fn is_quit_command_matches_expected_tokens() {
        assert!(is_quit_command("quit"));
        assert!(is_quit_command(" EXIT "));
        assert!(is_quit_command("/quit"));
        assert!(!is_quit_command("continue"));
    }

    #[test]
    fn next_turn_keeps_history_and_drops_turn_scoped_fields() {
        let mut prev = AgentState::from_messages(vec![
            Message::user("what is a retriever?"),
            Message::assistant("It returns documents."),
        ])
        .with_router(Router::new(RouteType::Langchain, "library question"));
        prev.documents = vec![Document::new("retrievers", "retrievers.md")];

        let next = next_turn_state(&prev, "and a vector store?".into());
        assert_eq!(next.messages.len(), 3);
        assert_eq!(next.messages[2], Message::user("and a vector store?"));
        assert!(next.router.is_none());
        assert!(next.documents.is_empty());
        assert!(next.plan_steps.is_empty());
    }

    #[tokio::test]
    async fn run_one_turn_delegates_to_backend() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let backend: Arc<dyn RunBackend> = Arc::new(DummyBackend {
            seen: Arc::clone(&seen),
        });
        let state = AgentState::from_messages(vec![Message::user("hello")]);

        let out = run_one_turn(&backend, &opts(), state).await.unwrap();
        assert_eq!(out.reply(), "ok");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].messages, vec![Message::user("hello")]);
    }
}
