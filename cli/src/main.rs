//! docs-chat binary: ask questions about a documentation corpus from the command line.
//!
//! One turn by default; `-i/--interactive` continues in a REPL with the conversation history.

mod log_format;
mod logging;
mod repl;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use cli::{LocalBackend, RunBackend, RunOptions};
use repl::{run_one_turn, run_repl_loop};
use retrieval_graph::{AgentState, Message, RouteType, Router};

#[derive(Parser, Debug)]
#[command(name = "docs-chat")]
#[command(about = "Ask questions about a documentation corpus")]
struct Args {
    /// User message (or pass it as positional arguments)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Positional args: user message when -m/--message is not used
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,

    /// JSON array of documents (`text`, `source`, optional `metadata`) to search
    #[arg(long, value_name = "FILE", env = "DOCS_FILE")]
    docs: PathBuf,

    /// Print `{"reply", "state", "events"}` as JSON instead of the reply text
    #[arg(long)]
    json: bool,

    /// With --json, write to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// With --json, pretty-print (multi-line)
    #[arg(long)]
    pretty: bool,

    /// Print node enter/exit and the state after each node on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Interactive REPL: keep asking questions with the same conversation history
    #[arg(short, long)]
    interactive: bool,

    /// Pre-seed the router for the first turn and skip classification
    /// (more-info, general or langchain)
    #[arg(long, value_name = "TYPE", requires = "router_logic")]
    router_type: Option<String>,

    /// Reasoning for the pre-seeded router; passed to the responders as instructions
    #[arg(long, value_name = "TEXT", requires = "router_type")]
    router_logic: Option<String>,
}

/// Default max chars per message in verbose state dumps.
const DEFAULT_DISPLAY_MAX_LEN: usize = 200;

/// Reads `DOCS_CHAT_DISPLAY_MAX_LEN`; default on missing or invalid.
fn display_max_len() -> usize {
    std::env::var("DOCS_CHAT_DISPLAY_MAX_LEN")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DISPLAY_MAX_LEN)
}

/// Where `--json` output goes. In interactive mode every turn appends one document.
pub struct JsonSink {
    file: Option<PathBuf>,
    pretty: bool,
    append: bool,
}

impl JsonSink {
    pub fn write(&self, value: &serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
        let s = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        match &self.file {
            Some(path) if self.append => {
                let mut f = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                writeln!(f, "{}", s)?;
            }
            Some(path) => std::fs::write(path, format!("{}\n", s))?,
            None => {
                println!("{}", s);
                std::io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

fn user_message(args: &Args) -> Option<String> {
    let text = match &args.message {
        Some(m) => m.clone(),
        None => args.rest.join(" "),
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn seeded_router(args: &Args) -> Option<Router> {
    match (&args.router_type, &args.router_logic) {
        (Some(t), Some(logic)) => Some(Router::new(RouteType::from(t.as_str()), logic.clone())),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::load_and_apply("docs-chat", None).ok();
    let _log_guard = logging::init()?;

    let args = Args::parse();
    let message = user_message(&args);
    if message.is_none() && !args.interactive {
        eprintln!("docs-chat: no message given (use -m TEXT, positional text, or -i)");
        std::process::exit(1);
    }

    let opts = RunOptions {
        docs: args.docs.clone(),
        router: seeded_router(&args),
        verbose: args.verbose,
        output_json: args.json,
        display_max_len: display_max_len(),
    };
    let json = args.json.then(|| JsonSink {
        file: args.file.clone(),
        pretty: args.pretty,
        append: args.interactive,
    });

    let backend: Arc<dyn RunBackend> = match LocalBackend::from_options(&opts) {
        Ok(b) => Arc::new(b),
        Err(e) => {
            eprintln!("docs-chat: {}", e);
            std::process::exit(1);
        }
    };

    let mut state = AgentState::default();
    if let Some(text) = message {
        let mut first = AgentState::from_messages(vec![Message::user(text)]);
        first.router = opts.router.clone();
        match run_one_turn(&backend, &opts, first).await {
            Ok(out) => {
                match &json {
                    Some(sink) => sink.write(&out.to_json()?)?,
                    None => println!("{}", out.reply()),
                }
                state = out.state;
            }
            Err(e) => {
                tracing::error!(error = %e, "turn failed");
                eprintln!("docs-chat: {}", e);
                std::process::exit(1);
            }
        }
    }

    if args.interactive {
        run_repl_loop(&backend, &opts, state, json.as_ref()).await?;
    }
    Ok(())
}
