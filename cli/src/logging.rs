//! Logging initialization: logs go to `LOG_FILE` or are dropped, never to the console.
//!
//! stdout carries the reply (or the `--json` document) and stderr the verbose
//! trace, so neither may be interleaved with log lines.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::log_format::SpanPathFormat;

/// Installs the global subscriber.
///
/// - **RUST_LOG**: filter directives. Default: `info`.
/// - **LOG_FILE**: append plain-text logs to this file; when unset logs are dropped.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init() -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Ok(path) = std::env::var("LOG_FILE") else {
        let sink_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::sink)
            .with_filter(filter);
        tracing_subscriber::registry().with(sink_layer).try_init()?;
        return Ok(None);
    };

    let path = Path::new(&path);
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or("LOG_FILE has no file name")?;
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(SpanPathFormat::new())
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter);
    tracing_subscriber::registry().with(file_layer).try_init()?;
    tracing::info!(path = %path.display(), "docs-chat logging to file");
    Ok(Some(guard))
}
