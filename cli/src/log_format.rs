//! Plain-text event formatter for the `LOG_FILE` log.
//!
//! Each line carries the span path of the event so one turn through the
//! retrieval graph can be followed across node and research spans.

use std::fmt;

use tracing_core::Subscriber;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// `TIMESTAMP LEVEL [root>child#id] target: fields`.
///
/// The bracketed scope is omitted for events emitted outside any span.
pub struct SpanPathFormat {
    timer: SystemTime,
    with_target: bool,
}

impl Default for SpanPathFormat {
    fn default() -> Self {
        Self {
            timer: SystemTime,
            with_target: true,
        }
    }
}

impl SpanPathFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, on: bool) -> Self {
        self.with_target = on;
        self
    }
}

impl<S, N> FormatEvent<S, N> for SpanPathFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing_core::Event<'_>,
    ) -> fmt::Result {
        self.timer.format_time(&mut writer)?;
        write!(writer, " {:>5}", event.metadata().level())?;

        if let Some(scope) = ctx.event_scope() {
            let mut path = Vec::new();
            let mut leaf_id = 0;
            for span in scope.from_root() {
                path.push(span.name());
                leaf_id = span.id().into_u64();
            }
            write!(writer, " [{}#{}]", path.join(">"), leaf_id)?;
        }

        if self.with_target {
            write!(writer, " {}:", event.metadata().target())?;
        }
        write!(writer, " ")?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
