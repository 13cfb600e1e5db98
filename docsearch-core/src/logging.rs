use std::{
    fs,
    sync::OnceLock,
    sync::atomic::{AtomicUsize, Ordering},
};

use tracing::Metadata;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, daily},
};
use tracing_subscriber::{
    EnvFilter,
    filter::Directive,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    prelude::*,
};

use crate::config::LogConfig;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logger already initialized")]
    AlreadyInitialized,

    #[error("Failed to create log directory: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    #[error("Invalid filter directive: {0}")]
    InvalidDirective(String),
}

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`; keep the guard alive until exit.
    ///
    /// Logs go to a daily rolling file only. The terminal owns stdout/stderr
    /// while the alternate screen is active.
    pub fn init_tracing(cfg: &LogConfig) -> Result<WorkerGuard, LoggingError> {
        fs::create_dir_all(&cfg.log_dir)?;

        SEQ.get_or_init(|| AtomicUsize::new(1));

        // daily rolling file appender → logs/docsearch.YYYY-MM-DD
        let file: RollingFileAppender = daily(&cfg.log_dir, "docsearch");
        let (writer, guard) = tracing_appender::non_blocking(file);

        let directive = cfg
            .level
            .parse::<Directive>()
            .map_err(|e| LoggingError::InvalidDirective(format!("{}: {e}", cfg.level)))?;

        let file_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(EnvFilter::from_default_env().add_directive(directive));

        tracing_subscriber::registry()
            .with(file_layer)
            .try_init()
            .map_err(|_| LoggingError::AlreadyInitialized)?;

        Ok(guard)
    }
}

static SEQ: OnceLock<AtomicUsize> = OnceLock::new();

/// Custom formatter: `[SEQ] LEVEL [file:line mod::path] message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically‑increasing sequence number
        let seq: usize = SEQ
            .get_or_init(|| AtomicUsize::new(1))
            .fetch_add(1, Ordering::Relaxed);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {:5} [{}:{} {}] ",
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        // write all key‑value pairs for this event (usually just the message)
        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}
