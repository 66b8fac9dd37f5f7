use std::io::{self, IsTerminal};

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::AppConfig, infrastructure::directories::ResolvedPaths};

const LOG_FILE_PREFIX: &str = "scanner.log";

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Installs the global subscriber: stderr for the operator, a daily file for
/// the record. Later calls are no-ops.
pub fn init_tracing(config: &AppConfig, paths: &ResolvedPaths) -> Result<()> {
    if FILE_GUARD.get().is_some() {
        return Ok(());
    }

    let (file_writer, guard) = tracing_appender::non_blocking(rolling::daily(
        &paths.logs_dir,
        LOG_FILE_PREFIX,
    ));

    // stdout belongs to the scan form.
    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_ansi(io::stderr().is_terminal());
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(build_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
            &config.logging.level,
        ))
        .with(console_layer)
        .with(file_layer)
        .try_init()?;
    let _ = FILE_GUARD.set(guard);

    tracing::info!(
        target: "lifecycle",
        logs = %paths.logs_dir.display(),
        endpoint = %config.scanner.endpoint,
        timeout_ms = config.scanner.request_timeout.map(|t| t.as_millis() as u64),
        "tracing initialized"
    );
    Ok(())
}

/// `RUST_LOG` wins, then the configured level, then `info`. Unparsable
/// directives fall through to the next source.
fn build_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn rust_log_takes_precedence() {
        let filter = build_filter(Some("trace"), "warn");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn configured_level_used_without_rust_log() {
        let filter = build_filter(None, "warn");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn garbage_falls_back_to_info() {
        let filter = build_filter(Some("app=loudest"), "scan=loudest");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }
}
