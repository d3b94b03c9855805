//! Tracing setup.
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it logs to a
//! daily rolling file instead (`$BIKES_LOG_DIR`, default `logs/`).
//! `RUST_LOG` overrides the default level in both cases.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_DIR_ENV: &str = "BIKES_LOG_DIR";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered file output is flushed.
pub fn init(target: LogTarget) -> Option<WorkerGuard> {
    match target {
        LogTarget::Stderr => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(env_filter("warn"));
            let _ = tracing_subscriber::registry().with(layer).try_init();
            None
        }
        LogTarget::File => {
            let dir = std::env::var(LOG_DIR_ENV).unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
            let appender = tracing_appender::rolling::daily(dir, "bikes.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(env_filter("info"));
            let _ = tracing_subscriber::registry().with(layer).try_init();
            Some(guard)
        }
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
