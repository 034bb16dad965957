//! Logging Setup
//!
//! Console output plus an optional daily-rolling log file.

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_subscriber::prelude::*;

/// Log file name prefix inside the log directory
pub const LOG_FILE_NAME: &str = "cuedit.log";

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Logging configuration
#[derive(Clone, Debug, Default)]
pub struct LoggingOptions {
    /// Lower the default level from `info` to `debug`
    pub verbose: bool,
    /// Directory for the rolling log file; console only when `None`
    pub log_dir: Option<PathBuf>,
    /// Write console output to stderr instead of stdout
    pub stderr: bool,
}

/// Installs the global subscriber.
///
/// `RUST_LOG` directives are honored on top of the default level.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(options: &LoggingOptions) {
    let level = if options.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let console_layer = if options.stderr {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(cfg!(debug_assertions))
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(cfg!(debug_assertions))
            .boxed()
    };

    let file_layer = options.log_dir.as_ref().and_then(|log_dir| {
        // Best effort: an unwritable log dir leaves console logging only.
        std::fs::create_dir_all(log_dir).ok()?;
        let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let _ = LOG_GUARD.set(guard);
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer);

    // Avoid panics if already initialized (tests, repeated CLI setup).
    let _ = tracing::subscriber::set_global_default(subscriber);
}
