//! Tracing setup for the binary.
//!
//! Logs always go to an append-only file through a non-blocking writer.
//! Verbose runs mirror them to stderr as well.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crfbatch_core::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

const DEFAULT_FILTER: &str =
    "crfbatch=info,crfbatch_pipeline=info,crfbatch_av=info,crfbatch_core=info";
const VERBOSE_FILTER: &str =
    "crfbatch=trace,crfbatch_pipeline=debug,crfbatch_av=debug,crfbatch_core=debug";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped and must be kept
/// alive until the process exits.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<WorkerGuard> {
    let file_appender = file_appender(&config.file)?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(config.filter.as_deref(), verbose)))
        .context("Invalid log filter")?;

    let file_layer = fmt::layer().with_ansi(false).with_writer(file_writer);
    let stderr_layer = verbose.then(|| fmt::layer().with_writer(std::io::stderr));

    let subscriber = Registry::default()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install global tracing subscriber")?;

    tracing::debug!("Logging to {}", config.file.display());
    Ok(guard)
}

/// Open `path` for appending, creating its directory if needed.
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let (dir, file_name) = split_log_path(path)?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to prepare log directory {}", dir.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(&dir)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Configured directive if any, otherwise the default for the verbosity.
fn filter_directive(configured: Option<&str>, verbose: bool) -> &str {
    match configured {
        Some(directive) => directive,
        None if verbose => VERBOSE_FILTER,
        None => DEFAULT_FILTER,
    }
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, PathBuf::from(file_name)))
}
