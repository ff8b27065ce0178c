//! Tracing subscriber setup for the CLI
//!
//! Diagnostics always go to stderr, which keeps stdout free for the
//! generated file list and `--json` summaries. A log file can be added
//! through [`LoggingOptions::file`], optionally rotated.

use crate::config::{LogRotation, LoggingOptions};
use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install the global subscriber. Later calls are no-ops.
///
/// `RUST_LOG`, when set and non-empty, replaces the configured level.
pub fn init(options: &LoggingOptions) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = build_filter(&options.level)?;

    let mut layers: Vec<BoxedLayer> = vec![
        fmt::layer()
            .with_timer(UtcTime::rfc_3339())
            .with_writer(io::stderr)
            .with_ansi(options.color)
            .with_target(false)
            .boxed(),
    ];

    if let Some(path) = options.file.as_deref() {
        let writer = file_writer(path, options.rotation)?;
        layers.push(
            fmt::layer()
                .with_timer(UtcTime::rfc_3339())
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .boxed(),
        );
    }

    Registry::default()
        .with(layers.with_filter(filter))
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {e}")))
}

fn build_filter(configured: &str) -> Result<EnvFilter> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| configured.to_string());

    EnvFilter::try_new(&directives)
        .map_err(|e| Error::Config(format!("Invalid log level '{directives}': {e}")))
}

fn file_writer(path: &Path, rotation: Option<LogRotation>) -> Result<NonBlocking> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| {
        Error::Config(format!(
            "Failed to create log directory {}: {e}",
            dir.display()
        ))
    })?;

    let builder = NonBlockingBuilder::default().lossy(false);
    let (writer, guard) = match rotation {
        Some(rotation) => {
            let file_name = path.file_name().ok_or_else(|| {
                Error::Config(format!(
                    "Log file path '{}' needs a file name for rotation",
                    path.display()
                ))
            })?;
            let appender = match rotation {
                LogRotation::Hourly => rolling::hourly(dir, file_name),
                LogRotation::Daily => rolling::daily(dir, file_name),
            };
            builder.finish(appender)
        }
        None => {
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|e| {
                    Error::Config(format!("Failed to open log file {}: {e}", path.display()))
                })?;
            builder.finish(file)
        }
    };

    // the worker thread stops when its guard drops
    let _ = FILE_GUARD.set(guard);
    Ok(writer)
}
