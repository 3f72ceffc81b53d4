//! tracing subscriber setup.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Nothing is installed; every event is dropped.
    Off,
    Stderr,
    File(PathBuf),
}

/// Keeps the background log writer alive; pending lines are flushed on drop.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Installs the global subscriber. `level` is the default directive;
/// `RUST_LOG` takes precedence. File output is written from a worker
/// thread; hold the returned guard for the whole session.
pub fn init(level: &str, target: LogTarget) -> Result<Option<LogGuard>> {
    let default: LevelFilter = level
        .parse()
        .with_context(|| format!("invalid log level {level:?}"))?;
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    let guard = match target {
        LogTarget::Off => return Ok(None),
        LogTarget::Stderr => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))
                .context("install stderr logger")?;
            None
        }
        LogTarget::File(path) => {
            let file = File::create(&path)
                .with_context(|| format!("create log file {}", path.display()))?;
            let (writer, worker) = tracing_appender::non_blocking(file);
            fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))
                .context("install file logger")?;
            Some(LogGuard { _guard: worker })
        }
    };

    tracing::info!(level = %default, "logging initialized");
    Ok(guard)
}
