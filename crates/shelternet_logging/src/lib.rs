//! Shared logging setup for Shelternet binaries.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEFAULT_LOG_FILTER: &str =
    "shelternet=info,shelternet_api=info,shelternet_db=info,actix_web=info";
const VERBOSE_LOG_FILTER: &str =
    "shelternet=debug,shelternet_api=debug,shelternet_db=debug,actix_web=info,sqlx=warn";

/// Logging configuration shared by Shelternet binaries.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
    /// Directory for daily-rotated log files; stderr only when `None`.
    pub log_dir: Option<&'a Path>,
}

/// Keeps the background file writer alive. Hold it until shutdown.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize tracing with stderr output and an optional rolling file.
///
/// `RUST_LOG` overrides the default filter. `log` records (from actix-web)
/// are forwarded into tracing.
pub fn init_logging(config: LogConfig<'_>) -> Result<LogGuard> {
    let filter = build_filter(config.verbose);

    let (file_layer, guard) = match config.log_dir {
        Some(dir) => {
            let dir = ensure_dir(dir)?;
            let appender = tracing_appender::rolling::daily(
                &dir,
                format!("{}.log", sanitize_name(config.app_name)),
            );
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(build_filter(config.verbose));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LogGuard { _file: guard })
}

fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        })
    })
}

fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    Ok(dir.to_path_buf())
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("shelternet"), "shelternet");
        assert_eq!(sanitize_name("shelter net/../x"), "shelter_net____x");
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let tmp = tempfile::TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("logs");
        let created = ensure_dir(&nested).unwrap();
        assert!(created.is_dir());
    }
}
