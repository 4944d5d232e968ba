//! File logging for the picker host.
//!
//! The terminal belongs to the form while it runs, so every event goes to
//! a daily log file under the local data directory instead.

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

const LOG_FILE_PREFIX: &str = "tagpick.log";

/// Directives used when `RUST_LOG` is unset or unparsable.
fn fallback_directives(verbose: bool) -> &'static str {
    if verbose {
        "tagpick=debug,warn"
    } else {
        "tagpick=info,warn"
    }
}

/// Pick the filter: a valid `env` wins over `--verbose`.
fn filter(env: Option<&str>, verbose: bool) -> EnvFilter {
    env.filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback_directives(verbose)))
}

/// Where log files are written: `<local data dir>/tagpick/logs`.
pub fn log_directory() -> anyhow::Result<PathBuf> {
    let base = dirs::data_local_dir().context("no local data directory on this platform")?;
    Ok(base.join("tagpick").join("logs"))
}

/// Install the global file subscriber.
///
/// `RUST_LOG=tagpick=trace` also logs every suggestion rebuild.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let dir = log_directory()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let env = std::env::var("RUST_LOG").ok();
    let appender = RollingFileAppender::new(Rotation::DAILY, &dir, LOG_FILE_PREFIX);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter(env.as_deref(), verbose))
        .try_init()
        .context("installing the tracing subscriber")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %dir.display(),
        verbose,
        "tagpick starting up"
    );
    Ok(())
}

pub fn shutdown() {
    tracing::info!("tagpick shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_log_directory_ends_in_app_logs() {
        let dir = log_directory().unwrap();
        assert!(dir.ends_with("tagpick/logs"));
    }

    #[test]
    fn test_verbose_raises_fallback_level() {
        assert_eq!(filter(None, false).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(filter(None, true).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_env_directives_override_verbose() {
        let filter = filter(Some("tagpick=trace"), false);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_blank_or_invalid_env_falls_back() {
        assert_eq!(filter(Some("  "), true).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            filter(Some("tagpick=notalevel"), false).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}
