use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file prefix inside the log directory.
const LOG_PREFIX: &str = "fscan";

/// Pick the level filter: `RUST_LOG` wins, otherwise `debug` or `info`.
fn env_filter(debug_mode: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug_mode { "debug" } else { "info" }))
}

/// JSON lines for log files, one object per event.
fn json_file_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_writer(writer)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
}

/// Setup logging to stderr, optionally mirrored as JSON to a daily rotating file.
///
/// # Arguments
/// * `debug_mode` - If true, use debug level; otherwise use info level
/// * `log_dir` - Directory for rotating log files, created if missing
///
/// # Returns
/// When file logging is enabled, a guard that must be held for the duration
/// of the program to keep the file writer flushing
pub fn init_logging(debug_mode: bool, log_dir: Option<&Utf8Path>) -> Result<Option<WorkerGuard>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter(debug_mode))
            .with(console_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
        return Ok(None);
    };

    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }

    let file_appender = rolling::daily(log_dir, LOG_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter(debug_mode))
        .with(console_layer)
        .with(json_file_layer(non_blocking))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("Logging initialized: dir={}, debug={}", log_dir, debug_mode);

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_log_directory_created() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = Utf8PathBuf::try_from(temp_dir.path().join("logs")).unwrap();

        // A global subscriber may already be installed by another test; the
        // directory is created before that matters.
        let _ = init_logging(false, Some(&log_dir));

        assert!(log_dir.exists());
    }

    #[test]
    fn test_file_layer_writes_json_lines() {
        let temp_dir = TempDir::new().unwrap();
        let appender = rolling::never(temp_dir.path(), "fscan.log");
        let subscriber = tracing_subscriber::registry().with(json_file_layer(appender));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(domain = "scan", "scan configuration built");
        });

        let contents = fs::read_to_string(temp_dir.path().join("fscan.log")).unwrap();
        let line = contents.lines().next().unwrap();
        assert!(line.starts_with('{'));
        assert!(line.contains(r#""message":"scan configuration built""#));
        assert!(line.contains(r#""domain":"scan""#));
        assert!(line.contains(r#""level":"INFO""#));
    }

    #[test]
    fn test_env_filter_defaults() {
        // Only meaningful when RUST_LOG is unset in the test environment.
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(env_filter(true).to_string(), "debug");
            assert_eq!(env_filter(false).to_string(), "info");
        }
    }
}
