//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: Unrecoverable command failures
//! - `warn`: Recovered problems (discarded layout entries, failed option writes)
//! - `info`: Command progress, summary counts
//! - `debug`: Pipeline passes, reconciliation details
//! - `trace`: Per-label text (requires explicit `--log-data` flag)
//!
//! Record values can be personal data. They are only written to logs when
//! `--log-data` is given; otherwise [`redact_value`] substitutes
//! [`REDACTED_VALUE`].

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{
        self, MakeWriter,
        format::{DefaultFields, Format, FmtSpan},
    },
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

static LOG_DATA_ENABLED: AtomicBool = AtomicBool::new(false);

/// Placeholder used when record-level logging is disabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Crates whose logs follow the configured level; everything else stays at warn.
const WORKSPACE_CRATES: &[&str] = &[
    "lss_cli",
    "lss_ingest",
    "lss_model",
    "lss_persistence",
    "lss_session",
    "lss_transform",
];

/// Returns true if record-level logging is explicitly enabled.
pub fn log_data_enabled() -> bool {
    LOG_DATA_ENABLED.load(Ordering::Relaxed)
}

/// Returns the input value when record logging is enabled, otherwise a redacted token.
pub fn redact_value(value: &str) -> &str {
    if log_data_enabled() {
        value
    } else {
        REDACTED_VALUE
    }
}

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level applied to the workspace crates.
    pub level_filter: LevelFilter,
    /// Whether `RUST_LOG` may override `level_filter`.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    /// Whether to include target (module path) in log output.
    pub with_target: bool,
    /// Whether to include span close events in JSON output.
    pub with_spans: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Optional log file path. When set, logs are appended to the file.
    pub log_file: Option<PathBuf>,
    /// Whether record values may be logged.
    pub log_data: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for machine parsing.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_spans: true,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
            log_data: false,
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber. Call once at startup.
///
/// Logs go to stderr, or are appended to `config.log_file` when set.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    LOG_DATA_ENABLED.store(config.log_data, Ordering::Release);
    let layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            output_layer(config, SharedFileWriter::new(file))
        }
        None => output_layer(config, io::stderr),
    };
    subscriber(config, layer).init();
    Ok(())
}

fn subscriber(config: &LogConfig, layer: BoxedLayer) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry()
        .with(layer)
        .with(build_env_filter(config))
}

/// The formatting layer for `config.format`, writing through `writer`.
fn output_layer<W>(config: &LogConfig, writer: W) -> BoxedLayer
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);
    match config.format {
        LogFormat::Json => {
            let spans = if config.with_spans {
                FmtSpan::CLOSE
            } else {
                FmtSpan::NONE
            };
            layer.json().with_span_events(spans).boxed()
        }
        LogFormat::Compact => optional_time(
            layer.compact().with_ansi(config.with_ansi),
            config.with_timestamps,
        ),
        LogFormat::Pretty => optional_time(layer.with_ansi(config.with_ansi), config.with_timestamps),
    }
}

fn optional_time<L, T, W>(
    layer: fmt::Layer<Registry, DefaultFields, Format<L, T>, W>,
    with_timestamps: bool,
) -> BoxedLayer
where
    fmt::Layer<Registry, DefaultFields, Format<L, T>, W>: Layer<Registry> + Send + Sync + 'static,
    fmt::Layer<Registry, DefaultFields, Format<L, ()>, W>: Layer<Registry> + Send + Sync + 'static,
{
    if with_timestamps {
        layer.boxed()
    } else {
        layer.without_time().boxed()
    }
}

/// Appends log lines to one file shared by every writer handle.
#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<File>>,
}

impl SharedFileWriter {
    fn new(file: File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = LogFileHandle;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileHandle(Arc::clone(&self.file))
    }
}

struct LogFileHandle(Arc<Mutex<File>>);

impl LogFileHandle {
    fn lock(&self) -> io::Result<MutexGuard<'_, File>> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for LogFileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.flush()
    }
}

/// Build the filter, letting `RUST_LOG` win when allowed.
fn build_env_filter(config: &LogConfig) -> EnvFilter {
    if config.use_env_filter
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    EnvFilter::new(default_directives(config.level_filter))
}

fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(WORKSPACE_CRATES.iter().map(|name| format!("{name}={level}")));
    directives.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_scope_workspace_crates() {
        let directives = default_directives(LevelFilter::DEBUG);
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("lss_transform=debug"));
        assert!(directives.contains("lss_session=debug"));
    }

    #[test]
    fn test_values_redacted_by_default() {
        assert!(!log_data_enabled());
        assert_eq!(redact_value("Ann"), REDACTED_VALUE);
    }

    #[test]
    fn test_log_file_receives_filtered_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label-sheet.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .unwrap();
        let config = LogConfig {
            use_env_filter: false,
            with_ansi: false,
            format: LogFormat::Compact,
            log_file: Some(path.clone()),
            ..LogConfig::default()
        };

        let layer = output_layer(&config, SharedFileWriter::new(file));
        tracing::subscriber::with_default(subscriber(&config, layer), || {
            tracing::warn!(column = "Zombie", "layout entry discarded");
            tracing::debug!("below the configured level");
        });

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 1);
        assert!(written.contains("WARN"));
        assert!(written.contains("layout entry discarded"));
        assert!(written.contains("Zombie"));
    }
}
