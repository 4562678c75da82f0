//! Centralized Logging Infrastructure
//!
//! Installs the process-wide `tracing` subscriber:
//! - `RUST_LOG` filter, with per-crate defaults when unset
//! - Compact console output
//! - Optional file logging with daily rotation

use std::path::PathBuf;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crate-level filter directives used when `RUST_LOG` is not set
pub const DEFAULT_DIRECTIVES: &[&str] = &["zonemux_core=debug", "zonemux_gateway=debug"];

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base level for everything not covered by a directive
    pub level: String,

    /// Extra filter directives, e.g. `zonemux_gateway::remote=trace`
    pub directives: Vec<String>,

    /// Directory for rotated log files; console only when `None`
    pub log_dir: Option<PathBuf>,

    /// Log file name prefix (files are `<prefix>.<date>.log`)
    pub file_prefix: String,

    /// Colored console output
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directives: DEFAULT_DIRECTIVES.iter().map(|d| d.to_string()).collect(),
            log_dir: None,
            file_prefix: "zonemux".to_string(),
            ansi: true,
        }
    }
}

impl LogConfig {
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Filter built from this config alone, ignoring `RUST_LOG`.
    /// Directives that fail to parse are reported on stderr and skipped.
    pub fn env_filter(&self) -> EnvFilter {
        self.directives
            .iter()
            .filter_map(|raw| match raw.parse::<Directive>() {
                Ok(directive) => Some(directive),
                Err(e) => {
                    eprintln!("Warning: ignoring log directive {:?}: {}", raw, e);
                    None
                }
            })
            .fold(EnvFilter::new(&self.level), |filter, directive| {
                filter.add_directive(directive)
            })
    }
}

/// Initialize tracing with console and optional file logging.
///
/// Loads `.env` first so `RUST_LOG` can come from there. Returns the file
/// writer guard when file logging is on; it must be kept alive for the
/// duration of the program.
pub fn init_tracing(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.env_filter());

    // Console layer: compact
    let console_layer = fmt::layer()
        .with_ansi(config.ansi)
        .compact()
        .with_line_number(false)
        .with_file(false)
        .with_target(true);

    // File layer: no colors, include more detail
    let (file_layer, guard) = match &config.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(&config.file_prefix)
                .filename_suffix("log")
                .build(log_dir)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
