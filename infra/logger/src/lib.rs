//! # Logger
//!
//! A centralized logging utility for the workspace: configures console
//! and optional rolling-file logging with non-blocking I/O and
//! environment-based filtering.
//!
//! `RUST_LOG` overrides the programmatic level at runtime.
//!
//! ## Example
//!
//! ```rust
//! # use vhub_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("my-app")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::LoggerError;
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// A builder for configuring and initializing the global tracing subscriber.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug)]
pub struct LoggerBuilder {
    name: String,
    console: bool,
    path: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
}

impl LoggerBuilder {
    /// Sets the logger name, used as the rolling log file prefix.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enables or disables the console layer.
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Configures the minimum log level to be emitted.
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Enables file logging under `path`.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Configures the log file rotation strategy.
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Configures the maximum number of rotated log files to keep.
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Consumes the builder and initializes the global tracing subscriber.
    ///
    /// Returns a [`Logger`] handle holding the non-blocking worker guard;
    /// keep it alive for the lifetime of the program so buffered logs are
    /// flushed.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for an empty name,
    /// zero `max_files`, or a configuration with no layers enabled;
    /// [`LoggerError::Subscriber`] if a global subscriber is already set.
    pub fn init(self) -> Result<Logger, LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration("logger name cannot be empty".into()));
        }
        if self.max_files == 0 {
            return Err(LoggerError::InvalidConfiguration(
                "max_files must be greater than zero".into(),
            ));
        }
        if !self.console && self.path.is_none() {
            return Err(LoggerError::InvalidConfiguration(
                "no logging layers enabled; enable console or file output".into(),
            ));
        }

        let env_filter =
            EnvFilter::builder().with_default_directive(self.level.into()).from_env_lossy();

        let mut layers = Vec::new();
        if self.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = if let Some(path) = self.path {
            fs::create_dir_all(&path)?;

            let file_appender = RollingFileAppender::builder()
                .rotation(self.rotation)
                .filename_prefix(&self.name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(self.max_files)
                .build(path)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            layers.push(layer().with_writer(non_blocking).with_ansi(false).boxed());
            Some(guard)
        } else {
            None
        };

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
///
/// Holds the background worker guard; drop only at shutdown.
#[must_use = "dropping this handle stops background logging threads"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] for the global tracing subscriber.
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder {
            name: String::new(),
            console: true,
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
        }
    }

    /// Returns a reference to the underlying worker guard, if present.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}
