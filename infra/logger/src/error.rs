use thiserror::Error;

/// Errors that can occur during logger initialization.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// Failure when configuring the rolling file appender (e.g. invalid path).
    #[error("rolling file appender error: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    /// A global tracing subscriber has already been initialized.
    #[error("tracing subscriber error: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),

    /// Invalid configuration supplied to the logger builder.
    #[error("invalid logger configuration: {0}")]
    InvalidConfiguration(String),

    /// Failure creating the log directory.
    #[error("logger I/O error: {0}")]
    Io(#[from] std::io::Error),
}
