//! Injected diagnostic logging.
//!
//! Components never configure process-wide logging. Each one holds a
//! [`LogSink`] handed to it at construction and reports through it.
//! Messages are advisory only and never influence a parse or lookup result.

use std::fmt;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

/// Destination for diagnostic messages.
///
/// Implementations must be cheap to call and must not panic.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>);
}

/// Forwards messages to the `tracing` macros.
///
/// This is the default sink. Whatever subscriber the host application
/// installed decides where the events end up.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        match level {
            LogLevel::Error => tracing::error!(target: "hostresolve", "{}", message),
            LogLevel::Warning => tracing::warn!(target: "hostresolve", "{}", message),
            LogLevel::Info => tracing::info!(target: "hostresolve", "{}", message),
            LogLevel::Debug => tracing::debug!(target: "hostresolve", "{}", message),
        }
    }
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _level: LogLevel, _message: fmt::Arguments<'_>) {}
}

/// Plain closures work as sinks.
impl<F> LogSink for F
where
    F: Fn(LogLevel, &str) + Send + Sync,
{
    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        match message.as_str() {
            Some(s) => self(level, s),
            None => self(level, &message.to_string()),
        }
    }
}
