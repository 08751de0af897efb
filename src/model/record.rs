//! Structured log records and severity levels (pure data).

use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Severity level of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Fine-grained tracing output.
    Trace,
    /// Diagnostic detail useful during debugging.
    Debug,
    /// Normal operational messages.
    Info,
    /// Potential problems that did not disrupt operation.
    Warn,
    /// Failures that prevented part of the system from working.
    Error,
}

impl LogLevel {
    /// Canonical uppercase name, matching the on-disk representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known severity level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown log level: '{0}'")]
pub struct InvalidLogLevel(pub String);

impl FromStr for LogLevel {
    type Err = InvalidLogLevel;

    /// Case-insensitive match against the five level names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(InvalidLogLevel(s.to_string())),
        }
    }
}

/// One parsed log line.
///
/// Every field is independently optional: `None` means the field was missing
/// from the raw line or failed to parse. A record is built once from exactly
/// one raw line and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogRecord {
    /// Event timestamp, local date-time without timezone.
    pub timestamp: Option<NaiveDateTime>,
    /// Severity level.
    pub level: Option<LogLevel>,
    /// Origin of the event (module, class, component).
    pub source: Option<String>,
    /// Primary message text.
    pub message: Option<String>,
    /// Additional detail or context for the event.
    pub detail_message: Option<String>,
}

impl LogRecord {
    /// String forms of all non-absent fields, in field order.
    ///
    /// This is the haystack the text filter matches against: stringified
    /// timestamp, stringified level, then the three textual fields verbatim.
    pub fn searchable_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(5);
        if let Some(ts) = self.timestamp {
            fields.push(ts.to_string());
        }
        if let Some(level) = self.level {
            fields.push(level.to_string());
        }
        for text in [&self.source, &self.message, &self.detail_message]
            .into_iter()
            .flatten()
        {
            fields.push(text.clone());
        }
        fields
    }
}
