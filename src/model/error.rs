//! Error types for the tdlv engine.
//!
//! The taxonomy deliberately mirrors how failures are recovered from:
//!
//! - [`SourceError`] - the source file cannot be opened or has no registered
//!   reader. Fatal for the load it occurs in; surfaced to the caller.
//! - Field parse failures (bad timestamp, unknown level) are **not** errors
//!   at all: the parser degrades the field to `None` and the stream
//!   continues. One malformed line must never abort a multi-thousand-line
//!   read.
//! - A `load_more` call while a load is in flight (or after EOF) is a silent
//!   no-op, not an error, so callers may invoke it defensively.
//!
//! All variants carry structured context and compose into [`AppError`] via
//! `From`, so `?` propagates cleanly to the binary's top level.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;

/// Top-level application error for the CLI shell.
///
/// Domain errors convert into this via `#[from]`; the binary prints the
/// message and exits non-zero.
#[derive(Debug, Error)]
pub enum AppError {
    /// The log source could not be read.
    #[error("Failed to read log source: {0}")]
    Source(#[from] SourceError),

    /// Configuration file could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The tracing subscriber could not be installed.
    #[error("Logging setup error: {0}")]
    Logging(#[from] LoggingError),

    /// I/O failure writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors opening a log source for streaming.
///
/// These occur before any batch is produced; a load that fails this way
/// mutates no session state beyond what `bind` itself resets.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file does not exist or cannot be opened for reading.
    #[error("Source unavailable: {path} ({reason})")]
    Unavailable {
        /// The path that was attempted.
        path: PathBuf,
        /// Why the open failed (missing, permission denied, ...).
        reason: String,
    },

    /// No reader is registered for the file's format.
    #[error("Unsupported log format: {path}")]
    UnsupportedFormat {
        /// The path whose extension matched no registered reader.
        path: PathBuf,
    },
}
