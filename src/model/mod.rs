//! Domain model types (pure).
//!
//! All types in this module are plain data; the only logic is the filter
//! predicate, which is a pure function of a record and a settings value.

pub mod error;
pub mod filter;
pub mod record;

// Re-export for convenience
pub use error::{AppError, SourceError};
pub use filter::FilterSettings;
pub use record::{InvalidLogLevel, LogLevel, LogRecord};
