//! tdlv — incremental paging and filtering engine for tab-delimited logs.
//!
//! Streams a five-field, tab-delimited log file in bounded batches, parses
//! each line tolerantly into a [`model::LogRecord`], filters records through
//! a composable [`model::FilterSettings`] predicate, and serves the result as
//! a progressively growing, append-only page set via
//! [`session::PaginationSession`].

pub mod config;
pub mod logging;
pub mod model;
pub mod parser;
pub mod session;
pub mod source;
