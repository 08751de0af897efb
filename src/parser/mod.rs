//! Tab-delimited record parser.
//!
//! Pure functions converting raw field-lists (tab-split lines) into
//! [`LogRecord`] values. Parsing is total: a malformed or missing field
//! degrades to `None` in the record, it never produces an error. This policy
//! is load-bearing — a single garbled line must not abort a stream of
//! thousands.

use chrono::NaiveDateTime;

use crate::model::LogRecord;
use crate::source::RawBatch;

/// Fixed field order of the on-disk format.
const FIELD_TIMESTAMP: usize = 0;
const FIELD_LEVEL: usize = 1;
const FIELD_SOURCE: usize = 2;
const FIELD_MESSAGE: usize = 3;
const FIELD_DETAIL: usize = 4;

/// Timestamp formats attempted after ISO-8601, in order.
const FORMAT_24H: &str = "%Y-%m-%d %H:%M:%S";
const FORMAT_12H: &str = "%Y-%m-%d %I:%M:%S %p";

/// Parse one raw field-list into a record.
///
/// Fields beyond index 4 are ignored; missing trailing fields map to
/// absent. Never fails and never panics, whatever the input.
pub fn parse_record(fields: &[String]) -> LogRecord {
    LogRecord {
        timestamp: fields
            .get(FIELD_TIMESTAMP)
            .and_then(|raw| parse_timestamp(raw)),
        level: fields
            .get(FIELD_LEVEL)
            .and_then(|raw| raw.parse().ok()),
        source: fields.get(FIELD_SOURCE).cloned(),
        message: fields.get(FIELD_MESSAGE).cloned(),
        detail_message: fields.get(FIELD_DETAIL).cloned(),
    }
}

/// Parse a whole raw batch, one record per field-list, order preserved.
pub fn parse_batch(batch: &RawBatch) -> Vec<LogRecord> {
    batch.iter().map(|fields| parse_record(fields)).collect()
}

/// Attempt the supported timestamp formats in order; first success wins.
///
/// 1. ISO-8601 local date-time (`2023-10-01T12:34:56`, optional fraction)
/// 2. `2023-10-01 12:34:56`
/// 3. `2023-10-01 12:34:56 PM`
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, FORMAT_24H))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, FORMAT_12H))
        .ok()
}
