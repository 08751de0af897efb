//! Filter configuration and the inclusion predicate.

use chrono::NaiveDateTime;

use crate::model::record::{LogLevel, LogRecord};

/// Filtering criteria for a single load operation.
///
/// This is a configuration value, not mutable state: the session takes a
/// snapshot per load call and never re-filters rows it has already
/// accumulated. Every criterion is independent; an unset criterion is a
/// no-op for that dimension, never a rejection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSettings {
    /// Substring to match against the record's searchable fields.
    pub filter_text: Option<String>,
    /// Whether substring matching ignores case.
    pub ignore_case: bool,
    /// Inclusive lower bound on the record timestamp.
    pub start_date_time: Option<NaiveDateTime>,
    /// Inclusive upper bound on the record timestamp.
    pub end_date_time: Option<NaiveDateTime>,
    /// Level to match. The observed contract is equality, not a threshold;
    /// see the module tests pinning this behavior.
    pub min_level: Option<LogLevel>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            filter_text: None,
            ignore_case: true,
            start_date_time: None,
            end_date_time: None,
            min_level: None,
        }
    }
}

impl FilterSettings {
    /// Decide whether `record` passes this filter.
    ///
    /// Pure and side-effect free: the decision is the logical AND of the
    /// text, date-range, and level checks. Records with an absent timestamp
    /// pass the range check trivially; records with an absent level pass the
    /// level check trivially ("unknown, don't exclude").
    pub fn matches(&self, record: &LogRecord) -> bool {
        self.matches_text(record) && self.matches_date_range(record) && self.matches_level(record)
    }

    fn matches_text(&self, record: &LogRecord) -> bool {
        let Some(needle) = self.filter_text.as_deref() else {
            return true;
        };
        if needle.is_empty() {
            return true;
        }
        let fields = record.searchable_fields();
        if self.ignore_case {
            let needle = needle.to_lowercase();
            fields
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        } else {
            fields.iter().any(|field| field.contains(needle))
        }
    }

    fn matches_date_range(&self, record: &LogRecord) -> bool {
        let Some(ts) = record.timestamp else {
            return true;
        };
        let after_start = self.start_date_time.is_none_or(|start| ts >= start);
        let before_end = self.end_date_time.is_none_or(|end| ts <= end);
        after_start && before_end
    }

    fn matches_level(&self, record: &LogRecord) -> bool {
        match (self.min_level, record.level) {
            (None, _) => true,
            (Some(_), None) => true,
            (Some(wanted), Some(level)) => level == wanted,
        }
    }
}
