//! Stateful pagination session over a log source.
//!
//! A [`PaginationSession`] composes the source registry, the record parser,
//! and the filter predicate into a "load more" controller: each load consumes
//! the next raw batch of the file, filters it, and appends the survivors to
//! an append-only result set. The session tracks how many raw lines have been
//! consumed and knows when the source is exhausted.
//!
//! State machine: `Unbound -> Loading(initial) -> Idle <-> Loading(more) ->
//! Eof`. `Eof` ends further loads (they become no-ops) until the session is
//! rebound to a path, which resets everything.
//!
//! Resumption deliberately re-reads from the start of the file and skips the
//! already-consumed prefix by counting batch sizes. It is not the cheapest
//! scheme, but it keeps line accounting exact and tolerates the file having
//! been rewritten between loads.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::sync_channel;
use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

use crate::model::{FilterSettings, LogRecord, SourceError};
use crate::parser;
use crate::source::{RawBatch, SourceRegistry};

/// How many raw batches the producer thread may run ahead of the consumer.
const CHANNEL_DEPTH: usize = 4;

/// Incremental, filtered view over one bound log file.
///
/// Single-owner: the session is not meant to be shared across threads
/// without external synchronization. At most one load operation is in
/// flight at a time, guarded by the `loading` flag.
pub struct PaginationSession {
    registry: SourceRegistry,
    batch_size: usize,
    path: Option<PathBuf>,
    cursor: usize,
    accumulated: Vec<LogRecord>,
    end_of_file: bool,
    loading: bool,
    cancel: Arc<AtomicBool>,
}

impl PaginationSession {
    /// Session over the default format registry.
    pub fn new(batch_size: usize) -> Self {
        Self::with_registry(SourceRegistry::default(), batch_size)
    }

    /// Session over a caller-supplied registry.
    ///
    /// A zero `batch_size` is clamped to 1.
    pub fn with_registry(registry: SourceRegistry, batch_size: usize) -> Self {
        Self {
            registry,
            batch_size: batch_size.max(1),
            path: None,
            cursor: 0,
            accumulated: Vec::new(),
            end_of_file: false,
            loading: false,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Bind the session to `path` and run the initial load under `settings`.
    ///
    /// Resets the cursor, the accumulated records, and the EOF flag, then
    /// streams from the beginning of the file. Any read still in flight from
    /// a previous bind is cancelled first.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the file has no registered reader or
    /// cannot be opened; no records are appended in that case.
    pub fn bind(
        &mut self,
        path: impl Into<PathBuf>,
        settings: &FilterSettings,
    ) -> Result<(), SourceError> {
        // Stop a producer left over from a previous bind before touching state.
        self.cancel.store(true, Ordering::Relaxed);
        self.cancel = Arc::new(AtomicBool::new(false));

        let path = path.into();
        debug!(path = %path.display(), "binding session");
        self.path = Some(path);
        self.cursor = 0;
        self.accumulated.clear();
        self.end_of_file = false;

        self.run_load(settings)
    }

    /// Consume the next raw batch, filter it, and append the survivors.
    ///
    /// Silent no-op when a load is already in flight, the source is
    /// exhausted, or the session is unbound — callers may invoke this
    /// defensively without consequence.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the file can no longer be opened.
    pub fn load_more(&mut self, settings: &FilterSettings) -> Result<(), SourceError> {
        if self.loading || self.end_of_file || self.path.is_none() {
            return Ok(());
        }
        self.run_load(settings)
    }

    /// Filtered records accumulated so far, in file order.
    pub fn records(&self) -> &[LogRecord] {
        &self.accumulated
    }

    /// True while a load operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once the source has been exhausted.
    pub fn end_of_file(&self) -> bool {
        self.end_of_file
    }

    /// Count of raw lines consumed from the source in this session.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The currently bound path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Batch size this session reads with.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Run one load operation with the `loading` flag held.
    ///
    /// The flag is cleared on every exit path, including errors, so a
    /// subsequent `load_more` can always proceed.
    fn run_load(&mut self, settings: &FilterSettings) -> Result<(), SourceError> {
        self.loading = true;
        let result = self.read_next_batch(settings);
        self.loading = false;
        result
    }

    fn read_next_batch(&mut self, settings: &FilterSettings) -> Result<(), SourceError> {
        // Guards in bind/load_more only enter here with a path bound.
        let Some(path) = self.path.clone() else {
            return Ok(());
        };

        // Fail fast before spawning anything: open errors surface here with
        // no session state mutated.
        let reader = self.registry.reader_for(&path)?;
        let batches = reader.stream_batches(&path, self.batch_size)?;

        // Producer thread streams raw batches through a bounded channel so
        // file I/O runs off the consumer thread while delivery order stays
        // exactly file order. Dropping the receiver (or the cancel flag)
        // stops the producer; it is joined before this load returns, which
        // also releases the file handle.
        let (tx, rx) = sync_channel::<RawBatch>(CHANNEL_DEPTH);
        let cancel = Arc::clone(&self.cancel);
        let producer = thread::spawn(move || {
            for batch in batches {
                if cancel.load(Ordering::Relaxed) {
                    break;
                }
                if tx.send(batch).is_err() {
                    // Consumer hung up; stop reading.
                    break;
                }
            }
        });

        let mut lines_skipped = 0usize;
        let mut appended = 0usize;
        for batch in rx {
            if batch.is_empty() {
                // The explicit end signal: nothing left beyond the skip point.
                self.end_of_file = true;
                break;
            }
            if lines_skipped < self.cursor {
                // Prefix consumed by earlier loads; count it, don't parse it.
                lines_skipped += batch.len();
                continue;
            }

            let raw_len = batch.len();
            let survivors = parser::parse_batch(&batch)
                .into_iter()
                .filter(|record| settings.matches(record));
            let before = self.accumulated.len();
            self.accumulated.extend(survivors);
            appended = self.accumulated.len() - before;
            self.cursor += raw_len;

            // Short batch: the source ran out before filling the page.
            if raw_len < self.batch_size {
                self.end_of_file = true;
            }
            // One page per load.
            break;
        }

        // Receiver is gone after the loop; the producer unblocks and exits.
        if producer.join().is_err() {
            warn!(path = %path.display(), "batch producer thread panicked");
        }

        debug!(
            path = %path.display(),
            appended,
            cursor = self.cursor,
            end_of_file = self.end_of_file,
            "load finished"
        );
        Ok(())
    }

    #[cfg(test)]
    fn force_loading(&mut self, value: bool) {
        self.loading = value;
    }
}

impl Drop for PaginationSession {
    fn drop(&mut self) {
        // Unblock any producer still parked on the channel.
        self.cancel.store(true, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for PaginationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationSession")
            .field("path", &self.path)
            .field("batch_size", &self.batch_size)
            .field("cursor", &self.cursor)
            .field("accumulated", &self.accumulated.len())
            .field("end_of_file", &self.end_of_file)
            .field("loading", &self.loading)
            .finish()
    }
}
