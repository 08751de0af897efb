//! Log sources: streaming batch readers and format selection.
//!
//! A reader turns a file path into a lazy sequence of [`RawBatch`] values
//! without materializing the file. Readers only delimiter-split; semantic
//! parsing lives entirely in [`crate::parser`], which is why a malformed
//! timestamp can never abort reading.

pub mod text;

pub use text::TextLogReader;

use std::collections::HashMap;
use std::path::Path;

use crate::model::SourceError;

/// An ordered group of raw tab-split lines, read together to bound memory.
///
/// An empty batch is the canonical end-of-source signal. It is distinct from
/// "a batch whose records all got filtered out" — filtering happens after
/// parsing, on [`crate::model::LogRecord`]s, never here.
pub type RawBatch = Vec<Vec<String>>;

/// Lazy, finite stream of raw batches.
pub type BatchStream = Box<dyn Iterator<Item = RawBatch> + Send>;

/// Capability interface for format-specific batch readers.
pub trait LogFileReader: Send + Sync + std::fmt::Debug {
    /// Open `path` and stream its content as batches of `batch_size` raw
    /// lines, in file order.
    ///
    /// Full batches hold exactly `batch_size` lines; the final batch before
    /// EOF may be shorter; after all content is exhausted the stream yields
    /// one empty batch as the explicit end signal, then terminates. Each
    /// call re-opens the file from the beginning.
    ///
    /// # Errors
    ///
    /// Fails fast with [`SourceError::Unavailable`] before producing any
    /// batch when the path does not exist or cannot be opened.
    fn stream_batches(&self, path: &Path, batch_size: usize) -> Result<BatchStream, SourceError>;
}

/// Registry mapping a format key (lowercased file extension) to a reader.
///
/// A strategy map rather than an inheritance hierarchy: new formats register
/// a key and a factory, nothing else changes.
pub struct SourceRegistry {
    readers: HashMap<String, Box<dyn LogFileReader>>,
}

impl SourceRegistry {
    /// Empty registry with no formats.
    pub fn empty() -> Self {
        Self {
            readers: HashMap::new(),
        }
    }

    /// Register `reader` for the given format key (matched case-insensitively
    /// against file extensions).
    pub fn register(&mut self, key: impl Into<String>, reader: Box<dyn LogFileReader>) {
        self.readers.insert(key.into().to_lowercase(), reader);
    }

    /// Look up the reader for `path` by its extension.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnsupportedFormat`] when the path has no
    /// extension or no reader is registered for it.
    pub fn reader_for(&self, path: &Path) -> Result<&dyn LogFileReader, SourceError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.readers.get(&ext.to_lowercase()))
            .map(|boxed| boxed.as_ref())
            .ok_or_else(|| SourceError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
    }
}

impl Default for SourceRegistry {
    /// Registry with the built-in text reader bound to `txt` and `log`.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("txt", Box::new(TextLogReader::new()));
        registry.register("log", Box::new(TextLogReader::new()));
        registry
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.readers.keys().collect();
        keys.sort();
        f.debug_struct("SourceRegistry").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn default_registry_resolves_txt_and_log() {
        let registry = SourceRegistry::default();
        assert!(registry.reader_for(Path::new("app.txt")).is_ok());
        assert!(registry.reader_for(Path::new("app.log")).is_ok());
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let registry = SourceRegistry::default();
        assert!(registry.reader_for(Path::new("APP.TXT")).is_ok());
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let registry = SourceRegistry::default();
        let err = registry.reader_for(Path::new("trace.bin")).unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedFormat { path } if path == PathBuf::from("trace.bin")));
    }

    #[test]
    fn missing_extension_is_unsupported() {
        let registry = SourceRegistry::default();
        assert!(registry.reader_for(Path::new("no_extension")).is_err());
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        let registry = SourceRegistry::empty();
        assert!(registry.reader_for(Path::new("app.txt")).is_err());
    }

    #[test]
    fn registered_key_is_lowercased() {
        let mut registry = SourceRegistry::empty();
        registry.register("TSV", Box::new(TextLogReader::new()));
        assert!(registry.reader_for(Path::new("data.tsv")).is_ok());
    }
}
