//! Streaming batch reader for tab-delimited text logs.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::model::SourceError;
use crate::source::{BatchStream, LogFileReader, RawBatch};

/// Field delimiter of the text log format.
const DELIMITER: char = '\t';

/// Reader for plain text logs, one record per line, fields tab-separated.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextLogReader;

impl TextLogReader {
    /// Create a text reader.
    pub fn new() -> Self {
        Self
    }
}

impl LogFileReader for TextLogReader {
    fn stream_batches(&self, path: &Path, batch_size: usize) -> Result<BatchStream, SourceError> {
        if !path.exists() {
            return Err(SourceError::Unavailable {
                path: path.to_path_buf(),
                reason: "file does not exist".to_string(),
            });
        }
        let file = File::open(path).map_err(|e| SourceError::Unavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Box::new(TextBatches {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
            batch_size: batch_size.max(1),
            exhausted: false,
            end_signalled: false,
        }))
    }
}

/// Iterator over batches of tab-split lines.
///
/// Holds at most one batch of lines in memory at a time. After the
/// underlying file is exhausted it yields exactly one empty batch (the end
/// signal) and then terminates.
struct TextBatches {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    batch_size: usize,
    exhausted: bool,
    end_signalled: bool,
}

impl Iterator for TextBatches {
    type Item = RawBatch;

    fn next(&mut self) -> Option<RawBatch> {
        if self.end_signalled {
            return None;
        }
        if self.exhausted {
            self.end_signalled = true;
            return Some(RawBatch::new());
        }

        let mut batch = RawBatch::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            match self.lines.next() {
                Some(Ok(line)) => {
                    batch.push(line.split(DELIMITER).map(str::to_string).collect());
                }
                Some(Err(e)) => {
                    // A mid-stream read error ends the stream early; the
                    // short batch below doubles as the EOF signal.
                    warn!(path = %self.path.display(), error = %e, "read error, ending stream");
                    self.exhausted = true;
                    break;
                }
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }

        if batch.is_empty() {
            // File ended exactly on a batch boundary (or was empty): this
            // empty batch is the end signal itself.
            self.end_signalled = true;
        }
        Some(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fixture(name: &str, lines: usize) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let content: String = (0..lines)
            .map(|i| format!("2023-10-01 12:00:{i:02}\tINFO\tsrc\tline {i}\n"))
            .collect();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn stream_fails_fast_for_missing_file() {
        let path = std::env::temp_dir().join("tdlv_missing_file_98431.txt");
        let result = TextLogReader::new().stream_batches(&path, 10);
        assert!(matches!(result, Err(SourceError::Unavailable { .. })));
    }

    #[test]
    fn five_lines_batch_size_two_yields_2_2_1_then_empty() {
        let path = write_fixture("tdlv_text_batches_5x2.txt", 5);
        let batches: Vec<RawBatch> = TextLogReader::new()
            .stream_batches(&path, 2)
            .unwrap()
            .collect();
        let _ = fs::remove_file(&path);

        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2, 1, 0]);
    }

    #[test]
    fn exact_multiple_ends_with_single_empty_batch() {
        let path = write_fixture("tdlv_text_batches_4x2.txt", 4);
        let batches: Vec<RawBatch> = TextLogReader::new()
            .stream_batches(&path, 2)
            .unwrap()
            .collect();
        let _ = fs::remove_file(&path);

        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2, 0]);
    }

    #[test]
    fn empty_file_yields_one_empty_batch() {
        let path = std::env::temp_dir().join("tdlv_text_batches_empty.txt");
        fs::write(&path, "").unwrap();
        let batches: Vec<RawBatch> = TextLogReader::new()
            .stream_batches(&path, 3)
            .unwrap()
            .collect();
        let _ = fs::remove_file(&path);

        assert_eq!(batches.len(), 1);
        assert!(batches[0].is_empty());
    }

    #[test]
    fn lines_are_tab_split_in_file_order() {
        let path = std::env::temp_dir().join("tdlv_text_batches_split.txt");
        fs::write(&path, "a\tb\tc\nplain line\n").unwrap();
        let batches: Vec<RawBatch> = TextLogReader::new()
            .stream_batches(&path, 10)
            .unwrap()
            .collect();
        let _ = fs::remove_file(&path);

        assert_eq!(batches[0][0], vec!["a", "b", "c"]);
        // A line with no tabs splits into a single field.
        assert_eq!(batches[0][1], vec!["plain line"]);
    }

    #[test]
    fn restart_reopens_from_the_beginning() {
        let path = write_fixture("tdlv_text_batches_restart.txt", 3);
        let reader = TextLogReader::new();
        let first: Vec<RawBatch> = reader.stream_batches(&path, 2).unwrap().collect();
        let second: Vec<RawBatch> = reader.stream_batches(&path, 2).unwrap().collect();
        let _ = fs::remove_file(&path);

        assert_eq!(first, second);
    }

    #[test]
    fn zero_batch_size_is_clamped_to_one() {
        let path = write_fixture("tdlv_text_batches_clamp.txt", 2);
        let batches: Vec<RawBatch> = TextLogReader::new()
            .stream_batches(&path, 0)
            .unwrap()
            .collect();
        let _ = fs::remove_file(&path);

        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![1, 1, 0]);
    }
}
