/*!
 * Append-only diagnostic sinks.
 *
 * The pipeline reports alignment mismatches, retry summaries and
 * length-truncated sources as records. Where they end up is the sink's
 * business; a failing sink never fails a translation.
 */

use anyhow::{Context, Result};
use log::warn;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// One diagnostic record
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticRecord {
    /// Final segment count differs from the paragraph count
    AlignmentMismatch {
        /// Paragraph count minus segment count (negative on overshoot)
        problem_size: i64,
        /// Each source paragraph paired with the segment at the same position
        pairs: Vec<(String, Option<String>)>,
    },
    /// The reconciler needed retries for a batch
    RetrySummary {
        succeeded: bool,
        retry_count: usize,
        elapsed: Duration,
    },
    /// The service stopped on its length limit while translating this source
    LongText { source: String },
}

impl DiagnosticRecord {
    /// Plain-text rendering used by file sinks
    pub fn render(&self) -> String {
        match self {
            Self::AlignmentMismatch { problem_size, pairs } => {
                let mut out = format!("problem size: {}\n", problem_size);
                for (source, translated) in pairs {
                    out.push_str(source);
                    out.push_str("\n\n");
                    if let Some(translated) = translated {
                        out.push_str("............................................\n");
                        out.push_str(translated);
                        out.push_str("\n\n");
                    }
                    out.push_str("=============================\n");
                }
                out
            }
            Self::RetrySummary { succeeded, retry_count, elapsed } => format!(
                "retry {}, count = {}, time = {:.1}s\n",
                if *succeeded { "success" } else { "fail" },
                retry_count,
                elapsed.as_secs_f64()
            ),
            Self::LongText { source } => format!(
                "==================================================\n\
                 The total token is too long and cannot be completely translated\n\n\
                 {}\n",
                source
            ),
        }
    }
}

/// Destination for diagnostic records
pub trait DiagnosticSink: Send + Sync + Debug {
    /// Append one record
    fn write(&self, record: &DiagnosticRecord) -> Result<()>;
}

/// Write a record, logging instead of failing when the sink errors
pub fn write_best_effort(sink: &dyn DiagnosticSink, record: &DiagnosticRecord) {
    if let Err(e) = sink.write(record) {
        warn!("Failed to write diagnostic record: {:#}", e);
    }
}

/// Appends rendered records to a text file, creating parent directories
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    /// Serializes appends from concurrent workers
    lock: Mutex<()>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiagnosticSink for FileSink {
    fn write(&self, record: &DiagnosticRecord) -> Result<()> {
        let _guard = self.lock.lock();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open diagnostic log: {}", self.path.display()))?;
        file.write_all(record.render().as_bytes())
            .with_context(|| format!("Failed to append to diagnostic log: {}", self.path.display()))?;
        Ok(())
    }
}

/// Keeps records in memory; clones share storage
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<DiagnosticRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records.lock().clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn write(&self, record: &DiagnosticRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn write(&self, _record: &DiagnosticRecord) -> Result<()> {
        Ok(())
    }
}

/// The two sinks the pipeline writes to
#[derive(Debug, Clone)]
pub struct DiagnosticSinks {
    /// Alignment mismatches and retry summaries
    pub mismatch: Arc<dyn DiagnosticSink>,
    /// Sources whose translation was cut by the length limit
    pub long_text: Arc<dyn DiagnosticSink>,
}

impl DiagnosticSinks {
    /// File sinks under `log_dir`
    pub fn in_dir(log_dir: impl AsRef<Path>) -> Self {
        let dir = log_dir.as_ref();
        Self {
            mismatch: Arc::new(FileSink::new(dir.join("buglog.txt"))),
            long_text: Arc::new(FileSink::new(dir.join("long_text.txt"))),
        }
    }

    /// Sinks that drop every record
    pub fn disabled() -> Self {
        Self {
            mismatch: Arc::new(NullSink),
            long_text: Arc::new(NullSink),
        }
    }
}
