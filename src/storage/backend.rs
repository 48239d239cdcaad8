//! Storage backend abstraction.
//!
//! The [`Storage`] trait is deliberately small: a backend only knows how to
//! read every record and how to replace every record. The read-modify-write
//! operations the commands need (recording a visit, folding in a discovery
//! pass, re-ranking) are provided methods built on those two primitives, so
//! every backend gets identical merge semantics.

use crate::domain::error::Result;
use crate::domain::LabelCodec;
use crate::infrastructure::paths;
use crate::storage::merge::{self, RecordMap};
use crate::storage::models::LogRecord;
use crate::storage::ranking::sort_records;
use std::path::Path;

/// Persistent set of history records keyed by absolute path.
///
/// # Implementations
///
/// - [`crate::storage::HistoryFile`]: newline-delimited text file (default)
pub trait Storage {
    /// Returns `true` once the backing store has been written at least once.
    fn is_initialized(&self) -> bool;

    /// Reads every record, summing counts of duplicate paths.
    ///
    /// A store that does not exist yet reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    fn read_all(&self) -> Result<RecordMap>;

    /// Replaces the stored records with `records`.
    ///
    /// Implementations must write in rank order and must skip records for the
    /// home directory or whose path no longer exists (see
    /// [`prepare_for_write`]). Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn write_all(&mut self, codec: &LabelCodec, records: Vec<LogRecord>) -> Result<usize>;

    /// Records a visit to `path` and writes the result back.
    ///
    /// Visits to the home directory are ignored without touching the store.
    /// Returns whether anything was recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    fn record_visit(&mut self, codec: &LabelCodec, path: &str) -> Result<bool> {
        let _span = tracing::debug_span!("record_visit", path = %path).entered();

        if codec.is_home(path) {
            tracing::debug!("home directory visits are not recorded");
            return Ok(false);
        }

        let mut records = self.read_all()?;
        merge::visit(codec, &mut records, path);
        self.write_all(codec, records.into_values().collect())?;
        Ok(true)
    }

    /// Folds a discovery pass into the store and writes the result back.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    fn refresh(&mut self, codec: &LabelCodec, discovered: &[String]) -> Result<usize> {
        let _span = tracing::debug_span!("refresh_history", discovered = discovered.len()).entered();

        let current = self.read_all()?;
        let merged = merge::reconcile(codec, discovered.iter().map(String::as_str), current);
        self.write_all(codec, merged)
    }

    /// Re-reads and re-writes the store: duplicate lines are aggregated,
    /// vanished paths dropped, and the order re-ranked.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    fn rerank(&mut self, codec: &LabelCodec) -> Result<usize> {
        let _span = tracing::debug_span!("rerank_history").entered();

        let records = self.read_all()?;
        self.write_all(codec, records.into_values().collect())
    }
}

/// Ranks `records` and drops the ones that must not be persisted: the home
/// sentinel, any other record for the home directory, and anything whose path
/// no longer exists.
#[must_use]
pub fn prepare_for_write(codec: &LabelCodec, mut records: Vec<LogRecord>) -> Vec<LogRecord> {
    let before = records.len();
    records.retain(|r| {
        !r.is_home_sentinel()
            && !codec.is_home(&r.absolute_path)
            && paths::exists(Path::new(&r.absolute_path))
    });
    sort_records(&mut records);

    let dropped = before - records.len();
    if dropped > 0 {
        tracing::debug!(dropped, "pruned home and vanished records");
    }
    records
}
