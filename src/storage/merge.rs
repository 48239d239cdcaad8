//! Pure merge rules between the persisted records and new observations.
//!
//! Nothing here touches the filesystem. Pruning of vanished paths happens when
//! records are written back (see [`crate::storage::Storage::write_all`]).

use crate::domain::LabelCodec;
use std::collections::HashMap;

use super::models::LogRecord;

/// Records keyed by absolute path.
pub type RecordMap = HashMap<String, LogRecord>;

/// Folds `record` into `records`, summing counts for a path seen before.
///
/// The later record's `name` and `location` win.
pub fn accumulate(records: &mut RecordMap, record: LogRecord) {
    match records.get_mut(&record.absolute_path) {
        Some(existing) => {
            existing.bump(record.count);
            existing.name = record.name;
            existing.location = record.location;
        }
        None => {
            records.insert(record.absolute_path.clone(), record);
        }
    }
}

/// Merges freshly discovered project paths into the current records.
///
/// Every current record is kept as is. Discovered paths without a record get a
/// new one with count 1. Discovery never bumps an existing count, so running
/// this repeatedly with the same input is idempotent. The home directory is
/// never recorded.
#[must_use]
pub fn reconcile<'a>(
    codec: &LabelCodec,
    discovered: impl IntoIterator<Item = &'a str>,
    current: RecordMap,
) -> Vec<LogRecord> {
    let mut merged = current;
    let mut added = 0usize;

    for path in discovered {
        if codec.is_home(path) || merged.contains_key(path) {
            continue;
        }
        let record = codec.build_record(path);
        merged.insert(record.absolute_path.clone(), record);
        added += 1;
    }

    tracing::debug!(added, total = merged.len(), "reconciled discovered projects");
    merged.into_values().collect()
}

/// Records one visit to `path`.
///
/// Bumps an existing record by one, or adds a new record with count 1.
/// Returns `false` (and changes nothing) for the home directory, which is
/// never persisted.
pub fn visit(codec: &LabelCodec, records: &mut RecordMap, path: &str) -> bool {
    if codec.is_home(path) {
        return false;
    }

    match records.get_mut(path) {
        Some(existing) => existing.bump(1),
        None => {
            let record = codec.build_record(path);
            records.insert(record.absolute_path.clone(), record);
        }
    }
    true
}
