//! Ranking policy for history records.
//!
//! A single comparator orders records for both the on-disk write order and the
//! fuzzy-finder presentation order:
//!
//! 1. `count`, descending (the home sentinel carries [`HOME_SENTINEL_COUNT`]
//!    and therefore always comes first)
//! 2. `name`, ascending, ignoring case
//! 3. `location`, ascending
//! 4. `absolute_path`, ascending, so that the order is total

use super::models::{LogRecord, HOME_SENTINEL_COUNT};
use std::cmp::Ordering;

/// Compares two records by rank; `Ordering::Less` means `a` is shown first.
///
/// # Examples
///
/// ```
/// use pd::storage::{compare, LogRecord};
/// use std::cmp::Ordering;
///
/// let busy = LogRecord { count: 9, absolute_path: "/h/b".into(), name: "b".into(), location: String::new() };
/// let quiet = LogRecord { count: 2, absolute_path: "/h/a".into(), name: "a".into(), location: String::new() };
/// assert_eq!(compare(&busy, &quiet), Ordering::Less);
/// ```
#[must_use]
pub fn compare(a: &LogRecord, b: &LogRecord) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| cmp_ignore_case(&a.name, &b.name))
        .then_with(|| a.location.cmp(&b.location))
        .then_with(|| a.absolute_path.cmp(&b.absolute_path))
}

/// Sorts records in place by [`compare`].
pub fn sort_records(records: &mut [LogRecord]) {
    records.sort_by(compare);
}

/// Returns `records` ranked, with the home sentinel pinned in front.
///
/// Stray records for the home path, or already carrying the sentinel count,
/// are dropped so home appears exactly once.
#[must_use]
pub fn ranked_with_home(home: LogRecord, records: impl IntoIterator<Item = LogRecord>) -> Vec<LogRecord> {
    let mut ranked: Vec<LogRecord> = records
        .into_iter()
        .filter(|r| r.count != HOME_SENTINEL_COUNT && r.absolute_path != home.absolute_path)
        .collect();
    sort_records(&mut ranked);
    ranked.insert(0, home);
    ranked
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
