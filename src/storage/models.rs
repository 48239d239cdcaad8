//! Storage record model for the history log.
//!
//! One [`LogRecord`] is one line of the history file:
//!
//! ```text
//! <count>,<absolute path>,<name>,<location>
//! ```
//!
//! Fields are joined with bare commas and never quoted or escaped. A comma
//! inside a path, name, or location therefore cannot round-trip; this is an
//! accepted limitation of the format.

use serde::{Deserialize, Serialize};

/// Count assigned to the synthetic home-directory record.
///
/// Real counts saturate one below this value, so the home record always ranks
/// first.
pub const HOME_SENTINEL_COUNT: u64 = u64::MAX;

/// Highest count a persisted record can reach.
pub const MAX_RECORD_COUNT: u64 = HOME_SENTINEL_COUNT - 1;

/// Display name of the home-directory sentinel record.
pub const HOME_SENTINEL_NAME: &str = "~";

/// A known directory together with how often it has been discovered or visited.
///
/// `name` and `location` are derived from `absolute_path` when the record is
/// built (see [`crate::domain::LabelCodec::build_record`]) and are never edited
/// on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Number of visits or discoveries aggregated into this record.
    pub count: u64,

    /// Canonical absolute path; the record's identity.
    pub absolute_path: String,

    /// Final path component.
    pub name: String,

    /// Ancestor components relative to home (`src/github`), or the absolute
    /// parent (`/opt/tools`) for directories outside home. Empty for direct
    /// children of home.
    pub location: String,
}

/// Why a history line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    /// The line has fewer than four comma-separated fields.
    #[error("expected 4 fields, found {0}")]
    MissingFields(usize),
    /// The count is not a positive base-10 integer.
    #[error("invalid count {0:?}")]
    BadCount(String),
    /// The path field is not absolute.
    #[error("path {0:?} is not absolute")]
    RelativePath(String),
}

impl LogRecord {
    /// Returns `true` for the synthetic home-directory record.
    #[must_use]
    pub fn is_home_sentinel(&self) -> bool {
        self.count == HOME_SENTINEL_COUNT && self.name == HOME_SENTINEL_NAME && self.location.is_empty()
    }

    /// Adds `by` to the count, saturating below the sentinel count.
    pub fn bump(&mut self, by: u64) {
        self.count = self.count.saturating_add(by).min(MAX_RECORD_COUNT);
    }

    /// Serializes the record as one history line, without the trailing newline.
    ///
    /// ```
    /// use pd::storage::LogRecord;
    ///
    /// let record = LogRecord {
    ///     count: 3,
    ///     absolute_path: "/home/u/projA".into(),
    ///     name: "projA".into(),
    ///     location: String::new(),
    /// };
    /// assert_eq!(record.to_line(), "3,/home/u/projA,projA,");
    /// ```
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{}",
            self.count, self.absolute_path, self.name, self.location
        )
    }

    /// Parses one history line.
    ///
    /// The line is split into at most four fields, so any extra commas end up in
    /// `location`.
    ///
    /// # Errors
    ///
    /// Returns a [`LineError`] describing why the line is unusable.
    pub fn parse_line(line: &str) -> Result<Self, LineError> {
        let fields: Vec<&str> = line.splitn(4, ',').collect();
        if fields.len() < 4 {
            return Err(LineError::MissingFields(fields.len()));
        }

        let count = fields[0]
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|c| *c > 0)
            .ok_or_else(|| LineError::BadCount(fields[0].to_string()))?;

        if !fields[1].starts_with('/') {
            return Err(LineError::RelativePath(fields[1].to_string()));
        }

        Ok(Self {
            count: count.min(MAX_RECORD_COUNT),
            absolute_path: fields[1].to_string(),
            name: fields[2].to_string(),
            location: fields[3].to_string(),
        })
    }
}
