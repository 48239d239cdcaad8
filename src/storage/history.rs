//! Newline-delimited history file backend.
//!
//! One record per line, `count,absolute_path,name,location`, no header and no
//! escaping. The whole file is read on every command and rewritten in rank
//! order on every change.
//!
//! Writes go to a sibling `*.tmp` file that is renamed over the history file
//! once complete, so a crash mid-write leaves the previous contents in place.

use crate::domain::error::{PdError, Result};
use crate::domain::LabelCodec;
use crate::storage::backend::{prepare_for_write, Storage};
use crate::storage::merge::{accumulate, RecordMap};
use crate::storage::models::LogRecord;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// History file on disk.
///
/// Holds no records in memory between calls: every [`Storage::read_all`]
/// re-reads the file.
///
/// # Examples
///
/// ```no_run
/// use pd::storage::{HistoryFile, Storage};
///
/// let history = HistoryFile::new("/home/u/.config/pd/history");
/// let records = history.read_all()?;
/// println!("{} known directories", records.len());
/// # Ok::<(), pd::domain::PdError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    /// Creates a backend for the file at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the history file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, contents: &str) -> RecordMap {
        let mut records = RecordMap::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match LogRecord::parse_line(line) {
                Ok(record) => accumulate(&mut records, record),
                Err(reason) => tracing::warn!(
                    file = %self.path.display(),
                    line = index + 1,
                    %reason,
                    "skipping malformed history line"
                ),
            }
        }
        records
    }

    fn write_atomically(&self, records: &[LogRecord]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("tmp");
        tracing::trace!(tmp_path = %tmp_path.display(), "writing to temporary file");

        let mut file = io::BufWriter::new(fs::File::create(&tmp_path)?);
        for record in records {
            writeln!(file, "{}", record.to_line())?;
        }
        file.into_inner().map_err(io::IntoInnerError::into_error)?.sync_all()?;

        tracing::trace!("renaming temporary file to final location");
        fs::rename(&tmp_path, &self.path)
    }
}

impl Storage for HistoryFile {
    fn is_initialized(&self) -> bool {
        self.path.is_file()
    }

    fn read_all(&self) -> Result<RecordMap> {
        let _span = tracing::debug_span!("history_read_all", file = %self.path.display()).entered();

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("history file does not exist yet");
                return Ok(RecordMap::new());
            }
            Err(e) => return Err(PdError::history(&self.path, e)),
        };

        let records = self.parse(&contents);
        tracing::debug!(count = records.len(), "loaded history");
        Ok(records)
    }

    fn write_all(&mut self, codec: &LabelCodec, records: Vec<LogRecord>) -> Result<usize> {
        let _span = tracing::debug_span!("history_write_all",
            file = %self.path.display(),
            input = records.len()
        )
        .entered();

        let records = prepare_for_write(codec, records);
        self.write_atomically(&records)
            .map_err(|e| PdError::history(&self.path, e))?;

        tracing::debug!(written = records.len(), "history saved");
        Ok(records.len())
    }
}
