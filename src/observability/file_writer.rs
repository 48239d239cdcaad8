//! Rotating file writer with size-based rotation and backup retention.
//!
//! Diagnostics must never reach stdout (the shell wrapper reads it), so the
//! subscriber writes here instead. The file is rotated once it grows past a
//! size threshold and only a fixed number of backups are kept.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Maximum file size before rotation (5 MiB).
const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// # Rotation Strategy
///
/// 1. Check file size before each write
/// 2. If size > limit, rotate:
///    - Rename current file to `<name>.<unix_timestamp>`
///    - Open a new empty file
///    - Remove the oldest backups beyond the retention count
///
/// `&FileWriter` implements [`io::Write`], so an `Arc<FileWriter>` can be
/// handed straight to `tracing_subscriber::fmt::layer().with_writer(..)`.
pub struct FileWriter {
    /// Path to the primary log file.
    file_path: PathBuf,
    max_bytes: u64,
    keep: usize,
    /// Lazily opened on first write.
    writer: Mutex<Option<fs::File>>,
}

impl FileWriter {
    /// Creates a writer for `file_path` with the default limits.
    ///
    /// The file is not opened until the first write, so construction cannot
    /// fail.
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    /// Creates a writer rotating at `max_bytes` and keeping `keep` backups.
    pub const fn with_limits(file_path: PathBuf, max_bytes: u64, keep: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            keep,
            writer: Mutex::new(None),
        }
    }

    /// Appends `buf` to the file, rotating first if it has grown too large.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be rotated, opened, or written, or if the lock
    /// was poisoned by a panicking writer.
    pub fn append(&self, buf: &[u8]) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;

        self.check_and_rotate(&mut writer)?;

        if writer.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *writer = Some(file);
        }

        let file = writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No file available"))?;

        file.write_all(buf)?;
        file.flush()
    }

    fn check_and_rotate(&self, writer: &mut Option<fs::File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *writer = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    /// Renames the current file to `<name>.<unix_timestamp>` and prunes old
    /// backups.
    fn rotate_files(&self) -> io::Result<()> {
        let timestamp = chrono::Utc::now().timestamp();
        let backup_path = backup_path(&self.file_path, timestamp);

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup_path)?;
        }

        self.cleanup_old_backups()
    }

    /// Removes backups beyond the retention limit, oldest first.
    ///
    /// Individual deletion failures are ignored.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = match self.file_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let Some(file_name) = self.file_path.file_name().and_then(|s| s.to_str()) else {
            return Err(io::Error::new(io::ErrorKind::Other, "Invalid file name"));
        };
        let prefix = format!("{file_name}.");

        let mut backups: Vec<(i64, PathBuf)> = fs::read_dir(parent_dir)?
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name();
                let stamp = name.to_str()?.strip_prefix(&prefix)?.parse::<i64>().ok()?;
                Some((stamp, entry.path()))
            })
            .collect();

        backups.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, old_backup) in backups.iter().skip(self.keep) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }
}

fn backup_path(file_path: &Path, timestamp: i64) -> PathBuf {
    let mut name = file_path.as_os_str().to_os_string();
    name.push(format!(".{timestamp}"));
    PathBuf::from(name)
}

impl Write for &FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}
