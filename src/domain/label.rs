//! Conversion between absolute paths, history records, and selector labels.
//!
//! A label is what the user sees in the fuzzy finder: the project name, a
//! space, and where the project lives.
//!
//! | path | name | location | label |
//! |---|---|---|---|
//! | `$HOME` | `~` | | `~` |
//! | `$HOME/projA` | `projA` | | `projA ~` |
//! | `$HOME/src/github/pd` | `pd` | `src/github` | `pd ~/src/github` |
//! | `/opt/tools/fzf` | `fzf` | `/opt/tools` | `fzf /opt/tools` |
//!
//! # Decoding is lossy
//!
//! [`LabelCodec::decode`] recovers a path by splitting the label on the first
//! `" ~"`, or failing that the first `" /"`. A project whose name itself
//! contains `" ~"` therefore splits in the wrong place. Such labels are
//! detected (the pieces fail validation) and rejected with
//! [`PdError::Decode`]; no attempt is made to guess. Within a single
//! invocation the selector flow avoids the problem entirely by looking
//! selections up in a label index, and only falls back to decoding for labels
//! arriving from another process (the preview command).

use crate::domain::error::{PdError, Result};
use crate::storage::models::{LogRecord, HOME_SENTINEL_COUNT, HOME_SENTINEL_NAME};
use std::path::{Path, PathBuf};

/// Separator introducing a home-relative location in a label.
const HOME_SEPARATOR: &str = " ~";

/// Separator introducing an absolute location in a label.
const ROOT_SEPARATOR: &str = " /";

/// Builds records and labels relative to one home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCodec {
    home: PathBuf,
    home_str: String,
}

impl LabelCodec {
    /// Creates a codec for `home`.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let home_str = home.to_string_lossy().trim_end_matches('/').to_string();
        Self { home, home_str }
    }

    /// The home directory this codec is relative to.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Returns `true` if `path` is the home directory.
    #[must_use]
    pub fn is_home(&self, path: &str) -> bool {
        path.trim_end_matches('/') == self.home_str
    }

    /// The synthetic always-first record standing for the home directory.
    #[must_use]
    pub fn home_record(&self) -> LogRecord {
        LogRecord {
            count: HOME_SENTINEL_COUNT,
            absolute_path: self.home.to_string_lossy().into_owned(),
            name: HOME_SENTINEL_NAME.to_string(),
            location: String::new(),
        }
    }

    /// Builds a fresh record (count 1) for an absolute path.
    ///
    /// The home directory itself yields [`home_record`](Self::home_record).
    ///
    /// ```
    /// use pd::domain::LabelCodec;
    ///
    /// let codec = LabelCodec::new("/home/u");
    /// let record = codec.build_record("/home/u/src/github/pd");
    /// assert_eq!((record.count, record.name.as_str(), record.location.as_str()), (1, "pd", "src/github"));
    ///
    /// let outside = codec.build_record("/opt/tools/fzf");
    /// assert_eq!(outside.location, "/opt/tools");
    /// ```
    #[must_use]
    pub fn build_record(&self, absolute_path: &str) -> LogRecord {
        if self.is_home(absolute_path) {
            return self.home_record();
        }

        let trimmed = match absolute_path.trim_end_matches('/') {
            "" => "/",
            path => path,
        };

        let home_prefix = format!("{}/", self.home_str);
        let (location, name) = if let Some(relative) = trimmed.strip_prefix(&home_prefix) {
            relative.rsplit_once('/').unwrap_or(("", relative))
        } else {
            match trimmed.rsplit_once('/') {
                Some(("", "")) => ("", "/"),
                Some(("", name)) => ("/", name),
                Some((parent, name)) => (parent, name),
                None => ("", trimmed),
            }
        };

        LogRecord {
            count: 1,
            absolute_path: trimmed.to_string(),
            name: name.to_string(),
            location: location.to_string(),
        }
    }

    /// Splits a record into the two halves of its label: the name and the
    /// rendered location (`~`, `~/<location>`, or `/<location>`).
    ///
    /// The home sentinel has an empty location half.
    #[must_use]
    pub fn label_parts(&self, record: &LogRecord) -> (String, String) {
        let location = if record.is_home_sentinel() {
            String::new()
        } else if record.location.starts_with('/') {
            record.location.clone()
        } else if record.location.is_empty() {
            "~".to_string()
        } else {
            format!("~/{}", record.location)
        };
        (record.name.clone(), location)
    }

    /// Renders the plain (unstyled) label for a record.
    #[must_use]
    pub fn to_label(&self, record: &LogRecord) -> String {
        match self.label_parts(record) {
            (name, location) if location.is_empty() => name,
            (name, location) => format!("{name} {location}"),
        }
    }

    /// Recovers the absolute path a plain label was rendered from.
    ///
    /// # Errors
    ///
    /// Returns [`PdError::Decode`] if the label has no location separator, or
    /// if splitting it produces pieces that no record could have rendered
    /// (an empty name, a name containing `/`, or text between `~` and the
    /// location).
    pub fn decode(&self, label: &str) -> Result<PathBuf> {
        let label = label.trim();
        if label == HOME_SENTINEL_NAME {
            return Ok(self.home.clone());
        }

        if let Some((name, rest)) = label.split_once(HOME_SEPARATOR) {
            Self::check_name(label, name)?;
            if !(rest.is_empty() || rest.starts_with('/')) {
                return Err(PdError::Decode(format!(
                    "ambiguous label {label:?}: unexpected text after '~'"
                )));
            }
            let mut path = self.home.clone();
            let location = rest.trim_start_matches('/');
            if !location.is_empty() {
                path.push(location);
            }
            path.push(name);
            return Ok(path);
        }

        if let Some((name, rest)) = label.split_once(ROOT_SEPARATOR) {
            Self::check_name(label, name)?;
            return Ok(PathBuf::from(format!("/{rest}")).join(name));
        }

        Err(PdError::Decode(format!("no location in label {label:?}")))
    }

    fn check_name(label: &str, name: &str) -> Result<()> {
        if name.is_empty() || name.contains('/') {
            return Err(PdError::Decode(format!(
                "ambiguous label {label:?}: cannot isolate the project name"
            )));
        }
        Ok(())
    }
}
