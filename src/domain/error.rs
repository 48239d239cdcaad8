//! Error types for `pd`.
//!
//! This module defines the centralized error type [`PdError`] and a type alias
//! [`Result`] used throughout the crate. Errors are implemented with the
//! `thiserror` crate.
//!
//! Only some of these are fatal. A [`PdError::Decode`] raised while handling an
//! interactive selection is absorbed by the command layer and turned into the
//! "stay where you are" fallback; everything else propagates to `main`, which
//! prints it and exits nonzero.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for `pd` operations.
///
/// # Examples
///
/// ```
/// use pd::PdError;
///
/// fn decode(label: &str) -> Result<(), PdError> {
///     Err(PdError::Decode(format!("no location separator in {label:?}")))
/// }
///
/// assert!(decode("projA").unwrap_err().to_string().contains("projA"));
/// ```
#[derive(Debug, Error)]
pub enum PdError {
    /// A user-supplied path could not be made absolute.
    ///
    /// Raised when a syscall needed for resolution fails (reading the current
    /// directory, resolving symlinks on an existing path, and so on).
    #[error("cannot resolve {path}: {source}")]
    Resolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Opening, reading, or writing the history log failed.
    #[error("history file {path}: {source}")]
    History {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A selected label could not be mapped back to an absolute path.
    #[error("cannot decode label: {0}")]
    Decode(String),

    /// The configuration file is unreadable or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The interactive selector could not be run.
    #[error("Selector error: {0}")]
    Selector(String),
}

impl PdError {
    /// Wraps an I/O error raised while touching the history log at `path`.
    pub fn history(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::History {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors the interactive flows treat as "no usable selection".
    #[must_use]
    pub const fn is_soft(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// A specialized `Result` type for `pd` operations.
pub type Result<T> = std::result::Result<T, PdError>;
