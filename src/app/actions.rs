//! What a command produced, for the binary to print.
//!
//! stdout is reserved for output the shell wrapper consumes (a path to `cd`
//! into, or a listing the user asked for). Human-facing summaries go to stderr
//! so they never end up as a `cd` argument.

use std::path::PathBuf;

/// Result of handling one [`Command`](super::Command).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A directory was chosen; the shell should change into it.
    Jump(PathBuf),

    /// Nothing usable was chosen; the shell stays in this directory.
    Stay(PathBuf),

    /// A directory stack reference (`-`, `+2`) passed back for `cd` itself.
    Echo(String),

    /// Preview pane contents.
    Preview(String),

    /// Ranked labels or serialized records, one per line.
    Listing(Vec<String>),

    /// A discovery pass was folded into the history.
    Refreshed {
        /// Project roots found by the walk.
        discovered: usize,
        /// Records now in the history.
        written: usize,
    },

    /// The history was re-ranked without discovery.
    Synced {
        /// Records now in the history.
        written: usize,
    },
}

impl Outcome {
    /// Text for stdout, if any.
    #[must_use]
    pub fn stdout(&self) -> Option<String> {
        match self {
            Self::Jump(path) | Self::Stay(path) => Some(path.display().to_string()),
            Self::Echo(text) => Some(text.clone()),
            Self::Preview(text) => Some(text.trim_end_matches('\n').to_string()),
            Self::Listing(lines) if lines.is_empty() => None,
            Self::Listing(lines) => Some(lines.join("\n")),
            Self::Refreshed { .. } | Self::Synced { .. } => None,
        }
    }

    /// One-line human summary for stderr, if any.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        match self {
            Self::Refreshed { discovered, written } => Some(format!(
                "pd: found {discovered} projects, {written} directories in history"
            )),
            Self::Synced { written } => Some(format!("pd: {written} directories in history")),
            _ => None,
        }
    }
}
