//! Project root detection.

use super::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Marker names that make a directory a project root.
///
/// A directory is a project if any of `vcs_dirs` or `marker_files` exists
/// directly inside it. Nothing is searched recursively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMarkers {
    /// Version-control metadata directories (`.git`, `.hg`, ...).
    pub vcs_dirs: Vec<String>,

    /// Plain marker files (`.projectile`, ...).
    pub marker_files: Vec<String>,
}

impl Default for ProjectMarkers {
    fn default() -> Self {
        Self {
            vcs_dirs: [".git", ".hg", ".svn", ".bzr"].map(String::from).to_vec(),
            marker_files: vec![".projectile".to_string()],
        }
    }
}

impl ProjectMarkers {
    /// Returns `true` if `dir` contains any configured marker.
    ///
    /// Presence is checked with [`paths::exists`], so an unreadable marker
    /// counts as present.
    #[must_use]
    pub fn is_project(&self, dir: &Path) -> bool {
        self.vcs_dirs
            .iter()
            .chain(&self.marker_files)
            .any(|marker| paths::exists(&dir.join(marker)))
    }
}
