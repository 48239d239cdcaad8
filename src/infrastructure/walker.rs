//! Home directory scan for project roots.
//!
//! The walk yields every directory that passes [`ProjectMarkers::is_project`]
//! and does not descend into it, so nested projects are only recorded when
//! visited explicitly. Dot-prefixed directories and configured skip paths are
//! pruned without being entered. The walk root itself is never yielded and is
//! never pruned.

use super::detector::ProjectMarkers;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Settings for a project scan.
#[derive(Debug, Clone)]
pub struct Discovery<'a> {
    /// Directory the walk starts from (normally home).
    pub root: &'a Path,
    /// Absolute paths that are pruned along with everything below them.
    pub skip_dirs: &'a [PathBuf],
    /// Markers that identify a project root.
    pub markers: &'a ProjectMarkers,
    /// Maximum depth below `root`; `None` walks everything.
    pub max_depth: Option<usize>,
}

impl Discovery<'_> {
    /// Walks the tree and returns project roots in walk order.
    ///
    /// Unreadable entries are skipped. Symlinks are not followed.
    #[must_use]
    pub fn collect(&self) -> Vec<PathBuf> {
        let _span = tracing::debug_span!("discover_projects", root = %self.root.display()).entered();

        let skip: HashSet<&Path> = self.skip_dirs.iter().map(PathBuf::as_path).collect();
        let mut walk = WalkDir::new(self.root).follow_links(false);
        if let Some(depth) = self.max_depth {
            walk = walk.max_depth(depth);
        }

        let mut found = Vec::new();
        let mut entries = walk.into_iter();
        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::trace!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if entry.depth() == 0 || !entry.file_type().is_dir() {
                continue;
            }

            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if hidden || skip.contains(entry.path()) {
                entries.skip_current_dir();
                continue;
            }

            if self.markers.is_project(entry.path()) {
                tracing::trace!(path = %entry.path().display(), "found project");
                found.push(entry.into_path());
                entries.skip_current_dir();
            }
        }

        tracing::debug!(project_count = found.len(), "discovery finished");
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn project(root: &Path, rel: &str) {
        fs::create_dir_all(root.join(rel).join(".git")).unwrap();
    }

    fn discover(root: &Path, skip: &[PathBuf]) -> Vec<PathBuf> {
        let markers = ProjectMarkers::default();
        let mut found = Discovery {
            root,
            skip_dirs: skip,
            markers: &markers,
            max_depth: None,
        }
        .collect();
        found.sort();
        found
    }

    #[test]
    fn finds_projects_without_descending_into_them() {
        let home = TempDir::new().unwrap();
        project(home.path(), "projA");
        project(home.path(), "src/github/pd");
        project(home.path(), "projA/vendor/nested");
        fs::create_dir_all(home.path().join("Documents/notes")).unwrap();

        assert_eq!(
            discover(home.path(), &[]),
            vec![home.path().join("projA"), home.path().join("src/github/pd")]
        );
    }

    #[test]
    fn prunes_dot_directories_and_skip_paths() {
        let home = TempDir::new().unwrap();
        project(home.path(), ".config/nvim");
        project(home.path(), "Library/thing");
        project(home.path(), "code/kept");

        let skip = vec![home.path().join("Library")];
        assert_eq!(discover(home.path(), &skip), vec![home.path().join("code/kept")]);
    }

    #[test]
    fn root_is_never_a_result() {
        let home = TempDir::new().unwrap();
        fs::create_dir(home.path().join(".git")).unwrap();
        project(home.path(), "projB");

        assert_eq!(discover(home.path(), &[]), vec![home.path().join("projB")]);
    }

    #[test]
    fn max_depth_limits_the_walk() {
        let home = TempDir::new().unwrap();
        project(home.path(), "a/b/c/deep");
        project(home.path(), "shallow");
        let markers = ProjectMarkers::default();

        let found = Discovery {
            root: home.path(),
            skip_dirs: &[],
            markers: &markers,
            max_depth: Some(2),
        }
        .collect();
        assert_eq!(found, vec![home.path().join("shallow")]);
    }
}
