//! Lookup from the text a selector returns to the path it stands for.
//!
//! Built fresh for every selection from the exact labels handed to the
//! selector, so two projects whose labels would parse identically never get
//! confused within one invocation.

use crate::ui::strip_ansi;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Plain label text to absolute path.
#[derive(Debug, Default, Clone)]
pub struct LabelIndex {
    paths: HashMap<String, PathBuf>,
}

impl LabelIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label, which may carry ANSI styling.
    ///
    /// Keys are stored unstyled and trimmed, matching what the selector prints.
    /// When two labels render the same text the first one inserted keeps the
    /// key; callers insert in rank order, so the higher ranked record wins.
    pub fn insert(&mut self, label: &str, path: impl Into<PathBuf>) {
        let key = strip_ansi(label).trim().to_string();
        if let Some(existing) = self.paths.get(&key) {
            tracing::debug!(label = %key, kept = %existing.display(), "duplicate label");
            return;
        }
        self.paths.insert(key, path.into());
    }

    /// Path for a selection, if it was one of the indexed labels.
    #[must_use]
    pub fn resolve(&self, selection: &str) -> Option<&Path> {
        self.paths
            .get(strip_ansi(selection).trim())
            .map(PathBuf::as_path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
