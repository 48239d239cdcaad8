//! Command context: configuration plus the collaborators commands run against.
//!
//! [`App`] is constructed once per invocation. It owns nothing persistent; the
//! history backend re-reads its file for every operation.

use crate::domain::error::{PdError, Result};
use crate::domain::{LabelCodec, LabelIndex};
use crate::infrastructure::{Discovery, FzfSelector, ListingTool, Selector};
use crate::storage::{ranked_with_home, HistoryFile, LogRecord, Storage};
use crate::Config;
use std::path::PathBuf;

/// Everything a command needs, passed explicitly.
pub struct App {
    pub(crate) config: Config,
    pub(crate) codec: LabelCodec,
    pub(crate) storage: Box<dyn Storage>,
    pub(crate) selector: Box<dyn Selector>,
    pub(crate) listing: Vec<ListingTool>,
}

/// Labels for one selector run, in rank order, plus the index that maps each
/// back to its path.
#[derive(Debug, Default)]
pub struct Menu {
    pub labels: Vec<String>,
    pub index: LabelIndex,
}

impl App {
    /// Creates a context with explicit collaborators.
    pub fn new(config: Config, storage: Box<dyn Storage>, selector: Box<dyn Selector>) -> Self {
        let codec = LabelCodec::new(&config.home);
        Self {
            config,
            codec,
            storage,
            selector,
            listing: ListingTool::default_chain(),
        }
    }

    /// Creates the production context: the configured history file and an
    /// fzf-compatible finder whose preview calls back into this executable.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let storage = HistoryFile::new(&config.history_file);

        let mut selector = FzfSelector::new(&config.finder);
        match std::env::current_exe() {
            Ok(exe) => selector = selector.with_preview(FzfSelector::preview_for_exe(&exe)),
            Err(e) => tracing::warn!(error = %e, "cannot locate own executable, preview disabled"),
        }

        Self::new(config, Box::new(storage), Box::new(selector))
    }

    /// Replaces the preview listing chain.
    #[must_use]
    pub fn with_listing(mut self, listing: Vec<ListingTool>) -> Self {
        self.listing = listing;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn codec(&self) -> &LabelCodec {
        &self.codec
    }

    /// Walks home for project roots using the configured markers and skips.
    #[must_use]
    pub fn discover(&self) -> Vec<String> {
        let discovery = Discovery {
            root: &self.config.home,
            skip_dirs: &self.config.skip_dirs,
            markers: &self.config.markers,
            max_depth: self.config.max_depth,
        };
        discovery
            .collect()
            .into_iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect()
    }

    /// All persisted records in rank order, led by the home sentinel.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read.
    pub fn ranked(&self) -> Result<Vec<LogRecord>> {
        let records = self.storage.read_all()?;
        Ok(ranked_with_home(self.codec.home_record(), records.into_values()))
    }

    /// Builds styled labels and their index from ranked records.
    #[must_use]
    pub fn menu(&self, ranked: &[LogRecord]) -> Menu {
        let mut menu = Menu::default();
        for record in ranked {
            let (name, location) = self.codec.label_parts(record);
            let label = self.config.colors.paint_label(&name, &location);
            menu.index.insert(&label, &record.absolute_path);
            menu.labels.push(label);
        }
        menu
    }

    /// The directory the shell is already in, printed when nothing is chosen.
    ///
    /// # Errors
    ///
    /// Returns [`PdError::Resolution`] if the working directory cannot be read.
    pub fn current_dir(&self) -> Result<PathBuf> {
        std::env::current_dir().map_err(|source| PdError::Resolution {
            path: PathBuf::from("."),
            source,
        })
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("listing", &self.listing)
            .finish_non_exhaustive()
    }
}
