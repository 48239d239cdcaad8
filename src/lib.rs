//! pd: a project directory bookmarker with fuzzy navigation.
//!
//! `pd` scans the home directory for project roots, keeps a ranked history of
//! the directories you visit, and prints the one you pick so a shell wrapper
//! can `cd` into it:
//!
//! ```sh
//! pd() { cd "$(command pd "$@")" || return; }
//! ```
//!
//! - Project discovery by version-control or marker files
//! - A plain-text history ranked by visit count
//! - Fuzzy selection through `fzf`, with a directory listing preview
//! - Direct jumps to paths, which are recorded as visits

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Binary (main.rs, cli.rs)                           │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Command dispatch
//! │  - Select / jump / query                            │
//! │  - Refresh / sync / list / preview                  │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Infrastructure│
//! │ (ui/)         │   │ (storage/)    │   │ - Paths       │
//! │ - Label colors│   │ - History file│   │ - Walker      │
//! │ - ANSI strip  │   │ - Merge rules │   │ - fzf         │
//! │               │   │ - Ranking     │   │ - Listings    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/)                                   │
//! │  - Error types                                      │
//! │  - Label codec and index                            │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing subscriber writing to a rotated file     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Command handling on top of an explicit [`app::App`] context
//! - [`domain`]: Errors, the label codec, and the label index
//! - [`infrastructure`]: Paths, project detection, walking, external programs
//! - [`storage`]: History records, merge rules, ranking, the file backend
//! - [`ui`]: Label styling
//! - `observability`: tracing setup (internal)
//!
//! # Configuration
//!
//! Read from `~/.config/pd/config.toml` (or `--config`, or `PD_CONFIG`).
//! Every key is optional:
//!
//! ```toml
//! home = "/home/me"
//! history_file = "~/.config/pd/history"
//! skip_dirs = ["~/Library", "~/go/pkg"]
//! vcs_markers = [".git", ".hg"]
//! marker_files = [".projectile"]
//! max_depth = 6
//! finder = "fzf"
//! log_level = "debug"
//! log_file = "~/.local/share/pd/pd.log"
//!
//! [colors]
//! name = "#89b4fa"
//! location = "#6c7086"
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use pd::app::{handle_command, App, Command};
//! use pd::Config;
//!
//! let config = Config::load(None)?;
//! let mut app = App::from_config(config);
//! let outcome = handle_command(&mut app, &Command::Refresh)?;
//! eprintln!("{}", outcome.summary().unwrap_or_default());
//! # Ok::<(), pd::PdError>(())
//! ```

pub mod app;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod storage;

pub mod ui;

pub mod observability;

pub use app::{handle_command, App, Command, Outcome};
pub use domain::{LabelCodec, PdError, Result};
pub use ui::Theme;

use infrastructure::{paths, ProjectMarkers};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternative configuration file.
pub const CONFIG_ENV: &str = "PD_CONFIG";

/// Fully resolved configuration.
///
/// Built once at startup and handed to everything that needs it. Path values
/// are absolute, with `~` already expanded against [`Config::home`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory treated as home: the walk root and the base of `~` labels.
    pub home: PathBuf,

    /// History log location.
    pub history_file: PathBuf,

    /// Directories pruned from discovery, with everything below them.
    ///
    /// Default: `["~/Library"]`
    pub skip_dirs: Vec<PathBuf>,

    /// Markers identifying project roots.
    pub markers: ProjectMarkers,

    /// Maximum walk depth below home. Default: unlimited.
    pub max_depth: Option<usize>,

    /// Program used for interactive selection. Default: `"fzf"`
    pub finder: String,

    /// Label colors.
    pub colors: Theme,

    /// Tracing filter directive (`PD_LOG` takes precedence). Default: `warn`
    pub log_level: Option<String>,

    /// Diagnostic log location. Default: `<data_dir>/pd/pd.log`
    pub log_file: Option<PathBuf>,
}

/// On-disk shape of `config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    home: Option<String>,
    history_file: Option<String>,
    skip_dirs: Option<Vec<String>>,
    vcs_markers: Option<Vec<String>>,
    marker_files: Option<Vec<String>>,
    max_depth: Option<usize>,
    finder: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    colors: Theme,
}

impl Config {
    /// Loads configuration from `path`, or from the default location when
    /// `path` is `None`.
    ///
    /// A file that does not exist yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PdError::Config`] if the file cannot be read or is not valid
    /// TOML for this schema, or if no home directory can be determined.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(file) = path.map(Path::to_path_buf).or_else(paths::default_config_file) else {
            tracing::debug!("no config directory on this platform, using defaults");
            return Self::from_toml_str("");
        };

        let _span = tracing::debug_span!("load_config", file = %file.display()).entered();

        match std::fs::read_to_string(&file) {
            Ok(text) => Self::from_toml_str(&text).map_err(|e| match e {
                PdError::Config(msg) => PdError::Config(format!("{}: {msg}", file.display())),
                other => other,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("config file not found, using defaults");
                Self::from_toml_str("")
            }
            Err(e) => Err(PdError::Config(format!("cannot read {}: {e}", file.display()))),
        }
    }

    /// Parses configuration from TOML text and fills in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PdError::Config`] for invalid TOML or unknown keys, or if
    /// `home` is not set and cannot be determined.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pd::Config;
    /// use std::path::PathBuf;
    ///
    /// let config = Config::from_toml_str(r#"
    ///     home = "/home/u"
    ///     skip_dirs = ["~/Library/", "/mnt"]
    /// "#)?;
    /// assert_eq!(config.skip_dirs, vec![PathBuf::from("/home/u/Library"), PathBuf::from("/mnt")]);
    /// assert_eq!(config.finder, "fzf");
    /// # Ok::<(), pd::PdError>(())
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text).map_err(|e| PdError::Config(e.to_string()))?;
        Self::resolve(raw)
    }

    fn resolve(raw: RawConfig) -> Result<Self> {
        let home = match raw.home.as_deref() {
            Some(home) if home.starts_with('~') => paths::expand_tilde(home, &paths::home_dir()?),
            Some(home) => PathBuf::from(home),
            None => paths::home_dir()?,
        };
        // Canonical, like every jump target.
        let home = paths::normalize(&home);
        let home = paths::resolve_symlinks(&home).unwrap_or(home);
        let expand = |value: &str| paths::normalize(&paths::expand_tilde(value.trim_end_matches('/'), &home));

        let history_file = raw
            .history_file
            .as_deref()
            .map(expand)
            .or_else(paths::default_history_file)
            .unwrap_or_else(|| home.join(".pd_history"));

        let skip_dirs = raw
            .skip_dirs
            .unwrap_or_else(|| vec!["~/Library".to_string()])
            .iter()
            .filter(|dir| !dir.trim().is_empty())
            .map(|dir| expand(dir.as_str()))
            .collect();

        let defaults = ProjectMarkers::default();
        let markers = ProjectMarkers {
            vcs_dirs: raw.vcs_markers.unwrap_or(defaults.vcs_dirs),
            marker_files: raw.marker_files.unwrap_or(defaults.marker_files),
        };

        Ok(Self {
            history_file,
            skip_dirs,
            markers,
            max_depth: raw.max_depth,
            finder: raw.finder.unwrap_or_else(|| "fzf".to_string()),
            colors: raw.colors,
            log_level: raw.log_level,
            log_file: raw.log_file.as_deref().map(expand),
            home,
        })
    }

    /// Replaces the history file location (the `--history` flag).
    #[must_use]
    pub fn with_history_file(mut self, path: &str) -> Self {
        self.history_file = paths::normalize(&paths::expand_tilde(path, &self.home));
        self
    }
}
