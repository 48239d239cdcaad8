//! Path resolution utilities.
//!
//! Everything here takes the home directory as an argument instead of looking it
//! up, so callers (and tests) decide what "home" means. The only lookups of the
//! real environment are [`home_dir`] and the `default_*` location helpers.

use crate::domain::error::{PdError, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Application directory name under the platform config and data directories.
const APP_DIR: &str = "pd";

/// Returns the current user's home directory.
///
/// # Errors
///
/// Returns [`PdError::Config`] if the platform cannot report a home directory.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| PdError::Config("cannot determine home directory".to_string()))
}

/// Default location of `config.toml` (`~/.config/pd/config.toml` on Linux).
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Default location of the history log (`~/.config/pd/history` on Linux).
#[must_use]
pub fn default_history_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("history"))
}

/// Default location of the diagnostic log (`~/.local/share/pd/pd.log` on Linux).
#[must_use]
pub fn default_log_file() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join("pd.log"))
}

/// Expands a leading `~` against `home` without touching the filesystem.
///
/// Only `~` and `~/...` are expanded; `~user` forms are left as they are.
///
/// ```
/// use pd::infrastructure::expand_tilde;
/// use std::path::{Path, PathBuf};
///
/// let home = Path::new("/home/u");
/// assert_eq!(expand_tilde("~/Library", home), PathBuf::from("/home/u/Library"));
/// assert_eq!(expand_tilde("~", home), PathBuf::from("/home/u"));
/// assert_eq!(expand_tilde("/opt", home), PathBuf::from("/opt"));
/// ```
#[must_use]
pub fn expand_tilde(input: &str, home: &Path) -> PathBuf {
    if input == "~" {
        home.to_path_buf()
    } else if let Some(rest) = input.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(input)
    }
}

/// Resolves user input to a clean absolute path.
///
/// - empty input resolves to `home`
/// - a leading `~` expands to `home`
/// - relative paths resolve against the current working directory
/// - `.` and `..` components are removed lexically
///
/// # Errors
///
/// Returns [`PdError::Resolution`] if the current working directory is needed
/// and cannot be read.
pub fn expand(input: &str, home: &Path) -> Result<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(home.to_path_buf());
    }

    let path = expand_tilde(input, home);
    if path.is_absolute() {
        return Ok(normalize(&path));
    }

    let cwd = std::env::current_dir().map_err(|source| PdError::Resolution {
        path: path.clone(),
        source,
    })?;
    Ok(normalize(&cwd.join(path)))
}

/// Removes `.` and `..` components without consulting the filesystem.
///
/// `..` at the root stays at the root.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(Component::RootDir.as_os_str());
    }
    out
}

/// Resolves symlinks in an absolute path that exists.
///
/// A path that does not exist is returned unchanged: jumping to a directory
/// that has not been created yet is allowed.
///
/// # Errors
///
/// Returns [`PdError::Resolution`] if the path exists but cannot be
/// canonicalized (for example, permission denied on an ancestor).
pub fn resolve_symlinks(path: &Path) -> Result<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(source) => Err(PdError::Resolution {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Returns the directory a jump to `path` should land in.
///
/// Files map to their parent directory. Directories, and paths that do not
/// exist, are returned unchanged.
#[must_use]
pub fn containing_directory(path: &Path) -> PathBuf {
    match std::fs::metadata(path) {
        Ok(meta) if !meta.is_dir() => path
            .parent()
            .map_or_else(|| path.to_path_buf(), Path::to_path_buf),
        _ => path.to_path_buf(),
    }
}

/// Reports whether anything exists at `path`.
///
/// Only a definitive "not found" yields `false`. Any other stat failure (such
/// as permission denied) counts as present, so records the user temporarily
/// cannot inspect are never pruned.
#[must_use]
pub fn exists(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(_) => true,
        Err(e) => e.kind() != ErrorKind::NotFound,
    }
}
