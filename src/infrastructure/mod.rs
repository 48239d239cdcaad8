//! Infrastructure layer for filesystem and process interactions.
//!
//! This module holds the pieces that touch the outside world: path resolution,
//! project detection, the home directory walk, and the external programs used
//! for selection (`fzf`) and previews (`exa`, `tree`, `ls`).

pub mod detector;
pub mod listing;
pub mod paths;
pub mod selector;
pub mod walker;

pub use detector::ProjectMarkers;
pub use listing::{preview, ListingTool};
pub use paths::{containing_directory, exists, expand, expand_tilde, resolve_symlinks};
pub use selector::{FzfSelector, Selector};
pub use walker::Discovery;
