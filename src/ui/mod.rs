//! Presentation helpers for selector labels.
//!
//! `pd` draws no UI of its own; the fuzzy finder does. This module only paints
//! labels before they are handed over and strips the paint again when a
//! selection comes back.

pub mod helpers;
pub mod theme;

pub use helpers::strip_ansi;
pub use theme::Theme;
