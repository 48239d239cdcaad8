//! Storage layer for the directory history.
//!
//! The history is a flat set of [`LogRecord`]s keyed by absolute path. This
//! module owns the on-disk line format, the merge rules applied when new
//! observations arrive, and the ranking that orders records both on disk and
//! in the selector.
//!
//! # Modules
//!
//! - `models`: the record type and its line codec
//! - `ranking`: the single comparator used for every ordering
//! - `merge`: pure reconciliation and visit rules
//! - `backend`: the `Storage` trait
//! - `history`: the newline-delimited file backend

pub mod backend;
pub mod history;
pub mod merge;
pub mod models;
pub mod ranking;

pub use backend::Storage;
pub use history::HistoryFile;
pub use merge::RecordMap;
pub use models::LogRecord;
pub use ranking::{compare, ranked_with_home, sort_records};
