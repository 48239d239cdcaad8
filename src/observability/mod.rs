//! Diagnostic logging to a rotating file.
//!
//! stdout carries the directory the shell wrapper changes into, so log output
//! is written to a file instead:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer (no ANSI) → FileWriter → pd.log
//! ```
//!
//! # Configuration
//!
//! The filter is resolved from:
//! 1. `PD_LOG` environment variable (highest priority)
//! 2. `log_level` in `config.toml`
//! 3. Default: `"warn"`
//!
//! The file defaults to `pd.log` under the platform data directory
//! (`~/.local/share/pd/pd.log` on Linux) and rotates at 5 MiB, keeping three
//! backups.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::{init_tracing, LOG_ENV};
