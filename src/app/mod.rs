//! Application layer: one command in, one outcome out.
//!
//! This module sits between the binary (argument parsing and printing) and
//! the domain, storage, and infrastructure layers. It holds no state between
//! invocations.
//!
//! # Architecture
//!
//! ```text
//! CLI args → Command → handle_command(&mut App) → Outcome → stdout / stderr
//!                              │
//!                 Storage · Selector · Walker · Listing
//! ```
//!
//! # Modules
//!
//! - [`actions`]: The [`Outcome`] of a command and how it is printed
//! - [`handler`]: [`Command`] dispatch and the individual flows
//! - [`state`]: The [`App`] context carrying config and collaborators

pub mod actions;
pub mod handler;
pub mod state;

pub use actions::Outcome;
pub use handler::{handle_command, Command};
pub use state::{App, Menu};
