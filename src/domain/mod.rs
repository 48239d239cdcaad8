//! Domain layer: error taxonomy and the path/label codec.
//!
//! Nothing in here spawns processes or reads configuration. The codec is
//! constructed with an explicit home directory so it can be exercised with any
//! injected path.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`label`]: Records and labels built from absolute paths, and decoding back
//! - [`index`]: Per-invocation label to path lookup
//!
//! # Examples
//!
//! ```
//! use pd::domain::{LabelCodec, Result};
//! use std::path::PathBuf;
//!
//! fn jump_target(label: &str) -> Result<PathBuf> {
//!     LabelCodec::new("/home/u").decode(label)
//! }
//!
//! assert_eq!(jump_target("pd ~/src").unwrap(), PathBuf::from("/home/u/src/pd"));
//! ```

pub mod error;
pub mod index;
pub mod label;

pub use error::{PdError, Result};
pub use index::LabelIndex;
pub use label::LabelCodec;
