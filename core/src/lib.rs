//! Core contract and shared primitives for cool-lexicon.
//!
//! A lexicon is a flat set of unique words with no meaning attached. This
//! crate defines everything a storage backend and its callers agree on:
//!
//! - [`Lexicon`]: the batch-first contract (lookup, prefix search, suffix
//!   search, add, close).
//! - [`OperationResult`]: a per-item value paired with an optional failure,
//!   so one bad item never hides the items that succeeded.
//! - [`LexiconError`]: the error taxonomy shared by every crate.
//! - [`LexiconConfig`]: the JSON configuration model, its validation and
//!   the backend-specific connection targets.
//!
//! # Example
//!
//! ```
//! use cool_lexicon_core::{BackendKind, LexiconConfig};
//!
//! let config = LexiconConfig::from_json_str(
//!     r#"{"type": "mysql", "host": "localhost", "database": "lexicons",
//!         "username": "root", "password": "toor"}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.backend, BackendKind::MySql);
//! assert!(config.validate().is_ok());
//! assert_eq!(
//!     config.connection_target().unwrap(),
//!     "root:toor@tcp(localhost:3306)/lexicons"
//! );
//! ```

mod config;
mod error;
mod lexicon;
mod types;
mod validate;

pub use config::{BackendKind, LexiconConfig};
pub use error::{LexiconError, Result};
pub use lexicon::Lexicon;
pub use types::{LookupResults, MAX_WORD_LENGTH, OperationResult, SearchResults};
pub use validate::{validate_add_batch, validate_batch, validate_identifier};
