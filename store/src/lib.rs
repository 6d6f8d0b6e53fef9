//! SQL storage for cool-lexicon.
//!
//! Implements the [`Lexicon`](cool_lexicon_core::Lexicon) contract on top of
//! a single `lexicon(word)` table:
//!
//! - [`SqlLexicon`]: the adapter, generic over a [`SqlDriver`].
//! - [`Migration`]: versioned, idempotent schema setup and collation checks.
//! - [`open`]: the factory turning a validated configuration into a boxed
//!   lexicon.
//!
//! # Backends
//!
//! | `type` | Driver | Dialect |
//! |---|---|---|
//! | `sqlite` | [`SqliteDriver`] (rusqlite) | SQLite |
//! | `libsql`, `libsql-token` | [`HranaDriver`] (HTTP) | SQLite |
//! | `mysql` | `MySqlDriver` (feature `mysql`) | MySQL |
//!
//! # Example
//!
//! ```
//! use cool_lexicon_core::{Lexicon, LexiconConfig};
//!
//! let config = LexiconConfig::from_json_str(r#"{"type": "sqlite", "host": ":memory:"}"#).unwrap();
//! let mut lexicon = cool_lexicon_store::open(&config, true).unwrap();
//!
//! let words: Vec<String> = ["नमस्ते", "नमस्कार", "सुंदर"].map(String::from).to_vec();
//! lexicon.add(&words).unwrap();
//!
//! let found = lexicon.get_all_words_starting_with(&["न".to_string()]).unwrap();
//! assert_eq!(found["न"].value, vec!["नमस्कार", "नमस्ते"]);
//! ```

mod dialect;
pub mod driver;
mod factory;
mod migration;
mod store;

pub use dialect::{Affix, Dialect, TABLE_NAME};
pub use driver::{DriverError, DriverResult, HranaDriver, SqlDriver, SqliteDriver, Statement};
#[cfg(feature = "mysql")]
pub use driver::{MySqlDriver, MySqlOptions};
pub use factory::open;
pub use migration::{Migration, MigrationReport, MigrationStatus, latest_version};
pub use store::{INSERT_CHUNK_SIZE, SqlLexicon};
