//! Database drivers behind one small blocking interface.
//!
//! The adapter and the migration runner only ever bind text parameters and
//! read back booleans, strings or integers, so [`SqlDriver`] is limited to
//! exactly that. Each backend kind maps to one driver:
//!
//! - **`sqlite`**: embedded SQLite through rusqlite
//! - **`hrana`**: remote libSQL servers over HTTP (Hrana v2 pipeline)
//! - **`mysql`**: MySQL-compatible servers (cargo feature `mysql`)

mod hrana;
#[cfg(feature = "mysql")]
mod mysql;
mod sqlite;

use thiserror::Error;

use crate::dialect::Dialect;

pub use hrana::HranaDriver;
#[cfg(feature = "mysql")]
pub use self::mysql::{MySqlDriver, MySqlOptions};
pub use sqlite::SqliteDriver;

/// A SQL statement with positional text parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text with `?` placeholders.
    pub sql: String,
    /// One value per placeholder, in order.
    pub args: Vec<String>,
}

impl Statement {
    /// Creates a statement with parameters.
    pub fn new(sql: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    /// Creates a statement without parameters.
    pub fn bare(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }
}

/// Errors raised by a driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Embedded SQLite failure.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// HTTP transport failure talking to a libSQL server.
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed JSON from a libSQL server.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// The libSQL server rejected a statement.
    #[error("libsql: {0}")]
    Remote(String),

    /// MySQL failure.
    #[cfg(feature = "mysql")]
    #[error("mysql: {0}")]
    MySql(#[from] ::mysql::Error),

    /// A result row had an unexpected shape.
    #[error("unexpected result: {0}")]
    Decode(String),
}

/// Convenience alias for driver results.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Minimal blocking access to one database connection.
///
/// Implementations own their connection exclusively; dropping the driver
/// releases it.
pub trait SqlDriver {
    /// Dialect of the SQL this driver accepts.
    fn dialect(&self) -> Dialect;

    /// Runs a query whose first column of the first row is a 0/1 flag.
    fn query_exists(&mut self, stmt: &Statement) -> DriverResult<bool>;

    /// Runs a query and returns the first column of every row as text.
    fn query_strings(&mut self, stmt: &Statement) -> DriverResult<Vec<String>>;

    /// Runs a query and returns the first column of every row as an integer.
    fn query_integers(&mut self, stmt: &Statement) -> DriverResult<Vec<i64>>;

    /// Executes statements in order inside one transaction.
    ///
    /// Either every statement takes effect or none does. Returns the total
    /// number of affected rows.
    fn execute(&mut self, stmts: &[Statement]) -> DriverResult<u64>;
}

impl<D: SqlDriver + ?Sized> SqlDriver for Box<D> {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn query_exists(&mut self, stmt: &Statement) -> DriverResult<bool> {
        (**self).query_exists(stmt)
    }

    fn query_strings(&mut self, stmt: &Statement) -> DriverResult<Vec<String>> {
        (**self).query_strings(stmt)
    }

    fn query_integers(&mut self, stmt: &Statement) -> DriverResult<Vec<i64>> {
        (**self).query_integers(stmt)
    }

    fn execute(&mut self, stmts: &[Statement]) -> DriverResult<u64> {
        (**self).execute(stmts)
    }
}
