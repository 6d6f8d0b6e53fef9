//! Embedded SQLite driver.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, params_from_iter};

use super::{DriverResult, SqlDriver, Statement};
use crate::dialect::Dialect;

/// SQLite database held in a file or in memory.
///
/// # Examples
///
/// ```
/// use cool_lexicon_store::{Migration, SqlLexicon, SqliteDriver};
/// use cool_lexicon_core::Lexicon;
///
/// let mut driver = SqliteDriver::open_in_memory().unwrap();
/// Migration::new(&mut driver).up().unwrap();
///
/// let mut lexicon = SqlLexicon::new(driver);
/// lexicon.add(&["मोक्ष".to_string()]).unwrap();
/// let found = lexicon.lookup(&["मोक्ष".to_string()]).unwrap();
/// assert!(found["मोक्ष"].value);
/// ```
pub struct SqliteDriver {
    conn: Connection,
}

impl SqliteDriver {
    /// Opens (creating if needed) a database file.
    ///
    /// `timeout` bounds how long a statement waits on a locked database.
    pub fn open(path: impl AsRef<Path>, timeout: Option<Duration>) -> DriverResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn, timeout)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> DriverResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, None)
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection, timeout: Option<Duration>) -> DriverResult<Self> {
        if let Some(timeout) = timeout {
            conn.busy_timeout(timeout)?;
        }
        Ok(Self { conn })
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the driver and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl SqlDriver for SqliteDriver {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn query_exists(&mut self, stmt: &Statement) -> DriverResult<bool> {
        let mut prepared = self.conn.prepare_cached(&stmt.sql)?;
        let flag: i64 = prepared.query_row(params_from_iter(stmt.args.iter()), |row| row.get(0))?;
        Ok(flag != 0)
    }

    fn query_strings(&mut self, stmt: &Statement) -> DriverResult<Vec<String>> {
        let mut prepared = self.conn.prepare_cached(&stmt.sql)?;
        let rows = prepared
            .query_map(params_from_iter(stmt.args.iter()), |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn query_integers(&mut self, stmt: &Statement) -> DriverResult<Vec<i64>> {
        let mut prepared = self.conn.prepare_cached(&stmt.sql)?;
        let rows = prepared
            .query_map(params_from_iter(stmt.args.iter()), |row| row.get::<_, i64>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn execute(&mut self, stmts: &[Statement]) -> DriverResult<u64> {
        let tx = self.conn.transaction()?;
        let mut affected = 0u64;
        for stmt in stmts {
            affected += tx.execute(&stmt.sql, params_from_iter(stmt.args.iter()))? as u64;
        }
        tx.commit()?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver_with_table() -> SqliteDriver {
        let mut driver = SqliteDriver::open_in_memory().unwrap();
        driver
            .execute(&[Statement::bare(Dialect::Sqlite.create_table_sql())])
            .unwrap();
        driver
    }

    #[test]
    fn test_execute_counts_rows() {
        let mut driver = driver_with_table();
        let affected = driver
            .execute(&[Statement::new(
                Dialect::Sqlite.insert_ignore_sql(2),
                vec!["सुंदर".into(), "मोक्ष".into()],
            )])
            .unwrap();
        assert_eq!(affected, 2);
    }

    #[test]
    fn test_execute_rolls_back_on_failure() {
        let mut driver = driver_with_table();
        let result = driver.execute(&[
            Statement::new(Dialect::Sqlite.insert_ignore_sql(1), vec!["देव".into()]),
            Statement::bare("INSERT INTO missing_table VALUES (1)"),
        ]);
        assert!(result.is_err());

        let words = driver
            .query_strings(&Statement::bare("SELECT word FROM lexicon"))
            .unwrap();
        assert!(words.is_empty(), "first insert must be rolled back");
    }

    #[test]
    fn test_query_exists_and_integers() {
        let mut driver = driver_with_table();
        driver
            .execute(&[Statement::new(
                Dialect::Sqlite.insert_ignore_sql(1),
                vec!["नमस्ते".into()],
            )])
            .unwrap();

        let exists = driver
            .query_exists(&Statement::new(
                crate::dialect::LOOKUP_SQL,
                vec!["नमस्ते".into()],
            ))
            .unwrap();
        assert!(exists);

        let count = driver
            .query_integers(&Statement::bare("SELECT COUNT(*) FROM lexicon"))
            .unwrap();
        assert_eq!(count, vec![1]);
    }

    #[test]
    fn test_busy_timeout_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let driver =
            SqliteDriver::open(dir.path().join("words.db"), Some(Duration::from_millis(250)))
                .unwrap();
        let timeout: i64 = driver
            .connection()
            .query_row("PRAGMA busy_timeout", [], |row| row.get(0))
            .unwrap();
        assert_eq!(timeout, 250);
    }

    #[test]
    fn test_connection_survives_driver() {
        let mut driver = driver_with_table();
        driver
            .execute(&[Statement::new(
                Dialect::Sqlite.insert_ignore_sql(2),
                vec!["धन्यवाद".into(), "देव".into()],
            )])
            .unwrap();

        let conn = driver.into_connection();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM lexicon", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);

        let mut reopened = SqliteDriver::from_connection(conn, None).unwrap();
        assert_eq!(
            reopened
                .query_strings(&Statement::bare("SELECT word FROM lexicon ORDER BY word"))
                .unwrap()
                .len(),
            2
        );
    }
}
