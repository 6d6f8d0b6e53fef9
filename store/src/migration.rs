//! Versioned schema setup for the `lexicon` table.
//!
//! Applied versions are recorded in a `lexicon_migrations` table inside the
//! target database, so [`Migration::up`] can run on every startup and only
//! applies what is missing. Each version is applied in one transaction
//! together with its tracking row.
//!
//! # Example
//!
//! ```
//! use cool_lexicon_store::{Migration, SqliteDriver};
//!
//! let mut driver = SqliteDriver::open_in_memory().unwrap();
//! let mut migration = Migration::new(&mut driver);
//!
//! let report = migration.up().unwrap();
//! assert_eq!(report.applied, vec![1]);
//!
//! // Already current: nothing to do.
//! assert!(migration.up().unwrap().applied.is_empty());
//!
//! let status = migration.status().unwrap();
//! assert!(status.table_exists);
//! assert_eq!(status.current_version, status.latest_version);
//! migration.verify_collation().unwrap();
//! ```

use cool_lexicon_core::{LexiconError, Result};
use tracing::{debug, info};

use crate::dialect::{Dialect, TABLE_NAME, parse_sqlite_collation};
use crate::driver::{SqlDriver, Statement};

const TRACKING_TABLE: &str = "lexicon_migrations";

const CREATE_TRACKING_SQL: &str = "CREATE TABLE IF NOT EXISTS lexicon_migrations (\
     version INTEGER NOT NULL PRIMARY KEY, \
     description VARCHAR(255) NOT NULL)";

const APPLIED_VERSIONS_SQL: &str = "SELECT version FROM lexicon_migrations ORDER BY version";

const RECORD_VERSION_SQL: &str =
    "INSERT INTO lexicon_migrations (version, description) VALUES (?, ?)";

/// One schema change.
struct Step {
    version: i64,
    description: &'static str,
    statements: fn(Dialect) -> Vec<String>,
}

const STEPS: &[Step] = &[Step {
    version: 1,
    description: "create lexicon table",
    statements: create_lexicon_table,
}];

fn create_lexicon_table(dialect: Dialect) -> Vec<String> {
    vec![dialect.create_table_sql()]
}

/// Highest schema version this build knows about.
pub fn latest_version() -> i64 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Applies and inspects schema versions over a borrowed driver.
///
/// The driver stays usable after the migration is dropped, so the same
/// connection can be handed to [`SqlLexicon`](crate::SqlLexicon).
pub struct Migration<'a, D: SqlDriver + ?Sized> {
    driver: &'a mut D,
}

impl<'a, D: SqlDriver + ?Sized> Migration<'a, D> {
    /// Creates a migration runner for the driver's database.
    pub fn new(driver: &'a mut D) -> Self {
        Self { driver }
    }

    /// Applies every pending version in order.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Migration`] if the tracking table cannot be
    /// read or a version fails to apply. Versions applied before the
    /// failing one stay applied.
    pub fn up(&mut self) -> Result<MigrationReport> {
        let dialect = self.driver.dialect();
        self.driver
            .execute(&[Statement::bare(CREATE_TRACKING_SQL)])
            .map_err(|e| migration_error("failed to create tracking table", e))?;

        let done = self.applied_versions()?;
        let mut report = MigrationReport {
            applied: Vec::new(),
            current_version: done.last().copied().unwrap_or(0),
        };

        for step in STEPS.iter().filter(|step| !done.contains(&step.version)) {
            let mut stmts: Vec<Statement> = (step.statements)(dialect)
                .into_iter()
                .map(Statement::bare)
                .collect();
            stmts.push(Statement::new(
                RECORD_VERSION_SQL,
                vec![step.version.to_string(), step.description.to_string()],
            ));

            self.driver.execute(&stmts).map_err(|e| {
                migration_error(
                    &format!("failed to apply version {} ({})", step.version, step.description),
                    e,
                )
            })?;
            info!(version = step.version, description = step.description, %dialect, "applied migration");
            report.applied.push(step.version);
            report.current_version = report.current_version.max(step.version);
        }

        if report.applied.is_empty() {
            debug!(version = report.current_version, "schema already current");
        }
        Ok(report)
    }

    /// Reports the applied and known versions without changing anything.
    pub fn status(&mut self) -> Result<MigrationStatus> {
        let current_version = if self.table_exists(TRACKING_TABLE)? {
            self.applied_versions()?.last().copied().unwrap_or(0)
        } else {
            0
        };
        Ok(MigrationStatus {
            current_version,
            latest_version: latest_version(),
            table_exists: self.table_exists(TABLE_NAME)?,
        })
    }

    /// Checks that the live `word` column uses the dialect's collation.
    ///
    /// Match semantics of lookup and search depend on the collation, so a
    /// table created by hand with another collation is refused.
    ///
    /// # Errors
    ///
    /// - [`LexiconError::Migration`] if the table does not exist.
    /// - [`LexiconError::CollationMismatch`] if the collation differs.
    pub fn verify_collation(&mut self) -> Result<()> {
        let dialect = self.driver.dialect();
        let rows = self
            .driver
            .query_strings(&Statement::new(
                dialect.collation_query_sql(),
                vec![TABLE_NAME.to_string()],
            ))
            .map_err(|e| migration_error("failed to read column collation", e))?;

        let Some(raw) = rows.into_iter().next() else {
            return Err(LexiconError::Migration(format!(
                "table '{TABLE_NAME}' does not exist; run setup first"
            )));
        };
        let found = match dialect {
            Dialect::MySql => raw,
            Dialect::Sqlite => parse_sqlite_collation(&raw),
        };

        if !dialect.accepts_collation(&found) {
            return Err(LexiconError::CollationMismatch {
                expected: dialect.collation().to_string(),
                found,
            });
        }
        debug!(collation = %found, "collation verified");
        Ok(())
    }

    fn applied_versions(&mut self) -> Result<Vec<i64>> {
        self.driver
            .query_integers(&Statement::bare(APPLIED_VERSIONS_SQL))
            .map_err(|e| migration_error("failed to read applied versions", e))
    }

    fn table_exists(&mut self, name: &str) -> Result<bool> {
        let dialect = self.driver.dialect();
        let counts = self
            .driver
            .query_integers(&Statement::new(
                dialect.table_exists_sql(),
                vec![name.to_string()],
            ))
            .map_err(|e| migration_error("failed to inspect tables", e))?;
        Ok(counts.first().copied().unwrap_or(0) > 0)
    }
}

fn migration_error(context: &str, err: impl std::fmt::Display) -> LexiconError {
    LexiconError::Migration(format!("{context}: {err}"))
}

/// Outcome of [`Migration::up`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Versions applied by this call, in order.
    pub applied: Vec<i64>,
    /// Highest applied version after the call.
    pub current_version: i64,
}

/// Snapshot returned by [`Migration::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Highest applied version, 0 when nothing was applied.
    pub current_version: i64,
    /// Highest version known to this build.
    pub latest_version: i64,
    /// Whether the `lexicon` table exists.
    pub table_exists: bool,
}

impl MigrationStatus {
    /// Returns `true` if versions remain to be applied.
    pub fn is_pending(&self) -> bool {
        self.current_version < self.latest_version
    }
}
