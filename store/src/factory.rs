//! Builds a ready-to-use [`Lexicon`] from a [`LexiconConfig`].

use cool_lexicon_core::{BackendKind, Lexicon, LexiconConfig, LexiconError, Result};
use tracing::info;

use crate::driver::{HranaDriver, SqlDriver, SqliteDriver};
use crate::migration::Migration;
use crate::store::SqlLexicon;

/// Validates the configuration, connects, and returns a lexicon.
///
/// With `run_migrations` set, pending schema versions are applied first
/// (and for MySQL the database is created if missing). The collation of
/// `lexicon.word` is verified on every open.
///
/// Every failure here is a startup failure: an invalid configuration, an
/// unreachable backend, or a schema that is missing or mis-collated.
///
/// # Errors
///
/// - [`LexiconError::InvalidConfig`] when validation fails.
/// - [`LexiconError::Connection`] when the backend cannot be reached.
/// - [`LexiconError::UnsupportedBackend`] for MySQL in a build without the
///   `mysql` feature.
/// - [`LexiconError::Migration`] / [`LexiconError::CollationMismatch`] from
///   schema setup and verification.
///
/// # Examples
///
/// ```
/// use cool_lexicon_core::{Lexicon, LexiconConfig};
///
/// let config = LexiconConfig::from_json_str(r#"{"type": "sqlite", "host": ":memory:"}"#).unwrap();
/// let mut lexicon = cool_lexicon_store::open(&config, true).unwrap();
///
/// lexicon.add(&["सुंदर".to_string()]).unwrap();
/// let found = lexicon.get_all_words_ending_with(&["र".to_string()]).unwrap();
/// assert_eq!(found["र"].value, vec!["सुंदर".to_string()]);
/// lexicon.close().unwrap();
/// ```
pub fn open(config: &LexiconConfig, run_migrations: bool) -> Result<Box<dyn Lexicon>> {
    config.validate()?;
    let target = config.redacted_target()?;

    let mut driver = connect(config, run_migrations)?;
    if run_migrations {
        let report = Migration::new(&mut driver).up()?;
        info!(
            applied = ?report.applied,
            version = report.current_version,
            "schema is current"
        );
    }
    Migration::new(&mut driver).verify_collation()?;

    info!(backend = %config.backend, target = %target, "lexicon opened");
    Ok(Box::new(SqlLexicon::new(driver)))
}

fn connect(config: &LexiconConfig, run_migrations: bool) -> Result<Box<dyn SqlDriver>> {
    let timeout = config.timeout();
    let driver: Box<dyn SqlDriver> = match config.backend {
        BackendKind::Sqlite => Box::new(
            SqliteDriver::open(config.host.trim(), timeout).map_err(LexiconError::connection)?,
        ),
        BackendKind::Libsql => Box::new(
            HranaDriver::connect(&config.connection_target()?, config.auth_token(), timeout)
                .map_err(LexiconError::connection)?,
        ),
        BackendKind::LibsqlToken => {
            let host = config.host.trim().trim_end_matches('/');
            let base = match config.effective_port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            };
            Box::new(
                HranaDriver::connect(&base, config.auth_token(), timeout)
                    .map_err(LexiconError::connection)?,
            )
        }
        BackendKind::MySql => connect_mysql(config, run_migrations)?,
    };
    Ok(driver)
}

#[cfg(feature = "mysql")]
fn connect_mysql(config: &LexiconConfig, run_migrations: bool) -> Result<Box<dyn SqlDriver>> {
    use crate::driver::{MySqlDriver, MySqlOptions};

    let options = MySqlOptions {
        host: config.host.trim(),
        port: config.effective_port().unwrap_or(3306),
        username: config.username().unwrap_or_default(),
        password: config.password().unwrap_or_default(),
        database: config.database().unwrap_or_default(),
        timeout: config.timeout(),
    };
    if run_migrations {
        MySqlDriver::ensure_database(&options).map_err(LexiconError::connection)?;
    }
    let driver = MySqlDriver::connect(&options).map_err(LexiconError::connection)?;
    Ok(Box::new(driver))
}

#[cfg(not(feature = "mysql"))]
fn connect_mysql(_config: &LexiconConfig, _run_migrations: bool) -> Result<Box<dyn SqlDriver>> {
    Err(LexiconError::UnsupportedBackend(
        "mysql support is not compiled in; rebuild with the `mysql` feature".to_string(),
    ))
}
