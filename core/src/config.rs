//! Backend configuration loaded from a JSON file.
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "type": "mysql",
//!   "host": "127.0.0.1",
//!   "port": 3306,
//!   "database": "lexicons",
//!   "username": "root",
//!   "password": "toor"
//! }
//! ```
//!
//! A remote libSQL server with a token:
//!
//! ```json
//! {
//!   "type": "libsql-token",
//!   "host": "libsql://words-acme.turso.io",
//!   "authToken": "eyJhbGciOi..."
//! }
//! ```

use std::fmt;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LexiconError, Result};
use crate::validate::validate_identifier;

const DEFAULT_MYSQL_PORT: u16 = 3306;
const DEFAULT_LIBSQL_PORT: u16 = 8080;
const REDACTED: &str = "***";

/// Kind of database backing the lexicon.
///
/// The set is closed; the factory dispatches on it once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BackendKind {
    /// MySQL-compatible server, username/password login.
    #[default]
    #[serde(rename = "mysql")]
    MySql,
    /// libSQL server reached as `host:port`, optional token.
    #[serde(rename = "libsql")]
    Libsql,
    /// libSQL server reached by URL with a mandatory token.
    #[serde(rename = "libsql-token")]
    LibsqlToken,
    /// Embedded SQLite file; `host` is the file path or `:memory:`.
    #[serde(rename = "sqlite")]
    Sqlite,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::MySql => write!(f, "mysql"),
            BackendKind::Libsql => write!(f, "libsql"),
            BackendKind::LibsqlToken => write!(f, "libsql-token"),
            BackendKind::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Connection settings for one lexicon backend.
///
/// A zero value is useless and is reported by [`validate`](Self::validate).
///
/// # Examples
///
/// ```
/// use cool_lexicon_core::{BackendKind, LexiconConfig};
///
/// let config = LexiconConfig::from_json_str(
///     r#"{"type": "libsql-token", "host": "libsql://words.turso.io", "authToken": "t0k"}"#,
/// )
/// .unwrap();
/// assert_eq!(config.backend, BackendKind::LibsqlToken);
/// assert_eq!(config.redacted_target().unwrap(), "libsql://words.turso.io?authToken=***");
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexiconConfig {
    /// Backend kind. Defaults to MySQL when absent.
    #[serde(rename = "type", default)]
    pub backend: BackendKind,
    /// Server host, server URL, or SQLite file path.
    #[serde(default)]
    pub host: String,
    /// Server port; backend default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Database (schema) name. Required for MySQL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Login user. Not allowed together with `authToken`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Login password. Not allowed together with `authToken`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Authentication token. Not allowed together with username/password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Upper bound, in seconds, for each database round-trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl LexiconConfig {
    /// Loads configuration from a JSON file.
    ///
    /// The result is not validated; call [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// Returns [`Io`](LexiconError::Io) if the file cannot be read, or
    /// [`Json`](LexiconError::Json) if parsing fails (including an unknown
    /// `type`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }

    /// Parses configuration from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Checks the invariants that must hold before connecting.
    ///
    /// `host` is always required and at most one credential form may be
    /// present; which one is required depends on the backend.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfig`](LexiconError::InvalidConfig) describing the
    /// first violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(invalid("host is required"));
        }

        let has_login = self.username().is_some() || self.password().is_some();
        let has_token = self.auth_token().is_some();
        if has_login && has_token {
            return Err(invalid(
                "configure either username/password or authToken, not both",
            ));
        }

        match self.backend {
            BackendKind::MySql => {
                if self.username().is_none() {
                    return Err(invalid("username is required for mysql"));
                }
                if self.password().is_none() {
                    return Err(invalid("password is required for mysql"));
                }
                if has_token {
                    return Err(invalid("authToken is not supported for mysql"));
                }
                let database = self
                    .database()
                    .ok_or_else(|| invalid("database is required for mysql"))?;
                validate_identifier(database)?;
            }
            BackendKind::Libsql => {
                if has_login {
                    return Err(invalid(
                        "username/password are not supported for libsql; use authToken",
                    ));
                }
            }
            BackendKind::LibsqlToken => {
                if has_login {
                    return Err(invalid(
                        "username/password are not supported for libsql-token; use authToken",
                    ));
                }
                if !has_token {
                    return Err(invalid("authToken is required for libsql-token"));
                }
            }
            BackendKind::Sqlite => {
                if has_login || has_token {
                    return Err(invalid("sqlite does not take credentials"));
                }
            }
        }

        if self.port == Some(0) {
            return Err(invalid("port must be greater than zero"));
        }

        Ok(())
    }

    /// Returns the configured port, or the backend default.
    ///
    /// Embedded SQLite has no port and returns `None`.
    pub fn effective_port(&self) -> Option<u16> {
        match self.backend {
            BackendKind::MySql => Some(self.port.unwrap_or(DEFAULT_MYSQL_PORT)),
            BackendKind::Libsql => Some(self.port.unwrap_or(DEFAULT_LIBSQL_PORT)),
            BackendKind::LibsqlToken => self.port,
            BackendKind::Sqlite => None,
        }
    }

    /// Builds the backend's connection target.
    ///
    /// | Backend | Form |
    /// |---|---|
    /// | mysql | `user:pass@tcp(host:port)/database` |
    /// | libsql | `host:port` |
    /// | libsql-token | `host?authToken=token` |
    /// | sqlite | `host` |
    ///
    /// # Errors
    ///
    /// Fails when the configuration does not [`validate`](Self::validate).
    pub fn connection_target(&self) -> Result<String> {
        self.validate()?;
        Ok(self.render_target(false))
    }

    /// Same as [`connection_target`](Self::connection_target) with the
    /// password and token replaced by `***`; safe to log.
    pub fn redacted_target(&self) -> Result<String> {
        self.validate()?;
        Ok(self.render_target(true))
    }

    /// Per-round-trip timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Login user, ignoring blank values.
    pub fn username(&self) -> Option<&str> {
        non_blank(&self.username)
    }

    /// Login password, ignoring blank values.
    pub fn password(&self) -> Option<&str> {
        non_blank(&self.password)
    }

    /// Authentication token, ignoring blank values.
    pub fn auth_token(&self) -> Option<&str> {
        non_blank(&self.auth_token)
    }

    /// Database name, ignoring blank values.
    pub fn database(&self) -> Option<&str> {
        non_blank(&self.database)
    }

    fn render_target(&self, redact: bool) -> String {
        let host = self.host.trim();
        let remote = host.trim_end_matches('/');
        let secret = |value: Option<&str>| {
            if redact {
                REDACTED.to_string()
            } else {
                value.unwrap_or_default().to_string()
            }
        };

        match self.backend {
            BackendKind::MySql => format!(
                "{}:{}@tcp({}:{})/{}",
                self.username().unwrap_or_default(),
                secret(self.password()),
                host,
                self.effective_port().unwrap_or(DEFAULT_MYSQL_PORT),
                self.database().unwrap_or_default(),
            ),
            BackendKind::Libsql => format!(
                "{}:{}",
                remote,
                self.effective_port().unwrap_or(DEFAULT_LIBSQL_PORT)
            ),
            BackendKind::LibsqlToken => {
                format!("{}?authToken={}", remote, secret(self.auth_token()))
            }
            BackendKind::Sqlite => host.to_string(),
        }
    }
}

impl fmt::Debug for LexiconConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexiconConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("auth_token", &self.auth_token.as_ref().map(|_| REDACTED))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(message: &str) -> LexiconError {
    LexiconError::InvalidConfig(message.to_string())
}
