//! MySQL driver, compiled with the `mysql` feature.

use std::time::Duration;

use ::mysql::prelude::Queryable;
use ::mysql::{Conn, OptsBuilder, Params, TxOpts, Value};

use super::{DriverResult, SqlDriver, Statement};
use crate::dialect::Dialect;

/// Login settings for a MySQL server.
#[derive(Clone)]
pub struct MySqlOptions<'a> {
    /// Server host name or address.
    pub host: &'a str,
    /// Server port.
    pub port: u16,
    /// Login user.
    pub username: &'a str,
    /// Login password.
    pub password: &'a str,
    /// Database to select; must already be a validated identifier.
    pub database: &'a str,
    /// Bound for connecting and for each read/write.
    pub timeout: Option<Duration>,
}

impl MySqlOptions<'_> {
    fn builder(&self, with_database: bool) -> OptsBuilder {
        let builder = OptsBuilder::new()
            .ip_or_hostname(Some(self.host))
            .tcp_port(self.port)
            .user(Some(self.username))
            .pass(Some(self.password))
            .tcp_connect_timeout(self.timeout)
            .read_timeout(self.timeout)
            .write_timeout(self.timeout);
        if with_database {
            builder.db_name(Some(self.database))
        } else {
            builder
        }
    }
}

/// Single connection to a MySQL-compatible server.
pub struct MySqlDriver {
    conn: Conn,
}

impl MySqlDriver {
    /// Connects and selects the configured database.
    pub fn connect(options: &MySqlOptions<'_>) -> DriverResult<Self> {
        let conn = Conn::new(options.builder(true))?;
        Ok(Self { conn })
    }

    /// Creates the configured database if it does not exist yet.
    ///
    /// Uses a short-lived connection without a selected database.
    pub fn ensure_database(options: &MySqlOptions<'_>) -> DriverResult<()> {
        let mut conn = Conn::new(options.builder(false))?;
        conn.query_drop(format!(
            "CREATE DATABASE IF NOT EXISTS `{}` CHARACTER SET utf8mb4 COLLATE {}",
            options.database,
            Dialect::MySql.collation()
        ))?;
        Ok(())
    }
}

fn params(stmt: &Statement) -> Params {
    if stmt.args.is_empty() {
        Params::Empty
    } else {
        Params::Positional(stmt.args.iter().cloned().map(Value::from).collect())
    }
}

impl SqlDriver for MySqlDriver {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn query_exists(&mut self, stmt: &Statement) -> DriverResult<bool> {
        let flag: Option<i64> = self.conn.exec_first(stmt.sql.as_str(), params(stmt))?;
        Ok(flag.unwrap_or(0) != 0)
    }

    fn query_strings(&mut self, stmt: &Statement) -> DriverResult<Vec<String>> {
        Ok(self.conn.exec(stmt.sql.as_str(), params(stmt))?)
    }

    fn query_integers(&mut self, stmt: &Statement) -> DriverResult<Vec<i64>> {
        Ok(self.conn.exec(stmt.sql.as_str(), params(stmt))?)
    }

    // DDL statements commit implicitly in MySQL; only DML is rolled back.
    fn execute(&mut self, stmts: &[Statement]) -> DriverResult<u64> {
        let mut tx = self.conn.start_transaction(TxOpts::default())?;
        let mut affected = 0u64;
        for stmt in stmts {
            tx.exec_drop(stmt.sql.as_str(), params(stmt))?;
            affected += tx.affected_rows();
        }
        tx.commit()?;
        Ok(affected)
    }
}
