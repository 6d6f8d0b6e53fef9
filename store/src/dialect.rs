//! SQL text for each supported dialect.
//!
//! The only statement that differs between MySQL and the SQLite family is
//! the ignore-on-conflict insert; it is built by
//! [`Dialect::insert_ignore_sql`]. Table DDL and the collation query differ
//! too but only run during setup.
//!
//! Search patterns escape `%`, `_` and `!` in the caller's substring with
//! `!` (`LIKE ? ESCAPE '!'`), so substrings always match literally. `!` is
//! used instead of a backslash because the two dialects quote backslashes
//! differently in string literals.

use std::fmt;

/// Name of the word table.
pub const TABLE_NAME: &str = "lexicon";

const LIKE_ESCAPE: char = '!';

const WORD_COLUMN: &str = "word";

/// Exact-match existence check for one word.
pub(crate) const LOOKUP_SQL: &str = "SELECT EXISTS (SELECT 1 FROM lexicon WHERE word = ?)";

/// Pattern search returning matching words in column collation order.
pub(crate) const SEARCH_SQL: &str =
    "SELECT word FROM lexicon WHERE word LIKE ? ESCAPE '!' ORDER BY word";

/// SQL dialect spoken by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// MySQL-compatible servers.
    MySql,
    /// SQLite and libSQL.
    Sqlite,
}

impl Dialect {
    /// Builds a multi-row insert with one `(?)` group per word that skips
    /// words already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use cool_lexicon_store::Dialect;
    ///
    /// assert_eq!(
    ///     Dialect::Sqlite.insert_ignore_sql(2),
    ///     "INSERT OR IGNORE INTO lexicon (word) VALUES (?), (?)"
    /// );
    /// assert_eq!(
    ///     Dialect::MySql.insert_ignore_sql(1),
    ///     "INSERT IGNORE INTO lexicon (word) VALUES (?)"
    /// );
    /// ```
    pub fn insert_ignore_sql(self, rows: usize) -> String {
        let verb = match self {
            Dialect::MySql => "INSERT IGNORE",
            Dialect::Sqlite => "INSERT OR IGNORE",
        };
        let groups = vec!["(?)"; rows].join(", ");
        format!("{verb} INTO {TABLE_NAME} (word) VALUES {groups}")
    }

    /// Collation of the `word` column.
    ///
    /// MySQL compares case-insensitively with Unicode collation rules;
    /// SQLite's `NOCASE` folds ASCII case only.
    pub fn collation(self) -> &'static str {
        match self {
            Dialect::MySql => "utf8mb4_unicode_ci",
            Dialect::Sqlite => "NOCASE",
        }
    }

    /// Returns `true` if a collation reported by the database matches this
    /// dialect's matching semantics.
    ///
    /// MySQL reports the legacy `utf8`/`utf8mb3` Unicode collations under
    /// their own names; they compare the same way for stored words.
    pub fn accepts_collation(self, found: &str) -> bool {
        match self {
            Dialect::MySql => matches!(
                found.to_ascii_lowercase().as_str(),
                "utf8mb4_unicode_ci" | "utf8mb3_unicode_ci" | "utf8_unicode_ci"
            ),
            Dialect::Sqlite => found.eq_ignore_ascii_case("NOCASE"),
        }
    }

    /// DDL creating the word table.
    pub fn create_table_sql(self) -> String {
        match self {
            Dialect::MySql => format!(
                "CREATE TABLE IF NOT EXISTS {TABLE_NAME} (\
                 word VARCHAR(100) CHARACTER SET utf8mb4 COLLATE {} NOT NULL, \
                 PRIMARY KEY (word))",
                self.collation()
            ),
            Dialect::Sqlite => format!(
                "CREATE TABLE IF NOT EXISTS {TABLE_NAME} (\
                 word VARCHAR(100) NOT NULL COLLATE {} PRIMARY KEY)",
                self.collation()
            ),
        }
    }

    /// Query returning one row describing the live collation of
    /// `lexicon.word`, or no row when the table is missing.
    ///
    /// MySQL returns the collation name; SQLite returns the table's
    /// `CREATE TABLE` text, which [`parse_sqlite_collation`] reads.
    pub(crate) fn collation_query_sql(self) -> &'static str {
        match self {
            Dialect::MySql => {
                "SELECT COLLATION_NAME FROM information_schema.COLUMNS \
                 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? AND COLUMN_NAME = 'word'"
            }
            Dialect::Sqlite => "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?",
        }
    }

    /// Query counting tables named `?` in the current database.
    pub(crate) fn table_exists_sql(self) -> &'static str {
        match self {
            Dialect::MySql => {
                "SELECT COUNT(*) FROM information_schema.TABLES \
                 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?"
            }
            Dialect::Sqlite => "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Reads the `word` column collation out of a SQLite `CREATE TABLE` text.
///
/// Only the `word` column definition is inspected, so collations declared
/// on other columns are ignored. Returns `BINARY`, SQLite's default, when
/// the column declares none or is not found.
pub(crate) fn parse_sqlite_collation(create_sql: &str) -> String {
    column_definitions(create_sql)
        .into_iter()
        .find(|def| {
            def.split_whitespace()
                .next()
                .map(|name| name.trim_matches(|c| matches!(c, '"' | '`' | '[' | ']')))
                .is_some_and(|name| name.eq_ignore_ascii_case(WORD_COLUMN))
        })
        .and_then(|def| {
            let upper = def.to_ascii_uppercase();
            let mut tokens = upper.split_whitespace();
            tokens.find(|token| *token == "COLLATE")?;
            tokens.next().map(|token| token.trim_matches('"').to_string())
        })
        .unwrap_or_else(|| "BINARY".to_string())
}

/// Splits the body of a `CREATE TABLE` statement on top-level commas.
fn column_definitions(create_sql: &str) -> Vec<&str> {
    let (Some(start), Some(end)) = (create_sql.find('('), create_sql.rfind(')')) else {
        return Vec::new();
    };
    if end <= start {
        return Vec::new();
    }
    let body = &create_sql[start + 1..end];

    let mut defs = Vec::new();
    let mut depth = 0usize;
    let mut from = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                defs.push(body[from..i].trim());
                from = i + 1;
            }
            _ => {}
        }
    }
    defs.push(body[from..].trim());
    defs
}

/// Where a substring must sit inside a matching word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affix {
    /// Word starts with the substring.
    Prefix,
    /// Word ends with the substring.
    Suffix,
}

impl Affix {
    /// Builds the `LIKE` pattern for a substring, escaping wildcards.
    ///
    /// # Examples
    ///
    /// ```
    /// use cool_lexicon_store::Affix;
    ///
    /// assert_eq!(Affix::Prefix.pattern("न"), "न%");
    /// assert_eq!(Affix::Suffix.pattern("50%"), "%50!%");
    /// ```
    pub fn pattern(self, substring: &str) -> String {
        let escaped = escape_like(substring);
        match self {
            Affix::Prefix => format!("{escaped}%"),
            Affix::Suffix => format!("%{escaped}"),
        }
    }

    /// Name used in logs and output files.
    pub fn as_str(self) -> &'static str {
        match self {
            Affix::Prefix => "starts-with",
            Affix::Suffix => "ends-with",
        }
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_ignore_sql_per_dialect() {
        assert_eq!(
            Dialect::MySql.insert_ignore_sql(3),
            "INSERT IGNORE INTO lexicon (word) VALUES (?), (?), (?)"
        );
        assert_eq!(
            Dialect::Sqlite.insert_ignore_sql(1),
            "INSERT OR IGNORE INTO lexicon (word) VALUES (?)"
        );
    }

    #[test]
    fn test_create_table_uses_dialect_collation() {
        assert!(Dialect::MySql
            .create_table_sql()
            .contains("COLLATE utf8mb4_unicode_ci"));
        assert!(Dialect::Sqlite.create_table_sql().contains("COLLATE NOCASE"));
    }

    #[test]
    fn test_patterns_escape_wildcards() {
        assert_eq!(Affix::Prefix.pattern("a_b"), "a!_b%");
        assert_eq!(Affix::Suffix.pattern("wow!"), "%wow!!");
        assert_eq!(Affix::Suffix.pattern("र"), "%र");
    }

    #[test]
    fn test_parse_sqlite_collation() {
        assert_eq!(
            parse_sqlite_collation(&Dialect::Sqlite.create_table_sql()),
            "NOCASE"
        );
        assert_eq!(
            parse_sqlite_collation("CREATE TABLE lexicon (word TEXT PRIMARY KEY)"),
            "BINARY"
        );
        assert_eq!(
            parse_sqlite_collation("CREATE TABLE lexicon (word TEXT collate rtrim, x INT)"),
            "RTRIM"
        );
    }

    #[test]
    fn test_parse_sqlite_collation_reads_only_word_column() {
        assert_eq!(
            parse_sqlite_collation(
                "CREATE TABLE lexicon (note TEXT COLLATE NOCASE, \
                 word VARCHAR(100) NOT NULL PRIMARY KEY)"
            ),
            "BINARY"
        );
        assert_eq!(
            parse_sqlite_collation(
                "CREATE TABLE lexicon (score DECIMAL(10,2) COLLATE RTRIM, \
                 \"word\" VARCHAR(100) COLLATE NOCASE, wordy TEXT)"
            ),
            "NOCASE"
        );
    }

    #[test]
    fn test_accepts_collation() {
        assert!(Dialect::MySql.accepts_collation("utf8_unicode_ci"));
        assert!(Dialect::MySql.accepts_collation("utf8mb4_unicode_ci"));
        assert!(!Dialect::MySql.accepts_collation("utf8mb4_bin"));
        assert!(Dialect::Sqlite.accepts_collation("nocase"));
        assert!(!Dialect::Sqlite.accepts_collation("BINARY"));
    }

    #[test]
    fn test_sqlite_ddl_executes() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(&Dialect::Sqlite.create_table_sql()).unwrap();
        conn.execute(&Dialect::Sqlite.insert_ignore_sql(2), ["Deva", "deva"])
            .unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM lexicon", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1, "NOCASE primary key folds ASCII case");
    }
}
