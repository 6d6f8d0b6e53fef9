//! The SQL-backed [`Lexicon`].

use std::collections::BTreeSet;

use cool_lexicon_core::{
    Lexicon, LexiconError, LookupResults, OperationResult, Result, SearchResults, validate_add_batch,
    validate_batch,
};
use tracing::{debug, info, warn};

use crate::dialect::{Affix, Dialect, LOOKUP_SQL, SEARCH_SQL};
use crate::driver::{SqlDriver, Statement};

/// Words per multi-row insert statement.
///
/// Keeps each statement under the placeholder limits of every backend
/// (SQLite allows 32766 bound parameters, older builds 999).
pub const INSERT_CHUNK_SIZE: usize = 500;

/// A [`Lexicon`] over one exclusively owned database connection.
///
/// Lookup and search run one query per distinct item. A failed query is
/// recorded on that item's [`OperationResult`] and the batch continues, so
/// callers always learn which items succeeded. `add` is all-or-nothing.
pub struct SqlLexicon<D: SqlDriver> {
    driver: Option<D>,
    dialect: Dialect,
}

impl<D: SqlDriver> SqlLexicon<D> {
    /// Wraps a driver whose database already has the `lexicon` table.
    pub fn new(driver: D) -> Self {
        let dialect = driver.dialect();
        Self {
            driver: Some(driver),
            dialect,
        }
    }

    /// Dialect of the underlying connection.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns `true` until [`close`](Lexicon::close) succeeds.
    pub fn is_open(&self) -> bool {
        self.driver.is_some()
    }

    fn driver_mut(&mut self) -> Result<&mut D> {
        self.driver.as_mut().ok_or(LexiconError::Closed)
    }

    fn search(&mut self, substrings: &[String], affix: Affix) -> Result<SearchResults> {
        validate_batch(substrings, "substrings")?;
        let driver = self.driver_mut()?;

        let mut results = SearchResults::new();
        for substring in distinct(substrings) {
            let stmt = Statement::new(SEARCH_SQL, vec![affix.pattern(substring)]);
            match driver.query_strings(&stmt) {
                Ok(words) if words.is_empty() => {}
                Ok(words) => {
                    results.insert(substring.clone(), OperationResult::ok(words));
                }
                Err(err) => {
                    warn!(operation = affix.as_str(), substring = %substring, error = %err, "search query failed");
                    results.insert(
                        substring.clone(),
                        OperationResult::failed(LexiconError::query(err)),
                    );
                }
            }
        }

        debug!(
            operation = affix.as_str(),
            substrings = substrings.len(),
            matched = results.len(),
            "search batch finished"
        );
        Ok(results)
    }
}

impl<D: SqlDriver> Lexicon for SqlLexicon<D> {
    fn lookup(&mut self, words: &[String]) -> Result<LookupResults> {
        validate_batch(words, "words")?;
        let driver = self.driver_mut()?;

        let mut results = LookupResults::new();
        for word in distinct(words) {
            let stmt = Statement::new(LOOKUP_SQL, vec![word.clone()]);
            let outcome = match driver.query_exists(&stmt) {
                Ok(found) => OperationResult::ok(found),
                Err(err) => {
                    warn!(word = %word, error = %err, "lookup query failed");
                    OperationResult::failed(LexiconError::query(err))
                }
            };
            results.insert(word.clone(), outcome);
        }

        debug!(words = words.len(), "lookup batch finished");
        Ok(results)
    }

    fn get_all_words_starting_with(&mut self, substrings: &[String]) -> Result<SearchResults> {
        self.search(substrings, Affix::Prefix)
    }

    fn get_all_words_ending_with(&mut self, substrings: &[String]) -> Result<SearchResults> {
        self.search(substrings, Affix::Suffix)
    }

    fn add(&mut self, words: &[String]) -> Result<()> {
        validate_add_batch(words)?;
        let dialect = self.dialect;
        let driver = self.driver_mut()?;

        let stmts: Vec<Statement> = words
            .chunks(INSERT_CHUNK_SIZE)
            .map(|chunk| Statement::new(dialect.insert_ignore_sql(chunk.len()), chunk.to_vec()))
            .collect();
        let inserted = driver.execute(&stmts).map_err(LexiconError::query)?;

        info!(
            submitted = words.len(),
            inserted,
            statements = stmts.len(),
            "added words"
        );
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        match self.driver.take() {
            Some(driver) => {
                drop(driver);
                debug!(dialect = %self.dialect, "lexicon closed");
                Ok(())
            }
            None => Err(LexiconError::Closed),
        }
    }
}

/// Distinct items of a batch in sorted order.
fn distinct(items: &[String]) -> BTreeSet<&String> {
    items.iter().collect()
}
