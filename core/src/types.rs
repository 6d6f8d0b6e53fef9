//! Per-item result types returned by batch operations.

use std::collections::BTreeMap;

use crate::error::LexiconError;

/// Longest word, in characters, the lexicon stores.
///
/// Matches the `VARCHAR(100)` width of the `lexicon.word` column.
pub const MAX_WORD_LENGTH: usize = 100;

/// A value paired with an optional failure.
///
/// Batch operations return one `OperationResult` per input item, so a failed
/// query for one item does not discard the items that succeeded. When
/// `error` is set, `value` holds the type's empty value (`false`, empty list).
///
/// # Examples
///
/// ```
/// use cool_lexicon_core::{LexiconError, OperationResult};
///
/// let found = OperationResult::ok(true);
/// assert!(found.is_ok());
///
/// let failed: OperationResult<bool> =
///     OperationResult::failed(LexiconError::query("timeout"));
/// assert!(failed.is_err());
/// assert!(!failed.value);
/// ```
#[derive(Debug)]
pub struct OperationResult<V> {
    /// Result value for the item.
    pub value: V,
    /// Failure for the item, if its query did not complete.
    pub error: Option<LexiconError>,
}

impl<V> OperationResult<V> {
    /// Creates a successful result.
    pub fn ok(value: V) -> Self {
        Self { value, error: None }
    }

    /// Returns `true` if the item completed without error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Returns `true` if the item failed.
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// Borrows the outcome as a standard `Result`.
    pub fn as_result(&self) -> Result<&V, &LexiconError> {
        match &self.error {
            Some(err) => Err(err),
            None => Ok(&self.value),
        }
    }
}

impl<V: Default> OperationResult<V> {
    /// Creates a failed result carrying the empty value.
    pub fn failed(error: LexiconError) -> Self {
        Self {
            value: V::default(),
            error: Some(error),
        }
    }
}

/// Existence result per looked-up word, ordered by word.
pub type LookupResults = BTreeMap<String, OperationResult<bool>>;

/// Matching words per searched substring, ordered by substring.
///
/// Substrings with no match are absent. Failed substrings are present with
/// an empty list and their error.
pub type SearchResults = BTreeMap<String, OperationResult<Vec<String>>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_uses_empty_value() {
        let res: OperationResult<Vec<String>> =
            OperationResult::failed(LexiconError::query("broken pipe"));
        assert!(res.value.is_empty());
        assert!(res.as_result().is_err());
    }

    #[test]
    fn test_ok_as_result() {
        let res = OperationResult::ok(vec!["नमस्ते".to_string()]);
        assert_eq!(res.as_result().unwrap(), &vec!["नमस्ते".to_string()]);
    }
}
