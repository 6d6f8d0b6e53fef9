//! Input validation for batches and SQL identifiers.
//!
//! Batch checks run before any query so an invalid call has no observable
//! side effect.
//!
//! # Examples
//!
//! ```
//! use cool_lexicon_core::{validate_batch, validate_identifier};
//!
//! assert!(validate_batch(&["नमस्ते".to_string()], "words").is_ok());
//! assert!(validate_batch(&[], "words").is_err());
//!
//! assert!(validate_identifier("lexicons").is_ok());
//! assert!(validate_identifier("drop;--").is_err());
//! ```

use crate::error::{LexiconError, Result};
use crate::types::MAX_WORD_LENGTH;

/// Checks that a batch is non-empty and has no blank item.
///
/// `what` names the batch in the error message (`"words"`, `"substrings"`).
pub fn validate_batch(items: &[String], what: &str) -> Result<()> {
    if items.is_empty() {
        return Err(LexiconError::InvalidArgument(format!(
            "list of {what} is empty"
        )));
    }
    if let Some(pos) = items.iter().position(|item| item.trim().is_empty()) {
        return Err(LexiconError::InvalidArgument(format!(
            "list of {what} has a blank entry at position {pos}"
        )));
    }
    Ok(())
}

/// Checks a batch of words to add: [`validate_batch`] plus the column width.
pub fn validate_add_batch(words: &[String]) -> Result<()> {
    validate_batch(words, "words")?;
    if let Some(word) = words
        .iter()
        .find(|word| word.chars().count() > MAX_WORD_LENGTH)
    {
        return Err(LexiconError::InvalidArgument(format!(
            "word '{word}' is longer than {MAX_WORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Checks that a name is safe to splice into SQL as an identifier.
///
/// Only alphanumeric characters and underscores are accepted.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(LexiconError::InvalidConfig(
            "identifier cannot be empty".to_string(),
        ));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(LexiconError::InvalidConfig(format!(
            "invalid identifier '{name}': must contain only alphanumeric characters and underscores"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_batch_is_invalid() {
        let err = validate_batch(&[], "substrings").unwrap_err();
        assert!(matches!(err, LexiconError::InvalidArgument(_)));
        assert!(err.to_string().contains("substrings"));
    }

    #[test]
    fn test_blank_entry_is_invalid() {
        let err = validate_batch(&batch(&["न", "  "]), "substrings").unwrap_err();
        assert!(err.to_string().contains("position 1"));
    }

    #[test]
    fn test_add_batch_rejects_long_words() {
        let long = "अ".repeat(MAX_WORD_LENGTH + 1);
        assert!(validate_add_batch(&[long]).is_err());

        let fits = "अ".repeat(MAX_WORD_LENGTH);
        assert!(validate_add_batch(&[fits]).is_ok());
    }

    #[test]
    fn test_identifier_rules() {
        assert!(validate_identifier("lexicons").is_ok());
        assert!(validate_identifier("lexicon_2").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("my-db").is_err());
        assert!(validate_identifier("db name").is_err());
    }
}
