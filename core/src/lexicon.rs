//! The [`Lexicon`] contract.

use crate::error::Result;
use crate::types::{LookupResults, SearchResults};

/// A collection of unique words.
///
/// Unlike a dictionary, a lexicon stores only the words themselves; it can
/// tell whether a word exists and which words start or end with a
/// substring, and it can grow. Words are never removed or renamed.
///
/// Every operation takes a non-empty batch. An empty batch, or one with a
/// blank item, fails with [`LexiconError::InvalidArgument`] before any query
/// is issued. Per-item failures are reported inside the returned map rather
/// than failing the whole call.
///
/// A lexicon has two states, open and closed. After [`close`](Self::close)
/// every method, `close` included, fails with [`LexiconError::Closed`].
///
/// [`LexiconError::InvalidArgument`]: crate::LexiconError::InvalidArgument
/// [`LexiconError::Closed`]: crate::LexiconError::Closed
pub trait Lexicon {
    /// Checks the existence of each word using exact equality under the
    /// backend's collation.
    fn lookup(&mut self, words: &[String]) -> Result<LookupResults>;

    /// Finds, for each substring, every stored word that starts with it.
    ///
    /// Word lists are sorted by the column collation. Substrings with no
    /// match are left out of the result.
    fn get_all_words_starting_with(&mut self, substrings: &[String]) -> Result<SearchResults>;

    /// Finds, for each substring, every stored word that ends with it.
    ///
    /// Same ordering and omission rules as
    /// [`get_all_words_starting_with`](Self::get_all_words_starting_with).
    fn get_all_words_ending_with(&mut self, substrings: &[String]) -> Result<SearchResults>;

    /// Adds all words in one atomic write. Words already present are
    /// ignored; any other failure leaves the lexicon unchanged.
    fn add(&mut self, words: &[String]) -> Result<()>;

    /// Releases the underlying connection.
    fn close(&mut self) -> Result<()>;
}
