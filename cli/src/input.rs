//! Turns an operation's flag value into a batch of words.

use std::fs;
use std::path::Path;

/// Where the words of an operation come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordSource {
    /// The flag value is itself the single word.
    Literal,
    /// The flag value is a path to a file of whitespace-separated words.
    File,
}

impl WordSource {
    /// Picks the source from the `--input-file` flag.
    pub fn from_flag(input_file: bool) -> Self {
        if input_file { Self::File } else { Self::Literal }
    }

    /// Resolves `raw` into the words to operate on.
    ///
    /// Fails on a blank value, an unreadable file, or a file without words.
    pub fn words(self, raw: &str) -> Result<Vec<String>, String> {
        let value = raw.trim();
        if value.is_empty() {
            return Err("input value is empty or blank".to_string());
        }

        match self {
            Self::Literal => Ok(vec![value.to_string()]),
            Self::File => read_words(Path::new(value)),
        }
    }
}

fn read_words(path: &Path) -> Result<Vec<String>, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("failed to read input file '{}': {e}", path.display()))?;
    let words: Vec<String> = contents.split_whitespace().map(str::to_string).collect();
    if words.is_empty() {
        return Err(format!("input file '{}' contains no words", path.display()));
    }
    Ok(words)
}
