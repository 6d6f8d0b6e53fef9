//! Writes operation results to stdout or to per-operation files.
//!
//! Each item becomes one line, `<key> : <json value>`, or
//! `<key> : error : <message>` when the item failed.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use cool_lexicon_core::OperationResult;
use serde::Serialize;

/// Destination for result lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    /// Print to standard output.
    Stdout,
    /// Write `<operation>.txt` inside the directory, replacing any previous file.
    Dir(PathBuf),
}

impl Sink {
    /// Picks the sink from the `--output-dir` flag.
    pub fn from_flag(output_dir: Option<PathBuf>) -> Self {
        output_dir.map_or(Self::Stdout, Self::Dir)
    }

    /// Writes already rendered lines for one operation.
    ///
    /// Returns the file written, if any.
    pub fn write(&self, operation: &str, lines: &[String]) -> Result<Option<PathBuf>, String> {
        let mut text = lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }

        match self {
            Self::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(text.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|e| format!("failed to write results: {e}"))?;
                Ok(None)
            }
            Self::Dir(dir) => {
                fs::create_dir_all(dir).map_err(|e| {
                    format!("failed to create output directory '{}': {e}", dir.display())
                })?;
                let path = dir.join(format!("{operation}.txt"));
                fs::write(&path, text)
                    .map_err(|e| format!("failed to write '{}': {e}", path.display()))?;
                Ok(Some(path))
            }
        }
    }
}

/// Renders one line per item, in key order.
pub fn render<V: Serialize>(results: &BTreeMap<String, OperationResult<V>>) -> Vec<String> {
    results
        .iter()
        .map(|(key, result)| match result.as_result() {
            Ok(value) => match serde_json::to_string(value) {
                Ok(json) => format!("{key} : {json}"),
                Err(e) => format!("{key} : error : failed to encode result: {e}"),
            },
            Err(err) => format!("{key} : error : {err}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cool_lexicon_core::LexiconError;

    #[test]
    fn test_render_values_and_errors() {
        let mut results = BTreeMap::new();
        results.insert(
            "न".to_string(),
            OperationResult::ok(vec!["नमस्कार".to_string(), "नमस्ते".to_string()]),
        );
        results.insert(
            "र".to_string(),
            OperationResult::failed(LexiconError::query("connection reset")),
        );

        let lines = render(&results);
        assert_eq!(lines[0], r#"न : ["नमस्कार","नमस्ते"]"#);
        assert_eq!(lines[1], "र : error : query failure: connection reset");
    }

    #[test]
    fn test_render_lookup_booleans() {
        let mut results = BTreeMap::new();
        results.insert("सुंदर".to_string(), OperationResult::ok(true));
        results.insert("notexists".to_string(), OperationResult::ok(false));
        assert_eq!(render(&results), vec!["notexists : false", "सुंदर : true"]);
    }

    #[test]
    fn test_dir_sink_writes_operation_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Sink::from_flag(Some(dir.path().join("out")));
        let path = sink
            .write("lookup", &["मोक्ष : true".to_string()])
            .unwrap()
            .unwrap();
        assert!(path.ends_with("out/lookup.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "मोक्ष : true\n");
    }
}
