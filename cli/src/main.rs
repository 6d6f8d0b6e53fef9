mod input;
mod output;

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use cool_lexicon_core::{Lexicon, LexiconConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::input::WordSource;
use crate::output::Sink;

const DEFAULT_CONFIG: &str = "cool-lexicon-cfg.json";

#[derive(Debug, Parser)]
#[command(name = "cool-lexicon", version)]
#[command(about = "Look up, search and grow a word lexicon stored in MySQL or SQLite/libSQL")]
#[command(group(
    ArgGroup::new("operation")
        .args(["lookup", "starts_with", "ends_with", "add"])
        .multiple(false)
))]
struct Cli {
    /// JSON configuration file describing the backend.
    #[arg(long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,
    /// Create the database and table if missing before running the operation.
    #[arg(long)]
    setup: bool,
    /// Treat operation values as paths to files of whitespace-separated words.
    #[arg(long)]
    input_file: bool,
    /// Write results to `<operation>.txt` in this directory instead of stdout.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Check whether a word exists.
    #[arg(long, visible_alias = "ex", value_name = "WORD")]
    lookup: Option<String>,
    /// List all words starting with a substring.
    #[arg(long, visible_alias = "ss", value_name = "SUBSTRING")]
    starts_with: Option<String>,
    /// List all words ending with a substring.
    #[arg(long, visible_alias = "se", value_name = "SUBSTRING")]
    ends_with: Option<String>,
    /// Add a word.
    #[arg(long, visible_alias = "ad", value_name = "WORD")]
    add: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Lookup,
    StartsWith,
    EndsWith,
    Add,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Self::Lookup => "lookup",
            Self::StartsWith => "starts-with",
            Self::EndsWith => "ends-with",
            Self::Add => "add",
        }
    }
}

impl Cli {
    fn operation(&self) -> Option<(Operation, &str)> {
        [
            (Operation::Lookup, &self.lookup),
            (Operation::StartsWith, &self.starts_with),
            (Operation::EndsWith, &self.ends_with),
            (Operation::Add, &self.add),
        ]
        .into_iter()
        .find_map(|(op, value)| value.as_deref().map(|raw| (op, raw)))
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so result lines on stdout stay machine-readable.
fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let source = WordSource::from_flag(cli.input_file);
    let job = match cli.operation() {
        Some((op, raw)) => Some((op, source.words(raw)?)),
        None if cli.setup => None,
        None => {
            return Err(
                "no operation given; use --lookup, --starts-with, --ends-with, --add or --setup"
                    .to_string(),
            );
        }
    };

    let config = LexiconConfig::load(&cli.config)
        .map_err(|e| format!("failed to load config '{}': {e}", cli.config.display()))?;
    let mut lexicon = cool_lexicon_store::open(&config, cli.setup).map_err(|e| e.to_string())?;
    if cli.setup {
        info!(backend = %config.backend, "setup complete");
    }

    let result = match job {
        Some((op, words)) => execute(lexicon.as_mut(), op, &words, &Sink::from_flag(cli.output_dir)),
        None => Ok(()),
    };
    let closed = lexicon.close().map_err(|e| format!("failed to close lexicon: {e}"));
    result.and(closed)
}

fn execute(
    lexicon: &mut dyn Lexicon,
    op: Operation,
    words: &[String],
    sink: &Sink,
) -> Result<(), String> {
    let fail = |e: cool_lexicon_core::LexiconError| format!("{} failed: {e}", op.name());
    let lines = match op {
        Operation::Lookup => output::render(&lexicon.lookup(words).map_err(fail)?),
        Operation::StartsWith => {
            output::render(&lexicon.get_all_words_starting_with(words).map_err(fail)?)
        }
        Operation::EndsWith => {
            output::render(&lexicon.get_all_words_ending_with(words).map_err(fail)?)
        }
        Operation::Add => {
            lexicon.add(words).map_err(fail)?;
            vec![format!("added : {}", words.len())]
        }
    };

    if let Some(path) = sink.write(op.name(), &lines)? {
        info!(operation = op.name(), path = %path.display(), "results written");
    }
    Ok(())
}
