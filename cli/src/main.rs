use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use dcgtree::{DEFAULT_START, Err, Parser};

/// Top-down backtracking parser for separated Prolog DCG grammars.
///
/// Prints every parse tree of SENTENCE, one per line, as symbol/[children].
#[derive(clap::Parser)]
#[command(version, about)]
struct Cli {
  /// Prolog DCG file with the production rules
  grammar: PathBuf,

  /// Prolog DCG file with the lexicon rules
  lexicon: PathBuf,

  /// Sentence to tokenize and parse
  sentence: String,

  /// Where to write the trees (default: stdout)
  output: Option<PathBuf>,

  /// Start symbol
  #[arg(short, long, value_name = "SYMBOL", default_value = DEFAULT_START)]
  start: String,
}

fn run(cli: Cli) -> Result<(), Err> {
  let parser = Parser::from_files(&cli.grammar, &cli.lexicon)?.with_start(cli.start);

  // trees are buffered so a failed parse leaves no output file behind
  let mut trees: Vec<u8> = Vec::new();
  let count = parser.parse_into(&cli.sentence, &mut trees)?;
  tracing::info!("parsed {} tree{}", count, if count == 1 { "" } else { "s" });

  match &cli.output {
    Some(path) => fs::write(path, trees)?,
    None => io::stdout().lock().write_all(&trees)?,
  }

  Ok(())
}

fn main() {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .init();

  if let Err(err) = run(Cli::parse()) {
    eprintln!("error: {}", err);
    process::exit(1);
  }
}
