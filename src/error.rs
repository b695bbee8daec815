use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A grammar or lexicon file that the reader automaton rejected.
/// Lines and columns are 1-based, columns count characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
  #[error("unexpected end of file at line {line}, column {column}")]
  UnexpectedEnd { line: usize, column: usize },

  #[error("unexpected line break at line {line}")]
  UnexpectedLineBreak { line: usize },

  #[error("unexpected character '{found}' at line {line}, column {column}")]
  UnexpectedChar {
    found: char,
    line: usize,
    column: usize,
  },
}

/// Fatal errors for a single parse. Branch-local dead ends are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("unknown word: no lexicon entry for '{0}'")]
  UnknownWord(String),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("couldn't read {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("couldn't read {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: ReadError,
  },

  #[error(transparent)]
  Parse(#[from] ParseError),

  #[error("couldn't write trees: {0}")]
  Write(#[source] io::Error),
}
