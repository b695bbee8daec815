#[macro_use]
extern crate lazy_static;

pub mod backtrack;
pub mod error;
pub mod grammar;
pub mod reader;
pub mod rules;
pub mod syntree;
pub mod utils;

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use tracing::warn;

pub use crate::error::{Error, ParseError, ReadError};
pub use crate::grammar::{DEFAULT_START, Grammar, Lexicon};
pub use crate::utils::Err;

/// A grammar and lexicon ready to parse sentences
#[derive(Debug, Clone)]
pub struct Parser {
  grammar: Grammar,
  lexicon: Lexicon,
}

impl Parser {
  pub fn new(grammar: Grammar, lexicon: Lexicon) -> Self {
    let parser = Self { grammar, lexicon };
    for symbol in parser.undeclared_symbols() {
      warn!(
        symbol,
        "'{}' has neither production rules nor lexicon entries", symbol
      );
    }
    parser
  }

  /// Reads a production rule file and a lexicon file
  pub fn from_files(grammar: impl AsRef<Path>, lexicon: impl AsRef<Path>) -> Result<Self, Error> {
    Ok(Self::new(
      Grammar::read_from_file(grammar)?,
      Lexicon::read_from_file(lexicon)?,
    ))
  }

  pub fn with_start(self, start: impl Into<String>) -> Self {
    Self::new(self.grammar.with_start(start), self.lexicon)
  }

  pub fn grammar(&self) -> &Grammar {
    &self.grammar
  }

  pub fn lexicon(&self) -> &Lexicon {
    &self.lexicon
  }

  /// Symbols that can never be expanded or realized by any token
  pub fn undeclared_symbols(&self) -> Vec<&str> {
    self
      .grammar
      .referenced_symbols()
      .into_iter()
      .filter(|s| !self.grammar.is_nonterminal(s) && !self.lexicon.has_category(s))
      .collect()
  }

  pub fn parse_tokens(&self, tokens: &[&str]) -> Result<BTreeSet<String>, ParseError> {
    backtrack::parse(&self.grammar, &self.lexicon, tokens)
  }

  /// Tokenizes `sentence` and returns the rendering of every parse tree
  pub fn parse(&self, sentence: &str) -> Result<BTreeSet<String>, ParseError> {
    self.parse_tokens(&utils::tokenize(sentence))
  }

  /// Writes one tree per line, returning how many were written.
  /// Nothing is written if the sentence can't be parsed at all.
  pub fn parse_into<W: Write>(&self, sentence: &str, mut out: W) -> Result<usize, Error> {
    let trees = self.parse(sentence)?;
    for tree in trees.iter() {
      writeln!(out, "{}", tree).map_err(Error::Write)?;
    }
    out.flush().map_err(Error::Write)?;
    Ok(trees.len())
  }
}
