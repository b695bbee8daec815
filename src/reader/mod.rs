//! Reads separated Prolog DCG files one rule at a time by running one of the
//! two automata in [automaton] over the text.

pub mod automaton;

use std::fmt;

use tracing::{error, trace};

use crate::error::ReadError;
use crate::rules::{LexicalRule, ProductionRule};
use automaton::{Automaton, CharClass, State, Tag};

/// Which kind of file a [RuleReader] was built for
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
  Grammar,
  Lexicon,
}

impl Mode {
  fn automaton(self) -> &'static Automaton {
    match self {
      Self::Grammar => &automaton::GRAMMAR,
      Self::Lexicon => &automaton::LEXICON,
    }
  }
}

impl fmt::Display for Mode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Grammar => write!(f, "grammar"),
      Self::Lexicon => write!(f, "lexicon"),
    }
  }
}

/// Buffers filled while the automaton runs over a single rule
#[derive(Debug)]
struct Buffers {
  lhs: String,
  rhs: Vec<String>,
}

impl Buffers {
  fn new() -> Self {
    Self {
      lhs: String::new(),
      rhs: vec![String::new()],
    }
  }

  fn current_rhs(&mut self) -> &mut String {
    self.rhs.last_mut().expect("rhs always has an open element")
  }
}

/// Cursor over a grammar or lexicon text
pub struct RuleReader<'a> {
  mode: Mode,
  src: &'a str,
  pos: usize,
  line: usize,
  column: usize,
}

impl<'a> RuleReader<'a> {
  pub fn new(src: &'a str, mode: Mode) -> Self {
    Self {
      mode,
      src,
      pos: 0,
      line: 1,
      column: 1,
    }
  }

  pub fn grammar(src: &'a str) -> Self {
    Self::new(src, Mode::Grammar)
  }

  pub fn lexicon(src: &'a str) -> Self {
    Self::new(src, Mode::Lexicon)
  }

  pub fn mode(&self) -> Mode {
    self.mode
  }

  /// Whether the cursor has reached the end of the text
  pub fn finished(&self) -> bool {
    self.pos >= self.src.len()
  }

  /// Current (line, column) of the cursor
  pub fn location(&self) -> (usize, usize) {
    (self.line, self.column)
  }

  /// Reads the next `Lhs --> Sym1, ..., SymN.` rule.
  /// Returns `Ok(None)` when only whitespace and comments were left.
  pub fn read_production(&mut self) -> Result<Option<ProductionRule>, ReadError> {
    if !self.accepts(Mode::Grammar) {
      return Ok(None);
    }

    let buffers = self.run()?;
    if buffers.lhs.is_empty() {
      return Ok(None);
    }

    Ok(Some(ProductionRule {
      symbol: buffers.lhs,
      productions: buffers.rhs,
    }))
  }

  /// Reads the next `Lhs --> 'token'.` rule.
  /// Returns `Ok(None)` when only whitespace and comments were left.
  pub fn read_lexical(&mut self) -> Result<Option<LexicalRule>, ReadError> {
    if !self.accepts(Mode::Lexicon) {
      return Ok(None);
    }

    let Buffers { lhs, mut rhs } = self.run()?;
    if lhs.is_empty() {
      return Ok(None);
    }

    Ok(Some(LexicalRule {
      symbol: lhs,
      token: rhs.pop().unwrap_or_default(),
    }))
  }

  /// Reports calls that can't produce a rule
  fn accepts(&self, wanted: Mode) -> bool {
    if self.mode != wanted {
      error!(
        reader = %self.mode,
        "can't read a {} rule with a {} reader",
        wanted,
        self.mode
      );
      false
    } else if self.finished() {
      error!(reader = %self.mode, "can't read a rule: end of input already reached");
      false
    } else {
      true
    }
  }

  fn peek(&self) -> Option<char> {
    self.src[self.pos..].chars().next()
  }

  fn advance(&mut self) {
    if let Some(c) = self.peek() {
      self.pos += c.len_utf8();
      if c == '\n' {
        self.line += 1;
        self.column = 1;
      } else {
        self.column += 1;
      }
    }
  }

  /// A `%` comment runs up to, but not including, the next line break
  fn skip_comment(&mut self) {
    if self.peek() == Some('%') {
      while let Some(c) = self.peek() {
        if c == '\n' {
          break;
        }
        self.advance();
      }
    }
  }

  fn run(&mut self) -> Result<Buffers, ReadError> {
    let automaton = self.mode.automaton();
    let mut buffers = Buffers::new();
    let mut q: State = automaton.start;

    while !automaton.is_stop(q) {
      self.skip_comment();

      let c = self.peek();
      q = match automaton.next(q, CharClass::of(c)) {
        Some(next) => next,
        None => {
          let err = self.unexpected(c);
          // not resumable
          self.pos = self.src.len();
          return Err(err);
        }
      };

      if let Some(c) = c {
        match automaton.tag(q) {
          Tag::AppendLhs => buffers.lhs.push(c),
          Tag::AppendRhs => buffers.current_rhs().push(c),
          Tag::AppendRhsUnescaped => {
            let rhs = buffers.current_rhs();
            rhs.pop();
            rhs.push(c);
          }
          Tag::NextRhs => buffers.rhs.push(String::new()),
          Tag::Skip | Tag::Stop => {}
        }
      }

      self.advance();
    }

    trace!(
      reader = %self.mode,
      lhs = %buffers.lhs,
      line = self.line,
      "read rule"
    );
    Ok(buffers)
  }

  fn unexpected(&self, c: Option<char>) -> ReadError {
    match c {
      None => ReadError::UnexpectedEnd {
        line: self.line,
        column: self.column,
      },
      Some('\n') => ReadError::UnexpectedLineBreak { line: self.line },
      Some(found) => ReadError::UnexpectedChar {
        found,
        line: self.line,
        column: self.column,
      },
    }
  }
}

/// Reads every production rule in `src`, in declaration order
pub fn read_grammar(src: &str) -> Result<Vec<ProductionRule>, ReadError> {
  let mut reader = RuleReader::grammar(src);
  let mut rules = Vec::new();
  while !reader.finished() {
    if let Some(rule) = reader.read_production()? {
      rules.push(rule);
    }
  }
  Ok(rules)
}

/// Reads every lexicon rule in `src`, in declaration order
pub fn read_lexicon(src: &str) -> Result<Vec<LexicalRule>, ReadError> {
  let mut reader = RuleReader::lexicon(src);
  let mut rules = Vec::new();
  while !reader.finished() {
    if let Some(rule) = reader.read_lexical()? {
      rules.push(rule);
    }
  }
  Ok(rules)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn production(symbol: &str, productions: &[&str]) -> ProductionRule {
    ProductionRule {
      symbol: symbol.to_string(),
      productions: productions.iter().map(|s| s.to_string()).collect(),
    }
  }

  fn lexical(symbol: &str, token: &str) -> LexicalRule {
    LexicalRule {
      symbol: symbol.to_string(),
      token: token.to_string(),
    }
  }

  #[test]
  fn test_read_grammar_rules_in_order() {
    let rules = read_grammar(
      r#"
        s --> np, vp.
        np --> det, n.
        np-->det,adj,n.
        vp --> v.
      "#,
    )
    .unwrap();

    assert_eq!(
      rules,
      vec![
        production("s", &["np", "vp"]),
        production("np", &["det", "n"]),
        production("np", &["det", "adj", "n"]),
        production("vp", &["v"]),
      ]
    );
  }

  #[test]
  fn test_comments_are_whitespace() {
    let src = "% sentences\ns % the start symbol\n  --> np, % subject\n vp. % done\n% trailing";
    let rules = read_grammar(src).unwrap();
    assert_eq!(rules, vec![production("s", &["np", "vp"])]);
  }

  #[test]
  fn test_rule_at_end_of_file() {
    assert_eq!(
      read_grammar("vp --> v.").unwrap(),
      vec![production("vp", &["v"])]
    );
    assert_eq!(read_grammar("").unwrap(), vec![]);
    assert_eq!(read_grammar("  \n % nothing here").unwrap(), vec![]);
  }

  #[test]
  fn test_read_lexicon() {
    let rules = read_lexicon(
      r#"
        det --> 'the'.
        n --> 'cat'. n-->'dog'.
        v --> sleeps .
        punct --> ','.
        num --> '42'.
      "#,
    )
    .unwrap();

    assert_eq!(
      rules,
      vec![
        lexical("det", "the"),
        lexical("n", "cat"),
        lexical("n", "dog"),
        lexical("v", "sleeps"),
        lexical("punct", ","),
        lexical("num", "42"),
      ]
    );
  }

  #[test]
  fn test_escaped_quote() {
    assert_eq!(read_lexicon(r"w --> '\''.").unwrap(), vec![lexical("w", "'")]);
    assert_eq!(
      read_lexicon(r"w --> 'rock\'n\'roll'.").unwrap(),
      vec![lexical("w", "rock'n'roll")]
    );
    // backslashes that don't escape a quote are kept
    assert_eq!(
      read_lexicon(r"w --> 'a\b'.").unwrap(),
      vec![lexical("w", r"a\b")]
    );
    assert_eq!(
      read_lexicon(r"w --> '\\\''.").unwrap(),
      vec![lexical("w", r"\\'")]
    );
  }

  #[test]
  fn test_unexpected_char() {
    let err = read_grammar("s --> np, vp.\nnp -> det.").unwrap_err();
    assert_eq!(
      err,
      ReadError::UnexpectedChar {
        found: '>',
        line: 2,
        column: 5
      }
    );
    assert_eq!(
      err.to_string(),
      "unexpected character '>' at line 2, column 5"
    );
  }

  #[test]
  fn test_unexpected_end() {
    assert_eq!(
      read_grammar("s --> np, vp").unwrap_err(),
      ReadError::UnexpectedEnd { line: 1, column: 13 }
    );
    assert_eq!(
      read_lexicon("w --> 'open").unwrap_err(),
      ReadError::UnexpectedEnd { line: 1, column: 12 }
    );
  }

  #[test]
  fn test_unexpected_line_break() {
    assert_eq!(
      read_lexicon("w --> 'two\nlines'.").unwrap_err(),
      ReadError::UnexpectedLineBreak { line: 1 }
    );
    // a rule can't have an empty right-hand side
    assert_eq!(
      read_grammar("s -->\n.").unwrap_err(),
      ReadError::UnexpectedChar {
        found: '.',
        line: 2,
        column: 1
      }
    );
  }

  #[test]
  fn test_rules_need_separating_whitespace() {
    assert!(read_grammar("s --> a.t --> b.").is_err());
    assert!(read_grammar("s --> a.\nt --> b.").is_ok());
  }

  #[test]
  fn test_reader_stops_after_error() {
    let mut reader = RuleReader::grammar("s --> ?.\nt --> b.");
    assert!(reader.read_production().is_err());
    assert!(reader.finished());
    assert_eq!(reader.read_production(), Ok(None));
  }

  #[test]
  fn test_wrong_mode_returns_nothing() {
    let mut reader = RuleReader::lexicon("det --> 'the'.");
    assert_eq!(reader.read_production(), Ok(None));
    // nothing was consumed
    assert_eq!(reader.location(), (1, 1));
    assert_eq!(reader.read_lexical(), Ok(Some(lexical("det", "the"))));

    let mut reader = RuleReader::grammar("s --> a.");
    assert_eq!(reader.read_lexical(), Ok(None));
    assert_eq!(reader.read_production(), Ok(Some(production("s", &["a"]))));
  }

  #[test]
  fn test_read_after_end_returns_nothing() {
    let mut reader = RuleReader::grammar("s --> a.");
    assert!(reader.read_production().unwrap().is_some());
    assert!(reader.finished());
    assert_eq!(reader.read_production(), Ok(None));
  }

  #[test]
  fn test_cursor_moves_past_period() {
    let mut reader = RuleReader::grammar("s --> a.\n\nt --> b.\n");
    reader.read_production().unwrap();
    assert_eq!(reader.location(), (2, 1));
    reader.read_production().unwrap();
    assert_eq!(reader.location(), (4, 1));
    assert!(reader.finished());
  }
}
