use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, ReadError};
use crate::reader::{read_grammar, read_lexicon};
use crate::rules::{LexicalRule, ProductionRule, escape_token};

/// Symbol the parser derives unless told otherwise
pub const DEFAULT_START: &str = "s";

/// Production rules keyed by their left-hand symbol. Alternatives keep their
/// declaration order, which is the order derivations are explored in.
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
  pub start: String,
  rules: HashMap<String, Vec<Vec<String>>>,
  /// left-hand symbols in the order they were first declared
  order: Vec<String>,
}

impl Grammar {
  pub fn new(rules: Vec<ProductionRule>) -> Self {
    let mut order = Vec::new();
    let rules = rules
      .into_iter()
      .fold(HashMap::new(), |mut map: HashMap<_, Vec<_>>, rule| {
        if !map.contains_key(&rule.symbol) {
          order.push(rule.symbol.clone());
        }
        map.entry(rule.symbol).or_default().push(rule.productions);
        map
      });

    Self {
      start: DEFAULT_START.to_string(),
      rules,
      order,
    }
  }

  pub fn with_start(mut self, start: impl Into<String>) -> Self {
    self.start = start.into();
    self
  }

  pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
    let path = path.as_ref();
    let grammar: Self = read_file(path)?.parse().map_err(|source| Error::Read {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), symbols = grammar.order.len(), "read grammar");
    Ok(grammar)
  }

  /// Right-hand sides for `symbol`, or None if it has no production rules
  pub fn alternatives(&self, symbol: &str) -> Option<&[Vec<String>]> {
    self.rules.get(symbol).map(Vec::as_slice)
  }

  /// A symbol is a nonterminal iff it has at least one production rule
  pub fn is_nonterminal(&self, symbol: &str) -> bool {
    self.rules.contains_key(symbol)
  }

  /// Left-hand symbols in declaration order
  pub fn symbols(&self) -> impl Iterator<Item = &str> {
    self.order.iter().map(String::as_str)
  }

  /// Every rule, grouped by symbol in declaration order
  pub fn rules(&self) -> impl Iterator<Item = (&str, &[String])> {
    self.symbols().flat_map(move |symbol| {
      self.rules[symbol]
        .iter()
        .map(move |rhs| (symbol, rhs.as_slice()))
    })
  }

  /// The start symbol plus everything that appears on a right-hand side
  pub fn referenced_symbols(&self) -> BTreeSet<&str> {
    std::iter::once(self.start.as_str())
      .chain(self.rules.values().flatten().flatten().map(String::as_str))
      .collect()
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl FromStr for Grammar {
  type Err = ReadError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(Self::new(read_grammar(s)?))
  }
}

/// Renders the rules in file syntax. The start symbol isn't part of that
/// syntax: it is written as a comment only, and reading the text back gives
/// the default start symbol.
impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "% start: {}", self.start)?;
    for (symbol, rhs) in self.rules() {
      writeln!(f, "{} --> {}.", symbol, rhs.join(", "))?;
    }
    Ok(())
  }
}

/// Maps each token to the set of symbols it can realize
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
  entries: BTreeMap<String, BTreeSet<String>>,
}

impl Lexicon {
  pub fn new(rules: Vec<LexicalRule>) -> Self {
    let mut entries: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for LexicalRule { symbol, token } in rules {
      entries.entry(token).or_default().insert(symbol);
    }
    Self { entries }
  }

  pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
    let path = path.as_ref();
    let lexicon: Self = read_file(path)?.parse().map_err(|source| Error::Read {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), tokens = lexicon.len(), "read lexicon");
    Ok(lexicon)
  }

  pub fn categories(&self, token: &str) -> Option<&BTreeSet<String>> {
    self.entries.get(token)
  }

  pub fn contains_token(&self, token: &str) -> bool {
    self.entries.contains_key(token)
  }

  /// Whether `token` can be realized as `symbol`
  pub fn realizes(&self, token: &str, symbol: &str) -> bool {
    self
      .categories(token)
      .is_some_and(|symbols| symbols.contains(symbol))
  }

  /// Whether any token realizes `symbol`
  pub fn has_category(&self, symbol: &str) -> bool {
    self.entries.values().any(|symbols| symbols.contains(symbol))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl FromStr for Lexicon {
  type Err = ReadError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(Self::new(read_lexicon(s)?))
  }
}

impl fmt::Display for Lexicon {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (token, symbols) in self.entries.iter() {
      for symbol in symbols {
        writeln!(f, "{} --> '{}'.", symbol, escape_token(token))?;
      }
    }
    Ok(())
  }
}

fn read_file(path: &Path) -> Result<String, Error> {
  fs::read_to_string(path).map_err(|source| Error::Io {
    path: path.to_path_buf(),
    source,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  const GRAMMAR: &str = r#"
    % declaration order matters
    s --> np, vp.
    np --> det, n.
    vp --> v, np.
    np --> pn.
    vp --> v.
  "#;

  #[test]
  fn test_alternatives_keep_declaration_order() {
    let g: Grammar = GRAMMAR.parse().unwrap();

    assert_eq!(g.start, "s");
    assert_eq!(g.symbols().collect::<Vec<_>>(), vec!["s", "np", "vp"]);
    assert_eq!(
      g.alternatives("np").unwrap(),
      &[vec!["det".to_string(), "n".to_string()], vec!["pn".to_string()]]
    );
    assert_eq!(
      g.alternatives("vp").unwrap(),
      &[vec!["v".to_string(), "np".to_string()], vec!["v".to_string()]]
    );
    assert!(g.alternatives("det").is_none());
    assert!(g.is_nonterminal("vp"));
    assert!(!g.is_nonterminal("v"));
  }

  #[test]
  fn test_grammar_round_trip() {
    let g: Grammar = GRAMMAR.parse().unwrap();
    let printed = g.to_string();
    assert_eq!(
      printed,
      "% start: s\n\
       s --> np, vp.\n\
       np --> det, n.\n\
       np --> pn.\n\
       vp --> v, np.\n\
       vp --> v.\n"
    );
    assert_eq!(printed.parse::<Grammar>().unwrap(), g);
  }

  #[test]
  fn test_round_trip_drops_start() {
    let g = "s --> a. vp --> v.".parse::<Grammar>().unwrap().with_start("vp");
    let printed = g.to_string();
    assert!(printed.starts_with("% start: vp\n"));

    let read: Grammar = printed.parse().unwrap();
    assert_eq!(read.start, DEFAULT_START);
    assert_eq!(read.rules().collect::<Vec<_>>(), g.rules().collect::<Vec<_>>());
    assert_eq!(read.with_start("vp"), g);
  }

  #[test]
  fn test_referenced_symbols() {
    let g = GRAMMAR.parse::<Grammar>().unwrap().with_start("vp");
    assert_eq!(
      g.referenced_symbols().into_iter().collect::<Vec<_>>(),
      vec!["det", "n", "np", "pn", "v", "vp"]
    );
  }

  #[test]
  fn test_lexicon_membership() {
    let lex: Lexicon = r#"
      n --> 'fish'.
      v --> 'fish'.
      n --> 'fish'.
      det --> the.
    "#
    .parse()
    .unwrap();

    assert_eq!(lex.len(), 2);
    assert_eq!(
      lex.categories("fish").unwrap().iter().collect::<Vec<_>>(),
      vec!["n", "v"]
    );
    assert!(lex.realizes("fish", "v"));
    assert!(!lex.realizes("fish", "det"));
    assert!(!lex.realizes("cat", "n"));
    assert!(lex.contains_token("the"));
    assert!(lex.has_category("det"));
    assert!(!lex.has_category("adj"));
  }

  #[test]
  fn test_lexicon_round_trip() {
    let lex: Lexicon = r"w --> '\''. w --> 'don\'t'. n --> 'cat'.".parse().unwrap();
    assert_eq!(lex.categories("'").unwrap().len(), 1);
    assert_eq!(lex.to_string().parse::<Lexicon>().unwrap(), lex);
  }

  #[test]
  fn test_missing_file() {
    let err = Grammar::read_from_file("no/such/grammar.pl").unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
  }

  #[test]
  fn test_malformed_file() {
    let path = std::env::temp_dir().join(format!("dcgtree-malformed-{}.pl", std::process::id()));
    fs::write(&path, "s --> np, vp.\nnp -> det.\n").unwrap();
    let err = Grammar::read_from_file(&path).unwrap_err();
    fs::remove_file(&path).unwrap();

    match &err {
      Error::Read { path: p, source } => {
        assert_eq!(p, &path);
        assert_eq!(
          source,
          &ReadError::UnexpectedChar {
            found: '>',
            line: 2,
            column: 5
          }
        );
      }
      other => panic!("expected Error::Read, got {:?}", other),
    }
    assert_eq!(
      err.to_string(),
      format!(
        "couldn't read {}: unexpected character '>' at line 2, column 5",
        path.display()
      )
    );
  }
}
