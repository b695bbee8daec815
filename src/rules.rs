use std::fmt;

/// `symbol --> p1, p2, ..., pn.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionRule {
  pub symbol: String,
  pub productions: Vec<String>,
}

impl ProductionRule {
  pub fn len(&self) -> usize {
    self.productions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl fmt::Display for ProductionRule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} --> {}.", self.symbol, self.productions.join(", "))
  }
}

/// `symbol --> 'token'.`, the token may realize the symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalRule {
  pub symbol: String,
  pub token: String,
}

impl fmt::Display for LexicalRule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} --> '{}'.", self.symbol, escape_token(&self.token))
  }
}

/// Quote escaping for lexicon files. Only a token ending in a backslash can't
/// be read back, since its closing quote would come out escaped. The reader
/// never produces such a token.
pub fn escape_token(token: &str) -> String {
  token.replace('\'', "\\'")
}

#[test]
fn test_display_rules() {
  let rule = ProductionRule {
    symbol: "np".to_string(),
    productions: vec!["det".to_string(), "adj".to_string(), "n".to_string()],
  };
  assert_eq!(rule.to_string(), "np --> det, adj, n.");
  assert_eq!(rule.len(), 3);

  let rule = LexicalRule {
    symbol: "w".to_string(),
    token: "don't".to_string(),
  };
  assert_eq!(rule.to_string(), r"w --> 'don\'t'.");

  let rule = LexicalRule {
    symbol: "w".to_string(),
    token: r"a\'b".to_string(),
  };
  assert_eq!(rule.to_string(), r"w --> 'a\\'b'.");
  assert_eq!(
    crate::reader::read_lexicon(&rule.to_string()).unwrap(),
    vec![rule]
  );
}
