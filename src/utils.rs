use regex::Regex;
use std::error::Error;

/// Boxed static error type
pub type Err = Box<dyn Error + 'static>;

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: Regex = Regex::new($pattern).unwrap();
    }
  };
}

/// Splits a sentence into tokens. Runs of letters and digits form a word,
/// any other visible character is a token by itself, whitespace separates.
///
/// ```
/// assert_eq!(
///   dcgtree::utils::tokenize("Don't  panic, Arthur!"),
///   vec!["Don", "'", "t", "panic", ",", "Arthur", "!"],
/// );
/// ```
pub fn tokenize(sentence: &str) -> Vec<&str> {
  regex_static!(TOKEN, r"[\p{L}\p{N}]+|[^\s\p{L}\p{N}]");
  TOKEN.find_iter(sentence).map(|m| m.as_str()).collect()
}

#[test]
fn test_tokenize() {
  assert_eq!(tokenize("the cat sleeps"), vec!["the", "cat", "sleeps"]);
  assert_eq!(tokenize("  the\tcat\n"), vec!["the", "cat"]);
  assert_eq!(tokenize("Größe 42."), vec!["Größe", "42", "."]);
  assert_eq!(tokenize("a-b"), vec!["a", "-", "b"]);
  assert!(tokenize("   ").is_empty());
}
