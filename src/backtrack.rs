//! Top-down backtracking search over every derivation of the start symbol.
//!
//! The search runs on an explicit LIFO work-list of [Branch] values instead of
//! the call stack. A branch owns its pending symbols, its left-expanding set and
//! its own view of the tree, so a branch that fails or completes can never
//! disturb a sibling still waiting on the list.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, warn};

use crate::error::ParseError;
use crate::grammar::{Grammar, Lexicon};
use crate::syntree::{SymbolInstance, SynTree};

/// One point in the search space
#[derive(Debug, Clone)]
struct Branch<'a> {
  /// symbols still to expand, next on top
  pending: Vec<SymbolInstance<'a>>,
  /// symbols expanded since the last consumed token
  left_expanding: HashSet<&'a str>,
  /// index of the next input token
  pos: usize,
  tree: SynTree<'a>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
  pub branches: usize,
  pub left_recursions: usize,
  pub derivations: usize,
}

/// State for one call to [parse]. Ids restart at zero for every search.
struct Search<'a> {
  grammar: &'a Grammar,
  lexicon: &'a Lexicon,
  input: &'a [&'a str],
  next_id: usize,
  work: Vec<Branch<'a>>,
  trees: BTreeSet<String>,
  stats: SearchStats,
}

impl<'a> Search<'a> {
  fn new(grammar: &'a Grammar, lexicon: &'a Lexicon, input: &'a [&'a str]) -> Self {
    Self {
      grammar,
      lexicon,
      input,
      next_id: 0,
      work: Vec::new(),
      trees: BTreeSet::new(),
      stats: SearchStats::default(),
    }
  }

  fn new_instance(&mut self, symbol: &'a str) -> SymbolInstance<'a> {
    let si = SymbolInstance::new(symbol, self.next_id);
    self.next_id += 1;
    si
  }

  fn run(mut self) -> (BTreeSet<String>, SearchStats) {
    let grammar = self.grammar;
    let start = self.new_instance(&grammar.start);
    self.work.push(Branch {
      pending: vec![start],
      left_expanding: HashSet::new(),
      pos: 0,
      tree: SynTree::new(start),
    });

    while let Some(branch) = self.work.pop() {
      self.stats.branches += 1;
      self.step(branch);
    }

    (self.trees, self.stats)
  }

  fn step(&mut self, branch: Branch<'a>) {
    let Branch {
      mut pending,
      mut left_expanding,
      pos,
      tree,
    } = branch;

    let Some(top) = pending.pop() else {
      return;
    };

    if !left_expanding.insert(top.symbol) {
      warn!(
        symbol = top.symbol,
        "left recursion while expanding '{}', ignoring this expansion", top.symbol
      );
      self.stats.left_recursions += 1;
      return;
    }

    let grammar = self.grammar;
    match grammar.alternatives(top.symbol) {
      Some(alternatives) => self.expand(top, alternatives, pending, left_expanding, pos, tree),
      None => self.scan(top, pending, pos, tree),
    }
  }

  /// Queues one branch per alternative of `top`, in declaration order
  fn expand(
    &mut self,
    top: SymbolInstance<'a>,
    alternatives: &'a [Vec<String>],
    pending: Vec<SymbolInstance<'a>>,
    left_expanding: HashSet<&'a str>,
    pos: usize,
    tree: SynTree<'a>,
  ) {
    let mut branches = Vec::with_capacity(alternatives.len());
    for rhs in alternatives {
      let children = rhs
        .iter()
        .map(|symbol| self.new_instance(symbol))
        .collect::<Vec<_>>();

      let mut stack = pending.clone();
      stack.extend(children.iter().rev());

      branches.push(Branch {
        pending: stack,
        left_expanding: left_expanding.clone(),
        pos,
        tree: tree.with_branch(top, children),
      });
    }

    // the work-list is LIFO, so the first alternative goes on last
    self.work.extend(branches.into_iter().rev());
  }

  /// Tries to realize the lexical category `top` with the next input token
  fn scan(
    &mut self,
    top: SymbolInstance<'a>,
    pending: Vec<SymbolInstance<'a>>,
    pos: usize,
    tree: SynTree<'a>,
  ) {
    let Some(&token) = self.input.get(pos) else {
      return;
    };
    if !self.lexicon.realizes(token, top.symbol) {
      return;
    }

    let tree = tree.with_leaf(top, token);
    let pos = pos + 1;

    match (pos == self.input.len(), pending.is_empty()) {
      (true, true) => {
        self.stats.derivations += 1;
        self.trees.insert(tree.to_string());
      }
      (false, false) => self.work.push(Branch {
        pending,
        left_expanding: HashSet::new(),
        pos,
        tree,
      }),
      // ran out of input or out of symbols first
      _ => {}
    }
  }
}

/// Fails on the first token that has no lexicon entry at all
pub fn check_tokens(lexicon: &Lexicon, input: &[&str]) -> Result<(), ParseError> {
  match input.iter().find(|token| !lexicon.contains_token(token)) {
    Some(token) => Err(ParseError::UnknownWord(token.to_string())),
    None => Ok(()),
  }
}

/// Every distinct rendering of a derivation of `grammar.start` that consumes
/// all of `input`, sorted.
pub fn parse(
  grammar: &Grammar,
  lexicon: &Lexicon,
  input: &[&str],
) -> Result<BTreeSet<String>, ParseError> {
  parse_with_stats(grammar, lexicon, input).map(|(trees, _)| trees)
}

pub fn parse_with_stats(
  grammar: &Grammar,
  lexicon: &Lexicon,
  input: &[&str],
) -> Result<(BTreeSet<String>, SearchStats), ParseError> {
  check_tokens(lexicon, input)?;

  let (trees, stats) = Search::new(grammar, lexicon, input).run();
  debug!(
    tokens = input.len(),
    branches = stats.branches,
    left_recursions = stats.left_recursions,
    derivations = stats.derivations,
    trees = trees.len(),
    "search finished"
  );
  Ok((trees, stats))
}
