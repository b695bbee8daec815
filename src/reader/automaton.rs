//! Character classes and the two transition tables used by the rule reader.

/// The alphabet both automata run over
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CharClass {
  Letter,
  Space,
  Hyphen,
  Greater,
  Comma,
  Period,
  Quote,
  Backslash,
  Other,
  End,
  Invalid,
}

impl CharClass {
  pub const COUNT: usize = 11;

  /// Classify the character under the cursor. `None` is the end of input.
  pub fn of(c: Option<char>) -> Self {
    match c {
      None => Self::End,
      Some(c) if c.is_alphabetic() => Self::Letter,
      Some(c) if c.is_whitespace() => Self::Space,
      Some('-') => Self::Hyphen,
      Some('>') => Self::Greater,
      Some(',') => Self::Comma,
      Some('.') => Self::Period,
      Some('\'') => Self::Quote,
      Some('\\') => Self::Backslash,
      Some(c) if !c.is_control() => Self::Other,
      Some(_) => Self::Invalid,
    }
  }

  fn idx(self) -> usize {
    self as usize
  }
}

pub type State = usize;

/// What the reader does with the current character after entering a state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tag {
  Skip,
  /// Append to the left-hand symbol
  AppendLhs,
  /// Append to the current right-hand buffer
  AppendRhs,
  /// Drop the backslash preceding this character, then append it
  AppendRhsUnescaped,
  /// Open a new element in the right-hand list
  NextRhs,
  Stop,
}

/// Deterministic automaton as a (state, class) -> state table plus one tag per state.
#[derive(Debug)]
pub struct Automaton {
  pub name: &'static str,
  pub start: State,
  delta: Vec<[Option<State>; CharClass::COUNT]>,
  tags: Vec<Tag>,
}

impl Automaton {
  fn new(
    name: &'static str,
    start: State,
    tags: Vec<Tag>,
    transitions: &[(State, &[CharClass], State)],
  ) -> Self {
    let mut delta = vec![[None; CharClass::COUNT]; tags.len()];
    for &(from, classes, to) in transitions {
      assert!(to < tags.len(), "transition into unknown state {}", to);
      for class in classes {
        let slot = &mut delta[from][class.idx()];
        assert!(slot.is_none(), "{} is not deterministic at {}/{:?}", name, from, class);
        *slot = Some(to);
      }
    }

    Self {
      name,
      start,
      delta,
      tags,
    }
  }

  pub fn next(&self, q: State, class: CharClass) -> Option<State> {
    self.delta[q][class.idx()]
  }

  pub fn tag(&self, q: State) -> Tag {
    self.tags[q]
  }

  pub fn is_stop(&self, q: State) -> bool {
    self.tag(q) == Tag::Stop
  }

  pub fn len(&self) -> usize {
    self.tags.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

use CharClass::*;

/// Printable characters that stand for themselves inside a quoted token
const LITERAL: &[CharClass] = &[Letter, Other, Hyphen, Greater, Comma, Period];

/// `Lhs --> Sym1, Sym2, ..., SymN.`
pub mod grammar_states {
  use super::State;

  pub const START: State = 0;
  pub const LHS: State = 1;
  pub const AFTER_LHS: State = 2;
  pub const ARROW_1: State = 3;
  pub const ARROW_2: State = 4;
  pub const ARROW: State = 5;
  pub const AFTER_ARROW: State = 6;
  pub const RHS: State = 7;
  pub const AFTER_RHS: State = 8;
  pub const COMMA: State = 9;
  pub const AFTER_COMMA: State = 10;
  pub const PERIOD: State = 11;
  pub const STOP: State = 12;
}

fn grammar_automaton() -> Automaton {
  use grammar_states::*;

  let mut tags = vec![Tag::Skip; STOP + 1];
  tags[LHS] = Tag::AppendLhs;
  tags[RHS] = Tag::AppendRhs;
  tags[COMMA] = Tag::NextRhs;
  tags[STOP] = Tag::Stop;

  Automaton::new(
    "grammar",
    START,
    tags,
    &[
      (START, &[Space], START),
      (START, &[Letter], LHS),
      (START, &[End], STOP),
      (LHS, &[Letter], LHS),
      (LHS, &[Space], AFTER_LHS),
      (LHS, &[Hyphen], ARROW_1),
      (AFTER_LHS, &[Space], AFTER_LHS),
      (AFTER_LHS, &[Hyphen], ARROW_1),
      (ARROW_1, &[Hyphen], ARROW_2),
      (ARROW_2, &[Greater], ARROW),
      (ARROW, &[Space], AFTER_ARROW),
      (ARROW, &[Letter], RHS),
      (AFTER_ARROW, &[Space], AFTER_ARROW),
      (AFTER_ARROW, &[Letter], RHS),
      (RHS, &[Letter], RHS),
      (RHS, &[Space], AFTER_RHS),
      (RHS, &[Comma], COMMA),
      (RHS, &[Period], PERIOD),
      (AFTER_RHS, &[Space], AFTER_RHS),
      (AFTER_RHS, &[Comma], COMMA),
      (AFTER_RHS, &[Period], PERIOD),
      (COMMA, &[Space], AFTER_COMMA),
      (COMMA, &[Letter], RHS),
      (AFTER_COMMA, &[Space], AFTER_COMMA),
      (AFTER_COMMA, &[Letter], RHS),
      (PERIOD, &[Space, End], STOP),
    ],
  )
}

/// `Lhs --> 'token text'.` or `Lhs --> token.`
pub mod lexicon_states {
  use super::State;

  pub const START: State = 0;
  pub const LHS: State = 1;
  pub const AFTER_LHS: State = 2;
  pub const ARROW_1: State = 3;
  pub const ARROW_2: State = 4;
  pub const ARROW: State = 5;
  pub const AFTER_ARROW: State = 6;
  pub const BARE: State = 7;
  pub const OPEN_QUOTE: State = 8;
  pub const QUOTED: State = 9;
  pub const BACKSLASH: State = 10;
  pub const ESCAPED_QUOTE: State = 11;
  pub const CLOSE_QUOTE: State = 12;
  pub const AFTER_TOKEN: State = 13;
  pub const PERIOD: State = 14;
  pub const STOP: State = 15;
}

fn lexicon_automaton() -> Automaton {
  use lexicon_states::*;

  let mut tags = vec![Tag::Skip; STOP + 1];
  tags[LHS] = Tag::AppendLhs;
  tags[BARE] = Tag::AppendRhs;
  tags[QUOTED] = Tag::AppendRhs;
  tags[BACKSLASH] = Tag::AppendRhs;
  tags[ESCAPED_QUOTE] = Tag::AppendRhsUnescaped;
  tags[STOP] = Tag::Stop;

  Automaton::new(
    "lexicon",
    START,
    tags,
    &[
      (START, &[Space], START),
      (START, &[Letter], LHS),
      (START, &[End], STOP),
      (LHS, &[Letter], LHS),
      (LHS, &[Space], AFTER_LHS),
      (LHS, &[Hyphen], ARROW_1),
      (AFTER_LHS, &[Space], AFTER_LHS),
      (AFTER_LHS, &[Hyphen], ARROW_1),
      (ARROW_1, &[Hyphen], ARROW_2),
      (ARROW_2, &[Greater], ARROW),
      (ARROW, &[Space], AFTER_ARROW),
      (ARROW, &[Quote], OPEN_QUOTE),
      (ARROW, &[Letter], BARE),
      (AFTER_ARROW, &[Space], AFTER_ARROW),
      (AFTER_ARROW, &[Quote], OPEN_QUOTE),
      (AFTER_ARROW, &[Letter], BARE),
      // bare tokens are letters only
      (BARE, &[Letter], BARE),
      (BARE, &[Space], AFTER_TOKEN),
      (BARE, &[Period], PERIOD),
      (OPEN_QUOTE, LITERAL, QUOTED),
      (OPEN_QUOTE, &[Backslash], BACKSLASH),
      (QUOTED, LITERAL, QUOTED),
      (QUOTED, &[Backslash], BACKSLASH),
      (QUOTED, &[Quote], CLOSE_QUOTE),
      // a backslash is kept unless it escapes a quote
      (BACKSLASH, LITERAL, QUOTED),
      (BACKSLASH, &[Backslash], BACKSLASH),
      (BACKSLASH, &[Quote], ESCAPED_QUOTE),
      (ESCAPED_QUOTE, LITERAL, QUOTED),
      (ESCAPED_QUOTE, &[Backslash], BACKSLASH),
      (ESCAPED_QUOTE, &[Quote], CLOSE_QUOTE),
      (CLOSE_QUOTE, &[Space], AFTER_TOKEN),
      (CLOSE_QUOTE, &[Period], PERIOD),
      (AFTER_TOKEN, &[Space], AFTER_TOKEN),
      (AFTER_TOKEN, &[Period], PERIOD),
      (PERIOD, &[Space, End], STOP),
    ],
  )
}

lazy_static! {
  pub static ref GRAMMAR: Automaton = grammar_automaton();
  pub static ref LEXICON: Automaton = lexicon_automaton();
}
