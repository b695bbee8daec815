use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// One occurrence of a symbol within a derivation. Identity is the id alone.
#[derive(Debug, Copy, Clone)]
pub struct SymbolInstance<'a> {
  pub symbol: &'a str,
  pub id: usize,
}

impl<'a> SymbolInstance<'a> {
  pub fn new(symbol: &'a str, id: usize) -> Self {
    Self { symbol, id }
  }
}

impl PartialEq for SymbolInstance<'_> {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for SymbolInstance<'_> {}

impl PartialOrd for SymbolInstance<'_> {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for SymbolInstance<'_> {
  fn cmp(&self, other: &Self) -> Ordering {
    self.id.cmp(&other.id)
  }
}

impl Hash for SymbolInstance<'_> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Display for SymbolInstance<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}#{}", self.symbol, self.id)
  }
}

/// What a symbol instance was expanded into
#[derive(Debug, Clone, PartialEq)]
pub enum Children<'a> {
  Branch(Vec<SymbolInstance<'a>>),
  Leaf(&'a str),
}

impl Children<'_> {
  pub fn is_leaf(&self) -> bool {
    matches!(self, Self::Leaf(_))
  }

  pub fn is_branch(&self) -> bool {
    matches!(self, Self::Branch(_))
  }
}

#[derive(Debug)]
struct Edge<'a> {
  parent: SymbolInstance<'a>,
  children: Children<'a>,
  prev: Option<Rc<Edge<'a>>>,
}

/// A parse tree under construction.
///
/// Edges form a persistent list: extending a tree allocates one new edge that
/// points at the old head, so every earlier tree value stays valid and shares
/// its edges with all trees grown from it. Cloning is an Rc bump.
#[derive(Debug, Clone)]
pub struct SynTree<'a> {
  root: SymbolInstance<'a>,
  head: Option<Rc<Edge<'a>>>,
  len: usize,
}

impl<'a> SynTree<'a> {
  /// A tree with no edges yet, whose root will be `root`
  pub fn new(root: SymbolInstance<'a>) -> Self {
    Self {
      root,
      head: None,
      len: 0,
    }
  }

  pub fn root(&self) -> SymbolInstance<'a> {
    self.root
  }

  /// Number of expanded symbol instances
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// New tree with `parent` expanded into `children`
  pub fn with_branch(&self, parent: SymbolInstance<'a>, children: Vec<SymbolInstance<'a>>) -> Self {
    self.extend(parent, Children::Branch(children))
  }

  /// New tree with `parent` realized as the terminal `token`
  pub fn with_leaf(&self, parent: SymbolInstance<'a>, token: &'a str) -> Self {
    self.extend(parent, Children::Leaf(token))
  }

  fn extend(&self, parent: SymbolInstance<'a>, children: Children<'a>) -> Self {
    debug_assert!(
      self.children(parent).is_none(),
      "{} is already expanded",
      parent
    );

    Self {
      root: self.root,
      head: Some(Rc::new(Edge {
        parent,
        children,
        prev: self.head.clone(),
      })),
      len: self.len + 1,
    }
  }

  /// Newest edges first
  pub fn edges(&self) -> Edges<'_, 'a> {
    Edges {
      next: self.head.as_deref(),
    }
  }

  pub fn children(&self, parent: SymbolInstance<'a>) -> Option<&Children<'a>> {
    self
      .edges()
      .find(|(p, _)| *p == parent)
      .map(|(_, children)| children)
  }

  fn fmt_node(
    f: &mut fmt::Formatter<'_>,
    index: &HashMap<usize, &Children<'a>>,
    node: SymbolInstance<'a>,
  ) -> fmt::Result {
    match index.get(&node.id) {
      // not expanded yet, only happens for partial trees
      None => write!(f, "{}", node.symbol),
      Some(Children::Leaf(token)) => write!(f, "{}/[{}]", node.symbol, token),
      Some(Children::Branch(children)) => {
        write!(f, "{}/[", node.symbol)?;
        for (idx, child) in children.iter().enumerate() {
          if idx > 0 {
            write!(f, ",")?;
          }
          Self::fmt_node(f, index, *child)?;
        }
        write!(f, "]")
      }
    }
  }
}

/// Renders `symbol/[child1,child2,...]` from the root, terminals as their token
impl fmt::Display for SynTree<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let index = self
      .edges()
      .map(|(parent, children)| (parent.id, children))
      .collect::<HashMap<_, _>>();
    Self::fmt_node(f, &index, self.root)
  }
}

impl Drop for SynTree<'_> {
  // unlink the edge list iteratively so long trees can't overflow the stack
  fn drop(&mut self) {
    let mut next = self.head.take();
    while let Some(edge) = next {
      match Rc::try_unwrap(edge) {
        Ok(mut edge) => next = edge.prev.take(),
        Err(_) => break,
      }
    }
  }
}

pub struct Edges<'t, 'a> {
  next: Option<&'t Edge<'a>>,
}

impl<'t, 'a> Iterator for Edges<'t, 'a> {
  type Item = (SymbolInstance<'a>, &'t Children<'a>);

  fn next(&mut self) -> Option<Self::Item> {
    let edge = self.next?;
    self.next = edge.prev.as_deref();
    Some((edge.parent, &edge.children))
  }
}
