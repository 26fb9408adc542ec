//! Hierarchy nodes.
//!
//! A [`State`] is an immutable marker naming a mode of behavior. States form
//! a forest: each node has a unique name and at most one parent. Nodes are
//! cheap to clone (shared handle) and are normally created once at startup.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A node in the state hierarchy.
///
/// Equality and hashing use the state's name, which is its identity key in a
/// [`Registry`](crate::registry::Registry). Use [`State::same_node`] to
/// compare handles.
///
/// # Example
///
/// ```rust
/// use hsmkit::core::State;
///
/// let root = State::root("Root");
/// let ready = root.child("Ready");
///
/// assert_eq!(ready.parent(), Some(&root));
/// assert!(root.is_root());
/// assert_eq!(
///     ready.path().iter().map(State::name).collect::<Vec<_>>(),
///     vec!["Root", "Ready"]
/// );
/// ```
#[derive(Clone)]
pub struct State {
    node: Arc<Node>,
}

struct Node {
    name: String,
    parent: Option<State>,
}

impl State {
    /// Create a state with an optional parent.
    ///
    /// No validation happens here; duplicate names are diagnosed by the
    /// registry.
    pub fn new(name: impl Into<String>, parent: Option<&State>) -> Self {
        Self {
            node: Arc::new(Node {
                name: name.into(),
                parent: parent.cloned(),
            }),
        }
    }

    /// Create a root state (no parent).
    pub fn root(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    /// Create a state whose parent is `self`.
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self::new(name, Some(self))
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn parent(&self) -> Option<&State> {
        self.node.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    /// Walk from this state up to its root, inclusive of `self`.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// The full path from the root down to this state.
    pub fn path(&self) -> Vec<State> {
        let mut path: Vec<State> = self.ancestors().cloned().collect();
        path.reverse();
        path
    }

    /// True if both handles point at the same node.
    pub fn same_node(&self, other: &State) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name())
            .field("parent", &self.parent().map(State::name))
            .finish()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Iterator over a state and its ancestors, closest first.
pub struct Ancestors<'a> {
    next: Option<&'a State>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a State;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}
