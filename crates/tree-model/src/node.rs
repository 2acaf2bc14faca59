//! Core node types for the tree model

use smallvec::SmallVec;
use std::fmt;

use crate::geometry::Point;

/// Child lists are short for most hierarchies.
pub(crate) type ChildList = SmallVec<[NodeId; 4]>;

/// Unique identifier for a node within a tree
///
/// Internally represented as an index into an arena-based storage. Ids are
/// assigned in pre-order when the model is built and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node always has ID 0
    pub const ROOT: NodeId = NodeId(0);

    /// Create a new NodeId from a usize
    pub const fn new(id: usize) -> Self {
        NodeId(id)
    }

    /// Get the inner usize value
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(id: usize) -> Self {
        NodeId(id)
    }
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// A single node in the tree
///
/// A node has visible children, hidden (collapsed) children, or neither;
/// never both at once. The child lists are only mutated through
/// [`TreeModel`](crate::TreeModel) so that invariant holds.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    children: ChildList,
    hidden_children: ChildList,
    /// Distance from the root, refreshed on every layout pass.
    pub depth: usize,
    /// Current canvas position.
    pub position: Point,
    /// Position at the end of the previous layout pass.
    pub previous_position: Point,
}

impl Node {
    pub(crate) fn new(name: String, parent: Option<NodeId>, depth: usize) -> Self {
        Self {
            name,
            parent,
            children: ChildList::new(),
            hidden_children: ChildList::new(),
            depth,
            position: Point::ZERO,
            previous_position: Point::ZERO,
        }
    }

    /// The display label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label length in characters
    pub fn label_len(&self) -> usize {
        self.name.chars().count()
    }

    /// Structural parent, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Currently visible children
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Children collapsed away
    pub fn hidden_children(&self) -> &[NodeId] {
        &self.hidden_children
    }

    /// Visible and hidden children, whichever list is populated
    pub fn all_children(&self) -> &[NodeId] {
        if self.children.is_empty() {
            &self.hidden_children
        } else {
            &self.children
        }
    }

    /// Returns true if this node has hidden children
    pub fn is_collapsed(&self) -> bool {
        !self.hidden_children.is_empty()
    }

    /// Returns true if this node has no children at all
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.hidden_children.is_empty()
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn child_lists_mut(&mut self) -> (&mut ChildList, &mut ChildList) {
        (&mut self.children, &mut self.hidden_children)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_collapsed() {
            "+ "
        } else if self.children.is_empty() {
            ""
        } else {
            "- "
        };
        write!(f, "{}{}", marker, self.name)
    }
}
