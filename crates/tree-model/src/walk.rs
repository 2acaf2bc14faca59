//! Stack-based pre-order walkers
//!
//! Both walkers keep their own work stack, so stack usage does not grow
//! with tree depth. Each call to [`TreeModel::traverse`] or
//! [`TreeModel::walk_all`] starts a fresh walk.
//!
//! [`TreeModel::traverse`]: crate::TreeModel::traverse
//! [`TreeModel::walk_all`]: crate::TreeModel::walk_all

use crate::model::TreeModel;
use crate::node::{Node, NodeId};

/// Pre-order iterator over nodes that are not hidden behind a collapsed
/// ancestor.
pub struct VisibleWalker<'a> {
    inner: Walker<'a>,
}

/// Pre-order iterator over every node, collapsed or not.
pub struct FullWalker<'a> {
    inner: Walker<'a>,
}

struct Walker<'a> {
    tree: &'a TreeModel,
    stack: Vec<NodeId>,
    children_of: fn(&Node) -> &[NodeId],
}

impl<'a> Walker<'a> {
    fn new(tree: &'a TreeModel, start: NodeId, children_of: fn(&Node) -> &[NodeId]) -> Self {
        let stack = if tree.get(start).is_some() {
            vec![start]
        } else {
            Vec::new()
        };
        Self {
            tree,
            stack,
            children_of,
        }
    }

    fn next_preorder(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;

        // Push in reverse so the first child is popped first
        if let Some(node) = self.tree.get(current) {
            self.stack
                .extend((self.children_of)(node).iter().rev().copied());
        }

        Some(current)
    }
}

impl<'a> VisibleWalker<'a> {
    pub(crate) fn new(tree: &'a TreeModel, start: NodeId) -> Self {
        Self {
            inner: Walker::new(tree, start, Node::children),
        }
    }
}

impl<'a> FullWalker<'a> {
    pub(crate) fn new(tree: &'a TreeModel, start: NodeId) -> Self {
        Self {
            inner: Walker::new(tree, start, Node::all_children),
        }
    }
}

impl Iterator for VisibleWalker<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_preorder()
    }
}

impl Iterator for FullWalker<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_preorder()
    }
}
