//! Arena-backed tree with per-node collapse state

use anyhow::Context;
use derive_more::Display;
use log::{debug, trace};
use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::error::MalformedInputError;
use crate::geometry::Point;
use crate::input::InputNode;
use crate::node::{Node, NodeId};
use crate::walk::{FullWalker, VisibleWalker};

/// What [`TreeModel::toggle_collapse`] did to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ToggleOutcome {
    /// Visible children moved to the hidden list
    #[display(fmt = "Collapsed")]
    Collapsed,
    /// Hidden children restored
    #[display(fmt = "Expanded")]
    Expanded,
    /// The node has no children; nothing changed
    #[display(fmt = "Leaf")]
    Leaf,
}

/// Aggregates over the visible part of the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of visible nodes (root included)
    pub visible_count: usize,
    /// Longest visible label, in characters
    pub max_label_len: usize,
}

/// The canonical hierarchy of a dendrogram.
///
/// Nodes live in a flat arena and are addressed by [`NodeId`]. Ids are
/// handed out in pre-order at construction, so the root is always
/// [`NodeId::ROOT`]. Interaction only moves ids between a node's visible
/// and hidden child lists; nodes are never created or destroyed after
/// construction.
#[derive(Debug, Clone)]
pub struct TreeModel {
    nodes: Vec<Node>,
}

impl TreeModel {
    /// Build a model from validated input.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedInputError`] if any record has a missing or empty
    /// name. Nothing is built in that case.
    pub fn from_input(root: InputNode) -> Result<Self, MalformedInputError> {
        root.validate()?;

        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<(InputNode, Option<NodeId>, usize)> = vec![(root, None, 0)];

        while let Some((input, parent, depth)) = stack.pop() {
            let id = NodeId::new(nodes.len());
            let name = input.name.unwrap_or_default();
            nodes.push(Node::new(name, parent, depth));

            if let Some(parent) = parent {
                nodes[parent.get()].push_child(id);
            }

            // Reverse so children come off the stack in input order
            for child in input.children.into_iter().rev() {
                stack.push((child, Some(id), depth + 1));
            }
        }

        debug!("Built tree model with {} nodes", nodes.len());
        Ok(Self { nodes })
    }

    /// Parse a JSON document. `null` is treated as an empty tree.
    pub fn from_json(json: &str) -> Result<Self, MalformedInputError> {
        let root: Option<InputNode> = serde_json::from_str(json)?;
        Self::from_input(root.ok_or(MalformedInputError::MissingRoot)?)
    }

    /// Parse a JSON document from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, MalformedInputError> {
        let root: Option<InputNode> = serde_json::from_reader(reader)?;
        Self::from_input(root.ok_or(MalformedInputError::MissingRoot)?)
    }

    /// Load a JSON document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open tree file {}", path.display()))?;
        let model = Self::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("Malformed tree file {}", path.display()))?;
        Ok(model)
    }

    /// The root node ID
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Total number of nodes, hidden ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a model has at least a root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by its ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.get())
    }

    /// Get a node by its ID for position updates
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.get())
    }

    /// Get a node by an ID handed out by this model.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this model.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.get()]
    }

    /// Visible nodes in pre-order, starting at the root.
    pub fn traverse(&self) -> VisibleWalker<'_> {
        VisibleWalker::new(self, self.root())
    }

    /// Visible nodes in pre-order, starting at `start`.
    pub fn traverse_from(&self, start: NodeId) -> VisibleWalker<'_> {
        VisibleWalker::new(self, start)
    }

    /// Every node in pre-order, ignoring collapse state.
    pub fn walk_all(&self) -> FullWalker<'_> {
        FullWalker::new(self, self.root())
    }

    /// Visible node count and longest visible label.
    pub fn stats(&self) -> TreeStats {
        self.traverse()
            .fold(TreeStats::default(), |mut stats, id| {
                stats.visible_count += 1;
                stats.max_label_len = stats.max_label_len.max(self.node(id).label_len());
                stats
            })
    }

    /// Order every node's children by case-insensitive name.
    ///
    /// The sort is stable, so repeated calls do not reorder anything.
    pub fn sort(&mut self) {
        for index in 0..self.nodes.len() {
            let (children, hidden) = self.nodes[index].child_lists_mut();
            let mut children = std::mem::take(children);
            let mut hidden = std::mem::take(hidden);

            children.sort_by_cached_key(|id| self.nodes[id.get()].name().to_lowercase());
            hidden.sort_by_cached_key(|id| self.nodes[id.get()].name().to_lowercase());

            let (slot, hidden_slot) = self.nodes[index].child_lists_mut();
            *slot = children;
            *hidden_slot = hidden;
        }
    }

    /// Swap a node between collapsed and expanded.
    ///
    /// Returns `None` for an unknown id.
    pub fn toggle_collapse(&mut self, id: NodeId) -> Option<ToggleOutcome> {
        let node = self.nodes.get_mut(id.get())?;
        let (children, hidden) = node.child_lists_mut();

        let outcome = if !children.is_empty() {
            std::mem::swap(children, hidden);
            children.clear();
            ToggleOutcome::Collapsed
        } else if !hidden.is_empty() {
            std::mem::swap(children, hidden);
            hidden.clear();
            ToggleOutcome::Expanded
        } else {
            ToggleOutcome::Leaf
        };

        trace!("toggle {} -> {}", id, outcome);
        Some(outcome)
    }

    /// Hide a node's children if they are visible.
    pub fn collapse(&mut self, id: NodeId) -> bool {
        let expanded = self.get(id).map_or(false, |node| !node.children().is_empty());
        if expanded {
            self.toggle_collapse(id);
        }
        expanded
    }

    /// Restore a node's children if they are hidden.
    pub fn expand(&mut self, id: NodeId) -> bool {
        let collapsed = self.get(id).map_or(false, Node::is_collapsed);
        if collapsed {
            self.toggle_collapse(id);
        }
        collapsed
    }

    /// Expand every collapsed node.
    pub fn expand_all(&mut self) {
        for index in 0..self.nodes.len() {
            self.expand(NodeId::new(index));
        }
    }

    /// Collapse every node whose structural depth is at least `depth`.
    ///
    /// `collapse_below(1)` leaves only the root and its children visible.
    pub fn collapse_below(&mut self, depth: usize) {
        let targets: Vec<NodeId> = self
            .walk_all()
            .filter(|&id| self.node(id).depth >= depth)
            .collect();
        for id in targets {
            self.collapse(id);
        }
    }

    /// Ancestors of a node, from parent to root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.get(id).and_then(Node::parent);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.node(parent).parent();
        }
        ancestors
    }

    /// True if no ancestor of the node is collapsed.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.get(id).is_some()
            && self
                .ancestors(id)
                .into_iter()
                .all(|ancestor| !self.node(ancestor).is_collapsed())
    }

    /// First node (pre-order, whole tree) with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.walk_all().find(|&id| self.node(id).name() == name)
    }

    /// Every node (pre-order, whole tree) with the given name.
    pub fn find_all_by_name(&self, name: &str) -> Vec<NodeId> {
        self.walk_all()
            .filter(|&id| self.node(id).name() == name)
            .collect()
    }

    /// First visible node with the given name.
    pub fn find_visible_by_name(&self, name: &str) -> Option<NodeId> {
        self.traverse().find(|&id| self.node(id).name() == name)
    }

    /// Set the current position of a node.
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        if let Some(node) = self.nodes.get_mut(id.get()) {
            node.position = position;
        }
    }

    /// Copy `position` into `previous_position` for every visible node.
    pub fn stash_positions(&mut self) {
        let visible: Vec<NodeId> = self.traverse().collect();
        for id in visible {
            let node = &mut self.nodes[id.get()];
            node.previous_position = node.position;
        }
    }
}

/// Indented outline of the visible tree.
impl fmt::Display for TreeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in self.traverse() {
            let node = self.node(id);
            writeln!(f, "{:indent$}{}", "", node, indent = node.depth * 2)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(tree: &TreeModel, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| tree.node(id).name().to_string()).collect()
    }

    fn sample() -> TreeModel {
        TreeModel::from_json(
            r#"{
                "name": "Root",
                "children": [
                    { "name": "b", "children": [{ "name": "b2" }, { "name": "B1" }] },
                    { "name": "A" },
                    { "name": "c" }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ids_assigned_in_preorder() {
        let tree = sample();
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.node(NodeId::ROOT).name(), "Root");
        assert_eq!(tree.node(NodeId(1)).name(), "b");
        assert_eq!(tree.node(NodeId(2)).name(), "b2");
        assert_eq!(tree.node(NodeId(4)).name(), "A");
        assert_eq!(tree.node(NodeId(2)).parent(), Some(NodeId(1)));
        assert_eq!(tree.node(NodeId(2)).depth, 2);
    }

    #[test]
    fn test_null_input_is_missing_root() {
        assert_eq!(
            TreeModel::from_json("null").unwrap_err(),
            MalformedInputError::MissingRoot
        );
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = TreeModel::from_json("{ \"name\": ").unwrap_err();
        assert!(matches!(err, MalformedInputError::Parse(_)));
    }

    #[test]
    fn test_empty_child_name_rejected() {
        let err = TreeModel::from_json(r#"{ "name": "Root", "children": [{ "name": "" }] }"#)
            .unwrap_err();
        assert_eq!(
            err,
            MalformedInputError::EmptyName {
                path: "Root/[0]".into()
            }
        );
    }

    #[test]
    fn test_single_root_is_valid() {
        let tree = TreeModel::from_json(r#"{ "name": "Root" }"#).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(tree.node(tree.root()).is_leaf());
    }

    #[test]
    fn test_sort_case_insensitive() {
        let mut tree = sample();
        tree.sort();

        let root = tree.node(tree.root()).children().to_vec();
        assert_eq!(names(&tree, &root), vec!["A", "b", "c"]);

        let b = tree.find_by_name("b").unwrap();
        let b_children = tree.node(b).children().to_vec();
        assert_eq!(names(&tree, &b_children), vec!["B1", "b2"]);
    }

    #[test]
    fn test_sort_also_orders_hidden_children() {
        let mut tree = sample();
        let b = tree.find_by_name("b").unwrap();
        tree.toggle_collapse(b);
        tree.sort();
        tree.toggle_collapse(b);

        let b_children = tree.node(b).children().to_vec();
        assert_eq!(names(&tree, &b_children), vec!["B1", "b2"]);
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut tree = sample();
        let b = tree.find_by_name("b").unwrap();
        let before = tree.node(b).children().to_vec();

        assert_eq!(tree.toggle_collapse(b), Some(ToggleOutcome::Collapsed));
        assert!(tree.node(b).children().is_empty());
        assert_eq!(tree.node(b).hidden_children(), before.as_slice());

        assert_eq!(tree.toggle_collapse(b), Some(ToggleOutcome::Expanded));
        assert_eq!(tree.node(b).children(), before.as_slice());
        assert!(tree.node(b).hidden_children().is_empty());
    }

    #[test]
    fn test_toggle_leaf_and_unknown() {
        let mut tree = sample();
        let a = tree.find_by_name("A").unwrap();
        assert_eq!(tree.toggle_collapse(a), Some(ToggleOutcome::Leaf));
        assert_eq!(tree.toggle_collapse(NodeId(42)), None);
    }

    #[test]
    fn test_stats_follow_visibility() {
        let mut tree = sample();
        assert_eq!(
            tree.stats(),
            TreeStats {
                visible_count: 6,
                max_label_len: 4
            }
        );

        tree.collapse(tree.root());
        assert_eq!(
            tree.stats(),
            TreeStats {
                visible_count: 1,
                max_label_len: 4
            }
        );
    }

    #[test]
    fn test_is_visible() {
        let mut tree = sample();
        let b = tree.find_by_name("b").unwrap();
        let b1 = tree.find_by_name("B1").unwrap();
        assert!(tree.is_visible(b1));

        tree.collapse(b);
        assert!(!tree.is_visible(b1));
        assert!(tree.is_visible(b));
        assert_eq!(tree.find_visible_by_name("B1"), None);
        assert_eq!(tree.find_by_name("B1"), Some(b1));
    }

    #[test]
    fn test_collapse_below_and_expand_all() {
        let mut tree = sample();
        tree.collapse_below(1);
        assert_eq!(tree.stats().visible_count, 4);

        tree.expand_all();
        assert_eq!(tree.stats().visible_count, 6);
    }

    #[test]
    fn test_find_all_by_name() {
        let tree = TreeModel::from_json(
            r#"{ "name": "x", "children": [{ "name": "y" }, { "name": "x" }] }"#,
        )
        .unwrap();
        assert_eq!(tree.find_all_by_name("x"), vec![NodeId(0), NodeId(2)]);
        assert_eq!(tree.find_by_name("x"), Some(NodeId(0)));
    }

    #[test]
    fn test_stash_positions_only_touches_visible() {
        let mut tree = sample();
        let b = tree.find_by_name("b").unwrap();
        let b1 = tree.find_by_name("B1").unwrap();
        tree.set_position(b, Point::new(10.0, 20.0));
        tree.set_position(b1, Point::new(30.0, 40.0));
        tree.collapse(b);

        tree.stash_positions();
        assert_eq!(tree.node(b).previous_position, Point::new(10.0, 20.0));
        assert_eq!(tree.node(b1).previous_position, Point::ZERO);
    }

    #[test]
    fn test_outline() {
        let mut tree = sample();
        tree.sort();
        tree.collapse(tree.find_by_name("b").unwrap());

        insta::assert_snapshot!(tree.to_string(), @r###"
        - Root
          A
          + b
          c
        "###);
    }
}
