//! Tree layout for the visible part of a [`TreeModel`].
//!
//! Positions are computed in two independent axes:
//!
//! - **Breadth** (`y`): a tidy tree (Buchheim, Jünger and Leipert's
//!   linear-time variant of Walker's algorithm). Siblings are one unit
//!   apart, cousins two; parents sit centred over their children. The
//!   result is stretched to a height derived from the widest level.
//! - **Depth** (`x`): `depth * max_label_len * horizontal_spacing_factor`,
//!   uniform across the whole tree.
//!
//! Every walk uses an explicit stack so deep trees cannot overflow the
//! call stack.

use log::debug;
use tree_model::{NodeId, Point, TreeModel};

use crate::options::DendrogramOptions;

/// Result of one layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSummary {
    /// Number of visible nodes positioned.
    pub visible_count: usize,
    /// Longest visible label, in characters.
    pub max_label_len: usize,
    /// Number of visible nodes at each depth (index 0 is the root level).
    pub level_breadths: Vec<usize>,
    /// Extent of the breadth axis in pixels.
    pub height: f32,
}

impl LayoutSummary {
    /// The widest level.
    pub fn max_breadth(&self) -> usize {
        self.level_breadths.iter().copied().max().unwrap_or(1)
    }
}

/// Tree layout arranges the visible nodes left to right by depth.
#[derive(Clone, Debug)]
pub struct TreeLayout {
    /// Pixels per unit of level breadth.
    pub vertical_spacing: f32,

    /// Pixels per label character per depth level.
    pub horizontal_spacing_factor: f32,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self::from_options(&DendrogramOptions::default())
    }
}

impl TreeLayout {
    /// Create a new tree layout with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the spacing constants from dendrogram options.
    pub fn from_options(options: &DendrogramOptions) -> Self {
        Self {
            vertical_spacing: options.vertical_spacing_constant,
            horizontal_spacing_factor: options.horizontal_spacing_factor,
        }
    }

    /// Set the vertical spacing constant.
    pub fn vertical_spacing(mut self, spacing: f32) -> Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Set the horizontal spacing factor.
    pub fn horizontal_spacing_factor(mut self, factor: f32) -> Self {
        self.horizontal_spacing_factor = factor;
        self
    }

    /// Position every visible node of `model`.
    ///
    /// Writes `depth` and `position`; `previous_position` is left alone so
    /// the renderer can still animate from it.
    pub fn apply(&self, model: &mut TreeModel) -> LayoutSummary {
        let stats = model.stats();
        let (mut arena, level_breadths) = LayoutArena::build(model);

        let max_breadth = level_breadths.iter().copied().max().unwrap_or(1);
        let height = max_breadth as f32 * self.vertical_spacing;

        arena.first_walk_all();
        arena.second_walk_all();
        let breadth = arena.normalized_breadth(height);

        let column_width = stats.max_label_len as f32 * self.horizontal_spacing_factor;
        for (node, y) in arena.nodes.iter().skip(1).zip(breadth) {
            let x = node.depth as f32 * column_width;
            model.set_position(node.id, Point::new(x, y));
        }

        debug!(
            "Laid out {} visible nodes, levels {:?}, height {}",
            stats.visible_count, level_breadths, height
        );

        LayoutSummary {
            visible_count: stats.visible_count,
            max_label_len: stats.max_label_len,
            level_breadths,
            height,
        }
    }
}

// ============================================================================
// Tidy tree internals
// ============================================================================

/// Working state for one visible node. Index 0 of the arena is a synthetic
/// parent of the root, which keeps the walks free of root special cases.
#[derive(Debug)]
struct LayoutNode {
    id: NodeId,
    parent: Option<usize>,
    children: Vec<usize>,
    /// Index among siblings.
    number: usize,
    depth: usize,
    /// Preliminary breadth.
    prelim: f32,
    modifier: f32,
    shift: f32,
    change: f32,
    ancestor: usize,
    thread: Option<usize>,
    /// Default ancestor used while apportioning this node's children.
    default_ancestor: Option<usize>,
    /// Final breadth before normalisation.
    breadth: f32,
}

impl LayoutNode {
    fn new(index: usize, id: NodeId, parent: Option<usize>, number: usize, depth: usize) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            number,
            depth,
            prelim: 0.0,
            modifier: 0.0,
            shift: 0.0,
            change: 0.0,
            ancestor: index,
            thread: None,
            default_ancestor: None,
            breadth: 0.0,
        }
    }
}

struct LayoutArena {
    nodes: Vec<LayoutNode>,
}

const WRAPPER: usize = 0;
const ROOT: usize = 1;

impl LayoutArena {
    /// Copy the visible tree into the arena (pre-order) and count level
    /// breadths. Also refreshes each node's depth in the model.
    fn build(model: &mut TreeModel) -> (Self, Vec<usize>) {
        let root = model.root();
        let mut nodes = vec![LayoutNode::new(WRAPPER, root, None, 0, 0)];
        let mut level_breadths = vec![1];
        let mut stack: Vec<(NodeId, usize, usize, usize)> = vec![(root, WRAPPER, 0, 0)];

        while let Some((id, parent, number, depth)) = stack.pop() {
            let index = nodes.len();
            nodes.push(LayoutNode::new(index, id, Some(parent), number, depth));
            nodes[parent].children.push(index);

            let Some(node) = model.get_mut(id) else {
                continue;
            };
            node.depth = depth;

            let children = node.children();
            if !children.is_empty() {
                if level_breadths.len() <= depth + 1 {
                    level_breadths.push(0);
                }
                level_breadths[depth + 1] += children.len();
            }
            for (number, &child) in children.iter().enumerate().rev() {
                stack.push((child, index, number, depth + 1));
            }
        }

        (Self { nodes }, level_breadths)
    }

    fn separation(&self, a: usize, b: usize) -> f32 {
        if self.nodes[a].parent == self.nodes[b].parent {
            1.0
        } else {
            2.0
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.first().copied().or(self.nodes[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.last().copied().or(self.nodes[v].thread)
    }

    /// Post-order over the real tree, children left to right.
    fn first_walk_all(&mut self) {
        let mut pending = vec![ROOT];
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(v) = pending.pop() {
            order.push(v);
            pending.extend(self.nodes[v].children.iter().copied());
        }
        while let Some(v) = order.pop() {
            self.first_walk(v);
        }
    }

    fn first_walk(&mut self, v: usize) {
        let Some(parent) = self.nodes[v].parent else {
            return;
        };
        let number = self.nodes[v].number;
        let left_sibling = number
            .checked_sub(1)
            .map(|left| self.nodes[parent].children[left]);

        let children = &self.nodes[v].children;
        let outermost = children.first().copied().zip(children.last().copied());

        if let Some((first, last)) = outermost {
            self.execute_shifts(v);
            let midpoint = (self.nodes[first].prelim + self.nodes[last].prelim) / 2.0;
            if let Some(w) = left_sibling {
                self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
                self.nodes[v].modifier = self.nodes[v].prelim - midpoint;
            } else {
                self.nodes[v].prelim = midpoint;
            }
        } else if let Some(w) = left_sibling {
            self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
        }

        let default_ancestor = self.nodes[parent]
            .default_ancestor
            .unwrap_or(self.nodes[parent].children[0]);
        let ancestor = self.apportion(v, left_sibling, default_ancestor);
        self.nodes[parent].default_ancestor = Some(ancestor);
    }

    /// Push the subtree at `v` right until it clears every subtree to its
    /// left, threading contours as it goes.
    fn apportion(&mut self, v: usize, left_sibling: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = left_sibling else {
            return ancestor;
        };
        let Some(parent) = self.nodes[v].parent else {
            return ancestor;
        };

        // inner/outer contours of the right (p) and left (m) subtrees
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.nodes[parent].children[0];
        let mut sip = self.nodes[vip].modifier;
        let mut sop = self.nodes[vop].modifier;
        let mut sim = self.nodes[vim].modifier;
        let mut som = self.nodes[vom].modifier;

        let (next_vim, next_vip) = loop {
            let next_vim = self.next_right(vim);
            let next_vip = self.next_left(vip);
            let (Some(im), Some(ip)) = (next_vim, next_vip) else {
                break (next_vim, next_vip);
            };
            vim = im;
            vip = ip;
            vom = self.next_left(vom).unwrap_or(vom);
            vop = self.next_right(vop).unwrap_or(vop);
            self.nodes[vop].ancestor = v;

            let shift = self.nodes[vim].prelim + sim - self.nodes[vip].prelim - sip
                + self.separation(vim, vip);
            if shift > 0.0 {
                let from = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(from, v, shift);
                sip += shift;
                sop += shift;
            }

            sim += self.nodes[vim].modifier;
            sip += self.nodes[vip].modifier;
            som += self.nodes[vom].modifier;
            sop += self.nodes[vop].modifier;
        };

        if let Some(im) = next_vim {
            if self.next_right(vop).is_none() {
                self.nodes[vop].thread = Some(im);
                self.nodes[vop].modifier += sim - sop;
            }
        }
        if let Some(ip) = next_vip {
            if self.next_left(vom).is_none() {
                self.nodes[vom].thread = Some(ip);
                self.nodes[vom].modifier += sip - som;
                ancestor = v;
            }
        }

        ancestor
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let candidate = self.nodes[vim].ancestor;
        if self.nodes[candidate].parent == self.nodes[v].parent {
            candidate
        } else {
            ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f32) {
        let gap = self.nodes[wp].number as f32 - self.nodes[wm].number as f32;
        let change = if gap > 0.0 { shift / gap } else { 0.0 };
        self.nodes[wp].change -= change;
        self.nodes[wp].shift += shift;
        self.nodes[wm].change += change;
        self.nodes[wp].prelim += shift;
        self.nodes[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for index in (0..self.nodes[v].children.len()).rev() {
            let w = self.nodes[v].children[index];
            let child = &mut self.nodes[w];
            child.prelim += shift;
            child.modifier += shift;
            change += child.change;
            shift += child.shift + change;
        }
    }

    /// Pre-order: resolve accumulated modifiers into final breadths.
    fn second_walk_all(&mut self) {
        self.nodes[WRAPPER].modifier = -self.nodes[ROOT].prelim;

        let mut stack = vec![ROOT];
        while let Some(v) = stack.pop() {
            let parent_modifier = self.nodes[v]
                .parent
                .map_or(0.0, |parent| self.nodes[parent].modifier);
            let node = &mut self.nodes[v];
            node.breadth = node.prelim + parent_modifier;
            node.modifier += parent_modifier;
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Breadths of the real nodes (arena order) stretched into `[0, extent]`.
    fn normalized_breadth(&self, extent: f32) -> Vec<f32> {
        let mut left = ROOT;
        let mut right = ROOT;
        for index in ROOT..self.nodes.len() {
            if self.nodes[index].breadth < self.nodes[left].breadth {
                left = index;
            }
            if self.nodes[index].breadth > self.nodes[right].breadth {
                right = index;
            }
        }

        let tx = self.separation(left, right) / 2.0 - self.nodes[left].breadth;
        let kx = extent / (self.nodes[right].breadth + self.separation(right, left) / 2.0 + tx);

        self.nodes[ROOT..]
            .iter()
            .map(|node| (node.breadth + tx) * kx)
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tree_model::InputNode;

    fn model(json: &str) -> TreeModel {
        let mut model = TreeModel::from_json(json).unwrap();
        model.sort();
        model
    }

    fn position(model: &TreeModel, name: &str) -> Point {
        model.node(model.find_by_name(name).unwrap()).position
    }

    #[test]
    fn test_root_with_two_children() {
        let mut model = model(r#"{ "name": "Root", "children": [{ "name": "B" }, { "name": "A" }] }"#);
        let summary = TreeLayout::new().apply(&mut model);

        assert_eq!(summary.visible_count, 3);
        assert_eq!(summary.max_label_len, 4);
        assert_eq!(summary.level_breadths, vec![1, 2]);
        assert_eq!(summary.height, 300.0);

        assert_eq!(position(&model, "Root"), Point::new(0.0, 150.0));
        assert_eq!(position(&model, "A"), Point::new(40.0, 75.0));
        assert_eq!(position(&model, "B"), Point::new(40.0, 225.0));
    }

    #[test]
    fn test_single_node() {
        let mut model = model(r#"{ "name": "Solo" }"#);
        let summary = TreeLayout::new().apply(&mut model);

        assert_eq!(summary.level_breadths, vec![1]);
        assert_eq!(summary.height, 150.0);
        assert_eq!(position(&model, "Solo"), Point::new(0.0, 75.0));
    }

    #[test]
    fn test_height_follows_widest_level() {
        let mut model = model(
            r#"{ "name": "R", "children": [
                { "name": "A", "children": [{ "name": "A1" }, { "name": "A2" }, { "name": "A3" }] },
                { "name": "B", "children": [{ "name": "B1" }] }
            ] }"#,
        );
        let summary = TreeLayout::new().apply(&mut model);
        assert_eq!(summary.level_breadths, vec![1, 2, 4]);
        assert_eq!(summary.height, 600.0);

        let a = model.find_by_name("A").unwrap();
        model.collapse(a);
        let summary = TreeLayout::new().apply(&mut model);
        assert_eq!(summary.level_breadths, vec![1, 2, 1]);
        assert_eq!(summary.height, 300.0);
    }

    #[test]
    fn test_depth_and_columns() {
        let mut model = model(
            r#"{ "name": "R", "children": [{ "name": "Longer", "children": [{ "name": "x" }] }] }"#,
        );
        TreeLayout::new().horizontal_spacing_factor(5.0).apply(&mut model);

        let x = model.find_by_name("x").unwrap();
        assert_eq!(model.node(x).depth, 2);
        assert_eq!(model.node(x).position.x, 2.0 * 6.0 * 5.0);
    }

    #[test]
    fn test_parent_centred_over_children() {
        let mut model = model(
            r#"{ "name": "R", "children": [
                { "name": "A", "children": [{ "name": "A1" }, { "name": "A2" }, { "name": "A3" }] },
                { "name": "B" }
            ] }"#,
        );
        TreeLayout::new().apply(&mut model);

        let a = position(&model, "A").y;
        let a1 = position(&model, "A1").y;
        let a3 = position(&model, "A3").y;
        assert!((a - (a1 + a3) / 2.0).abs() < 1e-3);
        assert!(position(&model, "A2").y > a1);
        assert!(position(&model, "B").y > a);
    }

    #[test]
    fn test_cousins_are_further_apart_than_siblings() {
        let mut model = model(
            r#"{ "name": "R", "children": [
                { "name": "A", "children": [{ "name": "A1" }, { "name": "A2" }] },
                { "name": "B", "children": [{ "name": "B1" }, { "name": "B2" }] }
            ] }"#,
        );
        TreeLayout::new().apply(&mut model);

        let sibling_gap = position(&model, "A2").y - position(&model, "A1").y;
        let cousin_gap = position(&model, "B1").y - position(&model, "A2").y;
        assert!((cousin_gap - 2.0 * sibling_gap).abs() < 1e-3);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut model = model(
            r#"{ "name": "R", "children": [
                { "name": "A", "children": [{ "name": "A1" }, { "name": "A2" }] },
                { "name": "B" },
                { "name": "C", "children": [{ "name": "C1", "children": [{ "name": "C11" }] }] }
            ] }"#,
        );
        let layout = TreeLayout::new();

        layout.apply(&mut model);
        let first: Vec<Point> = model.traverse().map(|id| model.node(id).position).collect();
        layout.apply(&mut model);
        let second: Vec<Point> = model.traverse().map(|id| model.node(id).position).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_previous_position_untouched() {
        let mut model = model(r#"{ "name": "R", "children": [{ "name": "A" }] }"#);
        let root = model.root();
        model.get_mut(root).unwrap().previous_position = Point::new(1.0, 2.0);

        TreeLayout::new().apply(&mut model);
        assert_eq!(model.node(root).previous_position, Point::new(1.0, 2.0));
    }

    #[test]
    fn test_deep_chain() {
        let mut node = InputNode::leaf("leaf");
        for depth in 0..3_000 {
            node = InputNode::with_children(format!("n{depth}"), vec![node]);
        }
        let mut model = TreeModel::from_input(node).unwrap();

        let summary = TreeLayout::new().apply(&mut model);
        assert_eq!(summary.visible_count, 3_001);
        assert_eq!(summary.max_breadth(), 1);
        let leaf = model.find_by_name("leaf").unwrap();
        assert_eq!(model.node(leaf).depth, 3_000);
        assert_eq!(model.node(leaf).position.y, 75.0);
    }
}
