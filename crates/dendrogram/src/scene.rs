//! Retained scene of rendered elements and their transitions.
//!
//! Every reconcile pass matches the visible nodes of the model against
//! the elements already in the scene by [`NodeId`]:
//!
//! - **Entering**: new elements start at the triggering node's previous
//!   position, grow their marker and fade their label in.
//! - **Updating**: elements already present head for their new position
//!   from wherever they currently are.
//! - **Exiting**: elements no longer visible shrink toward the triggering
//!   node's new position and are removed once there.
//!
//! Links are keyed by their child node, so a link lives and dies with the
//! node it leads to.

use derive_more::Display;
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use tree_model::{Node, NodeId, Point, TreeModel};

use crate::frame::{CubicBezier, LinkFrame, NodeFrame};
use crate::transition::{TransitionSpec, Tween};

/// Canvas distance from a node centre that still counts as a hit.
pub const HIT_RADIUS: f32 = 30.0;

/// Horizontal label offset from the node centre.
pub const LABEL_OFFSET: f32 = 20.0;

/// Identity of a rendered element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum ElementKey {
    #[display(fmt = "node {}", _0)]
    Node(NodeId),
    /// The link leading to the given child.
    #[display(fmt = "link {}", _0)]
    Link(NodeId),
}

/// Lifecycle stage of a rendered element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Phase {
    #[display(fmt = "entering")]
    Entering,
    #[display(fmt = "updating")]
    Updating,
    #[display(fmt = "exiting")]
    Exiting,
    /// Transition finished, element at rest.
    #[display(fmt = "settled")]
    Settled,
}

/// Marker fill. Displays as the CSS colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum NodeFill {
    /// Has hidden children.
    #[display(fmt = "lightsteelblue")]
    Collapsed,
    /// Expanded or a leaf.
    #[display(fmt = "#fff")]
    Expanded,
}

impl NodeFill {
    pub fn for_node(node: &Node) -> Self {
        if node.is_collapsed() {
            NodeFill::Collapsed
        } else {
            NodeFill::Expanded
        }
    }
}

/// Which end of the label text sits at the anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum LabelAnchor {
    /// Text ends at the anchor, left of the marker.
    #[display(fmt = "end")]
    End,
    /// Text starts at the anchor, right of the marker.
    #[display(fmt = "start")]
    Start,
}

impl LabelAnchor {
    /// Internal nodes label to the left, leaves to the right.
    pub fn for_node(node: &Node) -> Self {
        if node.is_leaf() {
            LabelAnchor::Start
        } else {
            LabelAnchor::End
        }
    }

    /// Horizontal offset of the anchor from the node centre.
    pub fn offset(self) -> f32 {
        match self {
            LabelAnchor::End => -LABEL_OFFSET,
            LabelAnchor::Start => LABEL_OFFSET,
        }
    }
}

/// Counts from one reconcile pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Nodes that appeared.
    pub entered: usize,
    /// Nodes that stayed (including ones revived mid-exit).
    pub updated: usize,
    /// Nodes that started leaving.
    pub exited: usize,
    /// Nodes bound to the new layout; always the visible count.
    pub present: usize,
}

/// Emitted by [`Scene::advance`] when a transition completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum TransitionEvent {
    #[display(fmt = "{} settled", _0)]
    Settled(ElementKey),
    #[display(fmt = "{} removed", _0)]
    Removed(ElementKey),
}

/// A node marker with its label.
#[derive(Clone, Debug)]
pub struct NodeElement {
    pub id: NodeId,
    pub label: String,
    pub phase: Phase,
    pub fill: NodeFill,
    pub label_anchor: LabelAnchor,
    position: Tween<Point>,
    radius: Tween<f32>,
    label_opacity: Tween<f32>,
}

impl NodeElement {
    pub fn position_at(&self, now: Duration) -> Point {
        self.position.sample(now)
    }

    pub fn radius_at(&self, now: Duration) -> f32 {
        self.radius.sample(now)
    }

    pub fn label_opacity_at(&self, now: Duration) -> f32 {
        self.label_opacity.sample(now)
    }

    /// Where the marker is heading.
    pub fn target_position(&self) -> Point {
        self.position.target()
    }

    fn is_finished(&self, now: Duration) -> bool {
        self.position.is_finished(now)
            && self.radius.is_finished(now)
            && self.label_opacity.is_finished(now)
    }

    fn head_to(&mut self, position: Point, radius: f32, opacity: f32, now: Duration, spec: &TransitionSpec) {
        self.position.retarget(position, now, spec);
        self.radius.retarget(radius, now, spec);
        self.label_opacity.retarget(opacity, now, spec);
    }

    fn sample(&self, now: Duration) -> NodeFrame {
        NodeFrame {
            id: self.id,
            label: self.label.clone(),
            phase: self.phase,
            position: self.position_at(now),
            radius: self.radius_at(now),
            label_opacity: self.label_opacity_at(now),
            fill: self.fill,
            label_anchor: self.label_anchor,
        }
    }
}

/// A primary parent-child curve.
#[derive(Clone, Debug)]
pub struct LinkElement {
    pub parent: NodeId,
    pub child: NodeId,
    pub phase: Phase,
    source: Tween<Point>,
    target: Tween<Point>,
}

impl LinkElement {
    pub fn curve_at(&self, now: Duration) -> CubicBezier {
        CubicBezier::diagonal(self.source.sample(now), self.target.sample(now))
    }

    fn is_finished(&self, now: Duration) -> bool {
        self.source.is_finished(now) && self.target.is_finished(now)
    }

    fn head_to(&mut self, source: Point, target: Point, now: Duration, spec: &TransitionSpec) {
        self.source.retarget(source, now, spec);
        self.target.retarget(target, now, spec);
    }

    fn sample(&self, now: Duration) -> LinkFrame {
        LinkFrame {
            parent: self.parent,
            child: self.child,
            phase: self.phase,
            curve: self.curve_at(now),
        }
    }
}

/// Everything currently drawn, keyed by node id.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, NodeElement>,
    links: BTreeMap<NodeId, LinkElement>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the visible nodes of `model` to the scene.
    ///
    /// `source` is the node whose interaction triggered the pass: entering
    /// elements grow out of its previous position, exiting ones collapse
    /// into its new position. Positions are stashed on the model once every
    /// transition is scheduled.
    pub fn reconcile(
        &mut self,
        model: &mut TreeModel,
        source: NodeId,
        now: Duration,
        spec: &TransitionSpec,
        marker_radius: f32,
    ) -> ReconcileReport {
        let (origin, destination) = model
            .get(source)
            .map(|node| (node.previous_position, node.position))
            .unwrap_or((Point::ZERO, Point::ZERO));

        let mut report = ReconcileReport::default();
        let mut bound = BTreeSet::new();

        for id in model.traverse() {
            let node = model.node(id);
            bound.insert(id);
            report.present += 1;

            match self.nodes.get_mut(&id) {
                Some(element) => {
                    if element.phase == Phase::Exiting {
                        trace!("Reviving {} mid-exit", id);
                    }
                    element.phase = Phase::Updating;
                    element.fill = NodeFill::for_node(node);
                    element.label_anchor = LabelAnchor::for_node(node);
                    element.head_to(node.position, marker_radius, 1.0, now, spec);
                    report.updated += 1;
                }
                None => {
                    self.nodes.insert(
                        id,
                        NodeElement {
                            id,
                            label: node.name().to_string(),
                            phase: Phase::Entering,
                            fill: NodeFill::for_node(node),
                            label_anchor: LabelAnchor::for_node(node),
                            position: spec.tween(origin, node.position, now),
                            radius: spec.tween(0.0, marker_radius, now),
                            label_opacity: spec.tween(0.0, 1.0, now),
                        },
                    );
                    report.entered += 1;
                }
            }

            let Some(parent) = node.parent() else {
                continue;
            };
            let parent_position = model.node(parent).position;
            match self.links.get_mut(&id) {
                Some(link) => {
                    link.phase = Phase::Updating;
                    link.head_to(parent_position, node.position, now, spec);
                }
                None => {
                    self.links.insert(
                        id,
                        LinkElement {
                            parent,
                            child: id,
                            phase: Phase::Entering,
                            source: spec.tween(origin, parent_position, now),
                            target: spec.tween(origin, node.position, now),
                        },
                    );
                }
            }
        }

        for (id, element) in self.nodes.iter_mut() {
            if bound.contains(id) {
                continue;
            }
            if element.phase != Phase::Exiting {
                element.phase = Phase::Exiting;
                report.exited += 1;
            }
            element.head_to(destination, 0.0, 0.0, now, spec);
        }
        for (id, link) in self.links.iter_mut() {
            if !bound.contains(id) {
                link.phase = Phase::Exiting;
                link.head_to(destination, destination, now, spec);
            }
        }

        model.stash_positions();

        debug!(
            "Reconciled from {}: {} entered, {} updated, {} exited, {} present",
            source, report.entered, report.updated, report.exited, report.present
        );
        report
    }

    /// Settle finished transitions and drop finished exits.
    pub fn advance(&mut self, now: Duration) -> Vec<TransitionEvent> {
        let mut events = Vec::new();

        self.nodes.retain(|&id, element| {
            if element.phase == Phase::Settled || !element.is_finished(now) {
                return true;
            }
            if element.phase == Phase::Exiting {
                events.push(TransitionEvent::Removed(ElementKey::Node(id)));
                return false;
            }
            element.phase = Phase::Settled;
            events.push(TransitionEvent::Settled(ElementKey::Node(id)));
            true
        });

        self.links.retain(|&id, link| {
            if link.phase == Phase::Settled || !link.is_finished(now) {
                return true;
            }
            if link.phase == Phase::Exiting {
                events.push(TransitionEvent::Removed(ElementKey::Link(id)));
                return false;
            }
            link.phase = Phase::Settled;
            events.push(TransitionEvent::Settled(ElementKey::Link(id)));
            true
        });

        events
    }

    /// True while any element is mid-transition.
    pub fn is_animating(&self) -> bool {
        self.nodes.values().any(|element| element.phase != Phase::Settled)
            || self.links.values().any(|link| link.phase != Phase::Settled)
    }

    /// Drop every element and pending transition.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeElement> {
        self.nodes.get(&id)
    }

    pub fn link(&self, child: NodeId) -> Option<&LinkElement> {
        self.links.get(&child)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeElement> {
        self.nodes.values()
    }

    pub fn links(&self) -> impl Iterator<Item = &LinkElement> {
        self.links.values()
    }

    /// Drawn position of a node at `now`.
    pub fn node_position(&self, id: NodeId, now: Duration) -> Option<Point> {
        self.nodes.get(&id).map(|element| element.position_at(now))
    }

    /// Number of node elements that are not on their way out.
    pub fn present_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|element| element.phase != Phase::Exiting)
            .count()
    }

    /// Closest non-exiting node within [`HIT_RADIUS`] of a canvas point.
    pub fn node_at(&self, canvas_point: Point, now: Duration) -> Option<NodeId> {
        self.nodes
            .values()
            .filter(|element| element.phase != Phase::Exiting)
            .map(|element| (element.id, element.position_at(now).distance(canvas_point)))
            .filter(|&(_, distance)| distance <= HIT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub fn sample_nodes(&self, now: Duration) -> Vec<NodeFrame> {
        self.nodes.values().map(|element| element.sample(now)).collect()
    }

    pub fn sample_links(&self, now: Duration) -> Vec<LinkFrame> {
        self.links.values().map(|link| link.sample(now)).collect()
    }
}
