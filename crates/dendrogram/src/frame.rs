//! Drawable snapshots of the scene.
//!
//! A [`Frame`] is what the host paints for one animation tick. It carries
//! no references back into the engine, so it can be handed to any
//! [`RenderSurface`] (an SVG writer, a canvas binding, a test recorder).

use std::fmt::Write as _;
use tree_model::{NodeId, Point};

use crate::camera::ZoomTransform;
use crate::scene::{LabelAnchor, NodeFill, Phase};

/// A cubic Bézier segment in canvas space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicBezier {
    /// The horizontal "diagonal" used for tree links: both control points
    /// sit halfway along the depth axis, level with their endpoint.
    pub fn diagonal(source: Point, target: Point) -> Self {
        let mid_x = (source.x + target.x) / 2.0;
        Self {
            start: source,
            control1: Point::new(mid_x, source.y),
            control2: Point::new(mid_x, target.y),
            end: target,
        }
    }

    /// Point on the curve at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f32) -> Point {
        let u = 1.0 - t;
        self.start * (u * u * u)
            + self.control1 * (3.0 * u * u * t)
            + self.control2 * (3.0 * u * t * t)
            + self.end * (t * t * t)
    }

    /// SVG path data, e.g. `M0,0C5,0 5,10 10,10`.
    pub fn to_svg_path(&self) -> String {
        let mut path = String::with_capacity(48);
        let _ = write!(
            path,
            "M{},{}C{},{} {},{} {},{}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        );
        path
    }
}

/// One node marker as drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeFrame {
    pub id: NodeId,
    pub label: String,
    pub phase: Phase,
    pub position: Point,
    pub radius: f32,
    pub label_opacity: f32,
    pub fill: NodeFill,
    pub label_anchor: LabelAnchor,
}

impl NodeFrame {
    /// Where the label text is anchored.
    pub fn label_position(&self) -> Point {
        self.position + Point::new(self.label_anchor.offset(), 0.0)
    }
}

/// One primary link as drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkFrame {
    pub parent: NodeId,
    pub child: NodeId,
    pub phase: Phase,
    pub curve: CubicBezier,
}

/// Everything visible at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Applied to the whole group.
    pub transform: ZoomTransform,
    pub nodes: Vec<NodeFrame>,
    pub links: Vec<LinkFrame>,
    pub supplemental: Vec<CubicBezier>,
}

impl Frame {
    /// Paint onto a surface: links under supplemental curves under nodes.
    pub fn draw<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        surface.begin(&self.transform);
        for link in &self.links {
            surface.draw_link(link);
        }
        for curve in &self.supplemental {
            surface.draw_supplemental(curve);
        }
        for node in &self.nodes {
            surface.draw_node(node);
        }
        surface.finish();
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeFrame> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Something a [`Frame`] can be painted onto.
pub trait RenderSurface {
    /// Start a frame under the given group transform.
    fn begin(&mut self, transform: &ZoomTransform);

    fn draw_link(&mut self, link: &LinkFrame);

    fn draw_supplemental(&mut self, curve: &CubicBezier);

    fn draw_node(&mut self, node: &NodeFrame);

    fn finish(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diagonal_control_points() {
        let curve = CubicBezier::diagonal(Point::new(0.0, 0.0), Point::new(10.0, 20.0));
        assert_eq!(curve.control1, Point::new(5.0, 0.0));
        assert_eq!(curve.control2, Point::new(5.0, 20.0));
        assert_eq!(curve.point_at(0.0), Point::new(0.0, 0.0));
        assert_eq!(curve.point_at(1.0), Point::new(10.0, 20.0));
        assert_eq!(curve.point_at(0.5), Point::new(5.0, 10.0));
    }

    #[test]
    fn test_svg_path() {
        let curve = CubicBezier::diagonal(Point::new(0.0, 150.0), Point::new(40.0, 75.0));
        insta::assert_snapshot!(curve.to_svg_path(), @"M0,150C20,150 20,75 40,75");
    }

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl RenderSurface for Recorder {
        fn begin(&mut self, transform: &ZoomTransform) {
            self.0.push(format!("begin {}", transform.to_svg_transform()));
        }

        fn draw_link(&mut self, link: &LinkFrame) {
            self.0.push(format!("link {}", link.child));
        }

        fn draw_supplemental(&mut self, curve: &CubicBezier) {
            self.0.push(format!("extra {}", curve.to_svg_path()));
        }

        fn draw_node(&mut self, node: &NodeFrame) {
            self.0.push(format!("node {}", node.label));
        }

        fn finish(&mut self) {
            self.0.push("finish".to_string());
        }
    }

    #[test]
    fn test_draw_order() {
        let child = NodeId::new(1);
        let frame = Frame {
            transform: ZoomTransform::default(),
            nodes: vec![NodeFrame {
                id: child,
                label: "A".to_string(),
                phase: Phase::Settled,
                position: Point::new(40.0, 75.0),
                radius: 10.0,
                label_opacity: 1.0,
                fill: NodeFill::Expanded,
                label_anchor: LabelAnchor::Start,
            }],
            links: vec![LinkFrame {
                parent: NodeId::ROOT,
                child,
                phase: Phase::Settled,
                curve: CubicBezier::diagonal(Point::ZERO, Point::new(40.0, 75.0)),
            }],
            supplemental: vec![CubicBezier::diagonal(Point::ZERO, Point::new(2.0, 2.0))],
        };

        let mut recorder = Recorder::default();
        frame.draw(&mut recorder);

        assert_eq!(
            recorder.0,
            vec![
                "begin translate(0,0)scale(1)".to_string(),
                "link NodeId(1)".to_string(),
                "extra M0,0C1,0 1,2 2,2".to_string(),
                "node A".to_string(),
                "finish".to_string(),
            ]
        );
        assert_eq!(frame.node(child).unwrap().label_position(), Point::new(60.0, 75.0));
    }
}
