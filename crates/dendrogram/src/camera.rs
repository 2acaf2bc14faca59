//! Pan/zoom transform for the rendered group.
//!
//! The transform maps canvas space (where the layout places nodes) to
//! screen space (the host's drawing region):
//!
//! `screen = canvas * scale + translate`

use serde::{Deserialize, Serialize};
use tree_model::Point;

use crate::transition::Lerp;

/// Size of the host drawing region in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Centre of the viewport.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// A point at the given fraction of the width and height.
    pub fn anchor(&self, fraction: f32) -> Point {
        Point::new(self.width * fraction, self.height * fraction)
    }
}

/// The zoom transform applied to the whole rendered group.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    /// Where canvas origin (0,0) appears on screen.
    pub translate: Point,

    /// Zoom level (1.0 = 100%, 2.0 = 200%, 0.5 = 50%).
    pub scale: f32,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self {
            translate: Point::ZERO,
            scale: 1.0,
        }
    }
}

impl ZoomTransform {
    /// Identity transform (no offset, 100% zoom).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with a specific translation and scale.
    pub fn with_translate_and_scale(translate: Point, scale: f32) -> Self {
        Self { translate, scale }
    }

    /// Convert a point from screen space to canvas space.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.translate.x) / self.scale,
            (screen_point.y - self.translate.y) / self.scale,
        )
    }

    /// Convert a point from canvas space to screen space.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        canvas_point * self.scale + self.translate
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Point) {
        self.translate = self.translate + delta;
    }

    /// Set the scale directly, clamped to `[min_zoom, max_zoom]`.
    pub fn set_scale(&mut self, scale: f32, min_zoom: f32, max_zoom: f32) {
        self.scale = scale.clamp(min_zoom, max_zoom);
    }

    /// Zoom by a factor, keeping a specific screen point fixed.
    ///
    /// This is typically used for scroll-wheel zooming where the cursor
    /// position should remain at the same canvas location after zooming.
    pub fn zoom_around(&mut self, factor: f32, anchor: Point, min_zoom: f32, max_zoom: f32) {
        let canvas_point = self.screen_to_canvas(anchor);
        let new_scale = (self.scale * factor).clamp(min_zoom, max_zoom);

        if (new_scale - self.scale).abs() < f32::EPSILON {
            return;
        }

        self.scale = new_scale;

        let new_screen_point = self.canvas_to_screen(canvas_point);
        self.translate = self.translate + (anchor - new_screen_point);
    }

    /// Translate so that `canvas_point` lands on `screen_anchor`, keeping
    /// the current scale.
    pub fn center_on(&mut self, canvas_point: Point, screen_anchor: Point) {
        self.translate = screen_anchor - canvas_point * self.scale;
    }

    /// The transform as an SVG `transform` attribute value.
    pub fn to_svg_transform(&self) -> String {
        format!(
            "translate({},{})scale({})",
            self.translate.x, self.translate.y, self.scale
        )
    }
}

impl Lerp for ZoomTransform {
    fn lerp(self, to: ZoomTransform, t: f32) -> ZoomTransform {
        ZoomTransform {
            translate: self.translate.lerp(to.translate, t),
            scale: Lerp::lerp(self.scale, to.scale, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transform() {
        let transform = ZoomTransform::default();
        assert_eq!(transform.translate, Point::ZERO);
        assert_eq!(transform.scale, 1.0);
    }

    #[test]
    fn test_screen_to_canvas_with_offset() {
        let transform = ZoomTransform::with_translate_and_scale(Point::new(50.0, 100.0), 1.0);
        let canvas_point = transform.screen_to_canvas(Point::new(150.0, 200.0));
        assert_eq!(canvas_point, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_screen_to_canvas_with_zoom() {
        let transform = ZoomTransform::with_translate_and_scale(Point::ZERO, 2.0);
        let canvas_point = transform.screen_to_canvas(Point::new(200.0, 100.0));
        assert_eq!(canvas_point, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_roundtrip_conversion() {
        let transform = ZoomTransform::with_translate_and_scale(Point::new(100.0, 50.0), 1.5);
        let original = Point::new(200.0, 300.0);

        let back = transform.canvas_to_screen(transform.screen_to_canvas(original));
        assert!((back.x - original.x).abs() < 0.001);
        assert!((back.y - original.y).abs() < 0.001);
    }

    #[test]
    fn test_pan() {
        let mut transform = ZoomTransform::default();
        transform.pan(Point::new(10.0, 20.0));
        assert_eq!(transform.translate, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_zoom_around_keeps_anchor_fixed() {
        let mut transform = ZoomTransform::with_translate_and_scale(Point::new(30.0, 40.0), 1.0);
        let anchor = Point::new(200.0, 100.0);
        let before = transform.screen_to_canvas(anchor);

        transform.zoom_around(2.0, anchor, 0.1, 4.0);

        assert_eq!(transform.scale, 2.0);
        let after = transform.screen_to_canvas(anchor);
        assert!((after.x - before.x).abs() < 0.001);
        assert!((after.y - before.y).abs() < 0.001);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut transform = ZoomTransform::default();
        transform.zoom_around(100.0, Point::ZERO, 0.1, 4.0);
        assert_eq!(transform.scale, 4.0);

        transform.set_scale(0.001, 0.1, 4.0);
        assert_eq!(transform.scale, 0.1);
    }

    #[test]
    fn test_center_on_quarter_anchor() {
        let mut transform = ZoomTransform::with_translate_and_scale(Point::ZERO, 2.0);
        let viewport = Viewport::new(1000.0, 800.0);

        transform.center_on(Point::new(100.0, 50.0), viewport.anchor(0.25));

        assert_eq!(transform.translate, Point::new(50.0, 100.0));
        assert_eq!(transform.scale, 2.0);
        assert_eq!(
            transform.canvas_to_screen(Point::new(100.0, 50.0)),
            Point::new(250.0, 200.0)
        );
    }

    #[test]
    fn test_svg_transform() {
        let transform = ZoomTransform::with_translate_and_scale(Point::new(1.5, -2.0), 0.5);
        assert_eq!(transform.to_svg_transform(), "translate(1.5,-2)scale(0.5)");
    }
}
