//! Gesture handling and the layout/reconcile cycle.

use derive_more::Display;
use log::{debug, info, trace};
use std::time::Duration;
use tree_model::{MalformedInputError, NodeId, Point, ToggleOutcome, TreeModel};

use crate::camera::{Viewport, ZoomTransform};
use crate::frame::Frame;
use crate::gesture::PointerTracker;
use crate::layout::{LayoutSummary, TreeLayout};
use crate::options::DendrogramOptions;
use crate::overlay::SupplementalOverlay;
use crate::scene::{ReconcileReport, Scene, TransitionEvent};
use crate::transition::{TransitionSpec, Tween};

/// Wheel delta units per doubling of the zoom factor.
const WHEEL_ZOOM_RATE: f32 = 0.002;

/// Fraction of the viewport where a clicked node is centred.
const CENTER_ANCHOR: f32 = 0.25;

/// What a click on a node did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ClickOutcome {
    /// The click ended a drag and was swallowed.
    #[display(fmt = "suppressed")]
    Suppressed,
    /// The node was toggled and the view re-centred on it.
    #[display(fmt = "toggled ({})", _0)]
    Toggled(ToggleOutcome),
    /// The id is unknown or the node is not visible.
    #[display(fmt = "ignored")]
    Ignored,
}

/// A mounted dendrogram: owns the model, its layout and scene, the
/// overlay and the pan/zoom transform.
///
/// Time is supplied by the host. Every gesture is applied at the time of
/// the last [`tick`](Self::tick); structural changes happen synchronously
/// and only their visual transitions are deferred.
#[derive(Debug)]
pub struct InteractionController {
    model: TreeModel,
    options: DendrogramOptions,
    layout: TreeLayout,
    scene: Scene,
    overlay: SupplementalOverlay,
    viewport: Viewport,
    transform: ZoomTransform,
    view_transition: Option<Tween<ZoomTransform>>,
    pointer: PointerTracker,
    hovered: Option<NodeId>,
    now: Duration,
    last_layout: LayoutSummary,
    last_reconcile: ReconcileReport,
}

impl InteractionController {
    /// Mount a dendrogram for `model` and run the first pass.
    pub fn new(mut model: TreeModel, options: DendrogramOptions) -> Self {
        let options = options.normalized();
        let viewport = Viewport::new(options.width, options.height);
        let layout = TreeLayout::from_options(&options);

        model.sort();
        let root = model.root();
        if let Some(node) = model.get_mut(root) {
            node.previous_position = viewport.center();
        }

        let overlay = SupplementalOverlay::new(&model, &options.supplemental_edges);
        let pointer = PointerTracker::new(options.drag_threshold);

        let mut controller = Self {
            model,
            options,
            layout,
            scene: Scene::new(),
            overlay,
            viewport,
            transform: ZoomTransform::default(),
            view_transition: None,
            pointer,
            hovered: None,
            now: Duration::ZERO,
            last_layout: LayoutSummary {
                visible_count: 0,
                max_label_len: 0,
                level_breadths: Vec::new(),
                height: 0.0,
            },
            last_reconcile: ReconcileReport::default(),
        };

        controller.update(root);
        controller.center_on(root);

        info!(
            "Mounted dendrogram: {} nodes, {} visible, {} supplemental edges",
            controller.model.len(),
            controller.last_layout.visible_count,
            controller.overlay.len()
        );
        controller
    }

    /// Parse `json` and mount it.
    pub fn from_json(json: &str, options: DendrogramOptions) -> Result<Self, MalformedInputError> {
        Ok(Self::new(TreeModel::from_json(json)?, options))
    }

    // ------------------------------------------------------------------
    // Clicks
    // ------------------------------------------------------------------

    /// Toggle a node, lay out again and re-centre on it.
    pub fn click(&mut self, id: NodeId) -> ClickOutcome {
        if self.pointer.take_click_suppression() {
            trace!("Click on {} suppressed after drag", id);
            return ClickOutcome::Suppressed;
        }
        if !self.model.is_visible(id) {
            return ClickOutcome::Ignored;
        }
        let Some(outcome) = self.model.toggle_collapse(id) else {
            return ClickOutcome::Ignored;
        };

        info!("{} {}", outcome, self.model.node(id).name());
        self.update(id);
        self.center_on(id);
        ClickOutcome::Toggled(outcome)
    }

    /// Click whatever node is under a screen point.
    ///
    /// The click that ends a drag is swallowed even when it lands on empty
    /// canvas.
    pub fn click_at(&mut self, screen_point: Point) -> Option<ClickOutcome> {
        if self.pointer.take_click_suppression() {
            trace!("Click at {:?} suppressed after drag", screen_point);
            return Some(ClickOutcome::Suppressed);
        }
        let id = self.hit_test(screen_point)?;
        Some(self.click(id))
    }

    /// Animate the view so the node's last laid-out position sits at a
    /// quarter of the viewport, keeping the current zoom.
    pub fn center_on(&mut self, id: NodeId) {
        let Some(node) = self.model.get(id) else {
            return;
        };
        let mut target = self.transform();
        target.center_on(node.previous_position, self.viewport.anchor(CENTER_ANCHOR));
        self.animate_view(target);
    }

    // ------------------------------------------------------------------
    // Pan and zoom
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, at: Point) {
        self.pointer.press(at);
    }

    pub fn pointer_move(&mut self, at: Point) {
        if let Some(delta) = self.pointer.moved(at) {
            self.pan_by(delta);
        }
    }

    pub fn pointer_up(&mut self, at: Point) {
        if let Some(delta) = self.pointer.release(at) {
            self.pan_by(delta);
        }
    }

    /// Zoom around a screen point; positive `delta_y` zooms out.
    pub fn wheel(&mut self, delta_y: f32, anchor: Point) {
        let factor = 2f32.powf(-delta_y * WHEEL_ZOOM_RATE);
        let mut transform = self.transform();
        transform.zoom_around(
            factor,
            anchor,
            self.options.min_zoom(),
            self.options.max_zoom(),
        );
        trace!("Wheel {} -> scale {}", delta_y, transform.scale);
        self.set_view(transform);
    }

    /// Zoom to an absolute scale around the viewport centre.
    pub fn zoom_to(&mut self, scale: f32) {
        let mut transform = self.transform();
        let anchor = self.viewport.center();
        let canvas_point = transform.screen_to_canvas(anchor);
        transform.scale = self.options.clamp_scale(scale);
        transform.center_on(canvas_point, anchor);
        self.set_view(transform);
    }

    pub fn pan_by(&mut self, delta: Point) {
        let mut transform = self.transform();
        transform.pan(delta);
        self.set_view(transform);
    }

    /// Replace the transform (e.g. from the host's own zoom behaviour);
    /// the scale is clamped to the configured range.
    pub fn apply_transform(&mut self, mut transform: ZoomTransform) {
        transform.scale = self.options.clamp_scale(transform.scale);
        self.set_view(transform);
    }

    // ------------------------------------------------------------------
    // Hover and hit testing
    // ------------------------------------------------------------------

    pub fn hover(&mut self, id: Option<NodeId>) {
        if self.hovered != id {
            trace!("Hover {:?}", id);
            self.hovered = id;
        }
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Node drawn under a screen point, if any.
    pub fn hit_test(&self, screen_point: Point) -> Option<NodeId> {
        let canvas_point = self.transform().screen_to_canvas(screen_point);
        self.scene.node_at(canvas_point, self.now)
    }

    // ------------------------------------------------------------------
    // Clock and output
    // ------------------------------------------------------------------

    /// Advance the clock and finish any transitions that are due.
    pub fn tick(&mut self, now: Duration) -> Vec<TransitionEvent> {
        self.now = self.now.max(now);

        if let Some(tween) = self.view_transition {
            if tween.is_finished(self.now) {
                self.transform = tween.target();
                self.view_transition = None;
            }
        }

        self.scene.advance(self.now)
    }

    /// Snapshot of everything drawn at the current time.
    pub fn frame(&self) -> Frame {
        let scene = &self.scene;
        let now = self.now;
        let supplemental = self.overlay.curves_with(
            &self.model,
            self.options.supplemental_edge_offset,
            |id| {
                scene
                    .node_position(id, now)
                    .unwrap_or_else(|| self.model.node(id).position)
            },
        );

        Frame {
            transform: self.transform(),
            nodes: scene.sample_nodes(now),
            links: scene.sample_links(now),
            supplemental,
        }
    }

    /// Drop every pending transition and gesture. The model stays as it is.
    pub fn unmount(&mut self) {
        self.scene.clear();
        self.view_transition = None;
        self.pointer.reset();
        self.hovered = None;
        debug!("Unmounted dendrogram");
    }

    pub fn is_animating(&self) -> bool {
        self.view_transition.is_some() || self.scene.is_animating()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The view transform as drawn right now.
    pub fn transform(&self) -> ZoomTransform {
        match &self.view_transition {
            Some(tween) => tween.sample(self.now),
            None => self.transform,
        }
    }

    /// The transform the view is heading for.
    pub fn target_transform(&self) -> ZoomTransform {
        self.transform
    }

    pub fn model(&self) -> &TreeModel {
        &self.model
    }

    pub fn options(&self) -> &DendrogramOptions {
        &self.options
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn overlay(&self) -> &SupplementalOverlay {
        &self.overlay
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn layout_summary(&self) -> &LayoutSummary {
        &self.last_layout
    }

    pub fn last_reconcile(&self) -> ReconcileReport {
        self.last_reconcile
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn transition_spec(&self) -> TransitionSpec {
        TransitionSpec::new(self.options.transition_duration(), self.options.easing)
    }

    /// Layout then reconcile, with `source` as the triggering node.
    fn update(&mut self, source: NodeId) {
        let spec = self.transition_spec();
        self.last_layout = self.layout.apply(&mut self.model);
        self.last_reconcile = self.scene.reconcile(
            &mut self.model,
            source,
            self.now,
            &spec,
            self.options.marker_radius,
        );
        debug!(
            "Pass from {}: {} supplemental curves active",
            source,
            self.overlay.active_edges(&self.model).count()
        );
    }

    fn animate_view(&mut self, target: ZoomTransform) {
        let spec = self.transition_spec();
        let from = self.transform();
        self.transform = target;
        self.view_transition = Some(spec.tween(from, target, self.now));
    }

    fn set_view(&mut self, transform: ZoomTransform) {
        self.view_transition = None;
        self.transform = transform;
    }
}
