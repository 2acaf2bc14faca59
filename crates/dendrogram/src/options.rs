//! Configuration options for a dendrogram.
//!
//! This module provides the `DendrogramOptions` struct which controls the
//! viewport size, transition timing, zoom limits, layout spacing and the
//! supplemental edges drawn on top of the tree.

use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::transition::Easing;

/// A configured extra edge between two named nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementalEdgeSpec {
    /// Name of the node the curve points at.
    pub parent_name: String,
    /// Name of the node the curve starts from.
    pub child_name: String,
}

impl SupplementalEdgeSpec {
    pub fn new(parent_name: impl Into<String>, child_name: impl Into<String>) -> Self {
        Self {
            parent_name: parent_name.into(),
            child_name: child_name.into(),
        }
    }
}

/// Configuration options for a dendrogram.
///
/// Field names follow the host-facing configuration keys when
/// (de)serialized, e.g. `transitionDurationMs` or `zoomScaleRange`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DendrogramOptions {
    /// Viewport width in pixels.
    pub width: f32,

    /// Viewport height in pixels.
    pub height: f32,

    /// Length of enter/update/exit animations.
    pub transition_duration_ms: u64,

    /// Easing applied to every transition.
    pub easing: Easing,

    /// Minimum and maximum zoom factors.
    pub zoom_scale_range: [f32; 2],

    /// Pixels per unit of level breadth.
    #[serde(alias = "verticalSpacing")]
    pub vertical_spacing_constant: f32,

    /// Pixels per label character per depth level.
    pub horizontal_spacing_factor: f32,

    /// Extra edges between named nodes.
    pub supplemental_edges: Vec<SupplementalEdgeSpec>,

    /// How far below the parent a supplemental curve ends.
    pub supplemental_edge_offset: f32,

    /// Radius of a fully entered node marker.
    pub marker_radius: f32,

    /// Pointer travel (pixels) after which a press becomes a drag.
    pub drag_threshold: f32,
}

impl Default for DendrogramOptions {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 800.0,
            transition_duration_ms: 750,
            easing: Easing::default(),
            zoom_scale_range: [0.1, 4.0],
            vertical_spacing_constant: 150.0,
            horizontal_spacing_factor: 10.0,
            supplemental_edges: Vec::new(),
            supplemental_edge_offset: 10.0,
            marker_radius: 10.0,
            drag_threshold: 2.0,
        }
    }
}

impl DendrogramOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Set the viewport size.
    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the transition duration in milliseconds.
    pub fn transition_duration_ms(mut self, millis: u64) -> Self {
        self.transition_duration_ms = millis;
        self
    }

    /// Set the transition easing.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set both min and max zoom levels.
    pub fn zoom_range(mut self, min: f32, max: f32) -> Self {
        self.zoom_scale_range = [min, max];
        self
    }

    /// Set the vertical spacing constant.
    pub fn vertical_spacing(mut self, spacing: f32) -> Self {
        self.vertical_spacing_constant = spacing;
        self
    }

    /// Set the horizontal spacing factor.
    pub fn horizontal_spacing_factor(mut self, factor: f32) -> Self {
        self.horizontal_spacing_factor = factor;
        self
    }

    /// Add a supplemental edge.
    pub fn supplemental_edge(
        mut self,
        parent_name: impl Into<String>,
        child_name: impl Into<String>,
    ) -> Self {
        self.supplemental_edges
            .push(SupplementalEdgeSpec::new(parent_name, child_name));
        self
    }

    /// Set the supplemental curve offset below the parent.
    pub fn supplemental_edge_offset(mut self, offset: f32) -> Self {
        self.supplemental_edge_offset = offset;
        self
    }

    /// Set the node marker radius.
    pub fn marker_radius(mut self, radius: f32) -> Self {
        self.marker_radius = radius.max(0.0);
        self
    }

    /// Set the drag threshold.
    pub fn drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold.max(0.0);
        self
    }

    /// Minimum zoom factor.
    pub fn min_zoom(&self) -> f32 {
        self.zoom_scale_range[0]
    }

    /// Maximum zoom factor.
    pub fn max_zoom(&self) -> f32 {
        self.zoom_scale_range[1]
    }

    /// Clamp a zoom factor into the configured range.
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_zoom(), self.max_zoom())
    }

    /// Transition duration as a `Duration`.
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    /// Repair values that would make the engine misbehave.
    ///
    /// Out-of-range values are corrected (and logged), never rejected.
    pub fn normalized(mut self) -> Self {
        let [min, max] = self.zoom_scale_range;
        if !(min > 0.0) || !(max > 0.0) {
            warn!(
                "zoomScaleRange {:?} must be positive, using defaults",
                self.zoom_scale_range
            );
            self.zoom_scale_range = Self::default().zoom_scale_range;
        } else if min > max {
            warn!("zoomScaleRange {:?} is inverted, swapping", self.zoom_scale_range);
            self.zoom_scale_range = [max, min];
        }

        if !(self.width > 0.0) || !(self.height > 0.0) {
            warn!(
                "viewport {}x{} is not positive, using defaults",
                self.width, self.height
            );
            let defaults = Self::default();
            self.width = defaults.width;
            self.height = defaults.height;
        }

        if !(self.vertical_spacing_constant > 0.0) {
            warn!(
                "verticalSpacingConstant {} is not positive, using default",
                self.vertical_spacing_constant
            );
            self.vertical_spacing_constant = Self::default().vertical_spacing_constant;
        }

        if !(self.horizontal_spacing_factor >= 0.0) {
            warn!(
                "horizontalSpacingFactor {} is negative, using default",
                self.horizontal_spacing_factor
            );
            self.horizontal_spacing_factor = Self::default().horizontal_spacing_factor;
        }

        self
    }
}
