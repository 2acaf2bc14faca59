//! Dendrogram
//!
//! A collapsible, animated tree diagram engine. It lays out the visible
//! part of a [`TreeModel`], reconciles the result against what is already
//! on screen, and turns pointer gestures into collapse/expand, pan and
//! zoom. Drawing is left to the host through [`RenderSurface`].
//!
//! # Core Concepts
//!
//! - **InteractionController**: Owns everything for one mounted diagram
//! - **TreeLayout**: Tidy tree positions for the visible nodes
//! - **Scene**: Enter/update/exit reconciliation with timed transitions
//! - **SupplementalOverlay**: Extra curves between named nodes
//! - **ZoomTransform**: The pan/zoom applied to the whole drawing
//!
//! # Example
//!
//! ```
//! use dendrogram::prelude::*;
//! use std::time::Duration;
//!
//! let mut view = InteractionController::from_json(
//!     r#"{ "name": "Root", "children": [{ "name": "A" }, { "name": "B" }] }"#,
//!     DendrogramOptions::default(),
//! )
//! .expect("valid input");
//!
//! let a = view.model().find_by_name("A").expect("A exists");
//! view.tick(Duration::from_millis(750));
//! view.click(a);
//!
//! let frame = view.frame();
//! assert_eq!(frame.nodes.len(), 3);
//! ```

mod camera;
mod controller;
mod frame;
mod gesture;
mod layout;
mod options;
mod overlay;
mod scene;
mod transition;

pub use camera::{Viewport, ZoomTransform};
pub use controller::{ClickOutcome, InteractionController};
pub use frame::{CubicBezier, Frame, LinkFrame, NodeFrame, RenderSurface};
pub use gesture::PointerTracker;
pub use layout::{LayoutSummary, TreeLayout};
pub use options::{DendrogramOptions, SupplementalEdgeSpec};
pub use overlay::{SupplementalEdge, SupplementalOverlay};
pub use scene::{
    ElementKey, LabelAnchor, LinkElement, NodeElement, NodeFill, Phase, ReconcileReport, Scene,
    TransitionEvent, HIT_RADIUS,
};
pub use transition::{Easing, Lerp, TransitionSpec, Tween};

pub use tree_model::{self, NodeId, Point, ToggleOutcome, TreeModel};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        ClickOutcome, DendrogramOptions, Frame, InteractionController, NodeId, Point,
        RenderSurface, TreeLayout, TreeModel, ZoomTransform,
    };
}
