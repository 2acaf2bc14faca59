//! Tree Model Library
//!
//! Holds the canonical hierarchy behind a collapsible dendrogram: an
//! arena of named nodes with stable ids, per-node collapse state, and the
//! positions a layout pass writes back into the model.
//!
//! # Core Concepts
//!
//! - **TreeModel**: Arena storage for every node of the input tree
//! - **Node**: A named element with visible and hidden child lists
//! - **VisibleWalker**: Lazy pre-order iterator over the visible nodes
//!
//! # Example
//!
//! ```
//! use tree_model::prelude::*;
//!
//! let mut tree = TreeModel::from_json(
//!     r#"{ "name": "Root", "children": [{ "name": "B" }, { "name": "a" }] }"#,
//! )
//! .expect("valid input");
//! tree.sort();
//!
//! for id in tree.traverse() {
//!     let node = tree.node(id);
//!     println!("{:indent$}{}", "", node.name(), indent = node.depth * 2);
//! }
//! ```

mod error;
mod geometry;
mod input;
mod model;
mod node;
mod walk;

pub use error::MalformedInputError;
pub use geometry::Point;
pub use input::InputNode;
pub use model::{ToggleOutcome, TreeModel, TreeStats};
pub use node::{Node, NodeId};
pub use walk::{FullWalker, VisibleWalker};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        InputNode, MalformedInputError, Node, NodeId, Point, ToggleOutcome, TreeModel, TreeStats,
    };
}
