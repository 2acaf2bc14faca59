//! Extra curves between named nodes that are not parent and child.

use log::{debug, warn};
use tree_model::{NodeId, Point, TreeModel};

use crate::frame::CubicBezier;
use crate::options::SupplementalEdgeSpec;

/// A configured pair bound to the nodes it connects on this pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupplementalEdge {
    pub parent: NodeId,
    pub child: NodeId,
}

/// Every node carrying one endpoint name, in pre-order.
#[derive(Clone, Debug)]
enum Endpoint {
    Unique(NodeId),
    Shared(Vec<NodeId>),
}

impl Endpoint {
    /// First candidate that is currently visible.
    fn visible(&self, model: &TreeModel) -> Option<NodeId> {
        match self {
            Endpoint::Unique(id) => Some(*id).filter(|&id| model.is_visible(id)),
            Endpoint::Shared(ids) => ids.iter().copied().find(|&id| model.is_visible(id)),
        }
    }
}

#[derive(Clone, Debug)]
struct ResolvedPair {
    parent: Endpoint,
    child: Endpoint,
}

/// Supplemental edges resolved against one tree.
///
/// Names are looked up once, when the overlay is built. A pair naming a
/// node the tree does not contain is dropped for good. On each pass an
/// endpoint binds to the first visible node carrying its name; a pair with
/// no visible candidate for either end is skipped until one appears.
#[derive(Clone, Debug, Default)]
pub struct SupplementalOverlay {
    pairs: Vec<ResolvedPair>,
}

impl SupplementalOverlay {
    pub fn new(model: &TreeModel, specs: &[SupplementalEdgeSpec]) -> Self {
        let pairs = specs
            .iter()
            .filter_map(|spec| {
                let parent = resolve(model, &spec.parent_name)?;
                let child = resolve(model, &spec.child_name)?;
                Some(ResolvedPair { parent, child })
            })
            .collect::<Vec<_>>();

        debug!(
            "Resolved {} of {} supplemental edges",
            pairs.len(),
            specs.len()
        );
        Self { pairs }
    }

    /// Number of pairs whose names all exist in the tree.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Edges with a visible node for both endpoint names.
    pub fn active_edges<'a>(
        &'a self,
        model: &'a TreeModel,
    ) -> impl Iterator<Item = SupplementalEdge> + 'a {
        self.pairs.iter().filter_map(move |pair| {
            Some(SupplementalEdge {
                parent: pair.parent.visible(model)?,
                child: pair.child.visible(model)?,
            })
        })
    }

    /// Curves for the active edges using laid-out positions.
    pub fn curves(&self, model: &TreeModel, offset: f32) -> Vec<CubicBezier> {
        self.curves_with(model, offset, |id| model.node(id).position)
    }

    /// Curves for the active edges, positions supplied by the caller (for
    /// example the animated positions of the scene).
    ///
    /// Each curve runs from the child to a point `offset` below the parent.
    pub fn curves_with(
        &self,
        model: &TreeModel,
        offset: f32,
        position_of: impl Fn(NodeId) -> Point,
    ) -> Vec<CubicBezier> {
        self.active_edges(model)
            .map(|edge| {
                let from = position_of(edge.child);
                let to = position_of(edge.parent) + Point::new(0.0, offset);
                CubicBezier::diagonal(from, to)
            })
            .collect()
    }
}

fn resolve(model: &TreeModel, name: &str) -> Option<Endpoint> {
    let matches = model.find_all_by_name(name);
    match matches.as_slice() {
        [] => {
            warn!("Supplemental edge names unknown node {:?}, ignoring it", name);
            None
        }
        [only] => Some(Endpoint::Unique(*only)),
        _ => {
            warn!(
                "Supplemental edge name {:?} matches {} nodes, using the first visible one",
                name,
                matches.len()
            );
            Some(Endpoint::Shared(matches))
        }
    }
}
