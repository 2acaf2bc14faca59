use dendrogram::{DendrogramOptions, InteractionController, TreeLayout};
use proptest::prelude::*;
use std::time::Duration;
use tree_model::{InputNode, NodeId, Point, TreeModel};

fn arb_tree() -> impl Strategy<Value = InputNode> {
    let leaf = "[a-z]{1,8}".prop_map(InputNode::leaf);
    leaf.prop_recursive(4, 40, 4, |inner| {
        ("[a-z]{1,8}", prop::collection::vec(inner, 0..4))
            .prop_map(|(name, children)| InputNode::with_children(name, children))
    })
}

fn positions(model: &TreeModel) -> Vec<(NodeId, Point)> {
    model.traverse().map(|id| (id, model.node(id).position)).collect()
}

proptest! {
    #[test]
    fn layout_is_idempotent(input in arb_tree(), collapsed in prop::collection::vec(0usize..40, 0..4)) {
        let mut model = TreeModel::from_input(input).unwrap();
        model.sort();
        for index in collapsed {
            if index < model.len() {
                model.toggle_collapse(NodeId::new(index));
            }
        }

        let layout = TreeLayout::new();
        let first_summary = layout.apply(&mut model);
        let first = positions(&model);
        let second_summary = layout.apply(&mut model);

        prop_assert_eq!(first_summary, second_summary);
        prop_assert_eq!(first, positions(&model));
    }

    #[test]
    fn depth_and_columns_follow_the_tree(input in arb_tree()) {
        let mut model = TreeModel::from_input(input).unwrap();
        model.sort();
        let summary = TreeLayout::new().apply(&mut model);
        let column = summary.max_label_len as f32 * 10.0;

        for id in model.traverse() {
            let node = model.node(id);
            prop_assert_eq!(node.position.x, node.depth as f32 * column);
            prop_assert!(node.position.y >= 0.0 && node.position.y <= summary.height);
            if let Some(parent) = node.parent() {
                prop_assert_eq!(node.depth, model.node(parent).depth + 1);
            }
        }
    }

    #[test]
    fn siblings_keep_their_order(input in arb_tree()) {
        let mut model = TreeModel::from_input(input).unwrap();
        model.sort();
        TreeLayout::new().apply(&mut model);

        for id in model.traverse() {
            let children = model.node(id).children();
            for pair in children.windows(2) {
                prop_assert!(model.node(pair[0]).position.y < model.node(pair[1]).position.y);
            }
        }
    }

    #[test]
    fn reconcile_binds_every_visible_node(
        input in arb_tree(),
        clicks in prop::collection::vec(0usize..40, 1..8),
    ) {
        let model = TreeModel::from_input(input).unwrap();
        let mut view = InteractionController::new(model, DendrogramOptions::default());

        let mut now = Duration::ZERO;
        for index in clicks {
            now += Duration::from_millis(120);
            view.tick(now);
            view.click(NodeId::new(index));

            let visible = view.model().traverse().count();
            prop_assert_eq!(view.last_reconcile().present, visible);
            prop_assert_eq!(view.scene().present_count(), visible);
        }

        view.tick(now + Duration::from_secs(1));
        prop_assert!(!view.is_animating());
        prop_assert_eq!(view.frame().nodes.len(), view.model().traverse().count());
    }
}
