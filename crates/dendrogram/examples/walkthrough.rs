use anyhow::Result;
use dendrogram::prelude::*;
use dendrogram::{CubicBezier, LinkFrame, NodeFrame};
use std::env;
use std::time::Duration;

const SAMPLE: &str = r#"{
    "name": "Flare",
    "children": [
        { "name": "Analytics", "children": [
            { "name": "Cluster", "children": [{ "name": "Agglomerative" }, { "name": "Community" }] },
            { "name": "Graph", "children": [{ "name": "BetweennessCentrality" }, { "name": "LinkDistance" }] }
        ] },
        { "name": "Animate", "children": [{ "name": "Easing" }, { "name": "Tween" }] },
        { "name": "Display" }
    ]
}"#;

/// Prints SVG-like elements to stdout.
struct SvgPrinter;

impl RenderSurface for SvgPrinter {
    fn begin(&mut self, transform: &ZoomTransform) {
        println!("<g transform=\"{}\">", transform.to_svg_transform());
    }

    fn draw_link(&mut self, link: &LinkFrame) {
        println!("  <path class=\"link\" d=\"{}\"/>", link.curve.to_svg_path());
    }

    fn draw_supplemental(&mut self, curve: &CubicBezier) {
        println!("  <path class=\"supplemental\" d=\"{}\"/>", curve.to_svg_path());
    }

    fn draw_node(&mut self, node: &NodeFrame) {
        println!(
            "  <g transform=\"translate({},{})\"><circle r=\"{}\" fill=\"{}\"/><text x=\"{}\" text-anchor=\"{}\">{}</text></g>",
            node.position.x,
            node.position.y,
            node.radius,
            node.fill,
            node.label_anchor.offset(),
            node.label_anchor,
            node.label
        );
    }

    fn finish(&mut self) {
        println!("</g>");
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let model = match env::args().nth(1) {
        Some(path) => TreeModel::from_path(path)?,
        None => TreeModel::from_json(SAMPLE)?,
    };

    let options = DendrogramOptions::default().supplemental_edge("Animate", "Community");
    let mut view = InteractionController::new(model, options);
    println!("{}", view.model());

    let mut clock = Duration::ZERO;
    let step = Duration::from_millis(250);
    let mut settle = |view: &mut InteractionController| {
        while view.is_animating() {
            clock += step;
            for event in view.tick(clock) {
                log::debug!("{}", event);
            }
        }
    };
    settle(&mut view);

    if let Some(cluster) = view.model().find_by_name("Cluster") {
        let outcome = view.click(cluster);
        println!("Clicked Cluster: {}", outcome);
        settle(&mut view);
        println!("{}", view.model());
    }

    view.wheel(-200.0, Point::new(250.0, 200.0));
    view.frame().draw(&mut SvgPrinter);

    view.unmount();
    Ok(())
}
