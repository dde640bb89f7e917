use std::collections::HashMap;
use std::f32::consts::PI;

use eframe::egui::{Color32, Vec2, vec2};

use crate::color::confidence_color;
use crate::layout::radial_point;
use crate::tag::Hierarchy;
use crate::util::format_precision;

const LINK_SAMPLES: usize = 16;
const LABEL_GAP: f32 = 6.0;
const PATH_LABEL_RISE: f32 = 25.0;
const PATH_LABEL_INDENT: f32 = -70.0;

/// Which end of the label sits at its offset point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum LabelAnchor {
    Start,
    End,
}

/// One connector, sampled into a polyline in scene coordinates and
/// stroked with the child's confidence color.
#[derive(Clone, Debug)]
pub(super) struct LinkVisual {
    pub(super) child_id: String,
    pub(super) points: Vec<Vec2>,
    pub(super) color: Color32,
}

#[derive(Clone, Debug)]
pub(super) struct NodeVisual {
    pub(super) id: String,
    pub(super) position: Vec2,
    pub(super) color: Color32,
    pub(super) label: LabelVisual,
}

#[derive(Clone, Debug)]
pub(super) struct LabelVisual {
    pub(super) text: String,
    /// Unrotated offset from the node marker, in scene units.
    pub(super) offset: Vec2,
    pub(super) anchor: LabelAnchor,
    /// Rotation in radians; zero for the vertical render mode.
    pub(super) angle: f32,
    pub(super) color: Color32,
}

#[derive(Clone, Debug, Default)]
pub(super) struct Scene {
    pub(super) links: Vec<LinkVisual>,
    pub(super) nodes: Vec<NodeVisual>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct ReconcileReport {
    pub(super) entered: usize,
    pub(super) updated: usize,
    pub(super) exited: usize,
}

impl Scene {
    /// Replaces this scene's contents with `desired`, diffing by id:
    /// visuals whose id survives are updated in place, new ids enter,
    /// stale ids are dropped. Nothing from the previous render outlives
    /// the pass.
    pub(super) fn reconcile(&mut self, desired: Scene) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let mut previous_nodes: HashMap<String, NodeVisual> = self
            .nodes
            .drain(..)
            .map(|node| (node.id.clone(), node))
            .collect();
        self.nodes = desired
            .nodes
            .into_iter()
            .map(|node| match previous_nodes.remove(&node.id) {
                Some(mut existing) => {
                    existing.position = node.position;
                    existing.color = node.color;
                    existing.label = node.label;
                    report.updated += 1;
                    existing
                }
                None => {
                    report.entered += 1;
                    node
                }
            })
            .collect();
        report.exited += previous_nodes.len();

        let mut previous_links: HashMap<String, LinkVisual> = self
            .links
            .drain(..)
            .map(|link| (link.child_id.clone(), link))
            .collect();
        self.links = desired
            .links
            .into_iter()
            .map(|link| match previous_links.remove(&link.child_id) {
                Some(mut existing) => {
                    existing.points = link.points;
                    existing.color = link.color;
                    report.updated += 1;
                    existing
                }
                None => {
                    report.entered += 1;
                    link
                }
            })
            .collect();
        report.exited += previous_links.len();

        report
    }
}

/// Radial scene: layout points are (angle, radius) pairs; labels flip
/// side and rotation across the two halves of the circle so they read
/// outward and upright.
pub(super) fn build_radial_scene(hierarchy: &Hierarchy, layout: &[Vec2], origin: Vec2) -> Scene {
    let links = hierarchy
        .links()
        .map(|(parent, child)| LinkVisual {
            child_id: hierarchy.node(child).id.clone(),
            points: sample_radial_link(layout[parent], layout[child], origin),
            color: confidence_color(hierarchy.node(child).confidence),
        })
        .collect();

    let nodes = hierarchy
        .descendants()
        .into_iter()
        .map(|index| {
            let node = hierarchy.node(index);
            let angle = layout[index].x;
            let is_leaf = node.children.is_empty();
            let start_side = (angle < PI) == is_leaf;
            let rotation = if angle < PI {
                angle - PI / 2.0
            } else {
                angle + PI / 2.0
            };
            let color = confidence_color(node.confidence);

            NodeVisual {
                id: node.id.clone(),
                position: origin + radial_point(angle, layout[index].y),
                color,
                label: LabelVisual {
                    text: node.label.clone(),
                    offset: vec2(if start_side { LABEL_GAP } else { -LABEL_GAP }, 0.0),
                    anchor: if start_side {
                        LabelAnchor::Start
                    } else {
                        LabelAnchor::End
                    },
                    angle: rotation,
                    color,
                },
            }
        })
        .collect();

    Scene { links, nodes }
}

/// Vertical path scene: layout points are (x, y); labels sit above
/// internal nodes and below leaves, confidence appended to the text.
pub(super) fn build_path_scene(hierarchy: &Hierarchy, layout: &[Vec2], origin: Vec2) -> Scene {
    let links = hierarchy
        .links()
        .map(|(parent, child)| LinkVisual {
            child_id: hierarchy.node(child).id.clone(),
            points: sample_vertical_link(layout[parent], layout[child], origin),
            color: confidence_color(hierarchy.node(child).confidence),
        })
        .collect();

    let nodes = hierarchy
        .descendants()
        .into_iter()
        .map(|index| {
            let node = hierarchy.node(index);
            let is_leaf = node.children.is_empty();
            let color = confidence_color(node.confidence);
            let text = match node.confidence {
                Some(confidence) => {
                    format!("{} {}%", node.label, format_precision(confidence, 4))
                }
                None => node.label.clone(),
            };

            NodeVisual {
                id: node.id.clone(),
                position: origin + layout[index],
                color,
                label: LabelVisual {
                    text,
                    offset: vec2(
                        PATH_LABEL_INDENT,
                        if is_leaf { PATH_LABEL_RISE } else { -PATH_LABEL_RISE },
                    ),
                    anchor: LabelAnchor::Start,
                    angle: 0.0,
                    color,
                },
            }
        })
        .collect();

    Scene { links, nodes }
}

/// Cubic connector through mid-radius control points, projected out of
/// polar space before sampling.
fn sample_radial_link(source: Vec2, target: Vec2, origin: Vec2) -> Vec<Vec2> {
    let mid_radius = (source.y + target.y) / 2.0;
    sample_cubic(
        origin + radial_point(source.x, source.y),
        origin + radial_point(source.x, mid_radius),
        origin + radial_point(target.x, mid_radius),
        origin + radial_point(target.x, target.y),
    )
}

fn sample_vertical_link(source: Vec2, target: Vec2, origin: Vec2) -> Vec<Vec2> {
    let mid_y = (source.y + target.y) / 2.0;
    sample_cubic(
        origin + source,
        origin + vec2(source.x, mid_y),
        origin + vec2(target.x, mid_y),
        origin + target,
    )
}

fn sample_cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Vec<Vec2> {
    (0..=LINK_SAMPLES)
        .map(|step| {
            let t = step as f32 / LINK_SAMPLES as f32;
            let u = 1.0 - t;
            p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{radial_layout, vertical_layout};
    use crate::tag::FlatRecord;

    fn record(id: &str, parent: Option<&str>, confidence: Option<f32>) -> FlatRecord {
        FlatRecord {
            id: id.to_owned(),
            parent: parent.map(str::to_owned),
            label: id.to_owned(),
            confidence,
        }
    }

    fn small_tree() -> Hierarchy {
        Hierarchy::from_records(&[
            record("r", None, Some(90.0)),
            record("a", Some("r"), Some(50.0)),
            record("b", Some("r"), None),
        ])
        .expect("valid records")
    }

    #[test]
    fn links_take_the_childs_confidence_color() {
        let hierarchy = small_tree();
        let layout = radial_layout(&hierarchy, std::f32::consts::TAU, 100.0);
        let scene = build_radial_scene(&hierarchy, &layout, Vec2::ZERO);

        assert_eq!(scene.links.len(), 2);
        for link in &scene.links {
            let child = hierarchy
                .index_of(&link.child_id)
                .expect("link child exists");
            assert_eq!(link.color, confidence_color(hierarchy.node(child).confidence));
            assert_eq!(link.points.len(), LINK_SAMPLES + 1);
        }
    }

    #[test]
    fn radial_labels_flip_across_the_half_circle() {
        let hierarchy = small_tree();
        // force one leaf into each half
        let layout = vec![
            vec2(0.0, 0.0),
            vec2(PI / 2.0, 100.0),
            vec2(3.0 * PI / 2.0, 100.0),
        ];
        let scene = build_radial_scene(&hierarchy, &layout, Vec2::ZERO);

        let visual = |id: &str| {
            scene
                .nodes
                .iter()
                .find(|node| node.id == id)
                .expect("node visual")
        };

        // leaf in the first half: anchored start, rotated to angle - pi/2
        let a = visual("a");
        assert_eq!(a.label.anchor, LabelAnchor::Start);
        assert!(a.label.offset.x > 0.0);
        assert!(a.label.angle.abs() < 1e-5);

        // leaf in the second half: anchored end, rotated to angle + pi/2
        let b = visual("b");
        assert_eq!(b.label.anchor, LabelAnchor::End);
        assert!(b.label.offset.x < 0.0);
        assert!((b.label.angle - 2.0 * PI).abs() < 1e-5);

        // the internal root mirrors the leaf rule in its half
        let r = visual("r");
        assert_eq!(r.label.anchor, LabelAnchor::End);
    }

    #[test]
    fn path_labels_sit_above_internal_and_below_leaf_nodes() {
        let hierarchy = small_tree();
        let layout = vertical_layout(&hierarchy, 960.0, 800.0);
        let scene = build_path_scene(&hierarchy, &layout, Vec2::ZERO);

        for node in &scene.nodes {
            let index = hierarchy.index_of(&node.id).expect("node exists");
            if hierarchy.node(index).children.is_empty() {
                assert!(node.label.offset.y > 0.0, "{} should label below", node.id);
            } else {
                assert!(node.label.offset.y < 0.0, "{} should label above", node.id);
            }
        }

        let r = scene.nodes.iter().find(|node| node.id == "r").expect("root");
        assert_eq!(r.label.text, "r 90.00%");
        let b = scene.nodes.iter().find(|node| node.id == "b").expect("leaf");
        assert_eq!(b.label.text, "b");
    }

    #[test]
    fn reconcile_drops_stale_ids_and_updates_survivors() {
        let hierarchy = small_tree();
        let layout = vertical_layout(&hierarchy, 960.0, 800.0);
        let mut scene = Scene::default();

        let first = scene.reconcile(build_path_scene(&hierarchy, &layout, Vec2::ZERO));
        assert_eq!(first.entered, 5); // 3 nodes + 2 links
        assert_eq!(first.exited, 0);

        let smaller = Hierarchy::from_records(&[
            record("r", None, Some(90.0)),
            record("a", Some("r"), Some(75.0)),
        ])
        .expect("valid records");
        let smaller_layout = vertical_layout(&smaller, 960.0, 800.0);
        let second = scene.reconcile(build_path_scene(&smaller, &smaller_layout, Vec2::ZERO));

        assert_eq!(second.updated, 3); // r, a, and the r->a link survive
        assert_eq!(second.exited, 2); // b and its link are gone
        assert!(scene.nodes.iter().all(|node| node.id != "b"));
        assert!(scene.links.iter().all(|link| link.child_id != "b"));

        let a = scene.nodes.iter().find(|node| node.id == "a").expect("a");
        assert_eq!(a.color, confidence_color(Some(75.0)));
    }
}
