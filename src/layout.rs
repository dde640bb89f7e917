use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};

use crate::tag::Hierarchy;

/// Gap between orderly-adjacent leaves: siblings pack closer than leaves
/// under different parents, and the gap shrinks with depth so outer
/// rings of a radial tree stay balanced.
fn separation(hierarchy: &Hierarchy, previous: usize, current: usize) -> f32 {
    let weight = if hierarchy.node(previous).parent == hierarchy.node(current).parent {
        1.0
    } else {
        2.0
    };
    weight / hierarchy.node(current).depth.max(1) as f32
}

/// Leaf-ordered tidy walk. Leaves take cumulative separation-weighted
/// positions, internal nodes center over their children; the result is
/// normalized to [0, 1] on the cross axis.
fn normalized_cross(hierarchy: &Hierarchy) -> Vec<f32> {
    let mut cross = vec![0.0f32; hierarchy.len()];
    let mut cursor = 0.0f32;
    let mut previous_leaf = None;
    assign(hierarchy, hierarchy.root(), &mut cursor, &mut previous_leaf, &mut cross);

    if cursor > 0.0 {
        for position in &mut cross {
            *position /= cursor;
        }
    } else {
        // single-leaf column: center it
        for position in &mut cross {
            *position = 0.5;
        }
    }
    cross
}

fn assign(
    hierarchy: &Hierarchy,
    index: usize,
    cursor: &mut f32,
    previous_leaf: &mut Option<usize>,
    cross: &mut [f32],
) {
    let node = hierarchy.node(index);
    if node.children.is_empty() {
        if let Some(previous) = *previous_leaf {
            *cursor += separation(hierarchy, previous, index);
        }
        cross[index] = *cursor;
        *previous_leaf = Some(index);
        return;
    }

    for &child in &node.children {
        assign(hierarchy, child, cursor, previous_leaf, cross);
    }
    let first = cross[node.children[0]];
    let last = cross[*node.children.last().expect("non-empty children")];
    cross[index] = (first + last) / 2.0;
}

/// Polar layout: per node, `x` is the angle within `arc_span` and `y`
/// the radius, proportional to depth within `radial_extent`.
pub fn radial_layout(hierarchy: &Hierarchy, arc_span: f32, radial_extent: f32) -> Vec<Vec2> {
    let cross = normalized_cross(hierarchy);
    let max_depth = hierarchy.max_depth().max(1) as f32;

    hierarchy
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| {
            vec2(
                cross[index] * arc_span,
                node.depth as f32 / max_depth * radial_extent,
            )
        })
        .collect()
}

/// Rectangular layout: `x` across `width`, `y` down `height` by depth.
pub fn vertical_layout(hierarchy: &Hierarchy, width: f32, height: f32) -> Vec<Vec2> {
    let cross = normalized_cross(hierarchy);
    let max_depth = hierarchy.max_depth().max(1) as f32;

    hierarchy
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| {
            vec2(
                cross[index] * width,
                node.depth as f32 / max_depth * height,
            )
        })
        .collect()
}

/// Projects a polar layout point to scene coordinates; angle zero points
/// straight up.
pub fn radial_point(angle: f32, radius: f32) -> Vec2 {
    let rotated = angle - PI / 2.0;
    vec2(radius * rotated.cos(), radius * rotated.sin())
}
