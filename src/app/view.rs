use std::collections::HashSet;

use eframe::egui::{
    self, Color32, CursorIcon, FontId, Sense, Shape, Stroke, Ui, Vec2, epaint::TextShape, vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::layout;

use super::render_utils::{
    blend_color, circle_visible, dim_color, draw_background, polyline_visible, rotate,
};
use super::scene::{self, LabelAnchor};
use super::ViewModel;

// The vertical layout keeps a footer strip free for the deepest labels.
const PATH_FOOTER: f32 = 160.0;
const LABEL_MIN_SCALE: f32 = 0.18;
const MATCH_TINT: Color32 = Color32::from_rgb(103, 196, 255);
const SELECTED_RING: Color32 = Color32::from_rgb(245, 206, 93);
const HOVERED_RING: Color32 = Color32::from_rgb(255, 164, 101);

fn fuzzy_match(matcher: &SkimMatcherV2, text: &str, query: &str) -> bool {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
        .is_some()
}

impl ViewModel {
    /// Lays the current hierarchy out and reconciles the resulting
    /// primitives into the retained scene.
    pub(in crate::app) fn rebuild_scene(&mut self) {
        let desired = if self.tree_document {
            let extent = self.radial_extent();
            let layout = layout::radial_layout(&self.hierarchy, self.options.arc_span, extent);
            scene::build_radial_scene(&self.hierarchy, &layout, self.scene_origin())
        } else {
            let extent = vec2(self.content.x, (self.content.y - PATH_FOOTER).max(1.0));
            let layout = layout::vertical_layout(&self.hierarchy, extent.x, extent.y);
            scene::build_path_scene(&self.hierarchy, &layout, self.scene_origin() - extent / 2.0)
        };

        let report = self.scene.reconcile(desired);
        log::debug!(
            "scene reconciled: {} entered, {} updated, {} exited",
            report.entered,
            report.updated,
            report.exited
        );
        self.scene_dirty = false;
    }

    fn radial_extent(&self) -> f32 {
        (self.content.x * 2.0 / 3.0).min(self.options.radius)
    }

    fn scene_origin(&self) -> Vec2 {
        // radial trees anchor at a third of the canvas instead of its center
        let centering = if self.radial_centering {
            -self.content / 6.0
        } else {
            Vec2::ZERO
        };
        self.options.offset + centering
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.scene_dirty {
            self.rebuild_scene();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.viewport.translation, self.viewport.scale);
        self.handle_zoom(ui, rect, &response);
        self.handle_pan(&response);

        let scale = self.viewport.scale;
        if self.hierarchy.is_empty() {
            ui.label("The document produced an empty hierarchy.");
            return;
        }

        let mut visible_links = 0usize;
        for link in &self.scene.links {
            let points = link
                .points
                .iter()
                .map(|&point| self.viewport.to_screen(rect, point))
                .collect::<Vec<_>>();
            if !polyline_visible(rect, &points, 2.0) {
                continue;
            }
            visible_links += 1;
            painter.add(Shape::line(
                points,
                Stroke::new((1.5 * scale).clamp(0.3, 6.0), link.color),
            ));
        }

        let marker_radius = (self.options.node_radius * scale).clamp(1.0, 60.0);
        let screen_positions = self
            .scene
            .nodes
            .iter()
            .map(|node| self.viewport.to_screen(rect, node.position))
            .collect::<Vec<_>>();

        let hovered = self.hovered_node(ui, &screen_positions, marker_radius.max(6.0));
        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = CursorIcon::PointingHand);
        }
        if response.clicked() {
            self.selected = hovered
                .and_then(|(index, _)| self.scene.nodes.get(index))
                .map(|node| node.id.clone());
        }
        let hovered_index = hovered.map(|(index, _)| index);

        let query = self.search.trim().to_owned();
        let search_active = !query.is_empty();
        let matches: HashSet<usize> = if search_active {
            let matcher = SkimMatcherV2::default();
            self.scene
                .nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| {
                    (fuzzy_match(&matcher, &node.label.text, &query)
                        || fuzzy_match(&matcher, &node.id, &query))
                    .then_some(index)
                })
                .collect()
        } else {
            HashSet::new()
        };

        let draw_labels = scale >= LABEL_MIN_SCALE;
        let font = FontId::proportional((12.0 * scale).clamp(2.0, 64.0));
        let mut visible_nodes = 0usize;

        for (index, node) in self.scene.nodes.iter().enumerate() {
            let position = screen_positions[index];
            if !circle_visible(rect, position, marker_radius + 200.0 * scale) {
                continue;
            }
            visible_nodes += 1;

            let is_selected = self.selected.as_deref() == Some(node.id.as_str());
            let is_hovered = hovered_index == Some(index);
            let is_match = matches.contains(&index);

            let fill = if is_match {
                blend_color(node.color, MATCH_TINT, 0.68)
            } else if search_active {
                dim_color(node.color, 0.25)
            } else {
                node.color
            };

            painter.circle_filled(position, marker_radius, fill);
            let ring = if is_selected {
                Stroke::new(2.2, SELECTED_RING)
            } else if is_hovered {
                Stroke::new(1.8, HOVERED_RING)
            } else {
                Stroke::new(1.0, Color32::BLACK)
            };
            painter.circle_stroke(position, marker_radius, ring);

            if !draw_labels {
                continue;
            }

            let label = &node.label;
            let color = if search_active && !is_match {
                dim_color(label.color, 0.35)
            } else {
                label.color
            };
            let galley = painter.layout_no_wrap(label.text.clone(), font.clone(), color);
            let local = match label.anchor {
                LabelAnchor::Start => vec2(
                    label.offset.x * scale,
                    label.offset.y * scale - galley.size().y / 2.0,
                ),
                LabelAnchor::End => vec2(
                    label.offset.x * scale - galley.size().x,
                    label.offset.y * scale - galley.size().y / 2.0,
                ),
            };
            let text_pos = position + rotate(local, label.angle);
            if label.angle == 0.0 {
                painter.galley(text_pos, galley, color);
            } else {
                painter.add(TextShape::new(text_pos, galley, color).with_angle(label.angle));
            }
        }

        self.visible_node_count = visible_nodes;
        self.visible_link_count = visible_links;

        if let Some(index) = hovered_index
            && let Some(node) = self.scene.nodes.get(index)
        {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                egui::Align2::LEFT_TOP,
                &node.label.text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
