use std::f32::consts::TAU;

use eframe::egui::{self, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.add_space(4.0);

        let mut relayout = false;

        if self.tree_document {
            let mut level = self.options.collapse_level;
            ui.add(
                egui::Slider::new(&mut level, 0..=self.full.max_depth()).text("Collapse depth"),
            )
            .on_hover_text("Prune the label tree below this depth before layout.");
            if level != self.options.collapse_level {
                self.set_collapse_level(level);
            }

            relayout |= ui
                .add(
                    egui::Slider::new(&mut self.options.arc_span, 0.5..=TAU)
                        .text("Angular span"),
                )
                .on_hover_text("Total angle the radial tree fans across, in radians.")
                .changed();
            relayout |= ui
                .add(egui::Slider::new(&mut self.options.radius, 200.0..=3000.0).text("Radius"))
                .on_hover_text("Upper bound on the radial extent of the tree.")
                .changed();
        }

        ui.add(
            egui::Slider::new(&mut self.options.node_radius, 1.0..=12.0).text("Marker radius"),
        )
        .on_hover_text("Radius of the node circles, in scene units.");

        let mut width = self.content.x;
        let mut height = self.content.y;
        let mut resized = false;
        ui.horizontal(|ui| {
            ui.label("Content size");
            resized |= ui
                .add(egui::DragValue::new(&mut width).range(200.0..=8000.0))
                .changed();
            resized |= ui
                .add(egui::DragValue::new(&mut height).range(200.0..=8000.0))
                .changed();
        });
        let mut radial_centering = self.radial_centering;
        resized |= ui
            .checkbox(&mut radial_centering, "Radial centering")
            .on_hover_text("Anchor the scene at a third of the canvas rather than its center.")
            .changed();
        if resized {
            self.set_size(width, height, radial_centering);
        }

        ui.separator();
        ui.label("Search labels")
            .on_hover_text("Fuzzy-highlight matching nodes without changing the layout.");
        ui.text_edit_singleline(&mut self.search);

        if relayout {
            self.scene_dirty = true;
        }
    }
}
