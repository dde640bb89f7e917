use eframe::egui::{RichText, Ui};

use crate::util::format_precision;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click a node marker to select it.");
            return;
        };

        let Some(index) = self.hierarchy.index_of(&selected_id) else {
            ui.label("Selected node no longer exists in the current hierarchy.");
            return;
        };

        let node = self.hierarchy.node(index);
        ui.label(RichText::new(node.label.clone()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        match node.confidence {
            Some(confidence) => {
                ui.label(format!("Confidence: {}%", format_precision(confidence, 4)));
            }
            None => {
                ui.label("Confidence: not reported");
            }
        }
        ui.label(format!("Depth: {}", node.depth));
        ui.label(format!("Children: {}", node.children.len()));

        ui.separator();
        ui.label(RichText::new("Path from root").strong());
        let path = self
            .hierarchy
            .ancestor_path(index)
            .into_iter()
            .map(|ancestor| self.hierarchy.node(ancestor).label.clone())
            .collect::<Vec<_>>()
            .join(" -> ");
        ui.label(path);
    }
}
