use eframe::egui::{self, Pos2, Rect, Ui};

use super::ViewModel;
use super::viewport::Viewport;

impl ViewModel {
    /// Wheel zoom anchored at the pointer: the scene point under the
    /// cursor stays put, then the resulting translation is clamped to
    /// the pan bounds.
    pub(in crate::app) fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let scene_before = self.viewport.to_scene(rect, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        let scale =
            (self.viewport.scale * zoom_factor).clamp(Viewport::MIN_SCALE, Viewport::MAX_SCALE);
        let translation = pointer - rect.center() - (scene_before * scale);
        self.viewport.apply_gesture(scale, translation, self.content);
    }

    pub(in crate::app) fn handle_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let translation = self.viewport.translation + response.drag_delta();
            self.viewport
                .apply_gesture(self.viewport.scale, translation, self.content);
        }
    }

    pub(in crate::app) fn hovered_node(
        &self,
        ui: &Ui,
        screen_positions: &[Pos2],
        pick_radius: f32,
    ) -> Option<(usize, f32)> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        screen_positions
            .iter()
            .enumerate()
            .filter_map(|(index, position)| {
                let distance = position.distance(pointer);
                if distance <= pick_radius {
                    Some((index, distance))
                } else {
                    None
                }
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
