use eframe::egui::{self, Align, Color32, Context, Layout, vec2};

use crate::tag::{DocumentSource, Hierarchy};

use super::super::scene::Scene;
use super::super::viewport::Viewport;
use super::super::{GraphOptions, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(
        hierarchy: Hierarchy,
        options: GraphOptions,
        content: eframe::egui::Vec2,
        tree_document: bool,
    ) -> Self {
        let mut collapsed = hierarchy.clone();
        if tree_document {
            collapsed.collapse_below(options.collapse_level);
        }

        Self {
            full: hierarchy,
            hierarchy: collapsed,
            options,
            content,
            tree_document,
            radial_centering: tree_document,
            viewport: Viewport::default(),
            scene: Scene::default(),
            scene_dirty: true,
            search: String::new(),
            selected: None,
            load_error: None,
            visible_node_count: 0,
            visible_link_count: 0,
        }
    }

    /// Re-collapses the backup hierarchy at the new threshold. Only
    /// label trees collapse; predicted paths always render in full.
    pub(in crate::app) fn set_collapse_level(&mut self, level: usize) {
        self.options.collapse_level = level;
        if self.tree_document {
            self.hierarchy = self.full.clone();
            self.hierarchy.collapse_below(level);
            self.scene_dirty = true;
        }
    }

    /// Resizes the content rect that layout and pan bounds derive from.
    pub(in crate::app) fn set_size(&mut self, width: f32, height: f32, radial: bool) {
        self.content = vec2(width.max(1.0), height.max(1.0));
        self.radial_centering = radial;
        self.scene_dirty = true;
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &DocumentSource,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.scene_dirty {
            self.rebuild_scene();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("tagview");
                    ui.separator();
                    ui.label(if source.is_tree() {
                        "label tree"
                    } else {
                        "predicted paths"
                    });
                    ui.label(format!("document: {}", source.path().display()));
                    ui.label(format!("nodes: {}", self.hierarchy.len()));
                    ui.label(format!("links: {}", self.scene.links.len()));

                    if is_loading {
                        ui.spinner();
                    } else if ui.button("Reload").clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Reset view").clicked() {
                        self.viewport.reset();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(error) = &self.load_error {
                            ui.colored_label(
                                Color32::from_rgb(240, 120, 100),
                                format!("reload failed: {error}"),
                            );
                        }
                        ui.label(format!(
                            "visible: {} nodes / {} links",
                            self.visible_node_count, self.visible_link_count
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }
}
