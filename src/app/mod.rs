use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Context as _;
use eframe::egui::{self, Context, Vec2, vec2};

use crate::tag::{DocumentSource, Hierarchy};

mod interaction;
mod render_utils;
mod scene;
mod ui;
mod view;
mod viewport;

use scene::Scene;
use viewport::Viewport;

/// Tunables mirroring the graph's public configuration surface.
#[derive(Clone, Copy, Debug)]
pub struct GraphOptions {
    /// Angular span of the radial layout, in radians.
    pub arc_span: f32,
    /// Upper bound on the radial extent.
    pub radius: f32,
    /// Extra scene offset applied to the layout origin.
    pub offset: Vec2,
    /// Node marker radius in scene units.
    pub node_radius: f32,
    /// Depth below which label trees are pruned.
    pub collapse_level: usize,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            arc_span: std::f32::consts::TAU,
            radius: 1500.0,
            offset: Vec2::ZERO,
            node_radius: 4.0,
            collapse_level: 2,
        }
    }
}

type LoadResult = Result<Hierarchy, String>;

pub struct TagViewApp {
    source: DocumentSource,
    options: GraphOptions,
    content: Vec2,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    /// Uncollapsed hierarchy kept for re-collapsing at a new threshold.
    full: Hierarchy,
    /// The hierarchy the layout and scene are built from.
    hierarchy: Hierarchy,
    options: GraphOptions,
    content: Vec2,
    tree_document: bool,
    radial_centering: bool,
    viewport: Viewport,
    scene: Scene,
    scene_dirty: bool,
    search: String,
    selected: Option<String>,
    /// Error of the last failed reload; the previous scene stays up.
    load_error: Option<String>,
    visible_node_count: usize,
    visible_link_count: usize,
}

impl TagViewApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: DocumentSource,
        options: GraphOptions,
        width: f32,
        height: f32,
    ) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            options,
            content: vec2(width, height),
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: DocumentSource) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_hierarchy(&source).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: DocumentSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }
}

fn load_hierarchy(source: &DocumentSource) -> anyhow::Result<Hierarchy> {
    let records = source.load()?;
    let hierarchy = Hierarchy::from_records(&records)
        .context("document does not form a single-rooted hierarchy")?;
    log::info!("built hierarchy of {} nodes", hierarchy.len());
    Ok(hierarchy)
}

impl eframe::App for TagViewApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(hierarchy) => AppState::Ready(Box::new(ViewModel::new(
                            hierarchy,
                            self.options,
                            self.content,
                            self.source.is_tree(),
                        ))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading tag document...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load tag document");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_loading = self.reload_rx.is_some();
                model.show(ctx, &self.source, &mut reload_requested, is_loading);

                // at most one outstanding load; further requests wait
                if reload_requested && self.reload_rx.is_none() {
                    model.load_error = None;
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(hierarchy)) => {
                            let mut fresh = ViewModel::new(
                                hierarchy,
                                model.options,
                                model.content,
                                self.source.is_tree(),
                            );
                            // the viewport transform persists across renders
                            fresh.viewport = model.viewport;
                            fresh.search = model.search.clone();
                            fresh.selected = model.selected.clone();
                            fresh.radial_centering = model.radial_centering;
                            transition = Some(AppState::Ready(Box::new(fresh)));
                        }
                        Ok(Err(error)) => {
                            log::warn!("reload failed: {error}");
                            model.load_error = Some(error);
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            model.load_error = Some("load worker disconnected".to_owned());
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
