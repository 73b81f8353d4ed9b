use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{debug, error, info};

use crate::catalog::{Catalog, CatalogTotals, load_catalog};
use crate::explorer::{
    Explorer, ExplorerConfig, ExplorerEvent, FrameScheduler, NodeId, PaginationControls,
};

mod graph;
mod physics;
mod render_utils;
mod scene;
mod ui;

use physics::PhysicsConfig;
use scene::SimulationGraph;

type LoadResult = Result<Catalog, String>;

pub struct ExplorerApp {
    catalog_path: PathBuf,
    config: ExplorerConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    source: String,
    totals: CatalogTotals,
    explorer: Explorer,
    scene: SimulationGraph,
    search: String,
    hovered: Option<NodeId>,
    pagination: Option<PaginationControls>,
}

impl FrameScheduler for Context {
    fn request_frame(&self) {
        self.request_repaint();
    }
}

impl ExplorerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        catalog_path: PathBuf,
        config: ExplorerConfig,
    ) -> Self {
        let state = Self::start_load(catalog_path.clone());
        Self {
            catalog_path,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(catalog_path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_catalog(&catalog_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(catalog_path: PathBuf) -> AppState {
        info!(path = %catalog_path.display(), "loading catalog");
        AppState::Loading {
            rx: Self::spawn_load(catalog_path),
        }
    }

    fn failed(message: String) -> AppState {
        error!(%message, "catalog load failed");
        AppState::Error(message)
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(catalog)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            self.config,
                            catalog,
                        ))));
                    }
                    Ok(Err(message)) => transition = Some(Self::failed(message)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(Self::failed("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading project catalog...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the project catalog");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.catalog_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    info!(path = %self.catalog_path.display(), "reloading catalog");
                    self.reload_rx = Some(Self::spawn_load(self.catalog_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(catalog)) => model.apply_catalog(catalog),
                        Ok(Err(message)) => transition = Some(Self::failed(message)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Self::failed(
                                "Background load worker disconnected".to_owned(),
                            ));
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

impl ViewModel {
    fn new(config: ExplorerConfig, catalog: Catalog) -> Self {
        let mut model = Self {
            source: String::new(),
            totals: CatalogTotals::default(),
            explorer: Explorer::new(config),
            scene: SimulationGraph::new(PhysicsConfig {
                spring_length: config.radius,
                ..PhysicsConfig::default()
            }),
            search: String::new(),
            hovered: None,
            pagination: None,
        };
        model.apply_catalog(catalog);
        model
    }

    /// Swaps in a freshly loaded catalog and rebuilds the category layout.
    fn apply_catalog(&mut self, catalog: Catalog) {
        self.totals = catalog.totals();
        self.source = catalog.source;
        self.hovered = None;
        self.explorer.reload(&mut self.scene, catalog.items);
        self.scene.restart_stabilization();
        self.drain_explorer_events();
    }

    fn drain_explorer_events(&mut self) {
        for event in self.explorer.take_events() {
            match event {
                ExplorerEvent::OverlayOpened(item_id) => debug!(%item_id, "overlay opened"),
                ExplorerEvent::OverlayClosed(item_id) => debug!(%item_id, "overlay closed"),
                ExplorerEvent::Pagination(controls) => self.pagination = controls,
            }
        }
    }

    fn show(&mut self, ctx: &Context, reload_requested: &mut bool, is_loading: bool) {
        self.draw_top_bar(ctx, reload_requested, is_loading);

        egui::SidePanel::left("categories")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_category_search(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_graph(ui);
                self.draw_cards(ui);
            });

        self.draw_pagination(ctx);
        self.drain_explorer_events();
    }
}
