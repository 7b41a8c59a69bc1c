use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui::{self, Context, Pos2};

use crate::camera::CameraFramer;
use crate::config::ExplorerConfig;
use crate::focus::NeighborhoodFocus;
use crate::graph::{AdjacencyIndex, BuildOptions, EdgeKey, Graph, GraphBuilder};
use crate::sim::{ForceSimulation, StrengthSchedule};
use crate::tree::{DocumentTree, LinkType, load_tree};

mod graph;
mod orbit;
mod render_utils;
mod ui;

use orbit::OrbitCamera;

const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct ExplorerApp {
    config: ExplorerConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<DocumentTree, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<DocumentTree, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    /// Holds the loaded tree with its flattening and taxonomies, reused by every rebuild.
    builder: GraphBuilder<DocumentTree>,
    tree_path: PathBuf,
    options: BuildOptions,
    /// Selector text being edited; committed into `options` when the field loses focus.
    selector_drafts: [String; 2],
    fov_degrees: f64,
    graph: Graph,
    adjacency: AdjacencyIndex,
    dominant: HashSet<String>,
    focus: NeighborhoodFocus,
    framer: CameraFramer,
    schedule: StrengthSchedule,
    simulation: ForceSimulation,
    camera: OrbitCamera,
    graph_dirty: bool,
    reframe_requested: bool,
    hovered: Option<String>,
    render: RenderGraph,
}

/// Per-build render data: edge endpoints resolved to node indices plus per-frame scratch.
struct RenderGraph {
    edges: Vec<RenderEdge>,
    view_scratch: ViewScratch,
}

struct RenderEdge {
    from: usize,
    to: usize,
    ltype: LinkType,
    key: EdgeKey,
}

#[derive(Default)]
struct ViewScratch {
    screen_positions: Vec<Option<Pos2>>,
    screen_radii: Vec<f32>,
    depths: Vec<f64>,
    visible_indices: Vec<usize>,
    draw_order: Vec<usize>,
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ExplorerConfig) -> Self {
        let state = Self::start_load(config.tree_path.clone());
        Self {
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(tree_path: PathBuf) -> Receiver<Result<DocumentTree, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_tree(&tree_path).map_err(|error| format!("{error:#}"));
            if let Err(error) = &result {
                log::error!("{error}");
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(tree_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(tree_path),
        }
    }

    fn ready(config: &ExplorerConfig, tree: DocumentTree, options: BuildOptions) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(
            tree,
            config.tree_path.clone(),
            options,
            config.fov_degrees,
        )))
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(tree) => Self::ready(&self.config, tree, self.config.options.clone()),
                        Err(error) => AppState::Error(error),
                    });
                } else {
                    ctx.request_repaint_after(LOAD_POLL_INTERVAL);
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading document tree...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load document tree");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.config.tree_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.config.tree_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            // A reload keeps the filters the user has set up.
                            let options = model.options.clone();
                            transition = Some(match result {
                                Ok(tree) => Self::ready(&self.config, tree, options),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint_after(LOAD_POLL_INTERVAL);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            if let AppState::Ready(model) = &mut self.state {
                model.focus.teardown();
            }
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(tree: DocumentTree, tree_path: PathBuf, options: BuildOptions, fov_degrees: f64) -> Self {
        Self {
            builder: GraphBuilder::new(tree),
            tree_path,
            selector_drafts: [options.select_a.clone(), options.select_b.clone()],
            options,
            fov_degrees,
            graph: Graph::default(),
            adjacency: AdjacencyIndex::default(),
            dominant: HashSet::new(),
            focus: NeighborhoodFocus::new(),
            framer: CameraFramer::new(),
            schedule: StrengthSchedule::new(Instant::now()),
            simulation: ForceSimulation::new(),
            camera: OrbitCamera::new(fov_degrees),
            graph_dirty: true,
            reframe_requested: false,
            hovered: None,
            render: RenderGraph {
                edges: Vec::new(),
                view_scratch: ViewScratch::default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::camera::Viewport;
    use crate::focus::FocusState;
    use crate::tree::{Document, DocumentType};

    fn model() -> ViewModel {
        let tree = DocumentTree::from_documents(
            &["CRE:1"],
            vec![
                Document::new("CRE:1", "Auth", DocumentType::Cre)
                    .with_link(LinkType::LinkedTo, "ASVS:V1")
                    .with_link(LinkType::LinkedTo, "ASVS:V2"),
                Document::new("ASVS:V1", "V1", DocumentType::Standard)
                    .with_link(LinkType::Related, "CRE:1"),
                Document::new("ASVS:V2", "V2", DocumentType::Standard)
                    .with_link(LinkType::Related, "CRE:1"),
            ],
        );
        ViewModel::new(tree, PathBuf::from("tree.json"), BuildOptions::default(), 40.0)
    }

    #[test]
    fn rebuild_cancels_hover_schedule_and_framing() {
        let mut model = model();
        let first = Instant::now();
        model.rebuild_graph(first);
        assert_eq!(model.graph.node_count(), 2);

        // Advance the previous build: a stage fired, a hover is pending, the camera framed.
        let later = first + Duration::from_millis(400);
        assert!(model.schedule.poll(later).is_some());
        model.focus.hover_enter("CRE:1", later);
        assert!(matches!(model.focus.state(), FocusState::Pending(_)));
        let viewport = Viewport {
            width: 1600.0,
            height: 900.0,
            fov_y_degrees: 40.0,
        };
        assert!(
            model
                .framer
                .on_settle(&mut model.graph.nodes, &model.dominant, &viewport)
                .is_some()
        );
        assert!(model.framer.has_framed());

        let rebuilt = later + Duration::from_millis(100);
        model.rebuild_graph(rebuilt);

        assert_eq!(*model.focus.state(), FocusState::Idle);
        assert_eq!(model.focus.pending_deadline(), None);
        assert_eq!(
            model.schedule.next_deadline(),
            Some(rebuilt + Duration::from_millis(200))
        );
        assert!(!model.framer.has_framed());
        assert_eq!(
            model.simulation.charge_strength(),
            model.schedule.initial_charge()
        );
    }

    #[test]
    fn rebuilds_reuse_the_flattened_tree() {
        let mut model = model();
        model.rebuild_graph(Instant::now());
        assert_eq!(model.graph.node("group:ASVS").map(|node| node.size), Some(3));

        model.options.ignored.insert(LinkType::LinkedTo);
        model.rebuild_graph(Instant::now());
        assert!(model.graph.is_empty());
        assert_eq!(model.builder.flattened().groups.len(), 1);
    }
}
