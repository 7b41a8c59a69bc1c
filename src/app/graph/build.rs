use std::time::Instant;

use crate::focus::NeighborhoodFocus;
use crate::graph::{AdjacencyIndex, largest_component};
use crate::sim::{Simulation, StrengthSchedule};

use super::super::{RenderEdge, RenderGraph, ViewModel, ViewScratch};

impl ViewModel {
    /// Derives a fresh graph from the tree and restarts everything that depends on it.
    pub(in crate::app) fn rebuild_graph(&mut self, now: Instant) {
        let mut graph = self.builder.build(&self.options);

        // Pending hover and staged strength changes belong to the previous build.
        self.focus.teardown();
        self.focus = NeighborhoodFocus::new();
        self.schedule = StrengthSchedule::new(now);
        self.framer.reset();
        self.reframe_requested = false;
        self.hovered = None;

        self.simulation
            .set_charge_strength(self.schedule.initial_charge());
        self.simulation.load(&mut graph.nodes, &graph.edges);

        self.adjacency = AdjacencyIndex::new(&graph);
        self.dominant = largest_component(&graph);

        let edges = graph
            .edges
            .iter()
            .filter_map(|edge| {
                Some(RenderEdge {
                    from: graph.index_of(&edge.source)?,
                    to: graph.index_of(&edge.target)?,
                    ltype: edge.ltype,
                    key: edge.key(),
                })
            })
            .collect();
        self.render = RenderGraph {
            edges,
            view_scratch: ViewScratch::default(),
        };

        log::info!(
            "built graph: {} nodes, {} edges, dominant component {} ({:.1} ms)",
            graph.node_count(),
            graph.edge_count(),
            self.dominant.len(),
            now.elapsed().as_secs_f64() * 1000.0
        );
        self.graph = graph;
        self.graph_dirty = false;
    }
}
