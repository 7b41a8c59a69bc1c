use std::collections::{HashMap, HashSet};

use super::types::{EdgeKey, Graph};

/// Neighbor and incident-edge lookup for hover focus, rebuilt whole for every graph.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
    neighbors: HashMap<String, HashSet<String>>,
    edges: HashMap<String, HashSet<EdgeKey>>,
}

impl AdjacencyIndex {
    pub fn new(graph: &Graph) -> Self {
        let mut neighbors: HashMap<String, HashSet<String>> =
            HashMap::with_capacity(graph.node_count());
        let mut edges: HashMap<String, HashSet<EdgeKey>> =
            HashMap::with_capacity(graph.node_count());

        for node in &graph.nodes {
            neighbors.entry(node.id.clone()).or_default();
            edges.entry(node.id.clone()).or_default();
        }

        for edge in &graph.edges {
            let key = edge.key();
            neighbors
                .entry(edge.source.clone())
                .or_default()
                .insert(edge.target.clone());
            neighbors
                .entry(edge.target.clone())
                .or_default()
                .insert(edge.source.clone());
            edges
                .entry(edge.source.clone())
                .or_default()
                .insert(key.clone());
            edges.entry(edge.target.clone()).or_default().insert(key);
        }

        Self { neighbors, edges }
    }

    pub fn neighbors(&self, id: &str) -> Option<&HashSet<String>> {
        self.neighbors.get(id)
    }

    pub fn incident_edges(&self, id: &str) -> Option<&HashSet<EdgeKey>> {
        self.edges.get(id)
    }

    pub fn degree(&self, id: &str) -> usize {
        self.neighbors.get(id).map_or(0, HashSet::len)
    }
}
