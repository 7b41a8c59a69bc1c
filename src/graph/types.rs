use std::collections::HashMap;
use std::fmt;

use nalgebra::Vector3;

use crate::tree::{DocumentType, LinkType};

pub type Position = Vector3<f64>;

/// Direction-insensitive edge identity: ordered endpoint pair plus lower-cased relation type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub low: String,
    pub high: String,
    pub ltype: String,
}

impl EdgeKey {
    pub fn canonical(a: &str, b: &str, ltype: &str) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.to_owned(),
            high: high.to_owned(),
            ltype: ltype.to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.low, self.high, self.ltype)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub doctype: DocumentType,
    pub size: u32,
    /// Original documents folded into a group node; empty for plain documents.
    pub members: Vec<String>,
    pub position: Option<Position>,
}

impl Node {
    pub fn is_group(&self) -> bool {
        !self.members.is_empty()
    }

    pub fn finite_position(&self) -> Option<Position> {
        self.position
            .filter(|position| position.iter().all(|value| value.is_finite()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub ltype: LinkType,
    pub weight: u32,
}

impl Edge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::canonical(&self.source, &self.target, self.ltype.as_str())
    }
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
}

impl Graph {
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();
        Self {
            nodes,
            edges,
            index_by_id,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|index| &self.nodes[index])
    }
}
