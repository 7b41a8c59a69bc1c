use std::collections::{BTreeSet, HashMap, HashSet};

use crate::tree::{Document, DocumentType, LinkType, TreeSource};

use super::flatten::{Flattened, flatten_tree};
use super::selector::EndpointSelector;
use super::taxonomy::{Taxonomies, build_taxonomies};
use super::types::{Edge, EdgeKey, Graph, Node};

/// Filter parameters coming from the control panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    pub ignored: BTreeSet<LinkType>,
    pub select_a: String,
    pub select_b: String,
    pub show_all: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            ignored: BTreeSet::new(),
            select_a: String::new(),
            select_b: String::new(),
            show_all: true,
        }
    }
}

/// Derives graphs from one tree; flattening and taxonomies are computed once per tree.
pub struct GraphBuilder<S: TreeSource> {
    source: S,
    flattened: Flattened,
    taxonomies: Taxonomies,
}

struct Frame<'d> {
    document: &'d Document,
    next_link: usize,
}

impl<S: TreeSource> GraphBuilder<S> {
    pub fn new(source: S) -> Self {
        let flattened = flatten_tree(&source);
        let taxonomies = build_taxonomies(&source, &flattened);
        Self {
            source,
            flattened,
            taxonomies,
        }
    }

    pub fn flattened(&self) -> &Flattened {
        &self.flattened
    }

    pub fn taxonomies(&self) -> &Taxonomies {
        &self.taxonomies
    }

    /// Node identity of a document: its group when it was folded, else its stable key.
    fn resolve(&self, document: &Document) -> String {
        let key = self.source.stable_key(document);
        if document.doctype == DocumentType::Standard
            && let Some(group_id) = self.flattened.group_identity_of(&key)
        {
            return group_id.to_owned();
        }
        key
    }

    pub fn build(&self, options: &BuildOptions) -> Graph {
        let traversed = self.traverse(&options.ignored);
        let kept = self.apply_endpoint_filter(traversed, options);
        let graph = self.materialize(kept);

        log::info!(
            "built graph: {} nodes, {} edges (ignored {:?}, show all {})",
            graph.node_count(),
            graph.edge_count(),
            options.ignored,
            options.show_all
        );
        graph
    }

    /// Depth-first walk from the roots, emitting edges in build orientation.
    fn traverse(&self, ignored: &BTreeSet<LinkType>) -> Vec<Edge> {
        let mut seen = HashSet::new();
        let mut seen_edges: HashSet<EdgeKey> = HashSet::new();
        let mut edges = Vec::new();

        for root_id in self.source.roots() {
            let Some(root) = self.source.document(root_id) else {
                continue;
            };
            if !seen.insert(self.source.stable_key(root)) {
                continue;
            }

            let mut stack = vec![Frame {
                document: root,
                next_link: 0,
            }];

            loop {
                let (document, index) = match stack.last_mut() {
                    Some(frame) => {
                        let index = frame.next_link;
                        frame.next_link += 1;
                        (frame.document, index)
                    }
                    None => break,
                };

                let Some(link) = document.links.get(index) else {
                    stack.pop();
                    continue;
                };

                if ignored.contains(&link.ltype) {
                    continue;
                }

                let Some(target) = self.source.document(&link.target) else {
                    log::debug!(
                        "dropping {} link {} -> {}: target not in store",
                        link.ltype,
                        document.id,
                        link.target
                    );
                    continue;
                };

                let source_id = self.resolve(document);
                let target_id = self.resolve(target);
                let key = EdgeKey::canonical(&source_id, &target_id, link.ltype.as_str());
                if !seen_edges.insert(key) {
                    continue;
                }

                if source_id != target_id {
                    edges.push(Edge {
                        source: source_id,
                        target: target_id,
                        ltype: link.ltype,
                        weight: link.ltype.weight(),
                    });
                }

                if seen.insert(self.source.stable_key(target)) {
                    stack.push(Frame {
                        document: target,
                        next_link: 0,
                    });
                }
            }
        }

        edges
    }

    /// Type of the document behind a resolved identity; group identities get a standard placeholder.
    fn endpoint_type(&self, identity: &str) -> Option<DocumentType> {
        if self.flattened.group(identity).is_some() {
            return Some(DocumentType::Standard);
        }
        self.source.document(identity).map(|document| document.doctype)
    }

    fn apply_endpoint_filter(&self, edges: Vec<Edge>, options: &BuildOptions) -> Vec<Edge> {
        if options.show_all {
            return edges;
        }

        let selectors = [
            EndpointSelector::parse(&options.select_a),
            EndpointSelector::parse(&options.select_b),
        ];
        if !selectors.iter().any(EndpointSelector::is_active) {
            return edges;
        }

        edges
            .into_iter()
            .filter(|edge| {
                let endpoints = [
                    (edge.source.as_str(), self.endpoint_type(&edge.source)),
                    (edge.target.as_str(), self.endpoint_type(&edge.target)),
                ];
                selectors.iter().any(|selector| {
                    endpoints
                        .iter()
                        .any(|(identity, doctype)| selector.matches(identity, *doctype))
                })
            })
            .collect()
    }

    fn new_node(&self, identity: &str) -> Option<Node> {
        if let Some(group) = self.flattened.group(identity) {
            return Some(Node {
                id: identity.to_owned(),
                name: group.base.clone(),
                doctype: DocumentType::Standard,
                size: group.members.len() as u32,
                members: group.members.clone(),
                position: None,
            });
        }

        self.source.document(identity).map(|document| Node {
            id: identity.to_owned(),
            name: document.name.clone(),
            doctype: document.doctype,
            size: 1,
            members: Vec::new(),
            position: None,
        })
    }

    /// Nodes come only from surviving edges; every repeat occurrence grows the node by one.
    fn materialize(&self, edges: Vec<Edge>) -> Graph {
        let mut nodes: Vec<Node> = Vec::new();
        let mut index_by_id: HashMap<String, usize> = HashMap::new();
        let mut kept = Vec::with_capacity(edges.len());

        for edge in edges {
            let mut complete = true;
            for identity in [&edge.source, &edge.target] {
                if let Some(&index) = index_by_id.get(identity.as_str()) {
                    nodes[index].size += 1;
                } else if let Some(node) = self.new_node(identity) {
                    index_by_id.insert(identity.clone(), nodes.len());
                    nodes.push(node);
                } else {
                    complete = false;
                }
            }

            if complete {
                // Final orientation points from the linked document back to the linking one.
                kept.push(Edge {
                    source: edge.target,
                    target: edge.source,
                    ltype: edge.ltype,
                    weight: edge.weight,
                });
            }
        }

        Graph::from_parts(nodes, kept)
    }
}
