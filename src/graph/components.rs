use std::collections::{HashMap, HashSet};

use super::types::Graph;

/// Identities of the largest connected component, treating edges as undirected.
///
/// Components are discovered in node order and the first one wins a size tie.
pub fn largest_component(graph: &Graph) -> HashSet<String> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::with_capacity(graph.node_count());
    for edge in &graph.edges {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
        adjacency
            .entry(edge.target.as_str())
            .or_default()
            .push(edge.source.as_str());
    }

    let mut visited: HashSet<&str> = HashSet::with_capacity(graph.node_count());
    let mut best: Vec<&str> = Vec::new();
    let mut stack = Vec::new();

    for node in &graph.nodes {
        let start = node.id.as_str();
        if !visited.insert(start) {
            continue;
        }

        let mut component = vec![start];
        stack.push(start);
        while let Some(current) = stack.pop() {
            let Some(neighbors) = adjacency.get(current) else {
                continue;
            };
            for &next in neighbors {
                if visited.insert(next) {
                    component.push(next);
                    stack.push(next);
                }
            }
        }

        if component.len() > best.len() {
            best = component;
        }
    }

    best.into_iter().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{Edge, Node};
    use crate::tree::{DocumentType, LinkType};

    fn node(id: &str) -> Node {
        Node {
            id: id.into(),
            name: id.into(),
            doctype: DocumentType::Cre,
            size: 1,
            members: Vec::new(),
            position: None,
        }
    }

    fn edge(source: &str, target: &str) -> Edge {
        Edge {
            source: source.into(),
            target: target.into(),
            ltype: LinkType::Related,
            weight: 1,
        }
    }

    #[test]
    fn two_triangles_and_an_isolated_node() {
        let graph = Graph::from_parts(
            ["lonely", "a", "b", "c", "x", "y", "z"].map(node).to_vec(),
            vec![
                edge("a", "b"),
                edge("b", "c"),
                edge("c", "a"),
                edge("x", "y"),
                edge("y", "z"),
                edge("z", "x"),
            ],
        );

        let component = largest_component(&graph);
        assert_eq!(component.len(), 3);
        // First triangle discovered wins the tie.
        assert!(["a", "b", "c"].iter().all(|id| component.contains(*id)));
    }

    #[test]
    fn direction_does_not_split_components() {
        let graph = Graph::from_parts(
            ["a", "b", "c", "d"].map(node).to_vec(),
            vec![edge("b", "a"), edge("c", "b"), edge("d", "c")],
        );
        assert_eq!(largest_component(&graph).len(), 4);
    }

    #[test]
    fn long_chains_do_not_recurse() {
        let ids = (0..50_000).map(|index| format!("n{index}")).collect::<Vec<_>>();
        let nodes = ids.iter().map(|id| node(id)).collect();
        let edges = ids.windows(2).map(|pair| edge(&pair[0], &pair[1])).collect();
        let graph = Graph::from_parts(nodes, edges);

        assert_eq!(largest_component(&graph).len(), 50_000);
    }

    #[test]
    fn empty_graph_has_empty_component() {
        assert!(largest_component(&Graph::default()).is_empty());
    }
}
