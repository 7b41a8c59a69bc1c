use crate::graph::{Node, Position};
use crate::util::stable_triple;

const SHELL_RADIUS_PER_NODE: f64 = 38.0;
const SHELL_MIN_RADIUS: f64 = 60.0;

/// Initial position on a sphere shell; the direction and depth come from a hash of the identity.
pub(super) fn seed_position(id: &str, node_count: usize) -> Position {
    let radius = (SHELL_RADIUS_PER_NODE * (node_count.max(1) as f64).cbrt()).max(SHELL_MIN_RADIUS);
    let (x, y, z) = stable_triple(id);
    let jitter = Position::new(x, y, z);

    let direction = jitter
        .try_normalize(1e-9)
        .unwrap_or_else(|| Position::new(0.0, 0.0, 1.0));
    let depth = 0.75 + (0.25 * (jitter.norm() / 3.0_f64.sqrt()).min(1.0));
    direction * (radius * depth)
}

/// Gives every node without a usable position its seeded one.
pub(super) fn seed_missing(nodes: &mut [Node]) -> usize {
    let count = nodes.len();
    let mut seeded = 0;
    for node in nodes.iter_mut() {
        if node.finite_position().is_none() {
            node.position = Some(seed_position(&node.id, count));
            seeded += 1;
        }
    }
    seeded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::DocumentType;

    #[test]
    fn seeds_are_stable_and_on_the_shell() {
        let first = seed_position("CRE:1", 27);
        assert_eq!(first, seed_position("CRE:1", 27));
        assert_ne!(first, seed_position("CRE:2", 27));

        let radius = SHELL_RADIUS_PER_NODE * 3.0;
        let distance = first.norm();
        assert!(distance >= radius * 0.75 - 1e-9 && distance <= radius + 1e-9);
    }

    #[test]
    fn only_unpositioned_nodes_are_seeded() {
        let node = |id: &str, position: Option<Position>| Node {
            id: id.into(),
            name: id.into(),
            doctype: DocumentType::Tool,
            size: 1,
            members: Vec::new(),
            position,
        };
        let kept = Position::new(1.0, 2.0, 3.0);
        let mut nodes = vec![
            node("a", Some(kept)),
            node("b", None),
            node("c", Some(Position::new(f64::NAN, 0.0, 0.0))),
        ];

        assert_eq!(seed_missing(&mut nodes), 2);
        assert_eq!(nodes[0].position, Some(kept));
        assert!(nodes.iter().all(|node| node.finite_position().is_some()));
    }
}
