use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::graph::{AdjacencyIndex, EdgeKey, Graph};

pub const HOVER_CONFIRM_DELAY: Duration = Duration::from_millis(1000);

/// Single-shot deadline armed by a hover-enter; dropping it cancels it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverTimer {
    pub target: String,
    pub due: Instant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spotlight {
    pub node: String,
    /// Neighbors of `node` plus `node` itself.
    pub neighborhood: HashSet<String>,
    pub edges: HashSet<EdgeKey>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FocusState {
    #[default]
    Idle,
    Pending(HoverTimer),
    Focused(Spotlight),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeEmphasis {
    Normal,
    Hovered,
    Neighbor,
    Dimmed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeEmphasis {
    Normal,
    Incident,
    Faint,
}

/// Debounced hover spotlight: idle, pending (timer armed) or focused.
#[derive(Debug)]
pub struct NeighborhoodFocus {
    state: FocusState,
    delay: Duration,
    torn_down: bool,
}

impl Default for NeighborhoodFocus {
    fn default() -> Self {
        Self::new()
    }
}

impl NeighborhoodFocus {
    pub fn new() -> Self {
        Self::with_delay(HOVER_CONFIRM_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            state: FocusState::Idle,
            delay,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn spotlight(&self) -> Option<&Spotlight> {
        match &self.state {
            FocusState::Focused(spotlight) => Some(spotlight),
            _ => None,
        }
    }

    pub fn pending_deadline(&self) -> Option<Instant> {
        match &self.state {
            FocusState::Pending(timer) => Some(timer.due),
            _ => None,
        }
    }

    /// Node the machine is currently waiting on or spotlighting.
    pub fn target(&self) -> Option<&str> {
        match &self.state {
            FocusState::Idle => None,
            FocusState::Pending(timer) => Some(timer.target.as_str()),
            FocusState::Focused(spotlight) => Some(spotlight.node.as_str()),
        }
    }

    pub fn hover_enter(&mut self, node: &str, now: Instant) {
        if self.torn_down || self.target() == Some(node) {
            return;
        }

        // Replacing the state drops the previous timer and spotlight in one step.
        self.state = FocusState::Pending(HoverTimer {
            target: node.to_owned(),
            due: now + self.delay,
        });
    }

    pub fn hover_exit(&mut self) {
        self.state = FocusState::Idle;
    }

    pub fn background_click(&mut self) {
        self.state = FocusState::Idle;
    }

    /// Fires the pending timer once `now` reaches its deadline; returns true when a spotlight was committed.
    pub fn poll(&mut self, now: Instant, index: &AdjacencyIndex) -> bool {
        let FocusState::Pending(timer) = &self.state else {
            return false;
        };
        if self.torn_down || now < timer.due {
            return false;
        }

        let node = timer.target.clone();
        let mut neighborhood = index.neighbors(&node).cloned().unwrap_or_default();
        neighborhood.insert(node.clone());
        let edges = index.incident_edges(&node).cloned().unwrap_or_default();

        log::debug!(
            "spotlight on {node}: {} nodes, {} edges",
            neighborhood.len(),
            edges.len()
        );
        self.state = FocusState::Focused(Spotlight {
            node,
            neighborhood,
            edges,
        });
        true
    }

    pub fn teardown(&mut self) {
        self.state = FocusState::Idle;
        self.torn_down = true;
    }

    pub fn node_emphasis(&self, id: &str) -> NodeEmphasis {
        match self.spotlight() {
            None => NodeEmphasis::Normal,
            Some(spotlight) if spotlight.node == id => NodeEmphasis::Hovered,
            Some(spotlight) if spotlight.neighborhood.contains(id) => NodeEmphasis::Neighbor,
            Some(_) => NodeEmphasis::Dimmed,
        }
    }

    pub fn edge_emphasis(&self, key: &EdgeKey) -> EdgeEmphasis {
        match self.spotlight() {
            None => EdgeEmphasis::Normal,
            Some(spotlight) if spotlight.edges.contains(key) => EdgeEmphasis::Incident,
            Some(_) => EdgeEmphasis::Faint,
        }
    }

    pub fn status_text(&self, graph: &Graph) -> String {
        let name = |id: &str| {
            graph
                .node(id)
                .map(|node| node.name.clone())
                .unwrap_or_else(|| id.to_owned())
        };

        match self.state() {
            FocusState::Idle => "Hover a node to focus its neighborhood".to_owned(),
            FocusState::Pending(timer) => format!("Focusing {}…", name(&timer.target)),
            FocusState::Focused(spotlight) => format!(
                "Focused {}: {} neighbors, {} links",
                name(&spotlight.node),
                spotlight.neighborhood.len().saturating_sub(1),
                spotlight.edges.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};
    use crate::tree::{DocumentType, LinkType};

    fn index() -> (Graph, AdjacencyIndex) {
        let node = |id: &str| Node {
            id: id.into(),
            name: id.to_uppercase(),
            doctype: DocumentType::Cre,
            size: 1,
            members: Vec::new(),
            position: None,
        };
        let edge = |source: &str, target: &str| Edge {
            source: source.into(),
            target: target.into(),
            ltype: LinkType::Related,
            weight: 1,
        };
        let graph = Graph::from_parts(
            vec![node("a"), node("b"), node("c"), node("d")],
            vec![edge("a", "b"), edge("a", "c"), edge("c", "d")],
        );
        let index = AdjacencyIndex::new(&graph);
        (graph, index)
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn spotlight_appears_only_after_the_delay() {
        let (_, index) = index();
        let start = Instant::now();
        let mut focus = NeighborhoodFocus::new();

        focus.hover_enter("a", start);
        assert!(!focus.poll(start + ms(999), &index));
        assert!(focus.spotlight().is_none());

        assert!(focus.poll(start + ms(1000), &index));
        let spotlight = focus.spotlight().unwrap();
        assert_eq!(spotlight.node, "a");
        assert_eq!(
            spotlight.neighborhood,
            HashSet::from(["a".to_owned(), "b".to_owned(), "c".to_owned()])
        );
        assert_eq!(spotlight.edges.len(), 2);
    }

    #[test]
    fn a_new_hover_cancels_the_previous_timer() {
        let (_, index) = index();
        let start = Instant::now();
        let mut focus = NeighborhoodFocus::new();

        focus.hover_enter("a", start);
        focus.hover_enter("d", start + ms(600));

        // A's deadline passes without A ever being spotlighted.
        assert!(!focus.poll(start + ms(1000), &index));
        assert!(!focus.poll(start + ms(1599), &index));
        assert!(focus.spotlight().is_none());

        assert!(focus.poll(start + ms(1600), &index));
        assert_eq!(focus.spotlight().unwrap().node, "d");
    }

    #[test]
    fn hovering_elsewhere_clears_the_spotlight_immediately() {
        let (_, index) = index();
        let start = Instant::now();
        let mut focus = NeighborhoodFocus::new();

        focus.hover_enter("a", start);
        focus.poll(start + ms(1000), &index);
        assert!(focus.spotlight().is_some());

        focus.hover_enter("b", start + ms(1200));
        assert!(focus.spotlight().is_none());
        assert_eq!(focus.pending_deadline(), Some(start + ms(2200)));
    }

    #[test]
    fn re_entering_the_same_node_keeps_the_timer() {
        let start = Instant::now();
        let mut focus = NeighborhoodFocus::new();

        focus.hover_enter("a", start);
        focus.hover_enter("a", start + ms(500));
        assert_eq!(focus.pending_deadline(), Some(start + ms(1000)));
    }

    #[test]
    fn exit_and_background_click_return_to_idle() {
        let (_, index) = index();
        let start = Instant::now();
        let mut focus = NeighborhoodFocus::new();

        focus.hover_enter("a", start);
        focus.hover_exit();
        assert_eq!(focus.state(), &FocusState::Idle);
        assert!(!focus.poll(start + ms(5000), &index));

        focus.hover_enter("a", start);
        focus.poll(start + ms(1000), &index);
        focus.background_click();
        assert_eq!(focus.state(), &FocusState::Idle);
    }

    #[test]
    fn teardown_cancels_and_ignores_later_events() {
        let (_, index) = index();
        let start = Instant::now();
        let mut focus = NeighborhoodFocus::new();

        focus.hover_enter("a", start);
        focus.teardown();
        assert!(!focus.poll(start + ms(2000), &index));

        focus.hover_enter("b", start + ms(2000));
        assert_eq!(focus.state(), &FocusState::Idle);
    }

    #[test]
    fn emphasis_follows_the_spotlight() {
        let (graph, index) = index();
        let start = Instant::now();
        let mut focus = NeighborhoodFocus::new();
        assert_eq!(focus.node_emphasis("d"), NodeEmphasis::Normal);

        focus.hover_enter("a", start);
        assert_eq!(focus.node_emphasis("a"), NodeEmphasis::Normal);
        focus.poll(start + ms(1000), &index);

        assert_eq!(focus.node_emphasis("a"), NodeEmphasis::Hovered);
        assert_eq!(focus.node_emphasis("c"), NodeEmphasis::Neighbor);
        assert_eq!(focus.node_emphasis("d"), NodeEmphasis::Dimmed);
        assert_eq!(
            focus.edge_emphasis(&EdgeKey::canonical("c", "a", "related")),
            EdgeEmphasis::Incident
        );
        assert_eq!(
            focus.edge_emphasis(&EdgeKey::canonical("c", "d", "related")),
            EdgeEmphasis::Faint
        );
        assert_eq!(focus.status_text(&graph), "Focused A: 2 neighbors, 2 links");
    }
}
