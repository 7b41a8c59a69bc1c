use std::collections::HashMap;

use crate::graph::{Edge, Node, Position};

use super::octree::{ChargeParams, OctNode, accumulate_charge};
use super::schedule::INITIAL_CHARGE;
use super::seed::seed_missing;
use super::{SimEvent, Simulation};

const ALPHA_MIN: f64 = 0.001;
const VELOCITY_DECAY: f64 = 0.4;
const LINK_DISTANCE: f64 = 70.0;
const LINK_STRENGTH: f64 = 0.35;
const CHARGE_SOFTENING: f64 = 25.0;
const MIN_DISTANCE_SQ: f64 = 1e-6;
const MAX_SPEED: f64 = 60.0;
const BARNES_HUT_THETA: f64 = 0.72;

#[derive(Clone, Copy, Debug)]
struct Spring {
    from: usize,
    to: usize,
    rest: f64,
}

/// Force layout in 3D with Barnes-Hut charge and geometric alpha cooling.
#[derive(Debug)]
pub struct ForceSimulation {
    velocities: Vec<Position>,
    springs: Vec<Spring>,
    charge_strength: f64,
    alpha: f64,
    alpha_decay: f64,
    settled: bool,
}

impl Default for ForceSimulation {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceSimulation {
    pub fn new() -> Self {
        Self {
            velocities: Vec::new(),
            springs: Vec::new(),
            charge_strength: INITIAL_CHARGE,
            alpha: 0.0,
            // About 300 ticks from a full reheat down to ALPHA_MIN.
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
            settled: true,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn charge_strength(&self) -> f64 {
        self.charge_strength
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    fn apply_charge(&mut self, positions: &[Position]) {
        let Some(octree) = OctNode::build(positions) else {
            return;
        };
        let params = ChargeParams {
            strength: self.charge_strength * self.alpha,
            softening: CHARGE_SOFTENING,
            theta: BARNES_HUT_THETA,
            min_distance_sq: MIN_DISTANCE_SQ,
        };
        for (index, velocity) in self.velocities.iter_mut().enumerate() {
            accumulate_charge(&octree, index, positions, params, velocity);
        }
    }

    fn apply_springs(&mut self, positions: &[Position]) {
        for spring in &self.springs {
            let (from, to) = (spring.from, spring.to);
            let delta = (positions[to] + self.velocities[to]) - (positions[from] + self.velocities[from]);
            let distance = delta.norm().max(1e-6);
            let pull = delta * ((distance - spring.rest) / distance * self.alpha * LINK_STRENGTH);
            self.velocities[to] -= pull * 0.5;
            self.velocities[from] += pull * 0.5;
        }
    }
}

impl Simulation for ForceSimulation {
    fn load(&mut self, nodes: &mut [Node], edges: &[Edge]) {
        let seeded = seed_missing(nodes);
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.as_str(), index))
            .collect::<HashMap<_, _>>();

        self.springs = edges
            .iter()
            .filter_map(|edge| {
                let from = *index_by_id.get(edge.source.as_str())?;
                let to = *index_by_id.get(edge.target.as_str())?;
                (from != to).then(|| Spring {
                    from,
                    to,
                    rest: LINK_DISTANCE / f64::from(edge.weight.max(1)),
                })
            })
            .collect();
        self.velocities = vec![Position::zeros(); nodes.len()];
        self.alpha = 1.0;
        self.settled = false;

        log::debug!(
            "simulation loaded {} nodes ({} seeded), {} springs",
            nodes.len(),
            seeded,
            self.springs.len()
        );
    }

    fn set_charge_strength(&mut self, strength: f64) {
        self.charge_strength = strength;
    }

    fn reheat(&mut self) {
        self.alpha = 1.0;
        self.settled = false;
    }

    fn tick(&mut self, nodes: &mut [Node]) -> SimEvent {
        if self.settled {
            return SimEvent::Idle;
        }
        if nodes.len() != self.velocities.len() {
            log::warn!(
                "simulation holds {} nodes but was ticked with {}; reload required",
                self.velocities.len(),
                nodes.len()
            );
            return SimEvent::Idle;
        }

        self.alpha -= self.alpha * self.alpha_decay;

        let positions = nodes
            .iter()
            .map(|node| node.finite_position().unwrap_or_else(Position::zeros))
            .collect::<Vec<_>>();
        self.apply_charge(&positions);
        self.apply_springs(&positions);

        let count = positions.len();
        let mut centroid = Position::zeros();
        for (node, (position, velocity)) in nodes
            .iter_mut()
            .zip(positions.iter().zip(self.velocities.iter_mut()))
        {
            *velocity *= 1.0 - VELOCITY_DECAY;
            let speed = velocity.norm();
            if speed > MAX_SPEED {
                *velocity *= MAX_SPEED / speed;
            }
            let next = position + *velocity;
            centroid += next;
            node.position = Some(next);
        }

        if count > 0 {
            centroid /= count as f64;
            for node in nodes.iter_mut() {
                if let Some(position) = node.position.as_mut() {
                    *position -= centroid;
                }
            }
        }

        if self.alpha < ALPHA_MIN {
            self.settled = true;
            log::info!("layout settled ({count} nodes)");
            SimEvent::Settled
        } else {
            SimEvent::Running
        }
    }
}
