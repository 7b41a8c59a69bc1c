mod forces;
mod octree;
mod schedule;
mod seed;

use crate::graph::{Edge, Node};

pub use forces::ForceSimulation;
pub use schedule::StrengthSchedule;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimEvent {
    /// Nothing moved: not loaded or already settled.
    Idle,
    Running,
    /// Emitted once per cooling cycle, on the tick alpha drops below its minimum.
    Settled,
}

/// Layout engine that owns velocities and writes node positions in place.
pub trait Simulation {
    fn load(&mut self, nodes: &mut [Node], edges: &[Edge]);
    fn set_charge_strength(&mut self, strength: f64);
    fn reheat(&mut self);
    fn tick(&mut self, nodes: &mut [Node]) -> SimEvent;
}
