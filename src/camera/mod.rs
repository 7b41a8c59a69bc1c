mod align;
mod extent;
mod fit;

use std::collections::HashSet;

use crate::graph::{Node, Position};

pub use align::align_principal_axis;
pub use extent::robust_bounds;
pub use fit::{CameraFrame, CameraPose, Viewport, ZoomBounds, place_camera};

/// With fewer dominant nodes than this, every positioned node is sampled.
const MIN_DOMINANT_SAMPLES: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    Framed(CameraFrame),
    /// Nothing positioned yet; the renderer falls back to its own fit-all.
    FitAll,
}

/// Frames the camera once per graph build, when the layout first settles.
#[derive(Debug, Default)]
pub struct CameraFramer {
    framed: bool,
}

impl CameraFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.framed = false;
    }

    pub fn has_framed(&self) -> bool {
        self.framed
    }

    pub fn on_settle(
        &mut self,
        nodes: &mut [Node],
        dominant: &HashSet<String>,
        viewport: &Viewport,
    ) -> Option<FrameOutcome> {
        if self.framed {
            return None;
        }
        self.framed = true;
        Some(frame_graph(nodes, dominant, viewport))
    }
}

/// Aligns the layout to its principal axis and computes a camera that fits the dominant component.
pub fn frame_graph(
    nodes: &mut [Node],
    dominant: &HashSet<String>,
    viewport: &Viewport,
) -> FrameOutcome {
    if !nodes.iter().any(|node| node.finite_position().is_some()) {
        return FrameOutcome::FitAll;
    }

    if let Some(alignment) = align_principal_axis(nodes, dominant) {
        log::debug!(
            "aligned layout by {:.3} rad (mirrored: {})",
            alignment.angle,
            alignment.mirrored
        );
    }

    let dominant_points = nodes
        .iter()
        .filter(|node| dominant.contains(&node.id))
        .filter_map(Node::finite_position)
        .collect::<Vec<Position>>();
    let samples = if dominant_points.len() < MIN_DOMINANT_SAMPLES {
        nodes
            .iter()
            .filter_map(Node::finite_position)
            .collect::<Vec<_>>()
    } else {
        dominant_points
    };

    match robust_bounds(&samples) {
        Some(bounds) => {
            let frame = place_camera(&bounds, viewport);
            log::info!(
                "framed {} samples at distance {:.0}",
                samples.len(),
                frame.distance
            );
            FrameOutcome::Framed(frame)
        }
        None => FrameOutcome::FitAll,
    }
}
