use crate::graph::Position;

const OCTREE_LEAF_CAPACITY: usize = 12;
const OCTREE_MAX_DEPTH: usize = 10;

#[derive(Clone, Copy, Debug)]
struct OctBounds {
    center: Position,
    half_extent: f64,
}

impl OctBounds {
    fn from_points(points: &[Position]) -> Option<Self> {
        let first = points.first()?;
        let (min, max) = points
            .iter()
            .fold((*first, *first), |(min, max), point| (min.inf(point), max.sup(point)));
        if !min.iter().chain(max.iter()).all(|value| value.is_finite()) {
            return None;
        }

        let span = (max - min).max().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half_extent: span * 0.5 + 1.0,
        })
    }

    fn contains(self, point: &Position) -> bool {
        (point - self.center)
            .iter()
            .all(|offset| offset.abs() <= self.half_extent)
    }

    fn side_length(self) -> f64 {
        self.half_extent * 2.0
    }

    /// Octant bits: x is bit 0, y bit 1, z bit 2.
    fn octant_for(self, point: &Position) -> usize {
        usize::from(point.x >= self.center.x)
            | usize::from(point.y >= self.center.y) << 1
            | usize::from(point.z >= self.center.z) << 2
    }

    fn child(self, octant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let sign = |bit: usize| if octant & bit == 0 { -quarter } else { quarter };
        Self {
            center: self.center + Position::new(sign(1), sign(2), sign(4)),
            half_extent: quarter,
        }
    }
}

/// Barnes-Hut octree over node positions; each cell carries its mass and center of mass.
#[derive(Debug)]
pub(super) struct OctNode {
    bounds: OctBounds,
    center_of_mass: Position,
    mass: f64,
    indices: Vec<usize>,
    children: [Option<Box<OctNode>>; 8],
}

impl OctNode {
    pub(super) fn build(positions: &[Position]) -> Option<Self> {
        let bounds = OctBounds::from_points(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(bounds, indices, positions, 0))
    }

    fn build_node(bounds: OctBounds, indices: Vec<usize>, positions: &[Position], depth: usize) -> Self {
        let mass = indices.len() as f64;
        let mut center_of_mass = indices
            .iter()
            .fold(Position::zeros(), |sum, &index| sum + positions[index]);
        if mass > 0.0 {
            center_of_mass /= mass;
        }

        let mut node = Self {
            bounds,
            center_of_mass,
            mass,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= OCTREE_MAX_DEPTH || node.indices.len() <= OCTREE_LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 8, _>(|_| Vec::new());
        for &index in &node.indices {
            buckets[bounds.octant_for(&positions[index])].push(index);
        }

        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return node;
        }

        for (octant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            node.children[octant] = Some(Box::new(Self::build_node(
                bounds.child(octant),
                bucket,
                positions,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// Charge parameters for one tick; `strength` already includes alpha.
#[derive(Clone, Copy, Debug)]
pub(super) struct ChargeParams {
    pub(super) strength: f64,
    pub(super) softening: f64,
    pub(super) theta: f64,
    pub(super) min_distance_sq: f64,
}

/// Velocity change of node `index` from every other node; distant cells act through their center of mass.
pub(super) fn accumulate_charge(
    node: &OctNode,
    index: usize,
    positions: &[Position],
    params: ChargeParams,
    velocity: &mut Position,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            let mut delta = positions[other] - point;
            if delta.norm_squared() < params.min_distance_sq {
                delta = coincident_direction(index, other);
            }
            *velocity += delta * (params.strength / (delta.norm_squared() + params.softening));
        }
        return;
    }

    let delta = node.center_of_mass - point;
    let distance = delta.norm().max(1e-3);
    let can_approximate = !node.bounds.contains(&point)
        && node.bounds.side_length() / distance < params.theta
        && node.mass > 1.0;

    if can_approximate {
        *velocity += delta * (params.strength * node.mass / (delta.norm_squared() + params.softening));
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge(child, index, positions, params, velocity);
    }
}

/// Deterministic tiny separation for coincident nodes, opposite for the two sides of a pair.
fn coincident_direction(index: usize, other: usize) -> Position {
    let (low, high) = (index.min(other), index.max(other));
    let angle = ((low as f64) * 0.618_034 + (high as f64) * 0.414_214) * std::f64::consts::TAU;
    let direction = Position::new(angle.cos(), angle.sin(), 0.5) * 1e-3;
    if index == low { direction } else { -direction }
}
