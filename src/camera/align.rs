use std::collections::HashSet;

use crate::graph::Node;

pub const MIN_ALIGN_NODES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Alignment {
    pub centroid: (f64, f64),
    /// Principal-axis angle that was rotated away, in radians.
    pub angle: f64,
    pub mirrored: bool,
}

/// Angle of the dominant spread of `(x, y)` offsets from their centroid.
pub fn principal_axis_angle(points: &[(f64, f64)]) -> Option<((f64, f64), f64)> {
    if points.is_empty() {
        return None;
    }

    let count = points.len() as f64;
    let cx = points.iter().map(|point| point.0).sum::<f64>() / count;
    let cy = points.iter().map(|point| point.1).sum::<f64>() / count;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for &(x, y) in points {
        let (dx, dy) = (x - cx, y - cy);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    Some(((cx, cy), 0.5 * (2.0 * sxy).atan2(sxx - syy)))
}

/// Rotates every positioned node so the dominant component's spread lies along x,
/// then flips the plane if the denser side ended up on the left.
pub fn align_principal_axis(nodes: &mut [Node], dominant: &HashSet<String>) -> Option<Alignment> {
    let points = nodes
        .iter()
        .filter(|node| dominant.contains(&node.id))
        .filter_map(Node::finite_position)
        .map(|position| (position.x, position.y))
        .collect::<Vec<_>>();
    if points.len() < MIN_ALIGN_NODES {
        return None;
    }

    let ((cx, cy), angle) = principal_axis_angle(&points)?;
    let (sin, cos) = (-angle).sin_cos();

    for node in nodes.iter_mut() {
        if let Some(mut position) = node.finite_position() {
            let (dx, dy) = (position.x - cx, position.y - cy);
            position.x = cx + (dx * cos) - (dy * sin);
            position.y = cy + (dx * sin) + (dy * cos);
            node.position = Some(position);
        }
    }

    let (mut left, mut right) = (0usize, 0usize);
    for position in nodes
        .iter()
        .filter(|node| dominant.contains(&node.id))
        .filter_map(Node::finite_position)
    {
        if position.x < cx {
            left += 1;
        } else if position.x > cx {
            right += 1;
        }
    }

    let mirrored = right < left;
    if mirrored {
        for node in nodes.iter_mut() {
            if let Some(mut position) = node.finite_position() {
                position.x = (2.0 * cx) - position.x;
                position.y = (2.0 * cy) - position.y;
                node.position = Some(position);
            }
        }
    }

    Some(Alignment {
        centroid: (cx, cy),
        angle,
        mirrored,
    })
}
