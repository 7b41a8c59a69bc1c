use crate::graph::Position;

/// Below this many samples the plain min/max is used.
pub const TRIM_MIN_SAMPLES: usize = 12;
const TRIM_FRACTION: f64 = 0.1;

/// Min/max after discarding roughly the lowest and highest decile.
pub fn trimmed_extent(values: &[f64]) -> Option<(f64, f64)> {
    let mut sorted = values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .collect::<Vec<_>>();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let last = sorted.len() - 1;
    if sorted.len() < TRIM_MIN_SAMPLES {
        return Some((sorted[0], sorted[last]));
    }

    let low = ((TRIM_FRACTION * last as f64).floor() as usize).min(last);
    let high = (((1.0 - TRIM_FRACTION) * last as f64).ceil() as usize).min(last);
    Some((sorted[low], sorted[high]))
}

/// Untrimmed max - min, floored at 1 so a flat axis still yields a usable frame.
pub fn raw_span(values: &[f64]) -> f64 {
    let (min, max) = values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
            (min.min(value), max.max(value))
        });
    if min > max { 1.0 } else { (max - min).max(1.0) }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RobustBounds {
    /// Midpoint of the trimmed extent on each axis.
    pub center: Position,
    /// Raw span on each axis, each at least 1.
    pub span: Position,
}

pub fn robust_bounds(points: &[Position]) -> Option<RobustBounds> {
    let mut center = Position::zeros();
    let mut span = Position::zeros();

    for axis in 0..3 {
        let values = points.iter().map(|point| point[axis]).collect::<Vec<_>>();
        let (min, max) = trimmed_extent(&values)?;
        center[axis] = (min + max) * 0.5;
        span[axis] = raw_span(&values);
    }

    Some(RobustBounds { center, span })
}
