use crate::graph::Position;

use super::extent::RobustBounds;

pub const PULL_BACK: f64 = 1.66;
pub const MIN_CAMERA_DISTANCE: f64 = 1200.0;
pub const MAX_CAMERA_DISTANCE: f64 = 2550.0;

const LOOK_AT_RIGHT_SHIFT: f64 = 0.02;
const LOOK_AT_DOWN_SHIFT: f64 = 0.035;
const CAMERA_LIFT: f64 = 0.017;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub fov_y_degrees: f64,
}

impl Viewport {
    pub fn aspect(&self) -> f64 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    fn half_fov_tan(&self) -> f64 {
        (self.fov_y_degrees.to_radians() * 0.5).tan()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitDistances {
    pub height: f64,
    pub width: f64,
}

impl FitDistances {
    pub fn larger(&self) -> f64 {
        self.height.max(self.width)
    }
}

/// Distance at which `span_y` fills the vertical field of view, and `span_x` the horizontal one.
pub fn fit_distances(span_x: f64, span_y: f64, viewport: &Viewport) -> FitDistances {
    let tan = viewport.half_fov_tan();
    FitDistances {
        height: (0.5 * span_y) / tan,
        width: (0.5 * span_x) / (tan * viewport.aspect()),
    }
}

pub fn camera_distance(fit: f64) -> f64 {
    (fit * PULL_BACK).clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

pub fn zoom_bounds(distance: f64) -> ZoomBounds {
    ZoomBounds {
        min: (0.36 * distance).clamp(150.0, 420.0),
        max: (6.8 * distance).max(3600.0),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Position,
    pub look_at: Position,
}

impl CameraPose {
    pub fn distance(&self) -> f64 {
        (self.position - self.look_at).norm()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFrame {
    pub pose: CameraPose,
    pub distance: f64,
    pub zoom: ZoomBounds,
    pub bounds: RobustBounds,
}

/// Camera looking down -z at the bounds, composed slightly right of and below center.
pub fn place_camera(bounds: &RobustBounds, viewport: &Viewport) -> CameraFrame {
    let span = bounds.span;
    let fit = fit_distances(span.x, span.y, viewport);
    let distance = camera_distance(fit.larger());

    let look_at = bounds.center
        + Position::new(LOOK_AT_RIGHT_SHIFT * span.x, -LOOK_AT_DOWN_SHIFT * span.y, 0.0);
    let position = look_at + Position::new(0.0, CAMERA_LIFT * span.y, distance);

    CameraFrame {
        pose: CameraPose { position, look_at },
        distance,
        zoom: zoom_bounds(distance),
        bounds: *bounds,
    }
}
