use std::f64::consts::PI;

use eframe::egui::{Pos2, Rect, Vec2};

use crate::camera::{CameraPose, ZoomBounds};
use crate::graph::Position;

const NEAR_PLANE: f64 = 1.0;
const POLAR_MARGIN: f64 = 0.05;
const ROTATE_SPEED: f64 = 0.005;
const ZOOM_SPEED: f64 = 0.0015;
const MIN_ANGULAR_SPEED: f64 = 1e-4;
const DEFAULT_DISTANCE: f64 = 1200.0;
const FIT_ALL_PADDING: f64 = 1.15;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Projected {
    pub(in crate::app) screen: Pos2,
    pub(in crate::app) depth: f64,
    /// Screen pixels per world unit at this depth.
    pub(in crate::app) scale: f32,
}

/// Orbit controls around a look-at point: rotate, pan, zoom and inertial damping.
#[derive(Clone, Debug)]
pub(in crate::app) struct OrbitCamera {
    pose: CameraPose,
    fov_y_degrees: f64,
    pub(in crate::app) min_distance: f64,
    pub(in crate::app) max_distance: f64,
    /// Fraction of the angular velocity removed every frame.
    pub(in crate::app) damping: f64,
    pub(in crate::app) rotate_enabled: bool,
    pub(in crate::app) pan_enabled: bool,
    pub(in crate::app) zoom_enabled: bool,
    yaw_velocity: f64,
    pitch_velocity: f64,
}

impl OrbitCamera {
    pub(in crate::app) fn new(fov_y_degrees: f64) -> Self {
        Self {
            pose: CameraPose {
                position: Position::new(0.0, 0.0, DEFAULT_DISTANCE),
                look_at: Position::zeros(),
            },
            fov_y_degrees,
            min_distance: 150.0,
            max_distance: 8000.0,
            damping: 0.12,
            rotate_enabled: true,
            pan_enabled: true,
            zoom_enabled: true,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
        }
    }

    pub(in crate::app) fn pose(&self) -> CameraPose {
        self.pose
    }

    pub(in crate::app) fn set_pose(&mut self, pose: CameraPose) {
        self.pose = pose;
        self.yaw_velocity = 0.0;
        self.pitch_velocity = 0.0;
    }

    pub(in crate::app) fn set_zoom_bounds(&mut self, bounds: ZoomBounds) {
        self.min_distance = bounds.min;
        self.max_distance = bounds.max.max(bounds.min);
    }

    pub(in crate::app) fn distance(&self) -> f64 {
        self.pose.distance()
    }

    fn half_fov_tan(&self) -> f64 {
        (self.fov_y_degrees.to_radians() * 0.5).tan()
    }

    /// Right and true-up vectors of the current view, plus the forward direction.
    fn basis(&self) -> (Position, Position, Position) {
        let forward = (self.pose.look_at - self.pose.position)
            .try_normalize(1e-9)
            .unwrap_or_else(|| Position::new(0.0, 0.0, -1.0));
        let right = forward
            .cross(&Position::y())
            .try_normalize(1e-9)
            .unwrap_or_else(Position::x);
        let up = right.cross(&forward);
        (right, up, forward)
    }

    pub(in crate::app) fn project(&self, rect: Rect, point: &Position) -> Option<Projected> {
        let (right, up, forward) = self.basis();
        let relative = point - self.pose.position;
        let depth = relative.dot(&forward);
        if depth <= NEAR_PLANE {
            return None;
        }

        let focal = (f64::from(rect.height()) * 0.5) / self.half_fov_tan();
        let scale = focal / depth;
        let x = relative.dot(&right) * scale;
        let y = relative.dot(&up) * scale;
        Some(Projected {
            screen: rect.center() + Vec2::new(x as f32, -y as f32),
            depth,
            scale: scale as f32,
        })
    }

    /// Adds drag-driven angular velocity; the motion itself is applied by [`Self::step`].
    pub(in crate::app) fn rotate(&mut self, drag: Vec2) {
        if !self.rotate_enabled {
            return;
        }
        self.yaw_velocity -= f64::from(drag.x) * ROTATE_SPEED;
        self.pitch_velocity -= f64::from(drag.y) * ROTATE_SPEED;
    }

    pub(in crate::app) fn pan(&mut self, drag: Vec2, viewport_height: f32) {
        if !self.pan_enabled || viewport_height <= 0.0 {
            return;
        }
        let (right, up, _) = self.basis();
        let world_per_pixel =
            (2.0 * self.distance() * self.half_fov_tan()) / f64::from(viewport_height);
        let shift = (right * -f64::from(drag.x) + up * f64::from(drag.y)) * world_per_pixel;
        self.pose.position += shift;
        self.pose.look_at += shift;
    }

    pub(in crate::app) fn zoom(&mut self, scroll: f32) {
        if !self.zoom_enabled || scroll == 0.0 {
            return;
        }
        let offset = self.pose.position - self.pose.look_at;
        let Some(direction) = offset.try_normalize(1e-9) else {
            return;
        };
        let distance = (offset.norm() * (-f64::from(scroll) * ZOOM_SPEED).exp())
            .clamp(self.min_distance, self.max_distance);
        self.pose.position = self.pose.look_at + direction * distance;
    }

    /// Applies and damps the pending angular velocity; returns true while still moving.
    pub(in crate::app) fn step(&mut self) -> bool {
        if self.yaw_velocity.abs() < MIN_ANGULAR_SPEED && self.pitch_velocity.abs() < MIN_ANGULAR_SPEED
        {
            self.yaw_velocity = 0.0;
            self.pitch_velocity = 0.0;
            return false;
        }

        let offset = self.pose.position - self.pose.look_at;
        let radius = offset.norm();
        if radius > 0.0 {
            let azimuth = offset.x.atan2(offset.z) + self.yaw_velocity;
            let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos() + self.pitch_velocity)
                .clamp(POLAR_MARGIN, PI - POLAR_MARGIN);
            self.pose.position = self.pose.look_at
                + Position::new(
                    radius * polar.sin() * azimuth.sin(),
                    radius * polar.cos(),
                    radius * polar.sin() * azimuth.cos(),
                );
        }

        let keep = 1.0 - self.damping.clamp(0.0, 1.0);
        self.yaw_velocity *= keep;
        self.pitch_velocity *= keep;
        true
    }

    /// Frames every given point, widening the zoom range when it has to.
    pub(in crate::app) fn fit_all(&mut self, points: &[Position]) {
        let finite = points
            .iter()
            .filter(|point| point.iter().all(|value| value.is_finite()));
        let (min, max) = finite.fold(
            (Position::repeat(f64::INFINITY), Position::repeat(f64::NEG_INFINITY)),
            |(min, max), point| (min.inf(point), max.sup(point)),
        );

        let (center, radius) = if min.x > max.x {
            (Position::zeros(), 0.0)
        } else {
            ((min + max) * 0.5, ((max - min) * 0.5).norm())
        };
        let half_fov = (self.fov_y_degrees.to_radians() * 0.5).max(1e-3);
        let distance = (radius * FIT_ALL_PADDING / half_fov.sin()).max(DEFAULT_DISTANCE);

        self.max_distance = self.max_distance.max(distance);
        self.set_pose(CameraPose {
            position: center + Position::new(0.0, 0.0, distance),
            look_at: center,
        });
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    fn rect() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn look_at_projects_to_the_center() {
        let camera = OrbitCamera::new(40.0);
        let projected = camera.project(rect(), &Position::zeros()).unwrap();
        assert_eq!(projected.screen, pos2(400.0, 300.0));
        assert_eq!(projected.depth, DEFAULT_DISTANCE);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let camera = OrbitCamera::new(40.0);
        assert!(camera.project(rect(), &Position::new(0.0, 0.0, 2000.0)).is_none());
    }

    #[test]
    fn screen_axes_follow_world_axes_when_looking_down_z() {
        let camera = OrbitCamera::new(40.0);
        let right = camera.project(rect(), &Position::new(100.0, 0.0, 0.0)).unwrap();
        let up = camera.project(rect(), &Position::new(0.0, 100.0, 0.0)).unwrap();
        assert!(right.screen.x > 400.0);
        assert!(up.screen.y < 300.0);
    }

    #[test]
    fn zoom_stays_inside_bounds() {
        let mut camera = OrbitCamera::new(40.0);
        camera.set_zoom_bounds(ZoomBounds {
            min: 420.0,
            max: 3600.0,
        });
        camera.zoom(100_000.0);
        assert!((camera.distance() - 420.0).abs() < 1e-9);
        camera.zoom(-100_000.0);
        assert!((camera.distance() - 3600.0).abs() < 1e-9);
    }

    #[test]
    fn rotation_keeps_distance_and_decays() {
        let mut camera = OrbitCamera::new(40.0);
        camera.rotate(Vec2::new(40.0, 10.0));

        let mut frames = 0;
        while camera.step() {
            frames += 1;
            assert!(frames < 1000);
        }
        assert!(frames > 0);
        assert!((camera.distance() - DEFAULT_DISTANCE).abs() < 1e-6);
        assert_eq!(camera.pose().look_at, Position::zeros());
    }

    #[test]
    fn disabled_controls_do_nothing() {
        let mut camera = OrbitCamera::new(40.0);
        camera.rotate_enabled = false;
        camera.pan_enabled = false;
        camera.zoom_enabled = false;
        let before = camera.pose();

        camera.rotate(Vec2::new(50.0, 50.0));
        camera.pan(Vec2::new(50.0, 50.0), 600.0);
        camera.zoom(300.0);
        assert!(!camera.step());
        assert_eq!(camera.pose(), before);
    }

    #[test]
    fn pan_moves_pose_rigidly() {
        let mut camera = OrbitCamera::new(40.0);
        camera.pan(Vec2::new(-30.0, 0.0), 600.0);
        let pose = camera.pose();
        assert!(pose.look_at.x > 0.0);
        assert!((pose.distance() - DEFAULT_DISTANCE).abs() < 1e-9);
    }

    #[test]
    fn fit_all_centers_on_the_points() {
        let mut camera = OrbitCamera::new(40.0);
        camera.fit_all(&[
            Position::new(-5000.0, 0.0, 0.0),
            Position::new(5000.0, 10.0, 0.0),
        ]);
        let pose = camera.pose();
        assert_eq!(pose.look_at, Position::new(0.0, 5.0, 0.0));
        assert!(pose.distance() > 5000.0);
        assert!(camera.max_distance >= pose.distance());

        camera.fit_all(&[]);
        assert_eq!(camera.pose().look_at, Position::zeros());
    }
}
