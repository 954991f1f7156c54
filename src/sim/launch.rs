//! Drag-to-shoot launch controller
//!
//! A drag is buffered from press to release; only the release turns the pull
//! vector into a launch velocity. Arrows fly opposite to the drag direction.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::terrain::Terrain;
use crate::consts::{GRAVITY, MAX_PULLBACK, MIN_LAUNCH_SPEED, MIN_PULL};
use crate::{map_range, map_range_clamped};

/// Horizontal reach used to scale the upward arc bias
const ARC_REACH: f32 = 1600.0;
/// Timestep between trajectory preview points
const PREVIEW_DT: f32 = 1.0 / 30.0;

/// Power multiplier for a drag direction `angle` (radians, screen space).
///
/// Steep-up drags around -π/3 get full power; flat, vertical and downward
/// drags are penalised.
pub fn angle_multiplier(angle: f32) -> f32 {
    if angle > 0.0 {
        0.5
    } else if angle > -PI / 6.0 {
        map_range(angle, -PI / 6.0, 0.0, 0.8, 0.5)
    } else if angle > -PI / 3.0 {
        map_range(angle, -PI / 3.0, -PI / 6.0, 1.0, 0.8)
    } else if angle > -PI / 2.0 {
        map_range(angle, -PI / 2.0, -PI / 3.0, 0.8, 1.0)
    } else {
        map_range(angle, -PI, -PI / 2.0, 0.5, 0.8)
    }
}

/// Speed before the angle multiplier, quadratic in pull fraction
pub fn base_speed(pull_distance: f32, max_speed: f32) -> f32 {
    let pull = pull_distance.clamp(0.0, MAX_PULLBACK) / MAX_PULLBACK;
    map_range(pull * pull, 0.0, 1.0, MIN_LAUNCH_SPEED, max_speed)
}

/// Launch velocity for a drag displacement, or `None` for a pull too short to fire
pub fn launch_velocity(pull: Vec2, max_speed: f32) -> Option<Vec2> {
    let pull_distance = pull.length().clamp(0.0, MAX_PULLBACK);
    if pull_distance <= MIN_PULL {
        return None;
    }

    let angle = pull.y.atan2(pull.x);
    let speed = base_speed(pull_distance, max_speed) * angle_multiplier(angle);

    let vx = -angle.cos() * speed;
    let mut vy = -angle.sin() * speed;

    // Longer horizontal shots get a stronger upward bias
    let reach = (angle.cos() * ARC_REACH).abs();
    let arc_scale = map_range_clamped(reach, 50.0, ARC_REACH, 0.1, 0.4);
    vy -= vx.abs() * arc_scale;

    Some(Vec2::new(vx, vy))
}

/// Ballistic path from `origin`, stopping at the ground or the side edges
pub fn predict_path(
    origin: Vec2,
    velocity: Vec2,
    terrain: &Terrain,
    width: f32,
    max_points: usize,
) -> Vec<Vec2> {
    let mut points = Vec::with_capacity(max_points);
    let mut pos = origin;
    let mut vel = velocity;
    for _ in 0..max_points {
        points.push(pos);
        pos += vel * PREVIEW_DT;
        vel.y += GRAVITY * PREVIEW_DT;

        if terrain.is_below_ground(pos) || pos.x > width || pos.x < 0.0 {
            break;
        }
    }
    points
}

/// Pointer drag state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaunchController {
    drag_start: Option<Vec2>,
    drag_current: Option<Vec2>,
}

impl LaunchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    pub fn begin(&mut self, pos: Vec2) {
        self.drag_start = Some(pos);
        self.drag_current = Some(pos);
    }

    /// Track the pointer during a drag (no effect on the simulation)
    pub fn drag_to(&mut self, pos: Vec2) {
        if self.is_dragging() {
            self.drag_current = Some(pos);
        }
    }

    /// Current displacement from the press point
    pub fn pull_vector(&self) -> Option<Vec2> {
        Some(self.drag_current? - self.drag_start?)
    }

    /// Finish the drag at `pos`. Returns the launch velocity if the pull was long enough.
    pub fn release(&mut self, pos: Vec2, max_speed: f32) -> Option<Vec2> {
        let start = self.drag_start.take()?;
        self.drag_current = None;
        launch_velocity(pos - start, max_speed)
    }

    pub fn cancel(&mut self) {
        self.drag_start = None;
        self.drag_current = None;
    }

    /// Predicted arrow path for the current pull, empty when not aiming
    pub fn preview(
        &self,
        origin: Vec2,
        max_speed: f32,
        terrain: &Terrain,
        width: f32,
        max_points: usize,
    ) -> Vec<Vec2> {
        self.pull_vector()
            .and_then(|pull| launch_velocity(pull, max_speed))
            .map(|vel| predict_path(origin, vel, terrain, width, max_points))
            .unwrap_or_default()
    }
}
