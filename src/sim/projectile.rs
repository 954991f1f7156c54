//! Arrow flight model
//!
//! Ballistic integration under constant gravity plus a weak homing nudge
//! toward the nearest enemy body within a short radius.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::terrain::Terrain;
use crate::consts::{GRAVITY, HEADING_SMOOTHING, HOMING_RANGE, MAX_HOMING_FORCE};
use crate::{lerp, map_range};

/// Outcome of one flight step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowFate {
    Flying,
    /// Went below the terrain surface
    HitGround,
    /// Left the horizontal bounds or rose above the top edge
    OutOfBounds,
    /// Already embedded; not simulated
    Stuck,
}

/// An arrow in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrow {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Smoothed heading for drawing (radians)
    pub angle: f32,
    /// Embedded in terrain or an enemy; no longer simulated
    pub stuck: bool,
}

/// An arrow left sticking out of an enemy (drawing only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedArrow {
    pub enemy_id: u32,
    /// Position at impact
    pub pos: Vec2,
    /// Impact position relative to the enemy anchor
    pub offset: Vec2,
    pub angle: f32,
}

impl Arrow {
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            angle: vel.y.atan2(vel.x),
            stuck: false,
        }
    }

    /// Index and distance of the closest live enemy body within homing range.
    ///
    /// Equidistant candidates resolve to the first in roster order.
    pub fn homing_target(&self, enemies: &[Enemy]) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        let mut closest = HOMING_RANGE;
        for (i, enemy) in enemies.iter().enumerate() {
            if !enemy.is_alive() {
                continue;
            }
            let d = self.pos.distance(enemy.center());
            if d < closest {
                closest = d;
                best = Some((i, d));
            }
        }
        best
    }

    /// Nudge velocity toward the homing target, scaled up as distance shrinks
    pub fn apply_homing(&mut self, enemies: &[Enemy]) {
        if let Some((i, dist)) = self.homing_target(enemies) {
            let to_target = enemies[i].center() - self.pos;
            let heading = to_target.y.atan2(to_target.x);
            let strength = map_range(dist, HOMING_RANGE, 0.0, 0.0, MAX_HOMING_FORCE);
            self.vel += Vec2::new(heading.cos(), heading.sin()) * strength;
        }
    }

    /// Advance one step of `dt` seconds inside a field `width` wide
    pub fn update(
        &mut self,
        dt: f32,
        enemies: &[Enemy],
        terrain: &Terrain,
        width: f32,
    ) -> ArrowFate {
        if self.stuck {
            return ArrowFate::Stuck;
        }

        self.apply_homing(enemies);

        self.pos += self.vel * dt;
        self.vel.y += GRAVITY * dt;

        let target_angle = self.vel.y.atan2(self.vel.x);
        self.angle = lerp(self.angle, target_angle, HEADING_SMOOTHING);

        if terrain.is_below_ground(self.pos) {
            ArrowFate::HitGround
        } else if self.pos.x < 0.0 || self.pos.x > width || self.pos.y < 0.0 {
            ArrowFate::OutOfBounds
        } else {
            ArrowFate::Flying
        }
    }

    /// Freeze the arrow into `enemy`, recording where it struck
    pub fn embed_in(&mut self, enemy: &Enemy) -> EmbeddedArrow {
        self.stuck = true;
        EmbeddedArrow {
            enemy_id: enemy.id,
            pos: self.pos,
            offset: self.pos - enemy.pos,
            angle: self.angle,
        }
    }
}
