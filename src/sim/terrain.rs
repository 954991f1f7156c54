//! Terrain height field
//!
//! A piecewise-linear ground curve sampled once per level from blended noise.
//! Arrows, enemies and the launch preview all query it through
//! [`Terrain::height_at`].

use glam::Vec2;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::level::LevelConfig;
use crate::consts::{GROUND_LEVEL, TERRAIN_STEP};
use crate::lerp;

/// Noise above this value opens a cliff segment
const CLIFF_THRESHOLD: f64 = 0.7;
/// Blend factor toward the new sample (lower = smoother)
const SMOOTHING: f32 = 0.6;
/// Extra exaggeration applied to the configured hill height
const HILL_EXAGGERATION: f32 = 1.5;

/// Immutable ground profile for one level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Terrain {
    /// Samples ordered by strictly increasing x
    samples: Vec<Vec2>,
}

/// Perlin noise remapped to [0, 1]
struct UnitNoise(Perlin);

impl UnitNoise {
    fn sample(&self, x: f64, channel: f64) -> f64 {
        ((self.0.get([x, channel]) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

impl Terrain {
    /// Generate the profile for `level`, walking from x = 0 to `width`
    pub fn generate(seed: u64, level: u32, config: &LevelConfig, width: f32) -> Self {
        let noise_seed = (level as u64).wrapping_mul(2654435761).wrapping_add(seed) as u32;
        let noise = UnitNoise(Perlin::new(noise_seed));
        let hill_height = config.hill_height * HILL_EXAGGERATION;
        let lv = level as f64;

        let steps = (width / TERRAIN_STEP).floor() as usize;
        let mut xs: Vec<f32> = (0..=steps).map(|i| i as f32 * TERRAIN_STEP).collect();
        // Close the profile exactly at the right edge so every on-screen x brackets
        if xs.last().is_some_and(|&last| last < width) {
            xs.push(width);
        }

        let mut samples = Vec::with_capacity(xs.len());
        let mut last_y = GROUND_LEVEL;
        for x in xs {
            let xd = x as f64;

            let base = noise.sample(xd * config.terrain_roughness as f64 * 3.0, lv * 10.0);

            let valley = ((xd * config.valley_frequency as f64 * 0.03).sin() * 0.8 + 0.2)
                * noise.sample(xd * 0.04 + lv * 100.0, 1.5)
                * 0.9;

            let peak = ((xd * config.peak_frequency as f64 * 0.03).cos() * 0.8 + 0.2)
                * noise.sample(xd * 0.035 + lv * 200.0, 2.5)
                * 1.1;

            let cliff = if noise.sample(xd * 0.01 + lv * 300.0, 3.5) > CLIFF_THRESHOLD {
                noise.sample(xd * 0.2 + lv * 400.0, 4.5) * 0.3
            } else {
                0.0
            };

            let combined = (base * 0.3 + valley * 0.3 + peak * 0.3 + cliff) as f32;
            let target = GROUND_LEVEL + combined * hill_height - hill_height / 2.0;
            let y = lerp(last_y, target, SMOOTHING);
            samples.push(Vec2::new(x, y));
            last_y = y;
        }

        log::debug!(
            "Terrain for level {} generated: {} samples, seed {}",
            level,
            samples.len(),
            noise_seed
        );

        Self { samples }
    }

    /// Build a profile from explicit samples; points that do not advance x are dropped
    pub fn from_samples(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut samples: Vec<Vec2> = Vec::new();
        for p in points {
            if samples.last().is_none_or(|last| p.x > last.x) {
                samples.push(p);
            }
        }
        Self { samples }
    }

    /// A profile with no samples: every query returns the default ground level
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[Vec2] {
        &self.samples
    }

    /// Ground y at `x`, linearly interpolated between the bracketing samples.
    ///
    /// Queries outside the sampled range fall back to [`GROUND_LEVEL`].
    pub fn height_at(&self, x: f32) -> f32 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return GROUND_LEVEL;
        };
        // Also rejects NaN
        if !(x >= first.x && x <= last.x) {
            return GROUND_LEVEL;
        }
        if x == last.x {
            return last.y;
        }

        // First sample strictly right of x; guaranteed to exist and be >= 1
        let hi = self.samples.partition_point(|p| p.x <= x);
        let a = self.samples[hi - 1];
        let b = self.samples[hi];
        let t = (x - a.x) / (b.x - a.x);
        lerp(a.y, b.y, t)
    }

    /// Whether `pos` is at or below the ground
    pub fn is_below_ground(&self, pos: Vec2) -> bool {
        pos.y > self.height_at(pos.x)
    }
}
