//! Tower Archer - a tower-defense archery arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (arrow physics, waves, terrain, progression)
//! - `settings`: Runtime configuration and quality presets
//!
//! Rendering, menus and input devices live outside this crate. They read
//! [`sim::FrameSnapshot`]s and feed pointer events through [`sim::TickInput`].

pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed frame timestep used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Play field dimensions (screen space, y grows downward)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Ground height used when a query falls outside the sampled terrain
    pub const GROUND_LEVEL: f32 = 450.0;
    /// Horizontal distance between terrain samples
    pub const TERRAIN_STEP: f32 = 15.0;

    /// Gravity for arrows (pixels/s², positive is down)
    pub const GRAVITY: f32 = 1200.0;

    /// Tower and archer anchor points
    pub const TOWER_X: f32 = 50.0;
    pub const TOWER_Y: f32 = GROUND_LEVEL - 100.0;
    pub const ARCHER_X: f32 = 50.0;
    pub const ARCHER_Y: f32 = GROUND_LEVEL - 130.0;

    /// Launch tuning
    pub const MAX_PULLBACK: f32 = 200.0;
    pub const MIN_PULL: f32 = 20.0;
    pub const MIN_LAUNCH_SPEED: f32 = 200.0;
    /// Max launch speed before the arrow-speed upgrade multiplier
    pub const BASE_MAX_LAUNCH_SPEED: f32 = 2000.0;

    /// Arrow homing
    pub const HOMING_RANGE: f32 = 30.0;
    pub const MAX_HOMING_FORCE: f32 = 0.8;
    /// Fraction of the way the drawn heading moves toward the velocity each step
    pub const HEADING_SMOOTHING: f32 = 0.2;

    /// Enemy tuning
    pub const BASE_ENEMY_SPEED: f32 = 15.0;
    /// Enemies stop and attack once they reach this x
    pub const ATTACK_LINE_X: f32 = 125.0;
    pub const ATTACK_INTERVAL_MS: f32 = 1000.0;
    /// Elite max health never exceeds this
    pub const ELITE_HEALTH_CAP: u32 = 5;

    /// Levels offered by the level selector
    pub const SELECTABLE_LEVELS: u32 = 5;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Re-map `value` from `[in_min, in_max]` to `[out_min, out_max]` without clamping
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}

/// Re-map and clamp the result to the output interval
#[inline]
pub fn map_range_clamped(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let mapped = map_range(value, in_min, in_max, out_min, out_max);
    if out_min < out_max {
        mapped.clamp(out_min, out_max)
    } else {
        mapped.clamp(out_max, out_min)
    }
}
