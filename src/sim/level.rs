//! Per-level tuning
//!
//! Everything here is a pure function of the level number.

use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;
use crate::consts::BASE_ENEMY_SPEED;

/// Derived configuration for one level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelConfig {
    /// Total enemies spawned during the level
    pub enemy_count: u32,
    /// Kinds the spawner may draw from
    pub enemy_kinds: &'static [EnemyKind],
    /// Base walking speed before the per-kind multiplier
    pub enemy_speed: f32,
    pub base_spawn_interval_ms: f64,
    pub spawn_variance_ms: f64,
    /// Minimum time between two spawn decisions
    pub min_spawn_gap_ms: f64,
    /// Enemies per wave
    pub wave_size: u32,
    /// Quiet time with an empty field before a wave may spawn
    pub wave_cooldown_ms: f64,
    // Terrain shaping
    pub terrain_roughness: f32,
    pub hill_height: f32,
    pub valley_frequency: f32,
    pub peak_frequency: f32,
}

const GOBLINS: &[EnemyKind] = &[EnemyKind::Goblin];
const GOBLINS_ORCS: &[EnemyKind] = &[EnemyKind::Goblin, EnemyKind::Orc];
const ALL_KINDS: &[EnemyKind] = &[EnemyKind::Goblin, EnemyKind::Orc, EnemyKind::Troll];

/// Configuration for `level` (1-based)
pub fn level_config(level: u32) -> LevelConfig {
    let lf = level as f32;
    let enemy_kinds = match level {
        0..=2 => GOBLINS,
        3..=4 => GOBLINS_ORCS,
        _ => ALL_KINDS,
    };

    LevelConfig {
        enemy_count: 5 + (lf * 1.5).floor() as u32,
        enemy_kinds,
        enemy_speed: BASE_ENEMY_SPEED * (1.0 + lf * 0.1),
        base_spawn_interval_ms: (2000.0 - level as f64 * 100.0).max(1200.0),
        spawn_variance_ms: 1000.0,
        min_spawn_gap_ms: 800.0,
        wave_size: (2 + level / 2).min(4),
        wave_cooldown_ms: (4000.0 - level as f64 * 200.0).max(2500.0),
        terrain_roughness: 0.003 + (level % 4) as f32 * 0.002,
        hill_height: 60.0 + (level % 5) as f32 * 25.0,
        valley_frequency: 0.5 + (level % 3) as f32 * 0.3,
        peak_frequency: 0.3 + (level % 4) as f32 * 0.2,
    }
}

/// Visual theme for a level (read by renderers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelTheme {
    Spring,
    Summer,
    Autumn,
    Winter,
    CherryBlossom,
}

impl LevelTheme {
    pub fn for_level(level: u32) -> Self {
        if level == 3 {
            return LevelTheme::CherryBlossom;
        }
        match level.saturating_sub(1) % 4 {
            0 => LevelTheme::Spring,
            1 => LevelTheme::Summer,
            2 => LevelTheme::Autumn,
            _ => LevelTheme::Winter,
        }
    }
}
