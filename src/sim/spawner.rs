//! Wave scheduler
//!
//! Decides each frame whether to spawn nothing, a single enemy, or a wave.
//! Waves only come when the field is empty after a cooldown; otherwise enemies
//! drip in one at a time, never closer together than the minimum gap.

use serde::{Deserialize, Serialize};

use super::level::LevelConfig;

/// Stagger range between members of one wave (ms)
pub const WAVE_STAGGER_MS: std::ops::Range<f64> = 200.0..400.0;

/// Backdating applied by [`WaveScheduler::reset_ready`]
const READY_BACKDATE_MS: f64 = 99_999.0;

/// What the scheduler wants this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnDecision {
    Idle,
    Single,
    /// Spawn this many at once
    Wave(u32),
}

/// Per-level spawn bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveScheduler {
    /// Enemies spawned so far this level
    pub spawned: u32,
    /// Time of the last spawn (may lie in the future after a staggered wave)
    pub last_spawn_ms: f64,
}

impl WaveScheduler {
    /// Fresh scheduler for a level starting at `now_ms`
    pub fn new(now_ms: f64) -> Self {
        Self {
            spawned: 0,
            last_spawn_ms: now_ms,
        }
    }

    pub fn reset(&mut self, now_ms: f64) {
        *self = Self::new(now_ms);
    }

    /// Fresh bookkeeping whose first spawn is due immediately
    pub fn reset_ready(&mut self, now_ms: f64) {
        *self = Self::new(now_ms - READY_BACKDATE_MS);
    }

    pub fn remaining(&self, config: &LevelConfig) -> u32 {
        config.enemy_count.saturating_sub(self.spawned)
    }

    /// Decide what to spawn at `now_ms` with `live` enemies on the field
    pub fn decide(&self, now_ms: f64, config: &LevelConfig, live: usize) -> SpawnDecision {
        let remaining = self.remaining(config);
        if remaining == 0 {
            return SpawnDecision::Idle;
        }

        let since_last = now_ms - self.last_spawn_ms;
        if since_last <= config.min_spawn_gap_ms {
            return SpawnDecision::Idle;
        }

        // The first enemy of a level always arrives alone
        let wave_ready = self.spawned > 0 && live == 0 && since_last > config.wave_cooldown_ms;
        if wave_ready {
            SpawnDecision::Wave(config.wave_size.min(remaining))
        } else {
            SpawnDecision::Single
        }
    }

    /// Record a single spawn at `now_ms`
    pub fn record_single(&mut self, now_ms: f64) {
        self.spawned += 1;
        self.last_spawn_ms = now_ms;
    }

    /// Record member `index` of a wave started at `now_ms`, staggered by `jitter_ms`
    pub fn record_wave_member(&mut self, now_ms: f64, index: u32, jitter_ms: f64) {
        self.spawned += 1;
        self.last_spawn_ms = now_ms + index as f64 * jitter_ms;
    }

    /// All enemies spawned and none left alive
    pub fn is_level_complete(&self, config: &LevelConfig, live: usize) -> bool {
        self.spawned >= config.enemy_count && live == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::level_config;
    use proptest::prelude::*;

    #[test]
    fn test_first_enemy_alone_after_min_gap() {
        let config = level_config(1);
        let scheduler = WaveScheduler::new(0.0);
        assert_eq!(scheduler.decide(500.0, &config, 0), SpawnDecision::Idle);
        assert_eq!(scheduler.decide(800.0, &config, 0), SpawnDecision::Idle);
        // Long past the wave cooldown, but nothing spawned yet
        assert_eq!(scheduler.decide(10_000.0, &config, 0), SpawnDecision::Single);
    }

    #[test]
    fn test_reset_ready_spawns_first_enemy_at_once() {
        let config = level_config(2);
        let mut scheduler = WaveScheduler::new(0.0);
        scheduler.spawned = 4;
        scheduler.reset_ready(50_000.0);
        assert_eq!(scheduler.spawned, 0);
        // First enemy still arrives alone, even with an empty field
        assert_eq!(scheduler.decide(50_000.0, &config, 0), SpawnDecision::Single);
    }

    #[test]
    fn test_wave_when_field_empty_after_cooldown() {
        let config = level_config(1);
        let mut scheduler = WaveScheduler::new(0.0);
        scheduler.record_single(1000.0);

        // Empty field but cooldown not elapsed: drip single
        assert_eq!(scheduler.decide(2000.0, &config, 0), SpawnDecision::Single);
        // Cooldown elapsed with enemies alive: still single
        assert_eq!(scheduler.decide(5000.0, &config, 2), SpawnDecision::Single);
        // Cooldown elapsed and empty: full wave of min(2, 5)
        assert_eq!(scheduler.decide(5000.0, &config, 0), SpawnDecision::Wave(2));
    }

    #[test]
    fn test_wave_clamped_to_remaining() {
        let config = level_config(8); // wave size 4
        let mut scheduler = WaveScheduler::new(0.0);
        scheduler.spawned = config.enemy_count - 1;
        scheduler.last_spawn_ms = 0.0;
        assert_eq!(scheduler.decide(100_000.0, &config, 0), SpawnDecision::Wave(1));
    }

    #[test]
    fn test_stagger_pushes_last_spawn_forward() {
        let mut scheduler = WaveScheduler::new(0.0);
        scheduler.record_wave_member(5000.0, 0, 300.0);
        assert_eq!(scheduler.last_spawn_ms, 5000.0);
        scheduler.record_wave_member(5000.0, 1, 250.0);
        assert_eq!(scheduler.last_spawn_ms, 5250.0);
        assert_eq!(scheduler.spawned, 2);
    }

    #[test]
    fn test_level_complete() {
        let config = level_config(1);
        let mut scheduler = WaveScheduler::new(0.0);
        assert!(!scheduler.is_level_complete(&config, 0));
        scheduler.spawned = config.enemy_count;
        assert!(!scheduler.is_level_complete(&config, 1));
        assert!(scheduler.is_level_complete(&config, 0));
        assert_eq!(scheduler.decide(1e9, &config, 0), SpawnDecision::Idle);
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_enemy_count(
            level in 1u32..12,
            frames in proptest::collection::vec((1.0f64..3000.0, 0usize..6), 1..300),
        ) {
            let config = level_config(level);
            let mut scheduler = WaveScheduler::new(0.0);
            let mut now = 0.0;
            for (dt, live) in frames {
                now += dt;
                match scheduler.decide(now, &config, live) {
                    SpawnDecision::Idle => {}
                    SpawnDecision::Single => scheduler.record_single(now),
                    SpawnDecision::Wave(n) => {
                        for i in 0..n {
                            scheduler.record_wave_member(now, i, 300.0);
                        }
                    }
                }
                prop_assert!(scheduler.spawned <= config.enemy_count);
            }
        }
    }
}
