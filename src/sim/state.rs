//! Game session and core simulation types
//!
//! One `GameSession` owns everything that lives for a playthrough: score, gold,
//! the upgrade ledger, the current level's terrain and roster, and the seeded
//! RNG. A new game resets all of it; a new level keeps score, gold, upgrades
//! and tower health.

use std::f32::consts::PI;
use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind, EnemyRoster};
use super::launch::LaunchController;
use super::level::{LevelConfig, level_config};
use super::projectile::{Arrow, EmbeddedArrow};
use super::spawner::WaveScheduler;
use super::terrain::Terrain;
use super::upgrades::{PurchaseError, UpgradeDefinition, UpgradeId, UpgradeLedger};
use crate::Settings;
use crate::consts::*;

/// Particles spawned per arrow hit
pub const HIT_PARTICLES: usize = 8;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No game running yet
    Menu,
    /// Enemies spawning and attacking
    LevelActive,
    /// All enemies dealt with; upgrades can be bought
    LevelComplete,
    /// Tower destroyed; only a restart leaves this phase
    GameOver,
}

/// Things that happened during a tick, for audio/visual collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: u32, kind: EnemyKind, elite: bool },
    WaveSpawned { size: u32 },
    ArrowLaunched { id: u32, vel: Vec2 },
    EnemyHit { enemy_id: u32, pos: Vec2, damage: f32 },
    EnemyKilled { enemy_id: u32, kind: EnemyKind },
    EnemyEscaped { enemy_id: u32 },
    TowerDamaged { amount: u32, health: i32 },
    LevelComplete { level: u32 },
    GameOver { level: u32, score: u32 },
}

/// A particle for hit effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Why a level transition was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// The current level is still running (or no game started)
    NotLevelComplete,
    /// The tower fell; restart instead
    GameOver,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::NotLevelComplete => write!(f, "current level is not complete"),
            TransitionError::GameOver => write!(f, "game is over"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// Complete session state (deterministic given seed and inputs)
#[derive(Debug, Clone)]
pub struct GameSession {
    pub settings: Settings,
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    pub score: u32,
    pub gold: u32,
    pub tower_health: i32,
    pub upgrades: UpgradeLedger,
    pub terrain: Terrain,
    pub enemies: EnemyRoster,
    /// Arrows in flight
    pub arrows: Vec<Arrow>,
    /// Arrows stuck in enemies (drawing only)
    pub embedded: Vec<EmbeddedArrow>,
    pub particles: Vec<Particle>,
    pub spawner: WaveScheduler,
    pub launcher: LaunchController,
    /// Simulation clock, accumulated from tick dt
    pub clock_ms: f64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameSession {
    /// Create a session sitting in the menu
    pub fn new(settings: Settings) -> Self {
        let upgrades = UpgradeLedger::new();
        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            phase: GamePhase::Menu,
            level: settings.clamped_start_level(),
            score: 0,
            gold: 0,
            tower_health: upgrades.tower_max_health(),
            upgrades,
            terrain: Terrain::flat(),
            enemies: EnemyRoster::new(),
            arrows: Vec::new(),
            embedded: Vec::new(),
            particles: Vec::new(),
            spawner: WaveScheduler::new(0.0),
            launcher: LaunchController::new(),
            clock_ms: 0.0,
            next_id: 1,
            settings,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Start a fresh playthrough at `level` (clamped to the selectable range).
    ///
    /// Score, gold and upgrades go back to their initial values and the tower
    /// is restored to full health.
    pub fn start_game(&mut self, level: u32) {
        let level = level.clamp(1, SELECTABLE_LEVELS);
        // Same seed and inputs replay the same game
        self.rng = Pcg32::seed_from_u64(self.settings.seed);
        self.clock_ms = 0.0;
        self.next_id = 1;
        self.score = 0;
        self.gold = 0;
        self.upgrades.reset();
        self.tower_health = self.upgrades.tower_max_health();
        self.particles.clear();
        log::info!("New game at level {} (seed {})", level, self.settings.seed);
        self.begin_level(level);
        self.spawner.reset(self.clock_ms);
    }

    /// Start over from the configured starting level
    pub fn restart(&mut self) {
        self.start_game(self.settings.clamped_start_level());
    }

    /// Move from a completed level to the next one. Returns the new level.
    pub fn advance_level(&mut self) -> Result<u32, TransitionError> {
        match self.phase {
            GamePhase::LevelComplete => {
                let next = self.level + 1;
                self.begin_level(next);
                // The first enemy of a follow-on level does not wait for the spawn gap
                self.spawner.reset_ready(self.clock_ms);
                Ok(next)
            }
            GamePhase::GameOver => {
                log::warn!("advance_level refused: game over");
                Err(TransitionError::GameOver)
            }
            GamePhase::Menu | GamePhase::LevelActive => {
                log::warn!("advance_level refused in {:?}", self.phase);
                Err(TransitionError::NotLevelComplete)
            }
        }
    }

    /// Per-level reset: new terrain and an empty field. Callers reset the spawner.
    fn begin_level(&mut self, level: u32) {
        self.level = level;
        let config = self.level_config();
        self.terrain = Terrain::generate(self.settings.seed, level, &config, SCREEN_WIDTH);
        self.enemies.clear();
        self.arrows.clear();
        self.embedded.clear();
        self.launcher.cancel();
        self.phase = GamePhase::LevelActive;
        log::info!(
            "Level {} started: {} enemies, kinds {:?}",
            level,
            config.enemy_count,
            config.enemy_kinds
        );
    }

    pub fn level_config(&self) -> LevelConfig {
        level_config(self.level)
    }

    /// Maximum launch speed with the arrow-speed upgrade applied
    pub fn max_launch_speed(&self) -> f32 {
        BASE_MAX_LAUNCH_SPEED * self.upgrades.arrow_speed_multiplier()
    }

    pub fn archer_pos(&self) -> Vec2 {
        Vec2::new(ARCHER_X, ARCHER_Y)
    }

    pub fn is_level_complete(&self) -> bool {
        self.phase == GamePhase::LevelComplete
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn list_upgrades(&self) -> Vec<UpgradeDefinition> {
        self.upgrades.list()
    }

    /// Buy an upgrade between levels. Returns the new upgrade level.
    pub fn purchase_upgrade(&mut self, id: UpgradeId) -> Result<u32, PurchaseError> {
        if self.phase != GamePhase::LevelComplete {
            log::warn!("Purchase of {} refused in {:?}", id.name(), self.phase);
            return Err(PurchaseError::NotBetweenLevels);
        }

        let level = self.upgrades.purchase(id, &mut self.gold)?;
        if id == UpgradeId::TowerHealth {
            self.tower_health = self.upgrades.tower_max_health();
        }
        log::debug!("Bought {} level {} ({} gold left)", id.name(), level, self.gold);
        Ok(level)
    }

    /// Spawn one enemy at the right edge, drawing its kind from the level's mix
    pub fn spawn_enemy(&mut self, config: &LevelConfig) -> GameEvent {
        let roll: f32 = self.rng.random();
        let kind = EnemyKind::choose(config.enemy_kinds, roll);
        let id = self.next_entity_id();
        let enemy = Enemy::spawn(
            id,
            kind,
            self.spawner.spawned,
            self.level,
            config.enemy_speed,
            SCREEN_WIDTH,
            &self.terrain,
        );
        let elite = enemy.elite;
        log::debug!("Spawned {} #{} (elite: {})", kind.name(), id, elite);
        self.enemies.push(enemy);
        GameEvent::EnemySpawned { id, kind, elite }
    }

    /// Fire an arrow from the archer
    pub fn launch_arrow(&mut self, vel: Vec2) -> GameEvent {
        let id = self.next_entity_id();
        self.arrows.push(Arrow::new(id, self.archer_pos(), vel));
        GameEvent::ArrowLaunched { id, vel }
    }

    /// Burst of particles where an arrow struck
    pub fn spawn_hit_particles(&mut self, pos: Vec2) {
        let cap = self.settings.max_particles();
        if cap == 0 {
            return;
        }

        for _ in 0..HIT_PARTICLES {
            let angle = self.rng.random_range(PI * 1.25..PI * 1.75);
            let speed: f32 = self.rng.random_range(100.0..200.0);
            let size: f32 = self.rng.random_range(3.0..6.0);

            if self.particles.len() >= cap {
                // Remove oldest particles to make room
                self.particles.remove(0);
            }
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                size,
            });
        }
    }

    /// Predicted path for the current drag, empty when not aiming or disabled
    pub fn trajectory_preview(&self) -> Vec<Vec2> {
        if self.phase != GamePhase::LevelActive {
            return Vec::new();
        }
        self.launcher.preview(
            self.archer_pos(),
            self.max_launch_speed(),
            &self.terrain,
            SCREEN_WIDTH,
            self.settings.preview_points(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QualityPreset;

    fn session() -> GameSession {
        GameSession::new(Settings::default())
    }

    #[test]
    fn test_new_session_in_menu() {
        let s = session();
        assert_eq!(s.phase, GamePhase::Menu);
        assert_eq!(s.score, 0);
        assert_eq!(s.gold, 0);
        assert_eq!(s.tower_health, 100);
        assert!(s.enemies.is_empty());
    }

    #[test]
    fn test_start_game_generates_level() {
        let mut s = session();
        s.start_game(1);
        assert_eq!(s.phase, GamePhase::LevelActive);
        assert_eq!(s.level, 1);
        assert!(!s.terrain.samples().is_empty());
        assert_eq!(s.spawner.spawned, 0);
    }

    #[test]
    fn test_level_selector_clamps() {
        let mut s = session();
        s.start_game(42);
        assert_eq!(s.level, SELECTABLE_LEVELS);
        s.start_game(0);
        assert_eq!(s.level, 1);
    }

    #[test]
    fn test_advance_requires_level_complete() {
        let mut s = session();
        assert_eq!(s.advance_level(), Err(TransitionError::NotLevelComplete));
        s.start_game(1);
        assert_eq!(s.advance_level(), Err(TransitionError::NotLevelComplete));
        assert_eq!(s.level, 1);

        s.phase = GamePhase::LevelComplete;
        s.score = 7;
        s.gold = 4;
        s.tower_health = 60;
        assert_eq!(s.advance_level(), Ok(2));
        assert_eq!(s.phase, GamePhase::LevelActive);
        // Playthrough totals and tower damage carry over
        assert_eq!(s.score, 7);
        assert_eq!(s.gold, 4);
        assert_eq!(s.tower_health, 60);

        s.phase = GamePhase::GameOver;
        assert_eq!(s.advance_level(), Err(TransitionError::GameOver));
        assert_eq!(s.level, 2);
    }

    #[test]
    fn test_purchase_only_between_levels() {
        let mut s = session();
        s.start_game(1);
        s.gold = 10;
        assert_eq!(
            s.purchase_upgrade(UpgradeId::ArrowDamage),
            Err(PurchaseError::NotBetweenLevels)
        );
        assert_eq!(s.gold, 10);

        s.phase = GamePhase::LevelComplete;
        assert_eq!(s.purchase_upgrade(UpgradeId::ArrowDamage), Ok(2));
        assert_eq!(s.gold, 7);
    }

    #[test]
    fn test_tower_health_purchase_heals_to_new_max() {
        let mut s = session();
        s.start_game(1);
        s.phase = GamePhase::LevelComplete;
        s.tower_health = 40;
        s.gold = 2;
        assert_eq!(s.purchase_upgrade(UpgradeId::TowerHealth), Ok(2));
        assert_eq!(s.tower_health, 125);
    }

    #[test]
    fn test_restart_resets_playthrough() {
        let mut s = session();
        s.start_game(3);
        s.phase = GamePhase::LevelComplete;
        s.gold = 20;
        s.score = 20;
        s.purchase_upgrade(UpgradeId::ArrowSpeed).unwrap();
        s.tower_health = 5;

        s.restart();
        assert_eq!(s.level, 1);
        assert_eq!(s.score, 0);
        assert_eq!(s.gold, 0);
        assert_eq!(s.upgrades, UpgradeLedger::new());
        assert_eq!(s.tower_health, 100);
        assert_eq!(s.max_launch_speed(), BASE_MAX_LAUNCH_SPEED);
    }

    #[test]
    fn test_arrow_speed_upgrade_raises_max_speed() {
        let mut s = session();
        s.start_game(1);
        s.phase = GamePhase::LevelComplete;
        s.gold = 3;
        s.purchase_upgrade(UpgradeId::ArrowSpeed).unwrap();
        assert!((s.max_launch_speed() - BASE_MAX_LAUNCH_SPEED * 1.2).abs() < 1e-3);
    }

    #[test]
    fn test_first_spawn_is_elite() {
        let mut s = session();
        s.start_game(2);
        let config = s.level_config();
        let first = s.spawn_enemy(&config);
        s.spawner.record_single(s.clock_ms);
        let second = s.spawn_enemy(&config);
        assert!(matches!(first, GameEvent::EnemySpawned { elite: true, .. }));
        assert!(matches!(second, GameEvent::EnemySpawned { elite: false, .. }));
        assert_eq!(s.enemies.get(0).unwrap().max_health, 3.0);
    }

    #[test]
    fn test_hit_particles_capped_and_oldest_dropped() {
        let mut s = GameSession::new(Settings::from_preset(QualityPreset::Low));
        for i in 0..20 {
            s.spawn_hit_particles(Vec2::new(i as f32, 100.0));
        }
        assert_eq!(s.particles.len(), 64);
        // 160 spawned, the first 96 evicted
        assert_eq!(s.particles[0].pos.x, 12.0);
        for p in &s.particles {
            // Upward-ish: angle between 5π/4 and 7π/4 means negative vy
            assert!(p.vel.y < 0.0);
            let speed = p.vel.length();
            assert!((100.0..=200.0).contains(&speed));
            assert!((3.0..=6.0).contains(&p.size));
        }
    }

    #[test]
    fn test_particles_disabled() {
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        let mut s = GameSession::new(settings);
        s.spawn_hit_particles(Vec2::ZERO);
        assert!(s.particles.is_empty());
    }

    #[test]
    fn test_transition_error_display() {
        assert_eq!(TransitionError::GameOver.to_string(), "game is over");
    }
}
