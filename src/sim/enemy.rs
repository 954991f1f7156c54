//! Enemy units and the roster that owns them
//!
//! Units walk left over the terrain until they reach the tower, then stand and
//! attack on a fixed interval. Health only ever goes down; removal is decided
//! by the caller after damage is applied.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::terrain::Terrain;
use crate::consts::{ATTACK_INTERVAL_MS, ATTACK_LINE_X, ELITE_HEALTH_CAP};

/// Walk-cycle phase advance per second
const WALK_CYCLE_RATE: f32 = 5.0;
/// Vertical bounce amplitude while walking
const WALK_BOUNCE: f32 = 3.0;
/// Hit flash decay per second
const HIT_FLASH_DECAY: f32 = 5.0;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Goblin,
    Orc,
    Troll,
}

impl EnemyKind {
    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Goblin => "goblin",
            EnemyKind::Orc => "orc",
            EnemyKind::Troll => "troll",
        }
    }

    /// Multiplier on the level's base enemy speed
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            EnemyKind::Goblin => 1.0,
            EnemyKind::Orc => 0.8,
            EnemyKind::Troll => 0.5,
        }
    }

    pub fn base_health(&self) -> f32 {
        match self {
            EnemyKind::Goblin => 1.0,
            EnemyKind::Orc => 2.0,
            EnemyKind::Troll => 3.0,
        }
    }

    /// Body height; also twice the hit radius
    pub fn height(&self) -> f32 {
        match self {
            EnemyKind::Goblin => 15.0,
            EnemyKind::Orc => 20.0,
            EnemyKind::Troll => 30.0,
        }
    }

    /// Tower damage per attack
    pub fn damage(&self) -> u32 {
        match self {
            EnemyKind::Goblin => 5,
            EnemyKind::Orc => 10,
            EnemyKind::Troll => 20,
        }
    }

    pub fn attack_interval_ms(&self) -> f32 {
        ATTACK_INTERVAL_MS
    }

    /// Spawn draw weight
    pub fn spawn_weight(&self) -> f32 {
        match self {
            EnemyKind::Goblin => 0.6,
            EnemyKind::Orc => 0.3,
            EnemyKind::Troll => 0.1,
        }
    }

    /// Weighted pick from `kinds` using `roll` in [0, 1).
    ///
    /// Weights accumulate in list order; a roll past the accumulated total
    /// falls back to the first kind.
    pub fn choose(kinds: &[EnemyKind], roll: f32) -> EnemyKind {
        match kinds {
            [] => EnemyKind::Goblin,
            [only] => *only,
            _ => {
                let mut sum = 0.0;
                for kind in kinds {
                    sum += kind.spawn_weight();
                    if roll < sum {
                        return *kind;
                    }
                }
                kinds[0]
            }
        }
    }
}

/// Movement/attack state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Walking,
    /// Stationary at the tower
    Attacking,
}

/// A single enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub health: f32,
    pub max_health: f32,
    pub elite: bool,
    /// Feet anchor minus body height (screen space)
    pub pos: Vec2,
    pub vel: Vec2,
    pub state: EnemyState,
    pub attack_timer_ms: f32,
    /// Order of spawn within the level (0 = first)
    pub spawn_index: u32,
    pub walk_cycle: f32,
    /// 1.0 right after a hit, decays to 0
    pub hit_flash: f32,
}

impl Enemy {
    /// Create a unit at the right edge of the field.
    ///
    /// The first unit of a level (`spawn_index == 0`) is elite with health
    /// scaled by level.
    pub fn spawn(
        id: u32,
        kind: EnemyKind,
        spawn_index: u32,
        level: u32,
        base_speed: f32,
        spawn_x: f32,
        terrain: &Terrain,
    ) -> Self {
        let elite = spawn_index == 0;
        let max_health = if elite {
            (level + 1).min(ELITE_HEALTH_CAP) as f32
        } else {
            kind.base_health()
        };

        Self {
            id,
            kind,
            health: max_health,
            max_health,
            elite,
            pos: Vec2::new(spawn_x, terrain.height_at(spawn_x) - kind.height()),
            vel: Vec2::new(-base_speed * kind.speed_multiplier(), 0.0),
            state: EnemyState::Walking,
            attack_timer_ms: 0.0,
            spawn_index,
            walk_cycle: 0.0,
            hit_flash: 0.0,
        }
    }

    pub fn height(&self) -> f32 {
        self.kind.height()
    }

    /// Vertical middle of the body (homing target)
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - self.height() / 2.0)
    }

    /// Radius used by the hit test
    pub fn hit_radius(&self) -> f32 {
        self.height() / 2.0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_attacking(&self) -> bool {
        self.state == EnemyState::Attacking
    }

    /// Advance one step. Returns the tower damage dealt during this step.
    pub fn update(&mut self, dt: f32, terrain: &Terrain) -> u32 {
        self.hit_flash = (self.hit_flash - dt * HIT_FLASH_DECAY).max(0.0);

        match self.state {
            EnemyState::Walking => {
                self.pos.x += self.vel.x * dt;
                self.walk_cycle += dt * WALK_CYCLE_RATE;
                self.pos.y = terrain.height_at(self.pos.x) - self.height()
                    + self.walk_cycle.sin() * WALK_BOUNCE;

                if self.pos.x <= ATTACK_LINE_X {
                    self.state = EnemyState::Attacking;
                }
                0
            }
            EnemyState::Attacking => {
                self.attack_timer_ms += dt * 1000.0;
                if self.attack_timer_ms >= self.kind.attack_interval_ms() {
                    self.attack_timer_ms = 0.0;
                    self.kind.damage()
                } else {
                    0
                }
            }
        }
    }

    /// Apply `amount` scaled by the damage upgrade `multiplier`.
    ///
    /// Health clamps at zero. Returns the effective damage.
    pub fn take_damage(&mut self, amount: f32, multiplier: f32) -> f32 {
        let effective = (amount * multiplier).max(0.0);
        self.health = (self.health - effective).max(0.0);
        self.hit_flash = 1.0;
        effective
    }
}

/// Result of one roster update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterUpdate {
    /// Total tower damage dealt this step
    pub tower_damage: u32,
    /// Units that walked off the left edge (removed, no reward)
    pub escaped: Vec<u32>,
}

/// Live enemies, kept in spawn order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemyRoster {
    enemies: Vec<Enemy>,
}

impl EnemyRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Enemy> {
        self.enemies.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Enemy> {
        self.enemies.iter_mut()
    }

    pub fn as_slice(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn get(&self, index: usize) -> Option<&Enemy> {
        self.enemies.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Enemy> {
        self.enemies.get_mut(index)
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    /// Step every unit; drop those past the left boundary
    pub fn update(&mut self, dt: f32, terrain: &Terrain) -> RosterUpdate {
        let mut result = RosterUpdate::default();
        for enemy in &mut self.enemies {
            result.tower_damage += enemy.update(dt, terrain);
        }

        self.enemies.retain(|e| {
            if e.pos.x < 0.0 {
                result.escaped.push(e.id);
                false
            } else {
                true
            }
        });
        result
    }

    /// Remove the given positions, highest index first.
    ///
    /// `indices` may be unsorted and contain duplicates.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Vec<Enemy> {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let mut removed = Vec::with_capacity(sorted.len());
        for i in sorted {
            if i < self.enemies.len() {
                removed.push(self.enemies.remove(i));
            }
        }
        removed
    }
}
