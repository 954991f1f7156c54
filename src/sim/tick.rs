//! Per-frame simulation tick
//!
//! Fixed order every frame: pointer input, clock, wave scheduler, enemy
//! update, arrow flight, hit resolution, particles, then the level/game-over
//! check.

use glam::Vec2;
use rand::Rng;

use super::collision::resolve_hits;
use super::projectile::ArrowFate;
use super::spawner::{SpawnDecision, WAVE_STAGGER_MS};
use super::state::{GameEvent, GamePhase, GameSession};
use crate::consts::*;

/// Particle life lost per second
const PARTICLE_DECAY: f32 = 2.0;

/// Raw pointer event, in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(Vec2),
    /// Advisory; only tracked for the aiming preview
    Drag(Vec2),
    Release(Vec2),
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer events since the last tick, in order
    pub pointer: Vec<PointerEvent>,
}

impl TickInput {
    /// A complete drag from `from` to `to` in one frame
    pub fn drag(from: Vec2, to: Vec2) -> Self {
        Self {
            pointer: vec![
                PointerEvent::Press(from),
                PointerEvent::Drag(to),
                PointerEvent::Release(to),
            ],
        }
    }
}

/// Advance the session by `dt` seconds. Returns what happened this frame.
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match session.phase {
        GamePhase::Menu | GamePhase::GameOver => return events,
        GamePhase::LevelComplete => {
            // Field is clear: let remaining arrows and particles settle
            session.launcher.cancel();
            session.clock_ms += dt as f64 * 1000.0;
            update_arrows(session, dt);
            update_particles(session, dt);
            return events;
        }
        GamePhase::LevelActive => {}
    }

    handle_pointer(session, input, &mut events);

    session.clock_ms += dt as f64 * 1000.0;

    run_spawner(session, &mut events);

    // Enemies walk and attack
    let update = session.enemies.update(dt, &session.terrain);
    for enemy_id in update.escaped {
        log::debug!("Enemy #{} escaped", enemy_id);
        events.push(GameEvent::EnemyEscaped { enemy_id });
    }
    if update.tower_damage > 0 {
        session.tower_health -= update.tower_damage as i32;
        events.push(GameEvent::TowerDamaged {
            amount: update.tower_damage,
            health: session.tower_health,
        });
    }

    update_arrows(session, dt);

    // Hits, kills and rewards
    let report = resolve_hits(
        &mut session.arrows,
        &mut session.enemies,
        session.upgrades.damage_multiplier(),
    );
    for hit in &report.hits {
        session.spawn_hit_particles(hit.pos);
        events.push(GameEvent::EnemyHit {
            enemy_id: hit.enemy_id,
            pos: hit.pos,
            damage: hit.damage,
        });
    }
    for enemy in &report.killed {
        session.score += 1;
        session.gold += 1;
        log::debug!("Killed {} #{} (score {})", enemy.kind.name(), enemy.id, session.score);
        events.push(GameEvent::EnemyKilled {
            enemy_id: enemy.id,
            kind: enemy.kind,
        });
    }
    session.embedded.extend(report.embedded);

    update_particles(session, dt);

    // Tower destroyed takes priority over clearing the level on the same frame
    if session.tower_health <= 0 {
        session.phase = GamePhase::GameOver;
        session.launcher.cancel();
        log::info!(
            "Game over on level {} with score {}",
            session.level,
            session.score
        );
        events.push(GameEvent::GameOver {
            level: session.level,
            score: session.score,
        });
    } else if session
        .spawner
        .is_level_complete(&session.level_config(), session.enemies.len())
    {
        session.phase = GamePhase::LevelComplete;
        session.launcher.cancel();
        log::info!(
            "Level {} complete (score {}, gold {})",
            session.level,
            session.score,
            session.gold
        );
        events.push(GameEvent::LevelComplete {
            level: session.level,
        });
    }

    events
}

/// Buffer the drag and fire only on release
fn handle_pointer(session: &mut GameSession, input: &TickInput, events: &mut Vec<GameEvent>) {
    for event in &input.pointer {
        match *event {
            PointerEvent::Press(pos) => session.launcher.begin(pos),
            PointerEvent::Drag(pos) => session.launcher.drag_to(pos),
            PointerEvent::Release(pos) => {
                let max_speed = session.max_launch_speed();
                if let Some(vel) = session.launcher.release(pos, max_speed) {
                    events.push(session.launch_arrow(vel));
                }
            }
        }
    }
}

fn run_spawner(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let config = session.level_config();
    let now = session.clock_ms;

    match session.spawner.decide(now, &config, session.enemies.len()) {
        SpawnDecision::Idle => {}
        SpawnDecision::Single => {
            events.push(session.spawn_enemy(&config));
            session.spawner.record_single(now);
        }
        SpawnDecision::Wave(size) => {
            log::debug!("Wave of {} on level {}", size, session.level);
            for i in 0..size {
                events.push(session.spawn_enemy(&config));
                let jitter = session.rng.random_range(WAVE_STAGGER_MS);
                session.spawner.record_wave_member(now, i, jitter);
            }
            events.push(GameEvent::WaveSpawned { size });
        }
    }
}

/// Fly every arrow; drop those that hit the ground or left the field
fn update_arrows(session: &mut GameSession, dt: f32) {
    let GameSession {
        arrows,
        enemies,
        terrain,
        ..
    } = session;
    arrows.retain_mut(|arrow| {
        arrow.update(dt, enemies.as_slice(), &*terrain, SCREEN_WIDTH) == ArrowFate::Flying
    });
}

fn update_particles(session: &mut GameSession, dt: f32) {
    for particle in session.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel.y += GRAVITY * 0.5 * dt;
        particle.life -= dt * PARTICLE_DECAY;
    }
    session.particles.retain(|p| p.life > 0.0);
}
