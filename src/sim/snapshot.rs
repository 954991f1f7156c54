//! Read-only frame snapshot for renderers
//!
//! Built once per frame from a `GameSession`. Owns its data, so a renderer can
//! hold or serialize it without borrowing the simulation.

use glam::Vec2;
use serde::Serialize;

use super::enemy::{EnemyKind, EnemyState};
use super::level::LevelTheme;
use super::state::{GamePhase, GameSession};
use super::upgrades::UpgradeDefinition;

#[derive(Debug, Clone, Serialize)]
pub struct ArrowView {
    pub id: u32,
    pub pos: Vec2,
    pub angle: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddedView {
    pub enemy_id: u32,
    pub pos: Vec2,
    pub angle: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub elite: bool,
    pub state: EnemyState,
    pub walk_cycle: f32,
    pub hit_flash: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub size: f32,
    pub life: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub level: u32,
    pub theme: LevelTheme,
    pub score: u32,
    pub gold: u32,
    pub tower_health: i32,
    pub tower_max_health: i32,
    pub level_complete: bool,
    pub terrain: Vec<Vec2>,
    pub arrows: Vec<ArrowView>,
    /// Arrows stuck in enemies, following their host while it lives
    pub embedded: Vec<EmbeddedView>,
    pub enemies: Vec<EnemyView>,
    pub particles: Vec<ParticleView>,
    pub upgrades: Vec<UpgradeDefinition>,
    /// Aiming preview, empty unless a drag is in progress
    pub trajectory: Vec<Vec2>,
}

impl FrameSnapshot {
    pub fn capture(session: &GameSession) -> Self {
        let arrows = session
            .arrows
            .iter()
            .map(|a| ArrowView {
                id: a.id,
                pos: a.pos,
                angle: a.angle,
            })
            .collect();

        let embedded = session
            .embedded
            .iter()
            .map(|e| {
                let host = session.enemies.iter().find(|enemy| enemy.id == e.enemy_id);
                EmbeddedView {
                    enemy_id: e.enemy_id,
                    pos: host.map_or(e.pos, |enemy| enemy.pos + e.offset),
                    angle: e.angle,
                }
            })
            .collect();

        let enemies = session
            .enemies
            .iter()
            .map(|e| EnemyView {
                id: e.id,
                kind: e.kind,
                pos: e.pos,
                health: e.health,
                max_health: e.max_health,
                elite: e.elite,
                state: e.state,
                walk_cycle: e.walk_cycle,
                hit_flash: e.hit_flash,
            })
            .collect();

        let particles = session
            .particles
            .iter()
            .map(|p| ParticleView {
                pos: p.pos,
                size: p.size,
                life: p.life,
            })
            .collect();

        Self {
            phase: session.phase,
            level: session.level,
            theme: LevelTheme::for_level(session.level),
            score: session.score,
            gold: session.gold,
            tower_health: session.tower_health,
            tower_max_health: session.upgrades.tower_max_health(),
            level_complete: session.is_level_complete(),
            terrain: session.terrain.samples().to_vec(),
            arrows,
            embedded,
            enemies,
            particles,
            upgrades: session.list_upgrades(),
            trajectory: session.trajectory_preview(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::tick::{PointerEvent, TickInput, tick};

    #[test]
    fn test_capture_session_scalars() {
        let mut session = GameSession::new(Settings::default());
        session.start_game(3);
        let snap = FrameSnapshot::capture(&session);
        assert_eq!(snap.phase, GamePhase::LevelActive);
        assert_eq!(snap.level, 3);
        assert_eq!(snap.theme, LevelTheme::CherryBlossom);
        assert_eq!(snap.tower_health, 100);
        assert_eq!(snap.tower_max_health, 100);
        assert!(!snap.level_complete);
        assert_eq!(snap.terrain.len(), session.terrain.samples().len());
        assert_eq!(snap.upgrades.len(), 3);
        assert!(snap.trajectory.is_empty());
    }

    #[test]
    fn test_trajectory_follows_setting() {
        let mut session = GameSession::new(Settings::default());
        session.start_game(1);
        let aim = TickInput {
            pointer: vec![
                PointerEvent::Press(Vec2::new(300.0, 300.0)),
                PointerEvent::Drag(Vec2::new(180.0, 360.0)),
            ],
        };
        tick(&mut session, &aim, crate::consts::FRAME_DT);

        let snap = FrameSnapshot::capture(&session);
        assert!(!snap.trajectory.is_empty());
        assert!(snap.trajectory.len() <= session.settings.preview_points());
        assert_eq!(snap.trajectory[0], session.archer_pos());

        session.settings.trajectory_preview = false;
        assert!(FrameSnapshot::capture(&session).trajectory.is_empty());
    }

    #[test]
    fn test_serializes_to_json() {
        let mut session = GameSession::new(Settings::default());
        session.start_game(1);
        let json = serde_json::to_string(&FrameSnapshot::capture(&session)).unwrap();
        assert!(json.contains("\"phase\":\"LevelActive\""));
        assert!(json.contains("\"theme\":\"Spring\""));
    }
}
