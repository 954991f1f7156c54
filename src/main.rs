//! Tower Archer headless runner
//!
//! Plays a session with a simple autopilot archer and prints the final frame
//! snapshot as JSON. Pass a settings JSON path as the first argument to
//! override the defaults; `RUST_LOG` controls log output.

use glam::Vec2;
use tower_archer::Settings;
use tower_archer::consts::*;
use tower_archer::sim::{
    FrameSnapshot, GameEvent, GamePhase, GameSession, TickInput, UpgradeId, launch_velocity,
    predict_path, tick,
};

/// Stop after clearing this level
const LAST_LEVEL: u32 = 5;
/// Hard cap on simulated frames (10 minutes at 60 Hz)
const MAX_FRAMES: u32 = 60 * 60 * 10;
/// Frames between autopilot shots
const FIRE_INTERVAL: u32 = 24;
/// Points simulated per candidate shot
const AIM_HORIZON: usize = 90;
/// Where the autopilot presses before dragging
const PRESS_POINT: Vec2 = Vec2::new(400.0, 300.0);

/// Upgrade priority when shopping between levels
const SHOPPING_LIST: [UpgradeId; 3] = [
    UpgradeId::ArrowDamage,
    UpgradeId::ArrowSpeed,
    UpgradeId::TowerHealth,
];

fn main() {
    env_logger::init();
    log::info!("Tower Archer (headless) starting...");

    let settings = load_settings();
    log::info!(
        "Seed {}, quality {}, starting at level {}",
        settings.seed,
        settings.quality.as_str(),
        settings.clamped_start_level()
    );
    match settings.to_json() {
        Ok(json) => log::debug!("Effective settings:\n{}", json),
        Err(e) => log::warn!("Could not serialize settings: {}", e),
    }

    let mut session = GameSession::new(settings);
    session.start_game(session.settings.clamped_start_level());

    let mut kills = 0u32;
    let mut shots = 0u32;
    for frame in 0..MAX_FRAMES {
        match session.phase {
            GamePhase::LevelActive => {
                let input = if frame % FIRE_INTERVAL == 0 {
                    aim(&session)
                        .map(|pull| TickInput::drag(PRESS_POINT, PRESS_POINT + pull))
                        .unwrap_or_default()
                } else {
                    TickInput::default()
                };

                for event in tick(&mut session, &input, FRAME_DT) {
                    match event {
                        GameEvent::EnemyKilled { .. } => kills += 1,
                        GameEvent::ArrowLaunched { .. } => shots += 1,
                        _ => {}
                    }
                }
            }
            GamePhase::LevelComplete => {
                if session.level >= LAST_LEVEL {
                    break;
                }
                go_shopping(&mut session);
                if let Err(e) = session.advance_level() {
                    log::warn!("Could not advance: {}", e);
                    break;
                }
            }
            GamePhase::Menu | GamePhase::GameOver => break,
        }
    }

    log::info!(
        "Finished on level {} ({:?}): {} kills from {} shots",
        session.level,
        session.phase,
        kills,
        shots
    );

    match serde_json::to_string_pretty(&FrameSnapshot::capture(&session)) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

/// Settings from the JSON file named on the command line, or defaults
fn load_settings() -> Settings {
    let Some(path) = std::env::args().nth(1) else {
        return Settings::default();
    };

    match std::fs::read_to_string(&path) {
        Ok(json) => match Settings::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {}; using defaults", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            log::warn!("Could not read {}: {}; using defaults", path, e);
            Settings::default()
        }
    }
}

/// Pick a pull vector whose predicted path passes closest to the lead enemy
fn aim(session: &GameSession) -> Option<Vec2> {
    // Lead enemy: the one closest to the tower
    let target = session
        .enemies
        .iter()
        .filter(|e| e.is_alive())
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))?;
    // Aim a little ahead of the walker
    let aim_point = target.center() + target.vel * 0.5;

    let origin = session.archer_pos();
    let max_speed = session.max_launch_speed();
    let mut best: Option<(Vec2, f32)> = None;

    for angle_step in 0..24 {
        // From slightly below horizontal up to steep lobs
        let angle = -0.3 + angle_step as f32 * 0.07;
        for length_step in 1..=16 {
            let length = MIN_PULL + length_step as f32 * (MAX_PULLBACK - MIN_PULL) / 16.0;
            let pull = Vec2::new(-angle.cos(), angle.sin()) * length;
            let Some(vel) = launch_velocity(pull, max_speed) else {
                continue;
            };

            let miss = predict_path(origin, vel, &session.terrain, SCREEN_WIDTH, AIM_HORIZON)
                .iter()
                .map(|p| p.distance(aim_point))
                .fold(f32::INFINITY, f32::min);
            if best.is_none_or(|(_, d)| miss < d) {
                best = Some((pull, miss));
            }
        }
    }

    best.map(|(pull, _)| pull)
}

/// Spend gold in priority order until nothing more is affordable
fn go_shopping(session: &mut GameSession) {
    for id in SHOPPING_LIST {
        while let Ok(level) = session.purchase_upgrade(id) {
            log::info!("Bought {} level {}", id.name(), level);
        }
    }
}
