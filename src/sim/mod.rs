//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG and seeded noise only
//! - Stable iteration order (spawn order for enemies, launch order for arrows)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod launch;
pub mod level;
pub mod projectile;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod upgrades;

pub use collision::{Hit, HitReport, resolve_hits};
pub use enemy::{Enemy, EnemyKind, EnemyRoster, EnemyState};
pub use launch::{LaunchController, launch_velocity, predict_path};
pub use level::{LevelConfig, LevelTheme, level_config};
pub use projectile::{Arrow, ArrowFate, EmbeddedArrow};
pub use snapshot::FrameSnapshot;
pub use spawner::{SpawnDecision, WaveScheduler};
pub use state::{GameEvent, GamePhase, GameSession, Particle, TransitionError};
pub use terrain::Terrain;
pub use tick::{PointerEvent, TickInput, tick};
pub use upgrades::{PurchaseError, UpgradeDefinition, UpgradeId, UpgradeLedger};
