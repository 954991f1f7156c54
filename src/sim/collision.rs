//! Arrow/enemy hit resolution
//!
//! One pass per frame: each free arrow scans live enemies in roster order and
//! stops at the first body it overlaps. Removals are deferred until the scan is
//! done and applied from the highest index down, so positions stay valid.

use glam::Vec2;

use super::enemy::{Enemy, EnemyRoster};
use super::projectile::{Arrow, EmbeddedArrow};

/// Damage of one arrow before the upgrade multiplier
pub const BASE_ARROW_DAMAGE: f32 = 1.0;

/// A single arrow striking an enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub arrow_id: u32,
    pub enemy_id: u32,
    /// Arrow position at impact
    pub pos: Vec2,
    /// Damage after the multiplier
    pub damage: f32,
}

/// Everything that happened during one resolution pass
#[derive(Debug, Clone, Default)]
pub struct HitReport {
    pub hits: Vec<Hit>,
    /// Enemies whose health reached zero, removed from the roster
    pub killed: Vec<Enemy>,
    /// Arrows that struck an enemy, removed from the active list
    pub embedded: Vec<EmbeddedArrow>,
}

/// Whether `arrow` overlaps `enemy` (distance to the anchor under half the body height)
pub fn arrow_hits_enemy(arrow: &Arrow, enemy: &Enemy) -> bool {
    arrow.pos.distance(enemy.pos) < enemy.hit_radius()
}

/// Match arrows to enemies, apply damage and remove both sides of every hit
pub fn resolve_hits(
    arrows: &mut Vec<Arrow>,
    roster: &mut EnemyRoster,
    damage_multiplier: f32,
) -> HitReport {
    let mut report = HitReport::default();
    let mut struck_arrows: Vec<usize> = Vec::new();
    let mut struck_enemies: Vec<usize> = Vec::new();

    for (ai, arrow) in arrows.iter_mut().enumerate() {
        if arrow.stuck {
            continue;
        }

        for (ei, enemy) in roster.iter_mut().enumerate() {
            if !enemy.is_alive() || !arrow_hits_enemy(arrow, enemy) {
                continue;
            }

            report.embedded.push(arrow.embed_in(enemy));
            let damage = enemy.take_damage(BASE_ARROW_DAMAGE, damage_multiplier);
            report.hits.push(Hit {
                arrow_id: arrow.id,
                enemy_id: enemy.id,
                pos: arrow.pos,
                damage,
            });

            struck_arrows.push(ai);
            if !struck_enemies.contains(&ei) {
                struck_enemies.push(ei);
            }
            break;
        }
    }

    let dead: Vec<usize> = struck_enemies
        .into_iter()
        .filter(|&ei| roster.get(ei).is_some_and(|e| !e.is_alive()))
        .collect();
    report.killed = roster.remove_indices(&dead);
    // Kills in roster order
    report.killed.reverse();

    struck_arrows.sort_unstable_by(|a, b| b.cmp(a));
    for ai in struck_arrows {
        arrows.remove(ai);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SCREEN_WIDTH;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::terrain::Terrain;

    fn enemy(id: u32, kind: EnemyKind, pos: Vec2) -> Enemy {
        let mut e = Enemy::spawn(id, kind, 1, 1, 15.0, SCREEN_WIDTH, &Terrain::flat());
        e.pos = pos;
        e
    }

    #[test]
    fn test_goblin_killed_by_one_arrow() {
        let mut roster = EnemyRoster::new();
        roster.push(enemy(1, EnemyKind::Goblin, Vec2::new(400.0, 400.0)));
        let mut arrows = vec![Arrow::new(10, Vec2::new(403.0, 402.0), Vec2::new(100.0, 0.0))];

        let report = resolve_hits(&mut arrows, &mut roster, 1.5);
        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].damage, 1.5);
        assert_eq!(report.killed.len(), 1);
        assert_eq!(report.killed[0].health, 0.0);
        assert!(roster.is_empty());
        assert!(arrows.is_empty());
        assert_eq!(report.embedded.len(), 1);
        assert_eq!(report.embedded[0].offset, Vec2::new(3.0, 2.0));
    }

    #[test]
    fn test_wounded_enemy_stays() {
        let mut roster = EnemyRoster::new();
        roster.push(enemy(1, EnemyKind::Troll, Vec2::new(400.0, 400.0)));
        let mut arrows = vec![Arrow::new(10, Vec2::new(400.0, 410.0), Vec2::ZERO)];

        let report = resolve_hits(&mut arrows, &mut roster, 1.5);
        assert_eq!(report.hits.len(), 1);
        assert!(report.killed.is_empty());
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get(0).unwrap().health, 1.5);
        assert!(arrows.is_empty());
    }

    #[test]
    fn test_one_hit_per_arrow_first_in_roster_order() {
        let mut roster = EnemyRoster::new();
        roster.push(enemy(1, EnemyKind::Troll, Vec2::new(400.0, 400.0)));
        roster.push(enemy(2, EnemyKind::Troll, Vec2::new(402.0, 400.0)));
        let mut arrows = vec![Arrow::new(10, Vec2::new(401.0, 400.0), Vec2::ZERO)];

        let report = resolve_hits(&mut arrows, &mut roster, 1.0);
        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].enemy_id, 1);
        assert_eq!(roster.get(1).unwrap().health, 3.0);
    }

    #[test]
    fn test_dead_enemy_not_hit_twice_in_one_frame() {
        let mut roster = EnemyRoster::new();
        roster.push(enemy(1, EnemyKind::Goblin, Vec2::new(400.0, 400.0)));
        let mut arrows = vec![
            Arrow::new(10, Vec2::new(400.0, 401.0), Vec2::ZERO),
            Arrow::new(11, Vec2::new(401.0, 400.0), Vec2::ZERO),
        ];

        let report = resolve_hits(&mut arrows, &mut roster, 1.5);
        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.killed.len(), 1);
        // The second arrow keeps flying
        assert_eq!(arrows.len(), 1);
        assert_eq!(arrows[0].id, 11);
    }

    #[test]
    fn test_removals_keep_unrelated_entries() {
        let mut roster = EnemyRoster::new();
        for (id, x) in [(1, 100.0), (2, 300.0), (3, 500.0), (4, 700.0)] {
            roster.push(enemy(id, EnemyKind::Goblin, Vec2::new(x, 400.0)));
        }
        let mut arrows = vec![
            Arrow::new(10, Vec2::new(300.0, 400.0), Vec2::ZERO),
            Arrow::new(11, Vec2::new(50.0, 50.0), Vec2::ZERO),
            Arrow::new(12, Vec2::new(700.0, 400.0), Vec2::ZERO),
        ];

        let report = resolve_hits(&mut arrows, &mut roster, 1.5);
        assert_eq!(report.killed.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(roster.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(arrows.iter().map(|a| a.id).collect::<Vec<_>>(), vec![11]);
    }

    #[test]
    fn test_stuck_arrows_ignored() {
        let mut roster = EnemyRoster::new();
        roster.push(enemy(1, EnemyKind::Goblin, Vec2::new(400.0, 400.0)));
        let mut arrow = Arrow::new(10, Vec2::new(400.0, 400.0), Vec2::ZERO);
        arrow.stuck = true;
        let mut arrows = vec![arrow];

        let report = resolve_hits(&mut arrows, &mut roster, 1.5);
        assert!(report.hits.is_empty());
        assert_eq!(arrows.len(), 1);
    }
}
