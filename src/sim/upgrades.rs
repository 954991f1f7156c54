//! Upgrade ledger
//!
//! Three persistent upgrades bought with gold between levels. Levels start at
//! 1 and cost grows by half (rounded down) after every purchase.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upgrade identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeId {
    ArrowDamage,
    TowerHealth,
    ArrowSpeed,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 3] = [
        UpgradeId::ArrowDamage,
        UpgradeId::TowerHealth,
        UpgradeId::ArrowSpeed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UpgradeId::ArrowDamage => "Arrow Damage",
            UpgradeId::TowerHealth => "Tower Health",
            UpgradeId::ArrowSpeed => "Arrow Speed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UpgradeId::ArrowDamage => "Increase arrow damage",
            UpgradeId::TowerHealth => "Increase tower max health",
            UpgradeId::ArrowSpeed => "Increase arrow speed",
        }
    }

    pub fn base_cost(&self) -> u32 {
        match self {
            UpgradeId::ArrowDamage => 3,
            UpgradeId::TowerHealth => 2,
            UpgradeId::ArrowSpeed => 3,
        }
    }

    pub fn max_level(&self) -> u32 {
        5
    }

    /// Effect at `level`: damage multiplier, tower max health, or speed multiplier
    pub fn value_at(&self, level: u32) -> f32 {
        let l = level as f32;
        match self {
            UpgradeId::ArrowDamage => l * 0.5 + 1.0,
            UpgradeId::TowerHealth => 100.0 + (l - 1.0) * 25.0,
            UpgradeId::ArrowSpeed => 1.0 + (l - 1.0) * 0.2,
        }
    }

    fn index(&self) -> usize {
        match self {
            UpgradeId::ArrowDamage => 0,
            UpgradeId::TowerHealth => 1,
            UpgradeId::ArrowSpeed => 2,
        }
    }
}

/// Why a purchase was refused. State is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseError {
    InsufficientGold { cost: u32, gold: u32 },
    MaxLevelReached,
    /// Upgrades can only be bought after a level is complete
    NotBetweenLevels,
}

impl fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseError::InsufficientGold { cost, gold } => {
                write!(f, "not enough gold: need {}, have {}", cost, gold)
            }
            PurchaseError::MaxLevelReached => write!(f, "upgrade is already at max level"),
            PurchaseError::NotBetweenLevels => {
                write!(f, "upgrades can only be bought between levels")
            }
        }
    }
}

impl std::error::Error for PurchaseError {}

/// Current state of one upgrade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct UpgradeState {
    level: u32,
    cost: u32,
}

impl UpgradeState {
    fn initial(id: UpgradeId) -> Self {
        Self {
            level: 1,
            cost: id.base_cost(),
        }
    }
}

/// Read-only view of an upgrade for menus
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeDefinition {
    pub id: UpgradeId,
    pub name: &'static str,
    pub description: &'static str,
    pub level: u32,
    pub max_level: u32,
    /// Price of the next level
    pub cost: u32,
    /// Effect at the current level
    pub value: f32,
}

/// All upgrades for one playthrough
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeLedger {
    upgrades: [UpgradeState; 3],
}

impl Default for UpgradeLedger {
    fn default() -> Self {
        Self {
            upgrades: UpgradeId::ALL.map(UpgradeState::initial),
        }
    }
}

impl UpgradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to level 1 and base cost for every upgrade
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn level(&self, id: UpgradeId) -> u32 {
        self.upgrades[id.index()].level
    }

    pub fn cost(&self, id: UpgradeId) -> u32 {
        self.upgrades[id.index()].cost
    }

    pub fn value(&self, id: UpgradeId) -> f32 {
        id.value_at(self.level(id))
    }

    pub fn damage_multiplier(&self) -> f32 {
        self.value(UpgradeId::ArrowDamage)
    }

    pub fn tower_max_health(&self) -> i32 {
        self.value(UpgradeId::TowerHealth) as i32
    }

    pub fn arrow_speed_multiplier(&self) -> f32 {
        self.value(UpgradeId::ArrowSpeed)
    }

    pub fn list(&self) -> Vec<UpgradeDefinition> {
        UpgradeId::ALL
            .iter()
            .map(|&id| UpgradeDefinition {
                id,
                name: id.name(),
                description: id.description(),
                level: self.level(id),
                max_level: id.max_level(),
                cost: self.cost(id),
                value: self.value(id),
            })
            .collect()
    }

    /// Buy the next level of `id`, paying from `gold`. Returns the new level.
    pub fn purchase(&mut self, id: UpgradeId, gold: &mut u32) -> Result<u32, PurchaseError> {
        let state = &mut self.upgrades[id.index()];
        if state.level >= id.max_level() {
            return Err(PurchaseError::MaxLevelReached);
        }
        if *gold < state.cost {
            return Err(PurchaseError::InsufficientGold {
                cost: state.cost,
                gold: *gold,
            });
        }

        *gold -= state.cost;
        state.level += 1;
        state.cost = state.cost * 3 / 2;
        Ok(state.level)
    }
}
