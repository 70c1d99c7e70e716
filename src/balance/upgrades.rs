//! Stat upgrade pricing and the end-of-wave upgrade table.

use serde::{Deserialize, Serialize};

/// Player stats purchasable in the character screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Health,
    Speed,
    Damage,
    FireRate,
    Dodge,
    Luck,
    CritChance,
    CritDamage,
    Regeneration,
}

impl StatKind {
    pub const ALL: [StatKind; 9] = [
        StatKind::Health,
        StatKind::Speed,
        StatKind::Damage,
        StatKind::FireRate,
        StatKind::Dodge,
        StatKind::Luck,
        StatKind::CritChance,
        StatKind::CritDamage,
        StatKind::Regeneration,
    ];
}

/// Pricing and step size for one purchasable stat.
/// Cost doubles with each purchase: `floor(base_cost * scaling^purchases)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatUpgrade {
    pub base_cost: u32,
    pub cost_scaling: f32,
    pub value: f32,
    pub max_value: f32,
}

pub(super) fn default_stat_upgrades() -> Vec<(StatKind, StatUpgrade)> {
    use StatKind::*;
    vec![
        (Health, StatUpgrade { base_cost: 50, cost_scaling: 2.0, value: 1.0, max_value: 50.0 }),
        (Speed, StatUpgrade { base_cost: 50, cost_scaling: 2.0, value: 20.0, max_value: 300.0 }),
        (Damage, StatUpgrade { base_cost: 50, cost_scaling: 2.0, value: 0.2, max_value: 20.0 }),
        (FireRate, StatUpgrade { base_cost: 50, cost_scaling: 2.0, value: 0.2, max_value: 10.0 }),
        (Dodge, StatUpgrade { base_cost: 50, cost_scaling: 2.0, value: 5.0, max_value: 60.0 }),
        (Luck, StatUpgrade { base_cost: 50, cost_scaling: 2.0, value: 1.0, max_value: 100.0 }),
        (CritChance, StatUpgrade { base_cost: 50, cost_scaling: 2.0, value: 5.0, max_value: 100.0 }),
        (CritDamage, StatUpgrade { base_cost: 50, cost_scaling: 2.0, value: 25.0, max_value: 1000.0 }),
        (Regeneration, StatUpgrade { base_cost: 50, cost_scaling: 2.0, value: 0.01, max_value: 0.1 }),
    ]
}

/// One weighted option in the end-of-wave upgrade draw
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EndWaveUpgrade {
    pub stat: StatKind,
    pub weight: f32,
    pub value: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndWaveUpgrades {
    pub options_count: usize,
    pub reroll_cost: u32,
    pub max_rerolls: u32,
    pub options: Vec<EndWaveUpgrade>,
}

pub(super) fn default_end_wave_upgrades() -> EndWaveUpgrades {
    use StatKind::*;
    EndWaveUpgrades {
        options_count: 4,
        reroll_cost: 25,
        max_rerolls: 3,
        options: vec![
            EndWaveUpgrade { stat: Health, weight: 10.0, value: 0.5 },
            EndWaveUpgrade { stat: Damage, weight: 10.0, value: 0.1 },
            EndWaveUpgrade { stat: FireRate, weight: 8.0, value: 0.1 },
            EndWaveUpgrade { stat: Speed, weight: 8.0, value: 10.0 },
            EndWaveUpgrade { stat: Dodge, weight: 6.0, value: 2.0 },
            EndWaveUpgrade { stat: Luck, weight: 6.0, value: 2.0 },
            EndWaveUpgrade { stat: CritChance, weight: 5.0, value: 2.0 },
            EndWaveUpgrade { stat: CritDamage, weight: 5.0, value: 10.0 },
            EndWaveUpgrade { stat: Regeneration, weight: 4.0, value: 0.005 },
        ],
    }
}
