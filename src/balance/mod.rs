//! Game balance tables.
//!
//! Everything tunable lives in [`BalanceConfig`], an immutable value that is
//! built once and passed by reference into the spawn, weapon, and combat
//! systems. Tests construct their own configs with overridden tables.

mod enemies;
mod items;
mod upgrades;
mod weapons;

pub use enemies::{EnemyDef, EnemyKind, EnemyShot, EnemyStats, WaveMotion};
pub use items::{Capability, ItemDef, ItemEffect, ItemId};
pub use upgrades::{EndWaveUpgrade, EndWaveUpgrades, StatKind, StatUpgrade};
pub use weapons::{ChainParams, WeaponDef, WeaponKind, WeaponSpecial, WeaponUpgrade, WellParams};

use serde::{Deserialize, Serialize};

/// Player stat baseline before meta-progression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBalance {
    pub health: f32,
    pub speed: f32,
    pub damage: f32,
    pub fire_rate: f32,
    pub dodge: f32,
    pub luck: f32,
    pub crit_chance: f32,
    pub crit_damage: f32,
    pub regeneration: f32,
    pub pickup_range: f32,
    pub size: f32,
}

impl Default for PlayerBalance {
    fn default() -> Self {
        Self {
            health: 10.0,
            speed: 100.0,
            damage: 1.0,
            fire_rate: 1.0,
            dodge: 5.0,
            luck: 0.0,
            crit_chance: 5.0,
            crit_damage: 150.0,
            regeneration: 0.02,
            pickup_range: 50.0,
            size: 20.0,
        }
    }
}

/// Spawn rate ramp parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnBalance {
    /// Enemies per second on wave 1 at t=0
    pub base_rate: f32,
    pub max_rate: f32,
    pub rate_per_wave: f32,
    /// Rate increase per second of wave time
    pub acceleration: f32,
}

impl Default for SpawnBalance {
    fn default() -> Self {
        Self { base_rate: 0.8, max_rate: 27.0, rate_per_wave: 0.85, acceleration: 0.035 }
    }
}

/// Money drop and reward parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyBalance {
    /// Drop chance reduction per level, clamped so the floor below survives
    pub wave_chance_reduction: f32,
    /// Drop chance never falls below this
    pub min_drop_chance: f32,
    /// Additive drop chance per luck point
    pub luck_drop_bonus: f32,
    /// Money value multiplier per luck point
    pub luck_value_bonus: f32,
    /// Money value scaling per wave
    pub wave_value_scale: f32,
    pub wave_completion_bonus: u32,
    pub wave_completion_bonus_per_wave: u32,
}

impl Default for EconomyBalance {
    fn default() -> Self {
        Self {
            wave_chance_reduction: 0.01,
            min_drop_chance: 0.05,
            luck_drop_bonus: 0.01,
            luck_value_bonus: 0.02,
            wave_value_scale: 0.1,
            wave_completion_bonus: 25,
            wave_completion_bonus_per_wave: 5,
        }
    }
}

/// Projectile baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileBalance {
    pub base_speed: f32,
    pub base_size: f32,
    pub lifetime: f32,
    /// Flat bounce budget granted to ring/radial patterns by bounce house
    pub bounce_house_max_bounces: u32,
}

impl Default for ProjectileBalance {
    fn default() -> Self {
        Self { base_speed: 400.0, base_size: 4.0, lifetime: 5.0, bounce_house_max_bounces: 5 }
    }
}

/// Shop-wide rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopBalance {
    pub max_weapon_slots: usize,
    pub weapon_max_level: u32,
    /// Weapon upgrade cost is `max(min_upgrade_cost, cost * level)`
    pub min_upgrade_cost: u32,
    /// Fraction of base cost refunded on sale
    pub sell_fraction: f32,
}

impl Default for ShopBalance {
    fn default() -> Self {
        Self { max_weapon_slots: 4, weapon_max_level: 4, min_upgrade_cost: 25, sell_fraction: 0.8 }
    }
}

/// The complete, immutable balance table set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceConfig {
    pub player: PlayerBalance,
    pub spawning: SpawnBalance,
    pub economy: EconomyBalance,
    pub projectile: ProjectileBalance,
    pub shop: ShopBalance,
    pub enemies: Vec<(EnemyKind, EnemyDef)>,
    /// Per-wave weighted kind distributions
    pub distributions: Vec<(u32, Vec<(EnemyKind, f32)>)>,
    /// Used for waves without an explicit distribution
    pub fallback_distribution: Vec<(EnemyKind, f32)>,
    pub weapons: Vec<(WeaponKind, WeaponDef, WeaponUpgrade)>,
    pub items: Vec<(ItemId, ItemDef)>,
    pub stat_upgrades: Vec<(StatKind, StatUpgrade)>,
    pub end_wave: EndWaveUpgrades,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            player: PlayerBalance::default(),
            spawning: SpawnBalance::default(),
            economy: EconomyBalance::default(),
            projectile: ProjectileBalance::default(),
            shop: ShopBalance::default(),
            enemies: enemies::default_defs().to_vec(),
            distributions: enemies::default_distributions(),
            fallback_distribution: enemies::default_fallback_distribution(),
            weapons: weapons::default_defs(),
            items: items::default_defs(),
            stat_upgrades: upgrades::default_stat_upgrades(),
            end_wave: upgrades::default_end_wave_upgrades(),
        }
    }
}

impl BalanceConfig {
    /// Look up an enemy definition, falling back to basic for safety
    pub fn enemy(&self, kind: EnemyKind) -> &EnemyDef {
        self.enemies
            .iter()
            .find(|(k, _)| *k == kind)
            .or_else(|| self.enemies.iter().find(|(k, _)| *k == EnemyKind::Basic))
            .map(|(_, def)| def)
            .expect("balance config has no enemy definitions")
    }

    /// Wave-frozen stats for an enemy kind
    pub fn enemy_stats(&self, kind: EnemyKind, wave: u32) -> EnemyStats {
        self.enemy(kind).stats_for_wave(wave)
    }

    /// The weighted distribution used for a given wave
    pub fn distribution(&self, wave: u32) -> &[(EnemyKind, f32)] {
        self.distributions
            .iter()
            .find(|(w, _)| *w == wave)
            .map(|(_, d)| d.as_slice())
            .unwrap_or(&self.fallback_distribution)
    }

    /// Select an enemy kind from the wave distribution. `draw` is a uniform
    /// sample in [0, 1); the walk picks the first kind whose cumulative
    /// weight reaches it, falling back to basic when weights sum below 1.
    pub fn select_enemy_kind(&self, wave: u32, draw: f32) -> EnemyKind {
        let mut cumulative = 0.0;
        for &(kind, weight) in self.distribution(wave) {
            cumulative += weight;
            if draw <= cumulative {
                return kind;
            }
        }
        EnemyKind::Basic
    }

    /// Enemies per second: capped linear ramp in wave number and wave time
    pub fn spawn_rate(&self, wave: u32, time_in_wave: f32) -> f32 {
        let s = &self.spawning;
        let base = s.base_rate + wave.saturating_sub(1) as f32 * s.rate_per_wave;
        (base + time_in_wave * s.acceleration).min(s.max_rate)
    }

    /// Money for completing a level
    pub fn wave_completion_bonus(&self, level: u32) -> u32 {
        self.economy.wave_completion_bonus
            + self.economy.wave_completion_bonus_per_wave * level.saturating_sub(1)
    }

    /// Weapon definition and upgrade table, falling back to the pistol for
    /// unknown kinds rather than failing
    pub fn weapon(&self, kind: WeaponKind) -> (&WeaponDef, &WeaponUpgrade) {
        self.weapons
            .iter()
            .find(|(k, _, _)| *k == kind)
            .or_else(|| self.weapons.iter().find(|(k, _, _)| *k == WeaponKind::Pistol))
            .map(|(_, def, up)| (def, up))
            .expect("balance config has no weapon definitions")
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.iter().find(|(i, _)| *i == id).map(|(_, def)| def)
    }

    pub fn stat_upgrade(&self, stat: StatKind) -> Option<&StatUpgrade> {
        self.stat_upgrades.iter().find(|(s, _)| *s == stat).map(|(_, up)| up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_enemy_stat_scaling_is_linear() {
        let balance = BalanceConfig::default();
        for &kind in &EnemyKind::ALL {
            let def = balance.enemy(kind).clone();
            for wave in 1..=30 {
                let stats = balance.enemy_stats(kind, wave);
                let w = (wave - 1) as f32;
                assert_eq!(stats.health, def.base_health + w * def.health_per_wave);
                assert_eq!(stats.speed, def.base_speed + w * def.speed_per_wave);
                assert_eq!(stats.damage, def.base_damage + w * def.damage_per_wave);
                assert_eq!(stats.xp, def.base_xp + w * def.xp_per_wave);
            }
        }
    }

    #[test]
    fn test_wave_one_basic_dies_to_base_damage() {
        let balance = BalanceConfig::default();
        let stats = balance.enemy_stats(EnemyKind::Basic, 1);
        // The starting pistol deals max(1, floor(damage * 1.0)) = 1
        assert!(stats.health <= balance.player.damage);
    }

    #[test]
    fn test_select_kind_boundary_draws() {
        let mut balance = BalanceConfig::default();
        balance.distributions = vec![(
            1,
            vec![
                (EnemyKind::Basic, 0.5),
                (EnemyKind::Tracker, 0.3),
                (EnemyKind::Tank, 0.2),
            ],
        )];
        // Weights sum to exactly 1.0: a draw of 0.99 lands on the last kind,
        // a draw of 0.0 on the first kind with nonzero weight.
        assert_eq!(balance.select_enemy_kind(1, 0.99), EnemyKind::Tank);
        assert_eq!(balance.select_enemy_kind(1, 0.0), EnemyKind::Basic);
    }

    #[test]
    fn test_select_kind_falls_back_to_basic() {
        let mut balance = BalanceConfig::default();
        balance.distributions = vec![(1, vec![(EnemyKind::Tracker, 0.1)])];
        assert_eq!(balance.select_enemy_kind(1, 0.95), EnemyKind::Basic);
    }

    #[test]
    fn test_unknown_wave_uses_fallback() {
        let balance = BalanceConfig::default();
        assert_eq!(balance.distribution(99), balance.fallback_distribution.as_slice());
    }

    #[test]
    fn test_spawn_rate_cap() {
        let balance = BalanceConfig::default();
        assert_eq!(balance.spawn_rate(30, 1e6), balance.spawning.max_rate);
    }

    proptest! {
        #[test]
        fn prop_spawn_rate_monotone_and_capped(
            wave in 1u32..40,
            t1 in 0.0f32..50.0,
            dt in 0.0f32..50.0,
        ) {
            let balance = BalanceConfig::default();
            let r1 = balance.spawn_rate(wave, t1);
            let r2 = balance.spawn_rate(wave, t1 + dt);
            let r3 = balance.spawn_rate(wave + 1, t1);
            prop_assert!(r2 >= r1);
            prop_assert!(r3 >= r1);
            prop_assert!(r1 <= balance.spawning.max_rate);
        }
    }
}
