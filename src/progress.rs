//! Persistent meta-progression
//!
//! Everything a run carries between levels: banked money, the purchased
//! stat baseline, the weapon loadout, and owned items. Persisted to
//! LocalStorage. Dying wipes all of it except the control scheme.

use serde::{Deserialize, Serialize};

use crate::balance::{BalanceConfig, ItemId, PlayerBalance, StatKind, WeaponKind};
use crate::consts::TOTAL_LEVELS;

/// Input mapping preference; survives permadeath
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlScheme {
    /// WASD to move, mouse to aim
    #[default]
    MouseAim,
    /// WASD to move, arrow keys to aim
    Keyboard,
}

/// The purchased stat baseline. Shop purchases write directly into these
/// values; combat reads them once at level start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_health: f32,
    pub speed: f32,
    pub damage: f32,
    pub fire_rate: f32,
    pub dodge: f32,
    pub luck: f32,
    pub crit_chance: f32,
    pub crit_damage: f32,
    pub regeneration: f32,
    pub pickup_range: f32,
}

impl PlayerStats {
    pub fn from_balance(base: &PlayerBalance) -> Self {
        Self {
            max_health: base.health,
            speed: base.speed,
            damage: base.damage,
            fire_rate: base.fire_rate,
            dodge: base.dodge,
            luck: base.luck,
            crit_chance: base.crit_chance,
            crit_damage: base.crit_damage,
            regeneration: base.regeneration,
            pickup_range: base.pickup_range,
        }
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::from_balance(&PlayerBalance::default())
    }
}

/// Persistent run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProgress {
    #[serde(default)]
    pub money: u32,
    /// Highest level the player may enter (1-based)
    #[serde(default = "default_unlocked")]
    pub unlocked_levels: u32,
    #[serde(default)]
    pub stats: PlayerStats,
    /// Purchase counts per stat, for the doubling cost curve
    #[serde(default)]
    pub upgrade_purchases: Vec<(StatKind, u32)>,
    /// Owned weapons and their levels, in slot order
    #[serde(default = "default_loadout")]
    pub weapons: Vec<(WeaponKind, u32)>,
    /// Owned items and their stack counts
    #[serde(default)]
    pub items: Vec<(ItemId, u32)>,
    #[serde(default)]
    pub control_scheme: ControlScheme,
}

fn default_unlocked() -> u32 {
    1
}

fn default_loadout() -> Vec<(WeaponKind, u32)> {
    vec![(WeaponKind::Pistol, 1)]
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            money: 0,
            unlocked_levels: 1,
            stats: PlayerStats::default(),
            upgrade_purchases: Vec::new(),
            weapons: default_loadout(),
            items: Vec::new(),
            control_scheme: ControlScheme::default(),
        }
    }
}

impl PlayerProgress {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "holdout_progress";

    /// Fresh progression seeded from a balance table
    pub fn new(balance: &BalanceConfig) -> Self {
        Self {
            stats: PlayerStats::from_balance(&balance.player),
            ..Default::default()
        }
    }

    /// Permadeath: wipe everything except the control scheme
    pub fn reset(&mut self) {
        *self = Self {
            control_scheme: self.control_scheme,
            ..Default::default()
        };
    }

    /// Bank the completion bonus and unlock the next level
    pub fn complete_level(&mut self, level: u32, bonus: u32) {
        self.money += bonus;
        if level < TOTAL_LEVELS {
            self.unlocked_levels = self.unlocked_levels.max(level + 1);
        }
    }

    pub fn purchases_of(&self, stat: StatKind) -> u32 {
        self.upgrade_purchases
            .iter()
            .find(|(s, _)| *s == stat)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn record_purchase(&mut self, stat: StatKind) {
        if let Some(entry) = self.upgrade_purchases.iter_mut().find(|(s, _)| *s == stat) {
            entry.1 += 1;
        } else {
            self.upgrade_purchases.push((stat, 1));
        }
    }

    pub fn stacks_of(&self, item: ItemId) -> u32 {
        self.items
            .iter()
            .find(|(i, _)| *i == item)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn weapon_level(&self, kind: WeaponKind) -> Option<u32> {
        self.weapons
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, level)| *level)
    }

    /// Load progression from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<PlayerProgress>(&json) {
                    Ok(progress) => {
                        log::info!(
                            "Loaded progression: {} money, {} levels unlocked",
                            progress.money,
                            progress.unlocked_levels
                        );
                        return progress;
                    }
                    Err(e) => log::warn!("Discarding unreadable progression save: {e}"),
                }
            }
        }

        log::info!("No saved progression, starting fresh");
        Self::default()
    }

    /// Save progression to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Progression saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_only_control_scheme() {
        let mut progress = PlayerProgress::default();
        progress.money = 5000;
        progress.unlocked_levels = 12;
        progress.stats.damage = 4.0;
        progress.weapons.push((WeaponKind::RocketLauncher, 3));
        progress.items.push((ItemId::Vampiric, 1));
        progress.control_scheme = ControlScheme::Keyboard;

        progress.reset();

        assert_eq!(progress.money, 0);
        assert_eq!(progress.unlocked_levels, 1);
        assert_eq!(progress.stats.damage, PlayerStats::default().damage);
        assert_eq!(progress.weapons, vec![(WeaponKind::Pistol, 1)]);
        assert!(progress.items.is_empty());
        assert_eq!(progress.control_scheme, ControlScheme::Keyboard);
    }

    #[test]
    fn test_complete_level_unlocks_next() {
        let mut progress = PlayerProgress::default();
        progress.complete_level(1, 25);
        assert_eq!(progress.money, 25);
        assert_eq!(progress.unlocked_levels, 2);

        // Replaying an early level never locks progress back down
        progress.unlocked_levels = 10;
        progress.complete_level(3, 35);
        assert_eq!(progress.unlocked_levels, 10);
    }

    #[test]
    fn test_final_level_does_not_unlock_beyond_cap() {
        let mut progress = PlayerProgress::default();
        progress.unlocked_levels = TOTAL_LEVELS;
        progress.complete_level(TOTAL_LEVELS, 100);
        assert_eq!(progress.unlocked_levels, TOTAL_LEVELS);
    }

    #[test]
    fn test_purchase_counting() {
        let mut progress = PlayerProgress::default();
        assert_eq!(progress.purchases_of(StatKind::Damage), 0);
        progress.record_purchase(StatKind::Damage);
        progress.record_purchase(StatKind::Damage);
        progress.record_purchase(StatKind::Speed);
        assert_eq!(progress.purchases_of(StatKind::Damage), 2);
        assert_eq!(progress.purchases_of(StatKind::Speed), 1);
    }
}
