//! Between-round purchase and upgrade operations
//!
//! Pure functions over `PlayerProgress` and `BalanceConfig`; the shop
//! screens are thin callers. Rejected purchases come back as a
//! `ShopError`, never a panic, so the UI can surface them.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::balance::{
    BalanceConfig, EndWaveUpgrade, ItemEffect, ItemId, StatKind, WeaponKind,
};
use crate::progress::{PlayerProgress, PlayerStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopError {
    InsufficientFunds,
    AlreadyOwned,
    UnknownItem,
    MaxStacks,
    SlotsFull,
    MaxLevel,
    LastWeapon,
    NotOwned,
    StatCapped,
    RerollLimit,
}

/// Next price of a stat upgrade given how many were already bought
pub fn stat_upgrade_cost(progress: &PlayerProgress, stat: StatKind, balance: &BalanceConfig) -> Option<u32> {
    let up = balance.stat_upgrade(stat)?;
    let purchases = progress.purchases_of(stat);
    Some((up.base_cost as f32 * up.cost_scaling.powi(purchases as i32)).floor() as u32)
}

/// Buy one step of a stat. Cost doubles per purchase; the stat is capped
/// at its configured maximum.
pub fn purchase_stat_upgrade(
    progress: &mut PlayerProgress,
    stat: StatKind,
    balance: &BalanceConfig,
) -> Result<(), ShopError> {
    let up = *balance.stat_upgrade(stat).ok_or(ShopError::UnknownItem)?;
    let value = stat_value_mut(&mut progress.stats, stat);
    if *value >= up.max_value {
        return Err(ShopError::StatCapped);
    }
    let cost = stat_upgrade_cost(progress, stat, balance).ok_or(ShopError::UnknownItem)?;
    if progress.money < cost {
        return Err(ShopError::InsufficientFunds);
    }
    progress.money -= cost;
    let value = stat_value_mut(&mut progress.stats, stat);
    *value = (*value + up.value).min(up.max_value);
    progress.record_purchase(stat);
    Ok(())
}

/// Price of the next stack of an item. Stackables scale by a tiered
/// multiplier chosen from the base cost; bounce house carries its own.
pub fn item_cost(progress: &PlayerProgress, id: ItemId, balance: &BalanceConfig) -> Option<u32> {
    let def = balance.item(id)?;
    let stacks = progress.stacks_of(id);
    let tiered = if def.cost <= 10 {
        1.8
    } else if def.cost >= 200 {
        2.5
    } else {
        2.0
    };
    let multiplier = def.stack_cost_multiplier.map(|m| m.max(2.0)).unwrap_or(tiered);
    Some((def.cost as f32 * multiplier.powi(stacks as i32)).floor() as u32)
}

/// Buy an item: applies its purchase-time stat effect (if any) and records
/// the stack. Non-stackables reject a second purchase.
pub fn purchase_item(
    progress: &mut PlayerProgress,
    id: ItemId,
    balance: &BalanceConfig,
) -> Result<(), ShopError> {
    let def = balance.item(id).ok_or(ShopError::UnknownItem)?.clone();
    let stacks = progress.stacks_of(id);
    if stacks >= def.max_stacks {
        return Err(if def.max_stacks == 1 {
            ShopError::AlreadyOwned
        } else {
            ShopError::MaxStacks
        });
    }
    let cost = item_cost(progress, id, balance).ok_or(ShopError::UnknownItem)?;
    if progress.money < cost {
        return Err(ShopError::InsufficientFunds);
    }
    progress.money -= cost;
    apply_effect(&mut progress.stats, def.effect);
    if let Some(entry) = progress.items.iter_mut().find(|(i, _)| *i == id) {
        entry.1 += 1;
    } else {
        progress.items.push((id, 1));
    }
    Ok(())
}

/// Buy a weapon into a free slot. New weapons start at level 1.
pub fn purchase_weapon(
    progress: &mut PlayerProgress,
    kind: WeaponKind,
    balance: &BalanceConfig,
) -> Result<(), ShopError> {
    if progress.weapon_level(kind).is_some() {
        return Err(ShopError::AlreadyOwned);
    }
    if progress.weapons.len() >= balance.shop.max_weapon_slots {
        return Err(ShopError::SlotsFull);
    }
    let (def, _) = balance.weapon(kind);
    if progress.money < def.cost {
        return Err(ShopError::InsufficientFunds);
    }
    progress.money -= def.cost;
    progress.weapons.push((kind, 1));
    Ok(())
}

/// Price to raise a weapon from its current level
pub fn weapon_upgrade_cost(level: u32, kind: WeaponKind, balance: &BalanceConfig) -> u32 {
    let (def, _) = balance.weapon(kind);
    ((def.cost as f32 * level as f32).floor() as u32).max(balance.shop.min_upgrade_cost)
}

pub fn upgrade_weapon(
    progress: &mut PlayerProgress,
    kind: WeaponKind,
    balance: &BalanceConfig,
) -> Result<(), ShopError> {
    let level = progress.weapon_level(kind).ok_or(ShopError::NotOwned)?;
    if level >= balance.shop.weapon_max_level {
        return Err(ShopError::MaxLevel);
    }
    let cost = weapon_upgrade_cost(level, kind, balance);
    if progress.money < cost {
        return Err(ShopError::InsufficientFunds);
    }
    progress.money -= cost;
    if let Some(entry) = progress.weapons.iter_mut().find(|(k, _)| *k == kind) {
        entry.1 += 1;
    }
    Ok(())
}

/// Sell a weapon for a fraction of its base cost. The loadout can never
/// go empty.
pub fn sell_weapon(
    progress: &mut PlayerProgress,
    kind: WeaponKind,
    balance: &BalanceConfig,
) -> Result<(), ShopError> {
    if progress.weapon_level(kind).is_none() {
        return Err(ShopError::NotOwned);
    }
    if progress.weapons.len() <= 1 {
        return Err(ShopError::LastWeapon);
    }
    let (def, _) = balance.weapon(kind);
    progress.money += (def.cost as f32 * balance.shop.sell_fraction).floor() as u32;
    progress.weapons.retain(|(k, _)| *k != kind);
    Ok(())
}

/// The end-of-wave upgrade screen: a weighted draw of distinct stat bumps,
/// rerollable at an escalating price.
#[derive(Debug, Clone)]
pub struct EndWaveOffers {
    pub options: Vec<EndWaveUpgrade>,
    pub rerolls_used: u32,
}

impl EndWaveOffers {
    pub fn roll(rng: &mut Pcg32, balance: &BalanceConfig) -> Self {
        Self {
            options: draw_distinct(rng, balance),
            rerolls_used: 0,
        }
    }

    pub fn reroll_cost(&self, balance: &BalanceConfig) -> u32 {
        balance.end_wave.reroll_cost * (self.rerolls_used + 1)
    }

    pub fn reroll(
        &mut self,
        progress: &mut PlayerProgress,
        rng: &mut Pcg32,
        balance: &BalanceConfig,
    ) -> Result<(), ShopError> {
        if self.rerolls_used >= balance.end_wave.max_rerolls {
            return Err(ShopError::RerollLimit);
        }
        let cost = self.reroll_cost(balance);
        if progress.money < cost {
            return Err(ShopError::InsufficientFunds);
        }
        progress.money -= cost;
        self.rerolls_used += 1;
        self.options = draw_distinct(rng, balance);
        Ok(())
    }

    /// Apply the chosen option to the persisted baseline. Dodge and crit
    /// chance keep hard caps so a lucky streak cannot break combat math.
    pub fn apply(&self, index: usize, progress: &mut PlayerProgress) -> Result<(), ShopError> {
        let option = self.options.get(index).copied().ok_or(ShopError::UnknownItem)?;
        let value = stat_value_mut(&mut progress.stats, option.stat);
        *value += option.value;
        match option.stat {
            StatKind::Dodge => *value = value.min(95.0),
            StatKind::CritChance => *value = value.min(100.0),
            _ => {}
        }
        Ok(())
    }
}

/// Weighted draw without replacement until the configured count is filled
fn draw_distinct(rng: &mut Pcg32, balance: &BalanceConfig) -> Vec<EndWaveUpgrade> {
    let mut pool = balance.end_wave.options.clone();
    let count = balance.end_wave.options_count.min(pool.len());
    let mut drawn = Vec::with_capacity(count);
    for _ in 0..count {
        let total: f32 = pool.iter().map(|o| o.weight).sum();
        let mut roll = rng.random::<f32>() * total;
        let mut pick = pool.len() - 1;
        for (i, option) in pool.iter().enumerate() {
            roll -= option.weight;
            if roll <= 0.0 {
                pick = i;
                break;
            }
        }
        drawn.push(pool.swap_remove(pick));
    }
    drawn
}

fn stat_value_mut(stats: &mut PlayerStats, stat: StatKind) -> &mut f32 {
    match stat {
        StatKind::Health => &mut stats.max_health,
        StatKind::Speed => &mut stats.speed,
        StatKind::Damage => &mut stats.damage,
        StatKind::FireRate => &mut stats.fire_rate,
        StatKind::Dodge => &mut stats.dodge,
        StatKind::Luck => &mut stats.luck,
        StatKind::CritChance => &mut stats.crit_chance,
        StatKind::CritDamage => &mut stats.crit_damage,
        StatKind::Regeneration => &mut stats.regeneration,
    }
}

fn apply_effect(stats: &mut PlayerStats, effect: ItemEffect) {
    match effect {
        ItemEffect::AddLuck(x) => stats.luck += x,
        ItemEffect::AddSpeed(x) => stats.speed += x,
        ItemEffect::MulSpeed(x) => stats.speed *= x,
        ItemEffect::AddHealth(x) => stats.max_health += x,
        ItemEffect::MulDamage(x) => stats.damage *= x,
        ItemEffect::AddCritChance(x) => stats.crit_chance += x,
        ItemEffect::AddCrit { chance, damage } => {
            stats.crit_chance += chance;
            stats.crit_damage += damage;
        }
        ItemEffect::MulFireRate(x) => stats.fire_rate *= x,
        ItemEffect::AddRegen(x) => stats.regeneration += x,
        ItemEffect::AddPickupRange(x) => stats.pickup_range += x,
        ItemEffect::MulPickupRange(x) => stats.pickup_range *= x,
        ItemEffect::MulSpeedAndFireRate { speed, fire_rate } => {
            stats.speed *= speed;
            stats.fire_rate *= fire_rate;
        }
        ItemEffect::MulDamageAndFireRate { damage, fire_rate } => {
            stats.damage *= damage;
            stats.fire_rate *= fire_rate;
        }
        ItemEffect::MulDamageAndHealth { damage, health } => {
            stats.damage *= damage;
            stats.max_health *= health;
        }
        // Capabilities act in combat; owning the item is the effect
        ItemEffect::Grant(_) => {}
    }
}
