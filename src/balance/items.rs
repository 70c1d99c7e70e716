//! Item catalog. Items either mutate the persisted stat baseline when
//! bought, or grant a runtime capability checked during combat.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemId {
    BounceHouse,
    Vampiric,
    MoneyMagnet,
    LuckyPenny,
    SpeedBoots,
    SharpShooter,
    TankArmor,
    RapidReload,
    ExplosiveRounds,
    LifeSteal,
    LuckyCoin,
    EnergyDrink,
    ProteinBar,
    SharpTips,
    QuickHands,
    BandaidPack,
    CoffeeShot,
    MagnetGloves,
    CriticalEye,
    HeavyRounds,
    ShieldGenerator,
    AdrenalineRush,
    DoubleTap,
    BloodPact,
    GlassCannon,
}

/// Combat-time capabilities a player can hold. Built from owned items at
/// level start; queried by lookup, never stored as parallel booleans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Capability {
    /// Projectiles gain wall bounces, scaling with stacks
    BounceHouse { bounces_per_stack: u32 },
    /// Heal on every Nth kill
    Vampiric { heal_per_kills: u32, heal_amount: f32 },
    /// Projectiles explode on impact
    ExplosiveRounds { radius: f32, damage_fraction: f32 },
    /// Heal a fraction of damage dealt
    LifeSteal { fraction: f32 },
    /// Chance to block all contact damage
    ShieldGenerator { block_chance: f32 },
    /// Speed boost while below a health fraction
    AdrenalineRush { trigger_fraction: f32, boost: f32 },
    /// Chance for weapons to fire a delayed echo shot
    DoubleTap { chance: f32 },
    /// Enemies may drop health pickups
    BloodPact { drop_chance: f32, heal_amount: f32 },
}

/// What buying the item does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    AddLuck(f32),
    AddSpeed(f32),
    MulSpeed(f32),
    AddHealth(f32),
    MulDamage(f32),
    AddCritChance(f32),
    AddCrit { chance: f32, damage: f32 },
    MulFireRate(f32),
    AddRegen(f32),
    AddPickupRange(f32),
    MulPickupRange(f32),
    /// Coffee shot: both multiplicative
    MulSpeedAndFireRate { speed: f32, fire_rate: f32 },
    /// Heavy rounds: more damage, slower trigger
    MulDamageAndFireRate { damage: f32, fire_rate: f32 },
    /// Glass cannon trade-off
    MulDamageAndHealth { damage: f32, health: f32 },
    /// No purchase-time stat change; grants a capability in combat
    Grant(Capability),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub cost: u32,
    pub max_stacks: u32,
    /// Bounce house overrides the tiered stack-cost multiplier
    pub stack_cost_multiplier: Option<f32>,
    pub effect: ItemEffect,
}

pub(super) fn default_defs() -> Vec<(ItemId, ItemDef)> {
    use Capability as Cap;
    use ItemEffect::*;
    use ItemId::*;
    vec![
        (
            BounceHouse,
            ItemDef {
                cost: 500,
                max_stacks: 10,
                stack_cost_multiplier: Some(2.0),
                effect: Grant(Cap::BounceHouse { bounces_per_stack: 1 }),
            },
        ),
        (
            Vampiric,
            ItemDef {
                cost: 4000,
                max_stacks: 1,
                stack_cost_multiplier: None,
                effect: Grant(Cap::Vampiric { heal_per_kills: 1, heal_amount: 0.1 }),
            },
        ),
        (MoneyMagnet, ItemDef { cost: 150, max_stacks: 1, stack_cost_multiplier: None, effect: MulPickupRange(2.0) }),
        (LuckyPenny, ItemDef { cost: 200, max_stacks: 1, stack_cost_multiplier: None, effect: AddLuck(10.0) }),
        (SpeedBoots, ItemDef { cost: 163, max_stacks: 1, stack_cost_multiplier: None, effect: MulSpeed(1.3) }),
        (
            SharpShooter,
            ItemDef {
                cost: 350,
                max_stacks: 1,
                stack_cost_multiplier: None,
                effect: AddCrit { chance: 20.0, damage: 50.0 },
            },
        ),
        (TankArmor, ItemDef { cost: 450, max_stacks: 1, stack_cost_multiplier: None, effect: AddHealth(5.0) }),
        (RapidReload, ItemDef { cost: 1000, max_stacks: 1, stack_cost_multiplier: None, effect: MulFireRate(1.5) }),
        (
            ExplosiveRounds,
            ItemDef {
                cost: 13000,
                max_stacks: 1,
                stack_cost_multiplier: None,
                effect: Grant(Cap::ExplosiveRounds { radius: 30.0, damage_fraction: 0.3 }),
            },
        ),
        (
            LifeSteal,
            ItemDef {
                cost: 10000,
                max_stacks: 1,
                stack_cost_multiplier: None,
                effect: Grant(Cap::LifeSteal { fraction: 0.05 }),
            },
        ),
        (LuckyCoin, ItemDef { cost: 15, max_stacks: 10, stack_cost_multiplier: None, effect: AddLuck(0.5) }),
        (EnergyDrink, ItemDef { cost: 18, max_stacks: 10, stack_cost_multiplier: None, effect: AddSpeed(3.0) }),
        (ProteinBar, ItemDef { cost: 20, max_stacks: 10, stack_cost_multiplier: None, effect: AddHealth(0.2) }),
        (SharpTips, ItemDef { cost: 22, max_stacks: 10, stack_cost_multiplier: None, effect: MulDamage(1.02) }),
        (QuickHands, ItemDef { cost: 50, max_stacks: 10, stack_cost_multiplier: None, effect: MulFireRate(1.03) }),
        (BandaidPack, ItemDef { cost: 250, max_stacks: 10, stack_cost_multiplier: None, effect: AddRegen(0.001) }),
        (
            CoffeeShot,
            ItemDef {
                cost: 90,
                max_stacks: 10,
                stack_cost_multiplier: None,
                effect: MulSpeedAndFireRate { speed: 1.05, fire_rate: 1.05 },
            },
        ),
        (MagnetGloves, ItemDef { cost: 100, max_stacks: 1, stack_cost_multiplier: None, effect: AddPickupRange(20.0) }),
        (CriticalEye, ItemDef { cost: 110, max_stacks: 1, stack_cost_multiplier: None, effect: AddCritChance(10.0) }),
        (
            HeavyRounds,
            ItemDef {
                cost: 230,
                max_stacks: 1,
                stack_cost_multiplier: None,
                effect: MulDamageAndFireRate { damage: 1.25, fire_rate: 0.9 },
            },
        ),
        (
            ShieldGenerator,
            ItemDef {
                cost: 280,
                max_stacks: 1,
                stack_cost_multiplier: None,
                effect: Grant(Cap::ShieldGenerator { block_chance: 15.0 }),
            },
        ),
        (
            AdrenalineRush,
            ItemDef {
                cost: 330,
                max_stacks: 1,
                stack_cost_multiplier: None,
                effect: Grant(Cap::AdrenalineRush { trigger_fraction: 0.3, boost: 0.3 }),
            },
        ),
        (
            DoubleTap,
            ItemDef {
                cost: 600,
                max_stacks: 1,
                stack_cost_multiplier: None,
                effect: Grant(Cap::DoubleTap { chance: 0.2 }),
            },
        ),
        (
            BloodPact,
            ItemDef {
                cost: 8500,
                max_stacks: 1,
                stack_cost_multiplier: None,
                effect: Grant(Cap::BloodPact { drop_chance: 0.3, heal_amount: 0.5 }),
            },
        ),
        (
            GlassCannon,
            ItemDef {
                cost: 1500,
                max_stacks: 1,
                stack_cost_multiplier: None,
                effect: MulDamageAndHealth { damage: 2.0, health: 0.5 },
            },
        ),
    ]
}
