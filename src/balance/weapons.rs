//! Weapon definitions and per-level upgrade tables.

use serde::{Deserialize, Serialize};

/// All purchasable weapons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Pistol,
    Shotgun,
    Smg,
    RocketLauncher,
    LaserBeam,
    Ricochet,
    WaveGun,
    BurstRifle,
    OrbitalCannon,
    NovaBurst,
    ChainLightning,
    Boomerang,
    GravityWell,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 13] = [
        WeaponKind::Pistol,
        WeaponKind::Shotgun,
        WeaponKind::Smg,
        WeaponKind::RocketLauncher,
        WeaponKind::LaserBeam,
        WeaponKind::Ricochet,
        WeaponKind::WaveGun,
        WeaponKind::BurstRifle,
        WeaponKind::OrbitalCannon,
        WeaponKind::NovaBurst,
        WeaponKind::ChainLightning,
        WeaponKind::Boomerang,
        WeaponKind::GravityWell,
    ];
}

/// Discrete trait unlocked or scaled by weapon level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponSpecial {
    /// Pistol: +5px auto-aim radius per level
    Accuracy,
    /// Shotgun: 15% tighter cone per level
    TighterSpread,
    /// SMG: pierces at level 3+
    Penetration,
    /// Rocket launcher: two rockets at level 4
    MultiRocket,
    /// Laser: wider beam visual per level
    BeamWidth,
    /// Ricochet: flagged for smart targeting
    SmartBounce,
    /// Wave gun: more oscillations
    Frequency,
    /// Burst rifle: 25% tighter grouping per level
    Precision,
    /// Orbital cannon: spiral pattern at level 3+
    Spiral,
    /// Nova burst: explosive rounds at level 4
    ExplosiveNova,
    /// Chain lightning: forks at level 4
    Fork,
    /// Boomerang: 30% faster return per level
    ReturnSpeed,
    /// Gravity well: damage over time at level 3+
    WellDamage,
}

/// Chain lightning parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChainParams {
    pub jumps: u32,
    pub range: f32,
    pub damage_decay: f32,
}

/// Gravity well parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WellParams {
    pub duration: f32,
    pub radius: f32,
    pub strength: f32,
    /// Outbound travel time before the orb anchors
    pub travel_time: f32,
}

/// Static definition of one weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponDef {
    pub cost: u32,
    /// Base shots per second, multiplied by the player's fire-rate stat
    pub fire_rate: f32,
    /// Multiplier of the player's damage stat
    pub damage_multiplier: f32,
    pub projectile_count: u32,
    /// Cone width in radians (fan or random jitter depending on weapon)
    pub spread: f32,
    pub piercing: bool,
    pub max_bounces: u32,
    pub aoe_radius: f32,
    /// Burst weapons: seconds between shots inside one burst
    pub burst_delay: f32,
    pub chain: Option<ChainParams>,
    pub boomerang_distance: f32,
    pub well: Option<WellParams>,
}

impl Default for WeaponDef {
    fn default() -> Self {
        Self {
            cost: 25,
            fire_rate: 1.0,
            damage_multiplier: 1.0,
            projectile_count: 1,
            spread: 0.0,
            piercing: false,
            max_bounces: 0,
            aoe_radius: 0.0,
            burst_delay: 0.0,
            chain: None,
            boomerang_distance: 0.0,
            well: None,
        }
    }
}

/// Per-level upgrade deltas, applied as `base + delta * (level - 1)`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponUpgrade {
    pub damage: f32,
    pub projectile_count: f32,
    pub aoe_radius: f32,
    pub bounces: u32,
    pub chain_jumps: u32,
    pub chain_range: f32,
    pub boomerang_distance: f32,
    pub special: Option<WeaponSpecial>,
}

pub(super) fn default_defs() -> Vec<(WeaponKind, WeaponDef, WeaponUpgrade)> {
    use std::f32::consts::PI;
    use WeaponKind::*;
    vec![
        (
            Pistol,
            WeaponDef { cost: 25, fire_rate: 1.0, damage_multiplier: 1.0, ..Default::default() },
            WeaponUpgrade { damage: 0.25, special: Some(WeaponSpecial::Accuracy), ..Default::default() },
        ),
        (
            Shotgun,
            WeaponDef {
                cost: 50,
                fire_rate: 0.2,
                damage_multiplier: 3.0,
                projectile_count: 4,
                spread: PI / 4.0,
                piercing: true,
                ..Default::default()
            },
            WeaponUpgrade {
                damage: 0.2,
                projectile_count: 1.0,
                special: Some(WeaponSpecial::TighterSpread),
                ..Default::default()
            },
        ),
        (
            Smg,
            WeaponDef {
                cost: 120,
                fire_rate: 8.0,
                damage_multiplier: 0.25,
                spread: PI / 12.0,
                ..Default::default()
            },
            WeaponUpgrade { damage: 0.15, special: Some(WeaponSpecial::Penetration), ..Default::default() },
        ),
        (
            RocketLauncher,
            WeaponDef {
                cost: 500,
                fire_rate: 0.19,
                damage_multiplier: 15.0,
                aoe_radius: 100.0,
                ..Default::default()
            },
            WeaponUpgrade {
                damage: 0.3,
                aoe_radius: 15.0,
                special: Some(WeaponSpecial::MultiRocket),
                ..Default::default()
            },
        ),
        (
            LaserBeam,
            WeaponDef { cost: 300, fire_rate: 40.0, damage_multiplier: 0.1, piercing: true, ..Default::default() },
            WeaponUpgrade { damage: 0.2, special: Some(WeaponSpecial::BeamWidth), ..Default::default() },
        ),
        (
            Ricochet,
            WeaponDef { cost: 175, fire_rate: 2.0, damage_multiplier: 1.2, max_bounces: 7, ..Default::default() },
            WeaponUpgrade {
                damage: 0.15,
                bounces: 2,
                special: Some(WeaponSpecial::SmartBounce),
                ..Default::default()
            },
        ),
        (
            WaveGun,
            WeaponDef {
                cost: 180,
                fire_rate: 1.5,
                damage_multiplier: 2.25,
                projectile_count: 3,
                piercing: true,
                ..Default::default()
            },
            WeaponUpgrade { special: Some(WeaponSpecial::Frequency), ..Default::default() },
        ),
        (
            BurstRifle,
            WeaponDef {
                cost: 125,
                fire_rate: 1.2,
                damage_multiplier: 3.5,
                projectile_count: 3,
                spread: PI / 24.0,
                burst_delay: 0.08,
                ..Default::default()
            },
            WeaponUpgrade { damage: 0.2, special: Some(WeaponSpecial::Precision), ..Default::default() },
        ),
        (
            OrbitalCannon,
            WeaponDef {
                cost: 400,
                fire_rate: 0.5,
                damage_multiplier: 8.5,
                projectile_count: 8,
                spread: PI * 2.0,
                ..Default::default()
            },
            WeaponUpgrade { damage: 0.15, special: Some(WeaponSpecial::Spiral), ..Default::default() },
        ),
        (
            NovaBurst,
            WeaponDef {
                cost: 300,
                fire_rate: 1.2,
                damage_multiplier: 1.5,
                projectile_count: 10,
                spread: PI * 2.0,
                piercing: true,
                ..Default::default()
            },
            WeaponUpgrade { damage: 0.1, special: Some(WeaponSpecial::ExplosiveNova), ..Default::default() },
        ),
        (
            ChainLightning,
            WeaponDef {
                cost: 2000,
                fire_rate: 1.8,
                damage_multiplier: 2.4,
                chain: Some(ChainParams { jumps: 3, range: 60.0, damage_decay: 0.75 }),
                ..Default::default()
            },
            WeaponUpgrade {
                chain_jumps: 1,
                chain_range: 20.0,
                special: Some(WeaponSpecial::Fork),
                ..Default::default()
            },
        ),
        (
            Boomerang,
            WeaponDef {
                cost: 65,
                fire_rate: 0.7,
                damage_multiplier: 2.2,
                boomerang_distance: 200.0,
                ..Default::default()
            },
            WeaponUpgrade {
                boomerang_distance: 50.0,
                special: Some(WeaponSpecial::ReturnSpeed),
                ..Default::default()
            },
        ),
        (
            GravityWell,
            WeaponDef {
                cost: 800,
                fire_rate: 0.5,
                damage_multiplier: 0.0,
                well: Some(WellParams {
                    duration: 4.0,
                    radius: 120.0,
                    strength: 200.0,
                    travel_time: 1.0,
                }),
                ..Default::default()
            },
            WeaponUpgrade { special: Some(WeaponSpecial::WellDamage), ..Default::default() },
        ),
    ]
}
