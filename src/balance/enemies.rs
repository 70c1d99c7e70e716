//! Enemy archetype definitions and per-wave stat scaling.

use serde::{Deserialize, Serialize};

/// Enemy archetypes. Each kind carries exactly one movement behavior,
/// dispatched by enum match in the AI update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Straight line, bounces off arena walls
    Basic,
    /// Steers toward the player every frame, no inertia
    Tracker,
    /// Random walk, chases at 1.5x speed inside its aggro radius
    Tank,
    /// Bounces while firing tracked shots at the player
    Shooter,
    /// Sinusoidal flier, crosses the arena and leaves
    Wave,
    /// Slow bruiser that shoots and spawns wave minions
    Boss,
    /// Very fast straight-line crosser
    Zoomer,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 7] = [
        EnemyKind::Basic,
        EnemyKind::Tracker,
        EnemyKind::Tank,
        EnemyKind::Shooter,
        EnemyKind::Wave,
        EnemyKind::Boss,
        EnemyKind::Zoomer,
    ];
}

/// Projectile parameters for shooting enemies (shooter, boss)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyShot {
    pub cooldown: f32,
    pub speed: f32,
    pub damage: f32,
    pub size: f32,
    pub max_bounces: u32,
}

/// Sine-motion parameters for wave enemies
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaveMotion {
    /// Wave height in pixels
    pub amplitude: f32,
    /// Complete oscillations across the canvas width
    pub frequency: f32,
    pub group_min: u32,
    pub group_max: u32,
    /// Per-instance multiplier bounds applied to amplitude and frequency
    pub variation_min: f32,
    pub variation_max: f32,
}

/// Static definition of one enemy archetype. Stats scale linearly with the
/// wave the enemy spawns in; see [`EnemyDef::stats_for_wave`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyDef {
    pub size: f32,
    pub base_health: f32,
    pub health_per_wave: f32,
    pub base_speed: f32,
    pub speed_per_wave: f32,
    pub base_damage: f32,
    pub damage_per_wave: f32,
    pub base_xp: f32,
    pub xp_per_wave: f32,
    pub money_drop_chance: f32,
    pub money_value: f32,
    /// Tank: distance at which it starts chasing
    pub aggro_radius: f32,
    /// Shooter/boss projectile, if this kind fires
    pub shot: Option<EnemyShot>,
    /// Boss: seconds between minion spawns
    pub minion_cooldown: f32,
    /// Wave-kind motion parameters
    pub wave_motion: Option<WaveMotion>,
}

impl Default for EnemyDef {
    fn default() -> Self {
        Self {
            size: 15.0,
            base_health: 1.0,
            health_per_wave: 0.0,
            base_speed: 80.0,
            speed_per_wave: 0.0,
            base_damage: 1.0,
            damage_per_wave: 0.0,
            base_xp: 10.0,
            xp_per_wave: 0.0,
            money_drop_chance: 0.3,
            money_value: 3.0,
            aggro_radius: 0.0,
            shot: None,
            minion_cooldown: 0.0,
            wave_motion: None,
        }
    }
}

/// Wave-frozen stats derived from an [`EnemyDef`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health: f32,
    pub speed: f32,
    pub damage: f32,
    pub xp: f32,
    pub money_drop_chance: f32,
    pub money_value: f32,
}

impl EnemyDef {
    /// Linear scaling: `base + (wave - 1) * per_wave`. Computed once at
    /// spawn; a wave-N enemy keeps wave-N stats for its whole life.
    pub fn stats_for_wave(&self, wave: u32) -> EnemyStats {
        let w = wave.saturating_sub(1) as f32;
        EnemyStats {
            health: self.base_health + w * self.health_per_wave,
            speed: self.base_speed + w * self.speed_per_wave,
            damage: self.base_damage + w * self.damage_per_wave,
            xp: self.base_xp + w * self.xp_per_wave,
            money_drop_chance: self.money_drop_chance,
            money_value: self.money_value,
        }
    }
}

pub(super) fn default_defs() -> [(EnemyKind, EnemyDef); 7] {
    [
        (
            EnemyKind::Basic,
            EnemyDef {
                size: 15.0,
                base_health: 0.8,
                health_per_wave: 0.05,
                base_speed: 70.0,
                speed_per_wave: 3.0,
                base_damage: 0.8,
                damage_per_wave: 0.15,
                base_xp: 10.0,
                xp_per_wave: 2.0,
                money_drop_chance: 0.3,
                money_value: 3.0,
                ..Default::default()
            },
        ),
        (
            EnemyKind::Tracker,
            EnemyDef {
                size: 12.0,
                base_health: 0.7,
                health_per_wave: 0.3,
                base_speed: 45.0,
                speed_per_wave: 1.5,
                base_damage: 0.8,
                damage_per_wave: 0.08,
                base_xp: 5.0,
                xp_per_wave: 1.0,
                money_drop_chance: 0.2,
                money_value: 5.0,
                ..Default::default()
            },
        ),
        (
            EnemyKind::Tank,
            EnemyDef {
                size: 30.0,
                base_health: 40.0,
                health_per_wave: 20.0,
                base_speed: 35.0,
                speed_per_wave: 0.8,
                base_damage: 4.0,
                damage_per_wave: 0.3,
                base_xp: 30.0,
                xp_per_wave: 5.0,
                money_drop_chance: 0.9,
                money_value: 20.0,
                aggro_radius: 150.0,
                ..Default::default()
            },
        ),
        (
            EnemyKind::Shooter,
            EnemyDef {
                size: 14.0,
                base_health: 0.7,
                health_per_wave: 0.5,
                base_speed: 90.0,
                speed_per_wave: 2.0,
                base_damage: 0.4,
                damage_per_wave: 0.08,
                base_xp: 15.0,
                xp_per_wave: 3.0,
                money_drop_chance: 0.4,
                money_value: 8.0,
                shot: Some(EnemyShot {
                    cooldown: 1.5,
                    speed: 150.0,
                    damage: 0.2,
                    size: 4.0,
                    max_bounces: 8,
                }),
                ..Default::default()
            },
        ),
        (
            EnemyKind::Wave,
            EnemyDef {
                size: 8.0,
                base_health: 0.3,
                health_per_wave: 0.25,
                base_speed: 120.0,
                speed_per_wave: 3.0,
                base_damage: 0.2,
                damage_per_wave: 0.05,
                base_xp: 3.0,
                xp_per_wave: 1.0,
                money_drop_chance: 0.1,
                money_value: 20.0,
                wave_motion: Some(WaveMotion {
                    amplitude: 90.0,
                    frequency: 10.0,
                    group_min: 2,
                    group_max: 10,
                    variation_min: 0.9,
                    variation_max: 1.1,
                }),
                ..Default::default()
            },
        ),
        (
            EnemyKind::Boss,
            EnemyDef {
                size: 50.0,
                base_health: 100.0,
                health_per_wave: 80.0,
                base_speed: 25.0,
                speed_per_wave: 0.3,
                base_damage: 5.0,
                damage_per_wave: 1.0,
                base_xp: 100.0,
                xp_per_wave: 20.0,
                money_drop_chance: 1.0,
                money_value: 250.0,
                shot: Some(EnemyShot {
                    cooldown: 0.8,
                    speed: 120.0,
                    damage: 1.0,
                    size: 8.0,
                    max_bounces: 20,
                }),
                minion_cooldown: 3.0,
                ..Default::default()
            },
        ),
        (
            EnemyKind::Zoomer,
            EnemyDef {
                size: 8.0,
                base_health: 0.8,
                health_per_wave: 0.4,
                base_speed: 300.0,
                speed_per_wave: 5.0,
                base_damage: 1.5,
                damage_per_wave: 0.2,
                base_xp: 50.0,
                xp_per_wave: 10.0,
                money_drop_chance: 1.0,
                money_value: 13.0,
                ..Default::default()
            },
        ),
    ]
}

/// Weighted enemy-kind distributions per wave. Weights need not sum to 1;
/// selection walks the cumulative sum and falls back to basic.
pub(super) fn default_distributions() -> Vec<(u32, Vec<(EnemyKind, f32)>)> {
    use EnemyKind::*;
    vec![
        (1, vec![(Basic, 0.6), (Tracker, 0.4)]),
        (2, vec![(Basic, 0.85), (Tracker, 0.15)]),
        (3, vec![(Basic, 0.5), (Tracker, 0.45), (Zoomer, 0.05)]),
        (4, vec![(Basic, 0.7), (Tracker, 0.2), (Zoomer, 0.1)]),
        (5, vec![(Basic, 0.6), (Tracker, 0.3), (Zoomer, 0.08), (Tank, 0.02)]),
        (6, vec![(Basic, 0.5), (Tracker, 0.3), (Tank, 0.03), (Zoomer, 0.07), (Wave, 0.1)]),
        (7, vec![(Basic, 0.45), (Tracker, 0.3), (Tank, 0.04), (Shooter, 0.08), (Zoomer, 0.03), (Wave, 0.1)]),
        (8, vec![(Basic, 0.4), (Tracker, 0.35), (Tank, 0.05), (Shooter, 0.1), (Zoomer, 0.05), (Wave, 0.05)]),
        (9, vec![(Basic, 0.38), (Tracker, 0.35), (Tank, 0.05), (Shooter, 0.12), (Zoomer, 0.05), (Wave, 0.05)]),
        (10, vec![(Basic, 0.35), (Tracker, 0.35), (Tank, 0.06), (Shooter, 0.15), (Zoomer, 0.05), (Wave, 0.03), (Boss, 0.01)]),
        (11, vec![(Basic, 0.35), (Tracker, 0.35), (Tank, 0.05), (Shooter, 0.15), (Zoomer, 0.03), (Wave, 0.07)]),
        (12, vec![(Basic, 0.33), (Tracker, 0.35), (Tank, 0.06), (Shooter, 0.16), (Zoomer, 0.03), (Wave, 0.07)]),
        (13, vec![(Basic, 0.32), (Tracker, 0.34), (Tank, 0.06), (Shooter, 0.18), (Zoomer, 0.03), (Wave, 0.07)]),
        (14, vec![(Basic, 0.3), (Tracker, 0.34), (Tank, 0.07), (Shooter, 0.19), (Zoomer, 0.03), (Wave, 0.07)]),
        (15, vec![(Basic, 0.3), (Tracker, 0.33), (Tank, 0.07), (Shooter, 0.2), (Zoomer, 0.04), (Wave, 0.05), (Boss, 0.01)]),
        (16, vec![(Basic, 0.3), (Tracker, 0.32), (Tank, 0.07), (Shooter, 0.21), (Zoomer, 0.03), (Wave, 0.07)]),
        (17, vec![(Basic, 0.28), (Tracker, 0.32), (Tank, 0.08), (Shooter, 0.22), (Zoomer, 0.03), (Wave, 0.07)]),
        (18, vec![(Basic, 0.28), (Tracker, 0.31), (Tank, 0.08), (Shooter, 0.23), (Zoomer, 0.03), (Wave, 0.07)]),
        (19, vec![(Basic, 0.27), (Tracker, 0.31), (Tank, 0.08), (Shooter, 0.24), (Zoomer, 0.03), (Wave, 0.07)]),
        (20, vec![(Basic, 0.25), (Tracker, 0.3), (Tank, 0.09), (Shooter, 0.22), (Zoomer, 0.05), (Wave, 0.07), (Boss, 0.02)]),
        (21, vec![(Basic, 0.25), (Tracker, 0.32), (Tank, 0.08), (Shooter, 0.25), (Zoomer, 0.03), (Wave, 0.07)]),
        (22, vec![(Basic, 0.25), (Tracker, 0.31), (Tank, 0.08), (Shooter, 0.26), (Zoomer, 0.03), (Wave, 0.07)]),
        (23, vec![(Basic, 0.24), (Tracker, 0.31), (Tank, 0.09), (Shooter, 0.26), (Zoomer, 0.03), (Wave, 0.07)]),
        (24, vec![(Basic, 0.24), (Tracker, 0.30), (Tank, 0.09), (Shooter, 0.27), (Zoomer, 0.03), (Wave, 0.07)]),
        (25, vec![(Basic, 0.23), (Tracker, 0.30), (Tank, 0.09), (Shooter, 0.27), (Zoomer, 0.03), (Wave, 0.07), (Boss, 0.01)]),
        (26, vec![(Basic, 0.23), (Tracker, 0.29), (Tank, 0.09), (Shooter, 0.28), (Zoomer, 0.04), (Wave, 0.07)]),
        (27, vec![(Basic, 0.22), (Tracker, 0.29), (Tank, 0.1), (Shooter, 0.28), (Zoomer, 0.04), (Wave, 0.07)]),
        (28, vec![(Basic, 0.22), (Tracker, 0.28), (Tank, 0.1), (Shooter, 0.29), (Zoomer, 0.04), (Wave, 0.07)]),
        (29, vec![(Basic, 0.21), (Tracker, 0.28), (Tank, 0.1), (Shooter, 0.30), (Zoomer, 0.04), (Wave, 0.07)]),
        (30, vec![(Basic, 0.2), (Tracker, 0.27), (Tank, 0.11), (Shooter, 0.28), (Zoomer, 0.04), (Wave, 0.07), (Boss, 0.03)]),
    ]
}

pub(super) fn default_fallback_distribution() -> Vec<(EnemyKind, f32)> {
    use EnemyKind::*;
    vec![
        (Basic, 0.25),
        (Tracker, 0.3),
        (Tank, 0.08),
        (Shooter, 0.25),
        (Zoomer, 0.04),
        (Wave, 0.08),
    ]
}
