//! Weapon firing: cooldowns, level-resolved stats, and one fire pattern
//! per weapon kind.
//!
//! Weapons fire autonomously while at least one enemy is alive. Item
//! effects (bounce house, explosive rounds) are read from the player at
//! fire time rather than baked into the weapon tables, so buying an item
//! mid-run changes the very next shot.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::projectile::{
    nearest_enemy, BoomerangState, ExplosiveCharge, HomingState, Owner, Projectile,
    WaveMotionState, WellState,
};
use super::state::{GameEvent, GameState};
use crate::balance::{BalanceConfig, Capability, ChainParams, WeaponKind, WeaponSpecial, WellParams};
use crate::normalize_angle;

/// Per-weapon combat state. The static definition stays in the balance
/// tables; this carries only what changes while playing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponState {
    pub kind: WeaponKind,
    pub level: u32,
    pub cooldown: f32,
    /// Burst rifle: shots left in the current burst
    pub burst_left: u32,
    pub burst_timer: f32,
    /// Queued double-tap echo, seconds until it fires
    pub echo_timer: Option<f32>,
}

impl WeaponState {
    pub fn new(kind: WeaponKind, level: u32) -> Self {
        Self { kind, level, cooldown: 0.0, burst_left: 0, burst_timer: 0.0, echo_timer: None }
    }
}

/// Weapon stats with all level scaling folded in
#[derive(Debug, Clone)]
pub struct ResolvedWeapon {
    pub fire_rate: f32,
    pub damage_mult: f32,
    pub count: u32,
    pub spread: f32,
    pub piercing: bool,
    pub max_bounces: u32,
    pub aoe_radius: f32,
    pub burst_delay: f32,
    pub auto_aim_bonus: f32,
    pub chain: Option<ChainParams>,
    pub boomerang_distance: f32,
    pub return_speed: f32,
    /// Well parameters and damage per second (unlocked at level 3)
    pub well: Option<(WellParams, f32)>,
    pub smart_bounce: bool,
}

/// Fold per-level deltas and discrete specials into the base definition
pub fn resolve(kind: WeaponKind, level: u32, balance: &BalanceConfig) -> ResolvedWeapon {
    let (def, up) = balance.weapon(kind);
    let steps = level.saturating_sub(1);
    let l = steps as f32;

    let mut r = ResolvedWeapon {
        fire_rate: def.fire_rate,
        damage_mult: def.damage_multiplier + up.damage * l,
        count: def.projectile_count + (up.projectile_count * l) as u32,
        spread: def.spread,
        piercing: def.piercing,
        max_bounces: def.max_bounces + up.bounces * steps,
        aoe_radius: def.aoe_radius + up.aoe_radius * l,
        burst_delay: def.burst_delay,
        auto_aim_bonus: 0.0,
        chain: def.chain.map(|c| ChainParams {
            jumps: c.jumps + up.chain_jumps * steps,
            range: c.range + up.chain_range * l,
            damage_decay: c.damage_decay,
        }),
        boomerang_distance: def.boomerang_distance + up.boomerang_distance * l,
        return_speed: 1.0,
        well: def.well.map(|w| (w, 0.0)),
        smart_bounce: false,
    };

    match up.special {
        Some(WeaponSpecial::Accuracy) => r.auto_aim_bonus = 5.0 * l,
        Some(WeaponSpecial::TighterSpread) => r.spread *= 0.85f32.powf(l),
        Some(WeaponSpecial::Penetration) if level >= 3 => r.piercing = true,
        Some(WeaponSpecial::MultiRocket) if level >= 4 => r.count = 2,
        Some(WeaponSpecial::Precision) => r.spread *= 0.75f32.powf(l),
        Some(WeaponSpecial::SmartBounce) => r.smart_bounce = true,
        Some(WeaponSpecial::ReturnSpeed) => r.return_speed = 1.0 + 0.3 * l,
        Some(WeaponSpecial::WellDamage) if level >= 3 => {
            if let Some((_, dps)) = &mut r.well {
                *dps = 0.5;
            }
        }
        _ => {}
    }

    r
}

/// Advance every weapon by one timestep
pub fn update_weapons(state: &mut GameState, dt: f32, balance: &BalanceConfig) {
    let mut weapons = std::mem::take(&mut state.weapons);
    for weapon in &mut weapons {
        weapon.update(dt, state, balance);
    }
    state.weapons = weapons;
}

impl WeaponState {
    fn update(&mut self, dt: f32, state: &mut GameState, balance: &BalanceConfig) {
        let stats = resolve(self.kind, self.level, balance);
        self.cooldown -= dt;
        self.burst_timer -= dt;
        let has_targets = state.enemies.iter().any(|e| e.alive);

        // Queued double-tap echo; fires only if enemies still exist
        if let Some(t) = &mut self.echo_timer {
            *t -= dt;
            if *t <= 0.0 {
                self.echo_timer = None;
                if has_targets {
                    fire(self.kind, &stats, state, balance);
                }
            }
        }

        if self.cooldown <= 0.0 && has_targets {
            if self.kind == WeaponKind::BurstRifle {
                self.burst_left = stats.count;
                self.burst_timer = 0.0;
            } else {
                fire(self.kind, &stats, state, balance);
                if let Some(chance) = state.player.double_tap_chance()
                    && state.rng.random::<f32>() < chance
                {
                    self.echo_timer = Some(0.05);
                }
            }
            self.cooldown = 1.0 / (stats.fire_rate * state.player.fire_rate);
        }

        // A started burst plays out even if the arena empties mid-burst
        if self.burst_left > 0 && self.burst_timer <= 0.0 {
            fire_burst_shot(&stats, state, balance);
            self.burst_left -= 1;
            self.burst_timer = stats.burst_delay;
        }
    }
}

/// Integer damage for one shot: `max(1, floor(player damage * multiplier))`
fn shot_damage(state: &GameState, stats: &ResolvedWeapon) -> f32 {
    (state.player.damage * stats.damage_mult).floor().max(1.0)
}

/// How a weapon participates in the bounce house item
enum BounceRule {
    /// One bounce per stack
    Full,
    /// Half the stack bounces (shotgun pellets)
    Half,
    /// Flat budget regardless of stacks (radial patterns)
    Flat,
    None,
}

fn apply_items(
    p: &mut Projectile,
    state: &GameState,
    balance: &BalanceConfig,
    bounce: BounceRule,
    explosion_radius_scale: Option<f32>,
) {
    if state.player.bounce_house_stacks > 0 {
        let per_stack = state
            .player
            .caps
            .iter()
            .find_map(|c| match c {
                Capability::BounceHouse { bounces_per_stack } => Some(*bounces_per_stack),
                _ => None,
            })
            .unwrap_or(0);
        let full = per_stack * state.player.bounce_house_stacks;
        match bounce {
            BounceRule::Full => p.max_bounces = full,
            BounceRule::Half => p.max_bounces = full / 2,
            BounceRule::Flat => p.max_bounces = balance.projectile.bounce_house_max_bounces,
            BounceRule::None => {}
        }
    }

    if let Some(scale) = explosion_radius_scale
        && let Some((radius, fraction)) = state.player.explosive_rounds()
    {
        p.explosive = Some(ExplosiveCharge { radius: radius * scale, damage: p.damage * fraction });
    }
}

fn fire(kind: WeaponKind, stats: &ResolvedWeapon, state: &mut GameState, balance: &BalanceConfig) {
    match kind {
        WeaponKind::Pistol => fire_pistol(stats, state, balance),
        WeaponKind::Shotgun => fire_shotgun(stats, state, balance),
        WeaponKind::Smg => fire_smg(stats, state, balance),
        WeaponKind::RocketLauncher => fire_rockets(stats, state, balance),
        WeaponKind::LaserBeam => fire_laser(stats, state, balance),
        WeaponKind::Ricochet => fire_ricochet(stats, state, balance),
        WeaponKind::WaveGun => fire_wave_gun(stats, state, balance),
        // Burst shots run through the burst path in update
        WeaponKind::BurstRifle => return,
        WeaponKind::OrbitalCannon => fire_orbital(stats, state, balance),
        WeaponKind::NovaBurst => fire_nova(stats, state, balance),
        WeaponKind::ChainLightning => {
            // Sound only when the chain actually connects
            if fire_chain(stats, state) {
                state.push_event(GameEvent::WeaponFired(kind));
            }
            return;
        }
        WeaponKind::Boomerang => fire_boomerang(stats, state, balance),
        WeaponKind::GravityWell => fire_well(stats, state, balance),
    }
    state.push_event(GameEvent::WeaponFired(kind));
}

fn fire_pistol(stats: &ResolvedWeapon, state: &mut GameState, balance: &BalanceConfig) {
    let damage = shot_damage(state, stats);
    let mut p = Projectile::new(
        Owner::Player,
        state.player.pos,
        state.player.aim_angle,
        balance.projectile.base_speed,
        balance.projectile.base_size,
        damage,
    );
    p.auto_aim_radius = 25.0 + stats.auto_aim_bonus;
    apply_items(&mut p, state, balance, BounceRule::Full, Some(1.0));
    state.add_projectile(p);
}

fn fire_shotgun(stats: &ResolvedWeapon, state: &mut GameState, balance: &BalanceConfig) {
    let damage = shot_damage(state, stats);
    let count = stats.count.max(2);
    for i in 0..count {
        let offset = (i as f32 - (count - 1) as f32 / 2.0) * stats.spread / (count - 1) as f32;
        let speed = balance.projectile.base_speed * (0.8 + state.rng.random::<f32>() * 0.4);
        let mut p = Projectile::new(
            Owner::Player,
            state.player.pos,
            state.player.aim_angle + offset,
            speed,
            balance.projectile.base_size,
            damage,
        );
        p.piercing = true;
        apply_items(&mut p, state, balance, BounceRule::Half, Some(0.5));
        state.add_projectile(p);
    }
}

fn fire_smg(stats: &ResolvedWeapon, state: &mut GameState, balance: &BalanceConfig) {
    let damage = shot_damage(state, stats);
    let jitter = (state.rng.random::<f32>() - 0.5) * stats.spread;
    let mut p = Projectile::new(
        Owner::Player,
        state.player.pos,
        state.player.aim_angle + jitter,
        balance.projectile.base_speed,
        3.0,
        damage,
    );
    p.piercing = stats.piercing;
    apply_items(&mut p, state, balance, BounceRule::Full, Some(0.3));
    state.add_projectile(p);
}

fn fire_rockets(stats: &ResolvedWeapon, state: &mut GameState, balance: &BalanceConfig) {
    let damage = shot_damage(state, stats);
    let target = nearest_enemy(state.player.pos, &state.enemies, f32::INFINITY)
        .map(|e| (e.id, e.pos));

    let count = stats.count.max(1);
    for i in 0..count {
        let mut angle = match target {
            Some((_, pos)) => {
                let to = pos - state.player.pos;
                to.y.atan2(to.x)
            }
            None => state.player.aim_angle,
        };
        if count > 1 {
            angle += (i as f32 - (count - 1) as f32 / 2.0) * 0.15;
        }
        let mut p = Projectile::new(
            Owner::Player,
            state.player.pos,
            angle,
            balance.projectile.base_speed * 0.7,
            10.0,
            damage,
        );
        // Full damage inside the blast
        p.explosive = Some(ExplosiveCharge { radius: stats.aoe_radius, damage });
        p.homing = Some(HomingState { target: target.map(|(id, _)| id), strength: 4.0 });
        p.max_bounces = 0;
        state.add_projectile(p);
    }
}

fn fire_laser(stats: &ResolvedWeapon, state: &mut GameState, balance: &BalanceConfig) {
    let damage = shot_damage(state, stats);
    let mut p = Projectile::new(
        Owner::Player,
        state.player.pos,
        state.player.aim_angle,
        balance.projectile.base_speed * 3.0,
        2.0,
        damage,
    );
    p.piercing = true;
    p.lifetime = 0.5;
    state.add_projectile(p);
}

fn fire_ricochet(stats: &ResolvedWeapon, state: &mut GameState, balance: &BalanceConfig) {
    let damage = shot_damage(state, stats);
    let mut p = Projectile::new(
        Owner::Player,
        state.player.pos,
        state.player.aim_angle,
        balance.projectile.base_speed,
        balance.projectile.base_size,
        damage,
    );
    p.max_bounces = stats.max_bounces;
    p.smart_bounce = stats.smart_bounce;
    state.add_projectile(p);
}

fn fire_wave_gun(stats: &ResolvedWeapon, state: &mut GameState, balance: &BalanceConfig) {
    let damage = shot_damage(state, stats);
    let count = stats.count.max(1);
    for i in 0..count {
        let mut p = Projectile::new(
            Owner::Player,
            state.player.pos,
            state.player.aim_angle,
            balance.projectile.base_speed,
            6.0,
            damage,
        );
        p.piercing = true;
        p.wave = Some(WaveMotionState {
            phase: i as f32 * std::f32::consts::TAU / count as f32,
            amplitude: 30.0,
            initial_angle: state.player.aim_angle,
            distance: 0.0,
        });
        state.add_projectile(p);
    }
}

fn fire_burst_shot(stats: &ResolvedWeapon, state: &mut GameState, balance: &BalanceConfig) {
    let damage = shot_damage(state, stats);
    let jitter = (state.rng.random::<f32>() - 0.5) * stats.spread;
    let p = Projectile::new(
        Owner::Player,
        state.player.pos,
        state.player.aim_angle + jitter,
        balance.projectile.base_speed * 1.5,
        balance.projectile.base_size,
        damage,
    );
    state.add_projectile(p);
    state.push_event(GameEvent::WeaponFired(WeaponKind::BurstRifle));
}

fn fire_orbital(stats: &ResolvedWeapon, state: &mut GameState, balance: &BalanceConfig) {
    let damage = shot_damage(state, stats);
    let count = stats.count.max(1);
    for i in 0..count {
        // Absolute ring, independent of aim
        let angle = std::f32::consts::TAU / count as f32 * i as f32;
        let mut p = Projectile::new(
            Owner::Player,
            state.player.pos,
            angle,
            balance.projectile.base_speed * 0.6,
            8.0,
            damage,
        );
        p.lifetime = 2.0;
        apply_items(&mut p, state, balance, BounceRule::Flat, None);
        state.add_projectile(p);
    }
}

fn fire_nova(stats: &ResolvedWeapon, state: &mut GameState, balance: &BalanceConfig) {
    let damage = shot_damage(state, stats);
    let count = stats.count.max(1);
    for i in 0..count {
        let angle = state.player.aim_angle + std::f32::consts::TAU / count as f32 * i as f32;
        let mut p = Projectile::new(
            Owner::Player,
            state.player.pos,
            angle,
            balance.projectile.base_speed * 0.8,
            5.0,
            damage,
        );
        p.piercing = true;
        apply_items(&mut p, state, balance, BounceRule::Flat, Some(1.0));
        state.add_projectile(p);
    }
}

/// Instant-hit chain: no projectile, damage applied directly with decay
/// per jump. Returns false when no enemy sits in the aim cone.
fn fire_chain(stats: &ResolvedWeapon, state: &mut GameState) -> bool {
    let Some(chain) = stats.chain else { return false };
    let damage = shot_damage(state, stats);
    let origin = state.player.pos;
    let aim = state.player.aim_angle;

    // First hit: nearest living enemy within range and a 45 degree cone
    let mut first: Option<usize> = None;
    let mut first_dist = 300.0;
    for (i, enemy) in state.enemies.iter().enumerate() {
        if !enemy.alive {
            continue;
        }
        let to = enemy.pos - origin;
        let dist = to.length();
        let diff = normalize_angle(to.y.atan2(to.x) - aim).abs();
        if dist < first_dist && diff < std::f32::consts::FRAC_PI_4 {
            first_dist = dist;
            first = Some(i);
        }
    }
    let Some(first) = first else { return false };

    state.enemies[first].take_damage(damage);
    state.push_event(GameEvent::ChainArc);
    state.push_event(GameEvent::EnemyHit { crit: false });

    let mut hit = vec![state.enemies[first].id];
    let mut current = first;
    let mut current_damage = damage;

    for _ in 0..chain.jumps {
        let from = state.enemies[current].pos;
        let mut next: Option<usize> = None;
        let mut next_dist = chain.range;
        for (i, enemy) in state.enemies.iter().enumerate() {
            if !enemy.alive || hit.contains(&enemy.id) {
                continue;
            }
            let dist = enemy.pos.distance(from);
            if dist < next_dist {
                next_dist = dist;
                next = Some(i);
            }
        }
        let Some(next) = next else { break };

        current_damage *= chain.damage_decay;
        state.enemies[next].take_damage(current_damage);
        state.push_event(GameEvent::ChainArc);
        state.push_event(GameEvent::EnemyHit { crit: false });
        hit.push(state.enemies[next].id);
        current = next;
    }

    true
}

fn fire_boomerang(stats: &ResolvedWeapon, state: &mut GameState, balance: &BalanceConfig) {
    let damage = shot_damage(state, stats);
    let mut p = Projectile::new(
        Owner::Player,
        state.player.pos,
        state.player.aim_angle,
        balance.projectile.base_speed,
        8.0,
        damage,
    );
    p.boomerang = Some(BoomerangState {
        flip_distance: stats.boomerang_distance,
        origin: state.player.pos,
        returning: false,
        traveled: 0.0,
        return_speed: stats.return_speed,
    });
    state.add_projectile(p);
}

fn fire_well(stats: &ResolvedWeapon, state: &mut GameState, balance: &BalanceConfig) {
    let Some((params, dps)) = stats.well else { return };
    let mut p = Projectile::new(
        Owner::Player,
        state.player.pos,
        state.player.aim_angle,
        balance.projectile.base_speed * 0.5,
        15.0,
        0.0,
    );
    p.lifetime = params.travel_time;
    p.well = Some(WellState {
        duration: params.duration,
        radius: params.radius,
        strength: params.strength,
        damage_per_sec: dps,
        active: false,
    });
    state.add_projectile(p);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::EnemyKind;
    use crate::progress::PlayerProgress;
    use crate::sim::enemy::Enemy;
    use glam::Vec2;

    fn state_with_enemy_at(x: f32, y: f32) -> (GameState, BalanceConfig) {
        let balance = BalanceConfig::default();
        let progress = PlayerProgress::default();
        let mut state = GameState::new(11, &progress, &balance);
        state.start_level(1, &progress, &balance);
        let enemy = Enemy::new(EnemyKind::Basic, 1, Vec2::new(x, y), &balance);
        state.add_enemy(enemy);
        (state, balance)
    }

    #[test]
    fn test_damage_floors_at_one() {
        let balance = BalanceConfig::default();
        let progress = PlayerProgress::default();
        let state = GameState::new(1, &progress, &balance);
        // SMG multiplier 0.25 with base damage 1 floors to 1
        let stats = resolve(WeaponKind::Smg, 1, &balance);
        assert_eq!(shot_damage(&state, &stats), 1.0);
    }

    #[test]
    fn test_level_scaling_damage_and_bounces() {
        let balance = BalanceConfig::default();
        let l1 = resolve(WeaponKind::Ricochet, 1, &balance);
        let l3 = resolve(WeaponKind::Ricochet, 3, &balance);
        assert_eq!(l1.max_bounces, 7);
        assert_eq!(l3.max_bounces, 11);
        assert!(l3.damage_mult > l1.damage_mult);
        assert!(l3.smart_bounce);
    }

    #[test]
    fn test_smg_pierces_at_level_three() {
        let balance = BalanceConfig::default();
        assert!(!resolve(WeaponKind::Smg, 2, &balance).piercing);
        assert!(resolve(WeaponKind::Smg, 3, &balance).piercing);
    }

    #[test]
    fn test_multi_rocket_at_level_four() {
        let balance = BalanceConfig::default();
        assert_eq!(resolve(WeaponKind::RocketLauncher, 3, &balance).count, 1);
        assert_eq!(resolve(WeaponKind::RocketLauncher, 4, &balance).count, 2);
    }

    #[test]
    fn test_shotgun_spread_tightens_with_level() {
        let balance = BalanceConfig::default();
        let l1 = resolve(WeaponKind::Shotgun, 1, &balance);
        let l4 = resolve(WeaponKind::Shotgun, 4, &balance);
        assert!((l4.spread - l1.spread * 0.85f32.powi(3)).abs() < 1e-6);
        // Projectile count also grows one per level
        assert_eq!(l1.count, 4);
        assert_eq!(l4.count, 7);
    }

    #[test]
    fn test_chain_params_scale_with_level() {
        let balance = BalanceConfig::default();
        let l1 = resolve(WeaponKind::ChainLightning, 1, &balance).chain.unwrap();
        let l3 = resolve(WeaponKind::ChainLightning, 3, &balance).chain.unwrap();
        assert_eq!(l1.jumps, 3);
        assert_eq!(l3.jumps, 5);
        assert_eq!(l3.range, 100.0);
    }

    #[test]
    fn test_no_fire_without_enemies() {
        let balance = BalanceConfig::default();
        let progress = PlayerProgress::default();
        let mut state = GameState::new(5, &progress, &balance);
        state.start_level(1, &progress, &balance);
        update_weapons(&mut state, 2.0, &balance);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_pistol_fires_once_per_cooldown() {
        let (mut state, balance) = state_with_enemy_at(600.0, 300.0);
        update_weapons(&mut state, 0.01, &balance);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state
            .events
            .contains(&GameEvent::WeaponFired(WeaponKind::Pistol)));

        // Cooldown (1s at base fire rate) suppresses the next shot
        update_weapons(&mut state, 0.01, &balance);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_shotgun_fan_is_centered_on_aim() {
        let (mut state, balance) = state_with_enemy_at(600.0, 300.0);
        state.player.aim_angle = 0.0;
        state.weapons = vec![WeaponState::new(WeaponKind::Shotgun, 1)];
        update_weapons(&mut state, 0.01, &balance);
        assert_eq!(state.projectiles.len(), 4);
        let mean_vy: f32 =
            state.projectiles.iter().map(|p| p.vel.y / p.vel.length()).sum::<f32>() / 4.0;
        assert!(mean_vy.abs() < 0.01, "fan symmetric around aim, got {mean_vy}");
        assert!(state.projectiles.iter().all(|p| p.piercing));
    }

    #[test]
    fn test_rocket_homes_on_nearest_enemy() {
        let (mut state, balance) = state_with_enemy_at(400.0, 500.0);
        state.player.aim_angle = 0.0; // aiming away from the enemy
        state.weapons = vec![WeaponState::new(WeaponKind::RocketLauncher, 1)];
        update_weapons(&mut state, 0.01, &balance);
        assert_eq!(state.projectiles.len(), 1);
        let rocket = &state.projectiles[0];
        assert!(rocket.vel.y > 0.0, "initial heading points at the enemy");
        assert!(rocket.homing.is_some());
        assert!(rocket.explosive.is_some());
    }

    #[test]
    fn test_burst_rifle_spaces_shots() {
        let (mut state, balance) = state_with_enemy_at(600.0, 300.0);
        state.weapons = vec![WeaponState::new(WeaponKind::BurstRifle, 1)];
        // First update arms the burst and fires shot one
        update_weapons(&mut state, 0.01, &balance);
        assert_eq!(state.projectiles.len(), 1);
        // Next shot waits out the intra-burst delay
        update_weapons(&mut state, 0.01, &balance);
        assert_eq!(state.projectiles.len(), 1);
        update_weapons(&mut state, 0.08, &balance);
        assert_eq!(state.projectiles.len(), 2);
        update_weapons(&mut state, 0.08, &balance);
        assert_eq!(state.projectiles.len(), 3);
        // Burst exhausted
        update_weapons(&mut state, 0.08, &balance);
        assert_eq!(state.projectiles.len(), 3);
    }

    #[test]
    fn test_orbital_ring_ignores_aim() {
        let (mut state, balance) = state_with_enemy_at(600.0, 300.0);
        state.weapons = vec![WeaponState::new(WeaponKind::OrbitalCannon, 1)];
        update_weapons(&mut state, 0.01, &balance);
        assert_eq!(state.projectiles.len(), 8);
        // Velocities sum to ~zero for a symmetric ring
        let sum: Vec2 = state.projectiles.iter().map(|p| p.vel).sum();
        assert!(sum.length() < 1.0);
    }

    #[test]
    fn test_chain_hits_decay_per_jump() {
        let balance = BalanceConfig::default();
        let progress = PlayerProgress::default();
        let mut state = GameState::new(2, &progress, &balance);
        state.start_level(1, &progress, &balance);
        state.player.damage = 10.0;
        state.player.aim_angle = 0.0;
        // Three tanks in a line to the right, 50px apart (within chain range)
        for i in 0..3 {
            let e = Enemy::new(EnemyKind::Tank, 1, Vec2::new(500.0 + i as f32 * 50.0, 325.0), &balance);
            state.add_enemy(e);
        }
        state.player.pos = Vec2::new(400.0, 325.0);
        let stats = resolve(WeaponKind::ChainLightning, 1, &balance);
        assert!(fire_chain(&stats, &mut state));

        let damage = shot_damage(&state, &stats); // floor(10 * 2.4) = 24
        let decay = stats.chain.unwrap().damage_decay;
        let hp = |i: usize| state.enemies[i].max_health - state.enemies[i].health;
        assert!((hp(0) - damage).abs() < 1e-3);
        assert!((hp(1) - damage * decay).abs() < 1e-3);
        assert!((hp(2) - damage * decay * decay).abs() < 1e-3);
    }

    #[test]
    fn test_chain_misses_outside_cone() {
        let balance = BalanceConfig::default();
        let progress = PlayerProgress::default();
        let mut state = GameState::new(2, &progress, &balance);
        state.start_level(1, &progress, &balance);
        state.player.pos = Vec2::new(400.0, 325.0);
        state.player.aim_angle = 0.0;
        // Enemy directly behind the aim direction
        let e = Enemy::new(EnemyKind::Basic, 1, Vec2::new(300.0, 325.0), &balance);
        state.add_enemy(e);
        let stats = resolve(WeaponKind::ChainLightning, 1, &balance);
        assert!(!fire_chain(&stats, &mut state));
        assert_eq!(state.enemies[0].health, state.enemies[0].max_health);
    }

    #[test]
    fn test_bounce_house_rules_per_weapon() {
        use crate::balance::ItemId;
        let balance = BalanceConfig::default();
        let mut progress = PlayerProgress::default();
        progress.items.push((ItemId::BounceHouse, 4));
        progress.weapons = vec![
            (WeaponKind::Pistol, 1),
            (WeaponKind::Shotgun, 1),
            (WeaponKind::OrbitalCannon, 1),
        ];
        let mut state = GameState::new(3, &progress, &balance);
        state.start_level(1, &progress, &balance);
        let enemy = Enemy::new(EnemyKind::Basic, 1, Vec2::new(600.0, 300.0), &balance);
        state.add_enemy(enemy);
        update_weapons(&mut state, 0.01, &balance);

        let pistol_shot = state.projectiles.iter().find(|p| !p.piercing && p.size < 5.0).unwrap();
        assert_eq!(pistol_shot.max_bounces, 4);
        let pellets: Vec<_> = state.projectiles.iter().filter(|p| p.piercing && p.size < 5.0).collect();
        assert!(pellets.iter().all(|p| p.max_bounces == 2), "shotgun gets half the stacks");
        let ring: Vec<_> = state.projectiles.iter().filter(|p| p.size == 8.0).collect();
        assert!(ring.iter().all(|p| p.max_bounces == balance.projectile.bounce_house_max_bounces));
    }

    #[test]
    fn test_double_tap_queues_echo() {
        use crate::balance::ItemId;
        let balance = BalanceConfig::default();
        let mut progress = PlayerProgress::default();
        progress.items.push((ItemId::DoubleTap, 1));
        let mut state = GameState::new(3, &progress, &balance);
        state.start_level(1, &progress, &balance);
        // Force the echo roll to succeed
        state.player.caps = vec![Capability::DoubleTap { chance: 1.1 }];
        let enemy = Enemy::new(EnemyKind::Basic, 1, Vec2::new(600.0, 300.0), &balance);
        state.add_enemy(enemy);

        update_weapons(&mut state, 0.01, &balance);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.weapons[0].echo_timer.is_some());

        // Echo lands after its 50ms delay
        update_weapons(&mut state, 0.06, &balance);
        assert_eq!(state.projectiles.len(), 2);
        assert!(state.weapons[0].echo_timer.is_none());
    }

    #[test]
    fn test_echo_suppressed_when_arena_empties() {
        let balance = BalanceConfig::default();
        let progress = PlayerProgress::default();
        let mut state = GameState::new(3, &progress, &balance);
        state.start_level(1, &progress, &balance);
        state.player.caps = vec![Capability::DoubleTap { chance: 1.1 }];
        let enemy = Enemy::new(EnemyKind::Basic, 1, Vec2::new(600.0, 300.0), &balance);
        state.add_enemy(enemy);

        update_weapons(&mut state, 0.01, &balance);
        assert!(state.weapons[0].echo_timer.is_some());
        state.enemies.clear();
        update_weapons(&mut state, 0.06, &balance);
        assert_eq!(state.projectiles.len(), 1, "echo must re-check for targets");
    }
}
