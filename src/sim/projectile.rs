//! Projectile motion: steering, integration, wall bounce, lifetime.
//!
//! Behaviors are orthogonal and stack on one projectile: a shot can be
//! piercing and explosive and wave-driven at the same time. Hit resolution
//! against entities lives in the tick loop; this module only moves things.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{bounce_canvas, off_screen};
use super::enemy::Enemy;
use crate::angle_to_dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// Explosion applied at the impact point
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExplosiveCharge {
    pub radius: f32,
    pub damage: f32,
}

/// Sinusoidal lateral drift around the launch heading
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaveMotionState {
    pub phase: f32,
    pub amplitude: f32,
    pub initial_angle: f32,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HomingState {
    /// Enemy id being tracked; re-acquired when the target dies
    pub target: Option<u32>,
    /// Turn rate in radians per second
    pub strength: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoomerangState {
    /// Outbound travel before flipping
    pub flip_distance: f32,
    pub origin: Vec2,
    pub returning: bool,
    pub traveled: f32,
    /// Speed multiplier on the return leg
    pub return_speed: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WellState {
    pub duration: f32,
    pub radius: f32,
    pub strength: f32,
    /// Damage per second inside the well (0 below level 3)
    pub damage_per_sec: f32,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: Owner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub speed: f32,
    pub damage: f32,
    pub bounces: u32,
    pub max_bounces: u32,
    pub lifetime: f32,
    pub piercing: bool,
    /// Marker only; bounces use the default wall reflection
    pub smart_bounce: bool,
    /// Plain player shots snap toward enemies inside this radius
    pub auto_aim_radius: f32,
    /// Enemies already hit this pass (piercing/boomerang)
    pub hit_enemies: Vec<u32>,
    pub explosive: Option<ExplosiveCharge>,
    pub wave: Option<WaveMotionState>,
    pub homing: Option<HomingState>,
    pub boomerang: Option<BoomerangState>,
    pub well: Option<WellState>,
    pub alive: bool,
}

impl Projectile {
    pub fn new(owner: Owner, pos: Vec2, angle: f32, speed: f32, size: f32, damage: f32) -> Self {
        Self {
            id: 0,
            owner,
            pos,
            vel: angle_to_dir(angle) * speed,
            size,
            speed,
            damage,
            bounces: 0,
            max_bounces: 0,
            lifetime: 5.0,
            piercing: false,
            smart_bounce: false,
            auto_aim_radius: 25.0,
            hit_enemies: Vec::new(),
            explosive: None,
            wave: None,
            homing: None,
            boomerang: None,
            well: None,
            alive: true,
        }
    }

    pub fn has_hit(&self, enemy_id: u32) -> bool {
        self.hit_enemies.contains(&enemy_id)
    }

    /// Advance one timestep. Enemies are needed for homing/auto-aim target
    /// queries and are mutated by active gravity wells (pull + optional DoT).
    pub fn update(&mut self, dt: f32, enemies: &mut [Enemy]) {
        if !self.alive {
            return;
        }

        if self.homing.is_some() {
            self.steer_homing(dt, enemies);
        } else if self.owner == Owner::Player && !self.piercing {
            self.steer_auto_aim(enemies);
        }

        if let Some(mut well) = self.well {
            if well.active {
                pull_enemies(self.pos, &well, dt, enemies);
            }
            self.well = Some(well);

            // Anchor once the outbound travel time runs out
            if !well.active && self.lifetime <= 0.0 {
                well.active = true;
                self.vel = Vec2::ZERO;
                self.lifetime = well.duration;
                self.well = Some(well);
            }
        }

        if let Some(mut b) = self.boomerang {
            b.traveled += self.speed * dt;
            if !b.returning && b.traveled >= b.flip_distance {
                b.returning = true;
                // The return leg can hit everything again
                self.hit_enemies.clear();
            }
            if b.returning {
                let home = b.origin - self.pos;
                let dist = home.length();
                if dist < 20.0 {
                    self.boomerang = Some(b);
                    self.alive = false;
                    return;
                }
                self.vel = home / dist * self.speed * b.return_speed;
            }
            self.boomerang = Some(b);
        }

        if let Some(mut w) = self.wave {
            w.distance += self.speed * dt;
            let offset = (w.distance * 0.03 + w.phase).sin() * w.amplitude;
            let heading = angle_to_dir(w.initial_angle);
            let lateral = angle_to_dir(w.initial_angle + std::f32::consts::FRAC_PI_2);
            self.vel = heading * self.speed + lateral * offset * 0.03;
            self.wave = Some(w);
        }

        self.pos += self.vel * dt;

        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            // A well orb anchors instead of dying; it expires on the next
            // pass through this check once its well duration runs out.
            let anchoring = matches!(self.well, Some(w) if !w.active);
            if !anchoring {
                self.alive = false;
                return;
            }
        }

        if self.max_bounces > 0 && self.bounces < self.max_bounces {
            self.bounces += bounce_canvas(&mut self.pos, &mut self.vel, self.size);
        } else if off_screen(self.pos) {
            self.alive = false;
        }
    }

    /// Track the current homing target, re-acquiring the nearest living
    /// enemy when it dies, and turn toward it at the homing rate.
    fn steer_homing(&mut self, dt: f32, enemies: &[Enemy]) {
        let Some(mut homing) = self.homing else { return };

        if let Some(id) = homing.target
            && !enemies.iter().any(|e| e.id == id && e.alive)
        {
            homing.target = None;
        }

        if homing.target.is_none() {
            homing.target = nearest_enemy(self.pos, enemies, f32::INFINITY).map(|e| e.id);
        }

        if let Some(id) = homing.target
            && let Some(target) = enemies.iter().find(|e| e.id == id)
        {
            let to_target = target.pos - self.pos;
            let target_angle = to_target.y.atan2(to_target.x);
            let current_angle = self.vel.y.atan2(self.vel.x);
            let diff = crate::normalize_angle(target_angle - current_angle);
            let turn = homing.strength * dt;
            let new_angle = current_angle + diff.clamp(-turn, turn);
            self.vel = angle_to_dir(new_angle) * self.speed;
        }

        self.homing = Some(homing);
    }

    /// Hard velocity snap toward the nearest enemy inside the auto-aim
    /// radius. Keeps plain shots feeling accurate without full homing.
    fn steer_auto_aim(&mut self, enemies: &[Enemy]) {
        if let Some(target) = nearest_enemy(self.pos, enemies, self.auto_aim_radius) {
            let to_target = target.pos - self.pos;
            let dist = to_target.length();
            if dist > 0.0 {
                self.vel = to_target / dist * self.speed;
            }
        }
    }
}

/// Nearest living enemy within `max_dist` of `pos`
pub fn nearest_enemy(pos: Vec2, enemies: &[Enemy], max_dist: f32) -> Option<&Enemy> {
    let mut best: Option<&Enemy> = None;
    let mut best_dist = max_dist;
    for enemy in enemies.iter().filter(|e| e.alive) {
        let dist = enemy.pos.distance(pos);
        if dist < best_dist {
            best_dist = dist;
            best = Some(enemy);
        }
    }
    best
}

/// Pull every living enemy inside the well radius toward its center with
/// force inversely proportional to distance, applying DoT when configured.
fn pull_enemies(center: Vec2, well: &WellState, dt: f32, enemies: &mut [Enemy]) {
    for enemy in enemies.iter_mut().filter(|e| e.alive) {
        let to_center = center - enemy.pos;
        let dist = to_center.length();
        if dist <= well.radius && dist > 0.0 {
            let force = well.strength / (dist + 1.0);
            enemy.vel += to_center / dist * force * dt;
            if well.damage_per_sec > 0.0 {
                enemy.take_damage(well.damage_per_sec * dt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::{BalanceConfig, EnemyKind};

    fn enemy_at(id: u32, x: f32, y: f32) -> Enemy {
        let balance = BalanceConfig::default();
        let mut e = Enemy::new(EnemyKind::Basic, 1, Vec2::new(x, y), &balance);
        e.id = id;
        e
    }

    #[test]
    fn test_lifetime_expiry() {
        let mut p = Projectile::new(Owner::Player, Vec2::new(400.0, 300.0), 0.0, 400.0, 4.0, 1.0);
        p.lifetime = 0.05;
        p.update(0.1, &mut []);
        assert!(!p.alive);
    }

    #[test]
    fn test_bounce_consumes_budget_then_dies_off_screen() {
        let mut p = Projectile::new(Owner::Player, Vec2::new(3.0, 300.0), std::f32::consts::PI, 400.0, 4.0, 1.0);
        p.max_bounces = 1;
        p.update(0.01, &mut []);
        assert_eq!(p.bounces, 1);
        assert!(p.vel.x > 0.0);

        // Budget spent: flying off the far edge kills it
        p.pos = Vec2::new(860.0, 300.0);
        p.update(0.01, &mut []);
        assert!(!p.alive);
    }

    #[test]
    fn test_auto_aim_snaps_within_radius() {
        let mut p = Projectile::new(Owner::Player, Vec2::new(400.0, 300.0), 0.0, 400.0, 4.0, 1.0);
        let mut enemies = [enemy_at(1, 400.0, 310.0)];
        p.update(0.001, &mut enemies);
        // Velocity now points straight down toward the enemy
        assert!(p.vel.y > 0.0);
        assert!(p.vel.x.abs() < 1.0);
    }

    #[test]
    fn test_piercing_shots_do_not_auto_aim() {
        let mut p = Projectile::new(Owner::Player, Vec2::new(400.0, 300.0), 0.0, 400.0, 4.0, 1.0);
        p.piercing = true;
        let mut enemies = [enemy_at(1, 400.0, 310.0)];
        p.update(0.001, &mut enemies);
        assert!(p.vel.y.abs() < 1.0);
    }

    #[test]
    fn test_boomerang_flips_and_clears_hits() {
        let mut p = Projectile::new(Owner::Player, Vec2::new(400.0, 300.0), 0.0, 100.0, 8.0, 1.0);
        p.piercing = false;
        p.boomerang = Some(BoomerangState {
            flip_distance: 10.0,
            origin: Vec2::new(400.0, 300.0),
            returning: false,
            traveled: 0.0,
            return_speed: 1.0,
        });
        p.hit_enemies.push(7);
        p.update(0.2, &mut []); // travels 20 > 10, flips
        let b = p.boomerang.unwrap();
        assert!(b.returning);
        assert!(p.hit_enemies.is_empty());
        assert!(p.vel.x < 0.0, "should head back toward origin");
    }

    #[test]
    fn test_well_anchors_then_expires() {
        let mut p = Projectile::new(Owner::Player, Vec2::new(400.0, 300.0), 0.0, 200.0, 15.0, 0.0);
        p.lifetime = 0.05;
        p.well = Some(WellState {
            duration: 0.5,
            radius: 120.0,
            strength: 200.0,
            damage_per_sec: 0.0,
            active: false,
        });
        p.update(0.1, &mut []);
        assert!(p.alive);
        assert!(p.well.unwrap().active);
        assert_eq!(p.vel, Vec2::ZERO);

        // Runs down the well duration and dies
        p.update(0.6, &mut []);
        assert!(!p.alive);
    }

    #[test]
    fn test_well_pulls_enemies_inward() {
        let mut p = Projectile::new(Owner::Player, Vec2::new(400.0, 300.0), 0.0, 200.0, 15.0, 0.0);
        p.lifetime = 10.0;
        p.well = Some(WellState {
            duration: 4.0,
            radius: 120.0,
            strength: 200.0,
            damage_per_sec: 0.0,
            active: true,
        });
        let mut enemies = [enemy_at(1, 450.0, 300.0)];
        enemies[0].vel = Vec2::ZERO;
        p.update(0.1, &mut enemies);
        assert!(enemies[0].vel.x < 0.0, "pull points toward the well center");
    }
}
