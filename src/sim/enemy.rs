//! Enemy entities: spawn placement, per-kind AI, contact stats.
//!
//! Stats are computed from the balance tables once at construction and
//! frozen; an enemy spawned on wave N keeps wave-N numbers even if it
//! survives into later spawn ticks.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::bounce_arena;
use super::projectile::{Owner, Projectile};
use crate::angle_to_dir;
use crate::balance::{BalanceConfig, EnemyKind, EnemyShot};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, OFFSCREEN_MARGIN, UI_BAR_HEIGHT};

/// Screen edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub fn random(rng: &mut Pcg32) -> Self {
        match rng.random_range(0..4u32) {
            0 => Edge::Top,
            1 => Edge::Right,
            2 => Edge::Bottom,
            _ => Edge::Left,
        }
    }

    /// Unit vector along the edge, used to offset group members
    pub fn along(self) -> Vec2 {
        match self {
            Edge::Top | Edge::Bottom => Vec2::X,
            Edge::Right | Edge::Left => Vec2::Y,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub damage: f32,
    pub money_drop_chance: f32,
    pub money_value: f32,
    pub alive: bool,
    /// Left the arena on its own; no kill credit or drops
    pub despawned: bool,
    /// Tank: chase radius
    pub aggro_radius: f32,
    /// Tank: seconds until the next random-walk heading
    pub walk_timer: f32,
    pub shoot_timer: f32,
    pub minion_timer: f32,
    /// Wave motion anchor and parameters
    pub spawn_x: f32,
    pub wave_phase: f32,
    pub wave_amplitude: f32,
    pub wave_frequency: f32,
    pub shot: Option<EnemyShot>,
}

impl Enemy {
    pub fn new(kind: EnemyKind, wave: u32, pos: Vec2, balance: &BalanceConfig) -> Self {
        let def = balance.enemy(kind);
        let stats = def.stats_for_wave(wave);
        let (wave_amplitude, wave_frequency) = def
            .wave_motion
            .map(|w| (w.amplitude, w.frequency))
            .unwrap_or((0.0, 0.0));
        Self {
            id: 0,
            kind,
            pos,
            vel: Vec2::ZERO,
            size: def.size,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            damage: stats.damage,
            money_drop_chance: stats.money_drop_chance,
            money_value: stats.money_value,
            alive: true,
            despawned: false,
            aggro_radius: def.aggro_radius,
            walk_timer: 0.0,
            shoot_timer: 0.0,
            minion_timer: 0.0,
            spawn_x: pos.x,
            wave_phase: 0.0,
            wave_amplitude,
            wave_frequency,
            shot: def.shot,
        }
    }

    /// Contact radius; slightly larger than the visual size
    pub fn hitbox(&self) -> f32 {
        self.size * 1.1
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.alive = false;
        }
    }

    /// Place a new enemy just outside the given edge and aim it according
    /// to its kind's entry pattern.
    pub fn spawn_from_edge(
        kind: EnemyKind,
        wave: u32,
        edge: Edge,
        rng: &mut Pcg32,
        balance: &BalanceConfig,
    ) -> Self {
        let play_height = CANVAS_HEIGHT - UI_BAR_HEIGHT;
        let mut pos = match edge {
            Edge::Top => Vec2::new(rng.random::<f32>() * CANVAS_WIDTH, UI_BAR_HEIGHT - 30.0),
            Edge::Right => Vec2::new(CANVAS_WIDTH + 20.0, UI_BAR_HEIGHT + rng.random::<f32>() * play_height),
            Edge::Bottom => Vec2::new(rng.random::<f32>() * CANVAS_WIDTH, CANVAS_HEIGHT + 20.0),
            Edge::Left => Vec2::new(-20.0, UI_BAR_HEIGHT + rng.random::<f32>() * play_height),
        };

        // Wave and zoomer enter from the central stretch of the edge so
        // their crossing paths stay inside the arena.
        match kind {
            EnemyKind::Wave => clamp_to_center_band(&mut pos, edge, 0.6, rng),
            EnemyKind::Zoomer => clamp_to_center_band(&mut pos, edge, 0.4, rng),
            _ => {}
        }

        let mut enemy = Enemy::new(kind, wave, pos, balance);
        enemy.vel = match kind {
            // Head for a random interior point, then carom forever
            EnemyKind::Basic | EnemyKind::Shooter => {
                let target = random_interior_point(rng);
                (target - pos).normalize_or_zero() * enemy.speed
            }
            // Trackers steer every frame so the entry heading is moot
            EnemyKind::Tracker => Vec2::ZERO,
            EnemyKind::Tank => {
                let angle = rng.random::<f32>() * std::f32::consts::TAU;
                angle_to_dir(angle) * enemy.speed
            }
            EnemyKind::Wave => {
                let center = Vec2::new(
                    CANVAS_WIDTH * (0.3 + rng.random::<f32>() * 0.4),
                    UI_BAR_HEIGHT + play_height * (0.3 + rng.random::<f32>() * 0.4),
                );
                (center - pos).normalize_or_zero() * enemy.speed
            }
            // Crosses to the opposite edge with some lateral jitter
            EnemyKind::Zoomer => {
                let jitter = (rng.random::<f32>() - 0.5) * 0.6;
                let exit = match edge {
                    Edge::Top => Vec2::new(pos.x + CANVAS_WIDTH * jitter, CANVAS_HEIGHT + 50.0),
                    Edge::Bottom => Vec2::new(pos.x + CANVAS_WIDTH * jitter, UI_BAR_HEIGHT - 50.0),
                    Edge::Right => Vec2::new(-50.0, pos.y + play_height * jitter),
                    Edge::Left => Vec2::new(CANVAS_WIDTH + 50.0, pos.y + play_height * jitter),
                };
                (exit - pos).normalize_or_zero() * enemy.speed
            }
            EnemyKind::Boss => {
                let center = Vec2::new(CANVAS_WIDTH / 2.0, UI_BAR_HEIGHT + play_height / 2.0);
                (center - pos).normalize_or_zero() * enemy.speed
            }
        };
        enemy
    }

    /// Place a new enemy at a random point inside the arena (trackers)
    pub fn spawn_inside(kind: EnemyKind, wave: u32, rng: &mut Pcg32, balance: &BalanceConfig) -> Self {
        let pad = 30.0;
        let pos = Vec2::new(
            pad + rng.random::<f32>() * (CANVAS_WIDTH - 2.0 * pad),
            UI_BAR_HEIGHT + pad + rng.random::<f32>() * (CANVAS_HEIGHT - UI_BAR_HEIGHT - 2.0 * pad),
        );
        Enemy::new(kind, wave, pos, balance)
    }

    /// One AI step. Shots and minions produced this step go into the
    /// pending buffers and are adopted by the state after the pass.
    pub fn update(
        &mut self,
        dt: f32,
        player_pos: Vec2,
        player_alive: bool,
        wave: u32,
        rng: &mut Pcg32,
        balance: &BalanceConfig,
        shots: &mut Vec<Projectile>,
        minions: &mut Vec<Enemy>,
    ) {
        if !self.alive {
            return;
        }

        match self.kind {
            EnemyKind::Basic => {}
            EnemyKind::Tracker => {
                if player_alive {
                    self.vel = (player_pos - self.pos).normalize_or_zero() * self.speed;
                }
            }
            EnemyKind::Tank => {
                if player_alive && self.pos.distance(player_pos) <= self.aggro_radius {
                    self.vel = (player_pos - self.pos).normalize_or_zero() * self.speed * 1.5;
                    self.walk_timer = 0.0;
                } else {
                    self.walk_timer -= dt;
                    if self.walk_timer <= 0.0 {
                        let angle = rng.random::<f32>() * std::f32::consts::TAU;
                        self.vel = angle_to_dir(angle) * self.speed;
                        self.walk_timer = 1.0 + rng.random::<f32>() * 2.0;
                    }
                }
            }
            EnemyKind::Shooter => {
                self.shoot_timer -= dt;
                if self.shoot_timer <= 0.0 && player_alive {
                    self.fire_at(player_pos, shots);
                }
            }
            EnemyKind::Wave => {
                let travel = (self.pos.x - self.spawn_x).abs() / CANVAS_WIDTH;
                let drift = (travel * self.wave_frequency * std::f32::consts::TAU + self.wave_phase).sin();
                self.pos.y += drift * self.wave_amplitude * dt;
            }
            EnemyKind::Boss => {
                // Keeps its entry heading and drifts, relying on wall bounces
                self.shoot_timer -= dt;
                if self.shoot_timer <= 0.0 && player_alive {
                    self.fire_at(player_pos, shots);
                }
                self.minion_timer -= dt;
                if self.minion_timer <= 0.0 {
                    self.spawn_minions(wave, rng, balance, minions);
                    self.minion_timer = balance.enemy(EnemyKind::Boss).minion_cooldown;
                }
            }
            EnemyKind::Zoomer => {}
        }

        self.pos += self.vel * dt;

        match self.kind {
            // Crossers leave the arena and despawn instead of bouncing
            EnemyKind::Wave | EnemyKind::Zoomer => {
                if self.pos.x < -OFFSCREEN_MARGIN
                    || self.pos.x > CANVAS_WIDTH + OFFSCREEN_MARGIN
                    || self.pos.y < -OFFSCREEN_MARGIN
                    || self.pos.y > CANVAS_HEIGHT + OFFSCREEN_MARGIN
                {
                    self.alive = false;
                    self.despawned = true;
                }
            }
            _ => {
                let contact = bounce_arena(&mut self.pos, &mut self.vel, self.size);
                // A wall hit interrupts the tank walk so the new heading
                // matches the reflected velocity
                if contact.any() && self.kind == EnemyKind::Tank {
                    self.walk_timer = 1.0 + rng.random::<f32>() * 2.0;
                }
            }
        }
    }

    fn fire_at(&mut self, player_pos: Vec2, shots: &mut Vec<Projectile>) {
        let Some(shot) = self.shot else { return };
        let to_player = player_pos - self.pos;
        let angle = to_player.y.atan2(to_player.x);
        let mut p = Projectile::new(Owner::Enemy, self.pos, angle, shot.speed, shot.size, shot.damage);
        p.max_bounces = shot.max_bounces;
        shots.push(p);
        self.shoot_timer = shot.cooldown;
    }

    /// Release a ring of three wave minions around the boss, fanned
    /// outward with dampened vertical velocity.
    fn spawn_minions(&self, wave: u32, rng: &mut Pcg32, balance: &BalanceConfig, minions: &mut Vec<Enemy>) {
        for i in 0..3 {
            let angle = std::f32::consts::TAU / 3.0 * i as f32 + rng.random::<f32>() * 0.5;
            let dir = angle_to_dir(angle);
            let pos = self.pos + dir * (self.size + 20.0);
            let mut minion = Enemy::new(EnemyKind::Wave, wave, pos, balance);
            minion.vel = dir * minion.speed;
            minion.vel.y *= 0.3;
            minion.wave_phase = rng.random::<f32>() * std::f32::consts::TAU;
            minions.push(minion);
        }
    }
}

fn random_interior_point(rng: &mut Pcg32) -> Vec2 {
    Vec2::new(
        rng.random::<f32>() * CANVAS_WIDTH,
        UI_BAR_HEIGHT + rng.random::<f32>() * (CANVAS_HEIGHT - UI_BAR_HEIGHT),
    )
}

/// Restrict an edge spawn position to the central `band` fraction of
/// that edge.
fn clamp_to_center_band(pos: &mut Vec2, edge: Edge, band: f32, rng: &mut Pcg32) {
    let lo = (1.0 - band) / 2.0;
    let t = lo + rng.random::<f32>() * band;
    match edge {
        Edge::Top | Edge::Bottom => pos.x = CANVAS_WIDTH * t,
        Edge::Right | Edge::Left => {
            pos.y = UI_BAR_HEIGHT + (CANVAS_HEIGHT - UI_BAR_HEIGHT) * t;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_stats_frozen_at_spawn_wave() {
        let balance = BalanceConfig::default();
        let e1 = Enemy::new(EnemyKind::Basic, 1, Vec2::new(100.0, 200.0), &balance);
        let e5 = Enemy::new(EnemyKind::Basic, 5, Vec2::new(100.0, 200.0), &balance);
        assert!(e5.health > e1.health);
        assert!(e5.speed > e1.speed);
        assert_eq!(e1.max_health, e1.health);
    }

    #[test]
    fn test_edge_spawn_is_outside_arena() {
        let balance = BalanceConfig::default();
        let mut rng = rng();
        for edge in [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left] {
            let e = Enemy::spawn_from_edge(EnemyKind::Basic, 1, edge, &mut rng, &balance);
            let outside = e.pos.x < 0.0
                || e.pos.x > CANVAS_WIDTH
                || e.pos.y < UI_BAR_HEIGHT
                || e.pos.y > CANVAS_HEIGHT;
            assert!(outside, "{edge:?} spawn {:?} should start off the playfield", e.pos);
        }
    }

    #[test]
    fn test_interior_spawn_respects_padding() {
        let balance = BalanceConfig::default();
        let mut rng = rng();
        for _ in 0..50 {
            let e = Enemy::spawn_inside(EnemyKind::Tracker, 1, &mut rng, &balance);
            assert!(e.pos.x >= 30.0 && e.pos.x <= CANVAS_WIDTH - 30.0);
            assert!(e.pos.y >= UI_BAR_HEIGHT + 30.0 && e.pos.y <= CANVAS_HEIGHT - 30.0);
        }
    }

    #[test]
    fn test_tracker_steers_toward_player() {
        let balance = BalanceConfig::default();
        let mut rng = rng();
        let mut e = Enemy::new(EnemyKind::Tracker, 1, Vec2::new(100.0, 300.0), &balance);
        let player = Vec2::new(700.0, 300.0);
        e.update(0.1, player, true, 1, &mut rng, &balance, &mut Vec::new(), &mut Vec::new());
        assert!(e.vel.x > 0.0);
        assert!(e.pos.x > 100.0);
    }

    #[test]
    fn test_tank_chases_inside_aggro_radius() {
        let balance = BalanceConfig::default();
        let mut rng = rng();
        let mut e = Enemy::new(EnemyKind::Tank, 1, Vec2::new(400.0, 300.0), &balance);
        let player = Vec2::new(450.0, 300.0);
        e.update(0.01, player, true, 1, &mut rng, &balance, &mut Vec::new(), &mut Vec::new());
        assert!((e.vel.length() - e.speed * 1.5).abs() < 0.01);
        assert!(e.vel.x > 0.0);
    }

    #[test]
    fn test_tank_walks_outside_aggro_radius() {
        let balance = BalanceConfig::default();
        let mut rng = rng();
        let mut e = Enemy::new(EnemyKind::Tank, 1, Vec2::new(100.0, 500.0), &balance);
        let player = Vec2::new(700.0, 150.0);
        e.update(0.01, player, true, 1, &mut rng, &balance, &mut Vec::new(), &mut Vec::new());
        assert!((e.vel.length() - e.speed).abs() < 0.01, "walk moves at base speed");
        assert!(e.walk_timer > 0.0);
    }

    #[test]
    fn test_shooter_fires_immediately_then_cools_down() {
        let balance = BalanceConfig::default();
        let mut rng = rng();
        let mut e = Enemy::new(EnemyKind::Shooter, 1, Vec2::new(400.0, 300.0), &balance);
        let mut shots = Vec::new();
        e.update(0.01, Vec2::new(600.0, 300.0), true, 1, &mut rng, &balance, &mut shots, &mut Vec::new());
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].owner, Owner::Enemy);
        assert!(shots[0].vel.x > 0.0, "shot tracks the player");
        assert!(e.shoot_timer > 0.0);

        shots.clear();
        e.update(0.01, Vec2::new(600.0, 300.0), true, 1, &mut rng, &balance, &mut shots, &mut Vec::new());
        assert!(shots.is_empty(), "cooldown suppresses the next shot");
    }

    #[test]
    fn test_boss_releases_minion_ring_immediately() {
        let balance = BalanceConfig::default();
        let mut rng = rng();
        let mut e = Enemy::new(EnemyKind::Boss, 10, Vec2::new(400.0, 325.0), &balance);
        let mut minions = Vec::new();
        // The first ring comes out on the boss's first update
        e.update(0.01, Vec2::new(600.0, 300.0), true, 10, &mut rng, &balance, &mut Vec::new(), &mut minions);
        assert_eq!(minions.len(), 3);
        assert!(minions.iter().all(|m| m.kind == EnemyKind::Wave));
        assert!(e.minion_timer > 0.0);
    }

    #[test]
    fn test_boss_keeps_entry_heading() {
        let balance = BalanceConfig::default();
        let mut rng = rng();
        let mut e = Enemy::new(EnemyKind::Boss, 10, Vec2::new(400.0, 325.0), &balance);
        e.vel = Vec2::new(-e.speed, 0.0);
        // Player off to the right must not pull the boss toward it
        e.update(0.01, Vec2::new(700.0, 325.0), true, 10, &mut rng, &balance, &mut Vec::new(), &mut Vec::new());
        assert!(e.vel.x < 0.0, "boss drifts with its spawn velocity");
        assert_eq!(e.vel.y, 0.0);
    }

    #[test]
    fn test_zoomer_despawns_off_screen() {
        let balance = BalanceConfig::default();
        let mut rng = rng();
        let mut e = Enemy::new(EnemyKind::Zoomer, 1, Vec2::new(CANVAS_WIDTH + 40.0, 300.0), &balance);
        e.vel = Vec2::new(e.speed, 0.0);
        e.update(0.1, Vec2::new(400.0, 300.0), true, 1, &mut rng, &balance, &mut Vec::new(), &mut Vec::new());
        assert!(!e.alive);
    }

    #[test]
    fn test_damage_kills_at_zero() {
        let balance = BalanceConfig::default();
        let mut e = Enemy::new(EnemyKind::Basic, 1, Vec2::new(400.0, 300.0), &balance);
        e.take_damage(e.health + 0.1);
        assert!(!e.alive);
    }
}
