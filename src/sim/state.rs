//! Game state and core simulation types
//!
//! All state that must be persisted for save/determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::projectile::Projectile;
use super::spawn::SpawnDirector;
use super::weapons::WeaponState;
use crate::balance::{BalanceConfig, Capability, EnemyKind, ItemEffect, WeaponKind};
use crate::consts::*;
use crate::progress::PlayerProgress;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// In menus, no simulation running
    Menu,
    /// Active gameplay
    Playing,
    /// Round timer expired with the player alive
    RoundComplete,
    /// Player died; the run is over
    GameOver,
}

/// One observable thing that happened during a tick. The shell drains
/// these for audio and screen feedback; the simulation never looks back
/// at them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    WeaponFired(WeaponKind),
    EnemyHit { crit: bool },
    EnemyKilled(EnemyKind),
    Explosion,
    ChainArc,
    PlayerHurt,
    PlayerHealed,
    DodgedAttack,
    BlockedAttack,
    PickupCollected(PickupKind),
    /// Once per remaining second during the final stretch of a round
    CountdownTick { seconds_left: u32, urgent: bool },
    RoundComplete,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PickupKind {
    Money { value: u32 },
    Health { amount: f32 },
}

/// Dropped loot waiting on the floor
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub pos: Vec2,
    pub kind: PickupKind,
    /// Seconds until it fades away
    pub lifetime: f32,
    pub alive: bool,
}

impl Pickup {
    pub fn new(pos: Vec2, kind: PickupKind) -> Self {
        Self { id: 0, pos, kind, lifetime: 10.0, alive: true }
    }
}

/// The player entity. Stats are resolved from the persisted baseline when
/// a level starts; items bought in the shop have already been folded into
/// that baseline, except for capabilities, which are carried as a set and
/// queried during combat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
    /// Current movement speed (adrenaline scales this)
    pub speed: f32,
    pub base_speed: f32,
    pub damage: f32,
    pub fire_rate: f32,
    /// Percent chance to ignore a hit entirely
    pub dodge: f32,
    pub luck: f32,
    pub crit_chance: f32,
    /// Percent of base damage dealt on crit (150 = 1.5x)
    pub crit_damage: f32,
    /// Health per second
    pub regeneration: f32,
    pub pickup_range: f32,
    pub aim_angle: f32,
    pub kill_count: u32,
    /// Kills accumulated toward the next vampiric heal
    pub vampiric_kills: u32,
    pub caps: Vec<Capability>,
    pub bounce_house_stacks: u32,
    pub adrenaline_active: bool,
}

impl Player {
    /// Build the combat-time player from persisted progression
    pub fn new(progress: &PlayerProgress, balance: &BalanceConfig) -> Self {
        let stats = &progress.stats;
        let mut caps = Vec::new();
        let mut bounce_house_stacks = 0;
        for (id, stacks) in &progress.items {
            if let Some(def) = balance.item(*id)
                && let ItemEffect::Grant(cap) = def.effect
            {
                if matches!(cap, Capability::BounceHouse { .. }) {
                    bounce_house_stacks = *stacks;
                }
                caps.push(cap);
            }
        }
        Self {
            pos: Vec2::new(CANVAS_WIDTH / 2.0, UI_BAR_HEIGHT + (CANVAS_HEIGHT - UI_BAR_HEIGHT) / 2.0),
            vel: Vec2::ZERO,
            size: balance.player.size,
            health: stats.max_health,
            max_health: stats.max_health,
            alive: true,
            speed: stats.speed,
            base_speed: stats.speed,
            damage: stats.damage,
            fire_rate: stats.fire_rate,
            dodge: stats.dodge,
            luck: stats.luck,
            crit_chance: stats.crit_chance,
            crit_damage: stats.crit_damage,
            regeneration: stats.regeneration,
            pickup_range: stats.pickup_range,
            aim_angle: 0.0,
            kill_count: 0,
            vampiric_kills: 0,
            caps,
            bounce_house_stacks,
            adrenaline_active: false,
        }
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn double_tap_chance(&self) -> Option<f32> {
        self.caps.iter().find_map(|c| match c {
            Capability::DoubleTap { chance } => Some(*chance),
            _ => None,
        })
    }

    pub fn shield_block_chance(&self) -> Option<f32> {
        self.caps.iter().find_map(|c| match c {
            Capability::ShieldGenerator { block_chance } => Some(*block_chance),
            _ => None,
        })
    }

    pub fn life_steal_fraction(&self) -> Option<f32> {
        self.caps.iter().find_map(|c| match c {
            Capability::LifeSteal { fraction } => Some(*fraction),
            _ => None,
        })
    }

    pub fn explosive_rounds(&self) -> Option<(f32, f32)> {
        self.caps.iter().find_map(|c| match c {
            Capability::ExplosiveRounds { radius, damage_fraction } => {
                Some((*radius, *damage_fraction))
            }
            _ => None,
        })
    }

    /// Kill threshold and heal amount for the vampiric capability
    pub fn vampiric(&self) -> Option<(u32, f32)> {
        self.caps.iter().find_map(|c| match c {
            Capability::Vampiric { heal_per_kills, heal_amount } => {
                Some((*heal_per_kills, *heal_amount))
            }
            _ => None,
        })
    }

    pub fn blood_pact(&self) -> Option<(f32, f32)> {
        self.caps.iter().find_map(|c| match c {
            Capability::BloodPact { drop_chance, heal_amount } => {
                Some((*drop_chance, *heal_amount))
            }
            _ => None,
        })
    }

    pub fn adrenaline(&self) -> Option<(f32, f32)> {
        self.caps.iter().find_map(|c| match c {
            Capability::AdrenalineRush { trigger_fraction, boost } => {
                Some((*trigger_fraction, *boost))
            }
            _ => None,
        })
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG; all combat randomness flows through here
    pub rng: Pcg32,
    /// Current level (1-based)
    pub level: u32,
    pub phase: GamePhase,
    pub paused: bool,
    /// Seconds left in the round
    pub round_timer: f32,
    /// Last whole second a countdown cue fired for
    pub countdown_cue: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Sorted by id for determinism
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub weapons: Vec<WeaponState>,
    pub spawner: SpawnDirector,
    /// Money banked this round (pickups plus completion bonus)
    pub money_earned: u32,
    pub total_kills: u32,
    /// Per-tick observable events, drained by the shell
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, progress: &PlayerProgress, balance: &BalanceConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level: 1,
            phase: GamePhase::Menu,
            paused: false,
            round_timer: ROUND_DURATION,
            countdown_cue: 0,
            time_ticks: 0,
            player: Player::new(progress, balance),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            weapons: Vec::new(),
            spawner: SpawnDirector::default(),
            money_earned: 0,
            total_kills: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reset combat state and enter the given level
    pub fn start_level(&mut self, level: u32, progress: &PlayerProgress, balance: &BalanceConfig) {
        self.level = level;
        self.phase = GamePhase::Playing;
        self.paused = false;
        self.round_timer = ROUND_DURATION;
        self.countdown_cue = 0;
        self.player = Player::new(progress, balance);
        self.enemies.clear();
        self.projectiles.clear();
        self.pickups.clear();
        self.weapons = progress
            .weapons
            .iter()
            .map(|&(kind, weapon_level)| WeaponState::new(kind, weapon_level))
            .collect();
        self.spawner = SpawnDirector::default();
        self.money_earned = 0;
        self.total_kills = 0;
        self.events.clear();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_enemy(&mut self, mut enemy: Enemy) {
        enemy.id = self.next_entity_id();
        self.enemies.push(enemy);
    }

    pub fn add_projectile(&mut self, mut projectile: Projectile) {
        projectile.id = self.next_entity_id();
        self.projectiles.push(projectile);
    }

    pub fn add_pickup(&mut self, mut pickup: Pickup) {
        pickup.id = self.next_entity_id();
        self.pickups.push(pickup);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.pickups.sort_by_key(|p| p.id);
    }
}
