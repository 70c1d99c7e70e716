//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod projectile;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weapons;

pub use collision::{bounce_arena, bounce_canvas, circles_overlap, off_screen};
pub use enemy::{Edge, Enemy};
pub use projectile::{Owner, Projectile};
pub use spawn::SpawnDirector;
pub use state::{GameEvent, GamePhase, GameState, Pickup, PickupKind, Player};
pub use tick::{TickInput, tick};
pub use weapons::{ResolvedWeapon, WeaponState, resolve};
