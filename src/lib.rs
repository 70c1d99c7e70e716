//! Holdout - a top-down arena survival shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, AI, weapons, combat)
//! - `balance`: Immutable tuning tables injected into the simulation
//! - `progress`: Persistent meta-progression (money, stats, loadout)
//! - `shop`: Between-round purchase/upgrade operations
//! - `settings`: User preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod balance;
pub mod progress;
pub mod settings;
pub mod shop;
pub mod sim;

pub use balance::BalanceConfig;
pub use progress::PlayerProgress;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 550.0;
    /// HUD bar across the top of the canvas; the arena starts below it
    pub const UI_BAR_HEIGHT: f32 = 100.0;

    /// One timed combat round, in seconds
    pub const ROUND_DURATION: f32 = 50.0;
    /// Levels per run
    pub const TOTAL_LEVELS: u32 = 30;

    /// How far past the canvas a non-bouncing entity may drift before dying
    pub const OFFSCREEN_MARGIN: f32 = 50.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for an angle in radians
#[inline]
pub fn angle_to_dir(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
