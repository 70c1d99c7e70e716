//! Circle collision and wall-bounce helpers
//!
//! Everything in the arena is a circle for collision purposes; entity `size`
//! is a diameter. Walls are the axis-aligned arena rectangle.

use glam::Vec2;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, OFFSCREEN_MARGIN, UI_BAR_HEIGHT};

/// Circle overlap test between two entities given positions and diameters
#[inline]
pub fn circles_overlap(pos_a: Vec2, size_a: f32, pos_b: Vec2, size_b: f32) -> bool {
    pos_a.distance(pos_b) < (size_a + size_b) / 2.0
}

/// Which walls an entity touched during a bounce pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub x: bool,
    pub y: bool,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Reflect and clamp against the arena walls (top bound is the UI bar edge).
/// Only acts while the entity is inside the extended arena bounds, so an
/// entity that spawned off-screen can still fly in. Returns which axes hit.
pub fn bounce_arena(pos: &mut Vec2, vel: &mut Vec2, size: f32) -> WallContact {
    let half = size / 2.0;
    let mut contact = WallContact::default();

    let in_bounds = pos.x > -half
        && pos.x < CANVAS_WIDTH + half
        && pos.y > UI_BAR_HEIGHT - half
        && pos.y < CANVAS_HEIGHT + half;
    if !in_bounds {
        return contact;
    }

    if pos.x - half <= 0.0 || pos.x + half >= CANVAS_WIDTH {
        vel.x = -vel.x;
        pos.x = pos.x.clamp(half, CANVAS_WIDTH - half);
        contact.x = true;
    }
    if pos.y - half <= UI_BAR_HEIGHT || pos.y + half >= CANVAS_HEIGHT {
        vel.y = -vel.y;
        pos.y = pos.y.clamp(UI_BAR_HEIGHT + half, CANVAS_HEIGHT - half);
        contact.y = true;
    }
    contact
}

/// Reflect and clamp against the full canvas (projectiles bounce across the
/// UI bar line, unlike enemies). Returns how many wall contacts occurred.
pub fn bounce_canvas(pos: &mut Vec2, vel: &mut Vec2, size: f32) -> u32 {
    let half = size / 2.0;
    let mut bounces = 0;

    if pos.x - half <= 0.0 || pos.x + half >= CANVAS_WIDTH {
        vel.x = -vel.x;
        pos.x = pos.x.clamp(half, CANVAS_WIDTH - half);
        bounces += 1;
    }
    if pos.y - half <= 0.0 || pos.y + half >= CANVAS_HEIGHT {
        vel.y = -vel.y;
        pos.y = pos.y.clamp(half, CANVAS_HEIGHT - half);
        bounces += 1;
    }
    bounces
}

/// True once an entity has drifted past the off-screen kill margin
#[inline]
pub fn off_screen(pos: Vec2) -> bool {
    pos.x < -OFFSCREEN_MARGIN
        || pos.x > CANVAS_WIDTH + OFFSCREEN_MARGIN
        || pos.y < -OFFSCREEN_MARGIN
        || pos.y > CANVAS_HEIGHT + OFFSCREEN_MARGIN
}
