//! Projectile motion and contact detection
//!
//! A shot travels in a straight line at constant speed, bouncing off the side
//! walls. It stops when it nears the ceiling or touches a resting bubble, at
//! which point it snaps to the nearest grid slot.

use glam::Vec2;

use super::grid::{GridGeometry, Slot};
use super::state::{Bubble, BubbleColor, Projectile};
use crate::config::GameConfig;

/// Result of advancing a projectile one tick
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Still flying
    Continue(Projectile),
    /// Came to rest; the caller attaches it at `slot` unless that slot is taken
    Place { slot: Slot, color: BubbleColor },
    /// Reached the bottom boundary without touching anything
    MissBottom,
}

/// Play-field edges a projectile interacts with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    /// Overlap allowed before two bubbles count as touching
    pub collision_tolerance: f32,
    /// Ceiling hits snap against this row height
    pub ceiling_y: f32,
}

impl Arena {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            width: config.board_width,
            height: config.board_height,
            top_margin: config.top_margin,
            bottom_margin: config.bottom_margin,
            collision_tolerance: config.collision_tolerance,
            ceiling_y: config.grid_origin.y,
        }
    }
}

/// Check if two circles touch, allowing a small overlap tolerance
#[inline]
pub fn circles_touch(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32, tolerance: f32) -> bool {
    a.distance(b) <= a_radius + b_radius - tolerance
}

/// Reflect off the side walls.
///
/// Flips the x velocity and clamps x into `[radius, width - radius]` when the
/// projectile touches or crosses a wall. Speed is preserved exactly.
pub fn bounce_off_walls(projectile: &mut Projectile, width: f32) {
    let min_x = projectile.radius;
    let max_x = width - projectile.radius;
    if projectile.pos.x <= min_x || projectile.pos.x >= max_x {
        projectile.vel.x = -projectile.vel.x;
        projectile.pos.x = projectile.pos.x.clamp(min_x, max_x);
    }
}

/// Advance a projectile by one tick.
///
/// Checks run in order: wall bounce, ceiling, bubble contact (first bubble in
/// board order), bottom boundary.
pub fn advance(
    projectile: &Projectile,
    bubbles: &[Bubble],
    geometry: &GridGeometry,
    arena: &Arena,
) -> Outcome {
    let mut next = projectile.clone();
    next.pos += next.vel;

    bounce_off_walls(&mut next, arena.width);

    if next.pos.y <= next.radius + arena.top_margin {
        let slot = geometry.nearest_slot(Vec2::new(next.pos.x, arena.ceiling_y));
        return Outcome::Place {
            slot,
            color: next.color,
        };
    }

    let hit = bubbles.iter().any(|bubble| {
        circles_touch(
            next.pos,
            next.radius,
            bubble.pos,
            bubble.radius,
            arena.collision_tolerance,
        )
    });
    if hit {
        let slot = geometry.nearest_slot(next.pos);
        return Outcome::Place {
            slot,
            color: next.color,
        };
    }

    if next.pos.y >= arena.height - next.radius - arena.bottom_margin {
        return Outcome::MissBottom;
    }

    Outcome::Continue(next)
}
