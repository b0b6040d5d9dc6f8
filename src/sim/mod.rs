//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (velocities are per tick)
//! - Seeded RNG only
//! - Stable iteration order (by bubble ID)
//! - No rendering or platform dependencies

pub mod cluster;
pub mod grid;
pub mod projectile;
pub mod state;
pub mod tick;

pub use cluster::connected_same_color;
pub use grid::{GridGeometry, Slot};
pub use projectile::{Arena, Outcome, advance, bounce_off_walls, circles_touch};
pub use state::{
    BoardEvent, BoardOutcome, BoardState, Bubble, BubbleColor, PopAnimation, PopEvent, Projectile,
    Resolution,
};
pub use tick::{fire, tick, tick_animations};
