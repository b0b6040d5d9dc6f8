//! Bubble Pop - A timed bubble shooter arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, projectile, clusters, board state)
//! - `session`: Game lifecycle, countdown and fixed-timestep driver
//! - `input`: Pointer drag to aim conversion
//! - `config`: Game constants, substitutable at construction time

pub mod config;
pub mod input;
pub mod session;
pub mod sim;

pub use config::GameConfig;
pub use session::{GameOverCause, GameSession, SessionPhase, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (velocities are expressed in pixels per tick)
    pub const TICK_RATE: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta the driver accepts (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Board dimensions
    pub const BOARD_WIDTH: f32 = 480.0;
    pub const BOARD_HEIGHT: f32 = 640.0;
    /// Launcher sits this far above the bottom edge, horizontally centered
    pub const LAUNCHER_OFFSET_Y: f32 = 80.0;

    /// Bubble defaults
    pub const BUBBLE_RADIUS: f32 = 18.0;
    pub const GRID_ROWS: u32 = 12;
    pub const GRID_COLS: u32 = 12;
    /// Center of slot (0, 0)
    pub const GRID_ORIGIN_X: f32 = 40.0;
    pub const GRID_ORIGIN_Y: f32 = 60.0;
    /// Vertical row pitch as a fraction of the bubble spacing
    pub const ROW_PITCH: f32 = 0.87;
    /// Rightmost slot center that counts as playable
    pub const PLAYABLE_MAX_X: f32 = 440.0;

    /// Initial layout
    pub const INITIAL_ROWS: u32 = 6;
    pub const INITIAL_MAX_COLS: u32 = 10;

    /// Shot tuning
    pub const MIN_POWER: f32 = 0.1;
    pub const POWER_SCALE: f32 = 15.0;
    pub const MAX_SHOT_SPEED: f32 = 12.0;

    /// Contact tuning
    pub const COLLISION_TOLERANCE: f32 = 3.0;
    pub const TOP_MARGIN: f32 = 20.0;
    pub const BOTTOM_MARGIN: f32 = 20.0;
    /// Adjacency threshold as a multiple of the bubble spacing
    pub const ADJACENCY_FACTOR: f32 = 1.1;

    /// Scoring
    pub const MIN_CLUSTER_SIZE: usize = 3;
    pub const POINTS_PER_BUBBLE: u64 = 10;
    pub const BONUS_PER_EXTRA_BUBBLE: u64 = 5;

    /// Pop animation lifetime in ticks
    pub const POP_ANIMATION_TICKS: u32 = 20;
    /// Round length in seconds (3 minutes)
    pub const COUNTDOWN_SECONDS: u32 = 180;
}

/// Format whole seconds as `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
