//! Game configuration
//!
//! Every tunable constant lives here so a front end can substitute values
//! when it builds a session. A config is fixed for the lifetime of a session.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game configuration (defaults match `crate::consts`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Board ===
    pub board_width: f32,
    pub board_height: f32,
    /// Distance from the bottom edge to the launcher center
    pub launcher_offset_y: f32,

    // === Grid ===
    pub bubble_radius: f32,
    pub rows: u32,
    pub cols: u32,
    pub grid_origin: Vec2,
    /// Row pitch as a fraction of the bubble spacing
    pub row_pitch: f32,
    /// Slot centers right of this are not playable
    pub playable_max_x: f32,
    pub initial_rows: u32,
    pub initial_max_cols: u32,

    // === Shots ===
    pub min_power: f32,
    pub power_scale: f32,
    pub max_shot_speed: f32,
    pub collision_tolerance: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub adjacency_factor: f32,

    // === Scoring ===
    pub min_cluster_size: usize,
    pub points_per_bubble: u64,
    pub bonus_per_extra_bubble: u64,

    // === Timing ===
    /// Simulation ticks per second
    pub tick_rate: f32,
    pub max_substeps: u32,
    pub pop_animation_ticks: u32,
    pub countdown_seconds: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            launcher_offset_y: LAUNCHER_OFFSET_Y,

            bubble_radius: BUBBLE_RADIUS,
            rows: GRID_ROWS,
            cols: GRID_COLS,
            grid_origin: Vec2::new(GRID_ORIGIN_X, GRID_ORIGIN_Y),
            row_pitch: ROW_PITCH,
            playable_max_x: PLAYABLE_MAX_X,
            initial_rows: INITIAL_ROWS,
            initial_max_cols: INITIAL_MAX_COLS,

            min_power: MIN_POWER,
            power_scale: POWER_SCALE,
            max_shot_speed: MAX_SHOT_SPEED,
            collision_tolerance: COLLISION_TOLERANCE,
            top_margin: TOP_MARGIN,
            bottom_margin: BOTTOM_MARGIN,
            adjacency_factor: ADJACENCY_FACTOR,

            min_cluster_size: MIN_CLUSTER_SIZE,
            points_per_bubble: POINTS_PER_BUBBLE,
            bonus_per_extra_bubble: BONUS_PER_EXTRA_BUBBLE,

            tick_rate: TICK_RATE,
            max_substeps: MAX_SUBSTEPS,
            pop_animation_ticks: POP_ANIMATION_TICKS,
            countdown_seconds: COUNTDOWN_SECONDS,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded config: {}x{} grid, {}s round",
            config.rows,
            config.cols,
            config.countdown_seconds
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Center-to-center distance between horizontal neighbors
    #[inline]
    pub fn spacing(&self) -> f32 {
        self.bubble_radius * 2.0
    }

    /// Maximum center distance for two bubbles to count as touching
    #[inline]
    pub fn adjacency_threshold(&self) -> f32 {
        self.spacing() * self.adjacency_factor
    }

    /// Where every shot starts
    pub fn launcher(&self) -> Vec2 {
        Vec2::new(
            self.board_width / 2.0,
            self.board_height - self.launcher_offset_y,
        )
    }

    /// Seconds per simulation tick
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1.0)
    }

    /// Points for popping a cluster of `count` bubbles
    pub fn points_for(&self, count: usize) -> u64 {
        let extra = count.saturating_sub(self.min_cluster_size) as u64;
        count as u64 * self.points_per_bubble + extra * self.bonus_per_extra_bubble
    }
}
