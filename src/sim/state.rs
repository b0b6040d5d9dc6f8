//! Board state and core simulation types
//!
//! The board owns every bubble, the single in-flight projectile, pop
//! animations and the score. Operations that advance it live in `tick`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{GridGeometry, Slot};
use crate::config::GameConfig;

/// Bubble palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BubbleColor {
    Purple,
    Cyan,
    Magenta,
    Lime,
    Orange,
}

impl BubbleColor {
    pub const ALL: [BubbleColor; 5] = [
        BubbleColor::Purple,
        BubbleColor::Cyan,
        BubbleColor::Magenta,
        BubbleColor::Lime,
        BubbleColor::Orange,
    ];

    /// Uniform pick from the palette
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BubbleColor::Purple => "purple",
            BubbleColor::Cyan => "cyan",
            BubbleColor::Magenta => "magenta",
            BubbleColor::Lime => "lime",
            BubbleColor::Orange => "orange",
        }
    }
}

/// A bubble resting in a grid slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    pub row: u32,
    pub col: u32,
    /// Always the grid position of (row, col)
    pub pos: Vec2,
    pub color: BubbleColor,
    pub radius: f32,
}

impl Bubble {
    pub fn new(id: u32, slot: Slot, color: BubbleColor, radius: f32) -> Self {
        Self {
            id,
            row: slot.row,
            col: slot.col,
            pos: slot.pos,
            color,
            radius,
        }
    }
}

/// The shot currently in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub color: BubbleColor,
    pub radius: f32,
}

impl Projectile {
    /// Launch from `origin` along `direction` (normalized here)
    pub fn launch(origin: Vec2, direction: Vec2, speed: f32, color: BubbleColor, radius: f32) -> Self {
        Self {
            pos: origin,
            vel: direction.normalize_or_zero() * speed,
            color,
            radius,
        }
    }
}

/// Expanding ring left behind by a popped bubble (cosmetic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopAnimation {
    pub pos: Vec2,
    pub color: BubbleColor,
    pub frame: u32,
}

impl PopAnimation {
    /// Progress through the animation, 0-1
    pub fn progress(&self, lifetime: u32) -> f32 {
        (self.frame as f32 / lifetime.max(1) as f32).min(1.0)
    }
}

/// A cluster removal, reported in the same tick it happens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopEvent {
    pub color: BubbleColor,
    pub count: usize,
    pub points: u64,
    pub positions: Vec<Vec2>,
}

/// How a shot resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// Attached to the grid without popping anything
    Placed { id: u32, row: u32, col: u32 },
    /// Attached and completed a cluster
    Popped(PopEvent),
    /// Target slot was already taken; the shot vanished
    Discarded { row: u32, col: u32 },
    /// Fell to the bottom boundary
    ReachedBottom,
}

/// Things that happened on the board since the last drain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoardEvent {
    Fired { color: BubbleColor, vel: Vec2 },
    Resolved(Resolution),
    Cleared,
}

/// Terminal board condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardOutcome {
    /// No bubbles left
    Cleared,
    /// A shot reached the bottom boundary
    ReachedBottom,
}

/// Undrained events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 64;

/// Complete board state (deterministic for a given seed and command stream)
#[derive(Debug, Clone)]
pub struct BoardState {
    pub config: GameConfig,
    pub geometry: GridGeometry,
    /// Seed the board was generated from
    pub seed: u64,
    rng: Pcg32,
    /// Placed bubbles (sorted by id)
    pub bubbles: Vec<Bubble>,
    /// At most one shot in flight
    pub projectile: Option<Projectile>,
    /// Color of the next shot
    pub next_color: BubbleColor,
    pub animations: Vec<PopAnimation>,
    pub score: u64,
    pub outcome: Option<BoardOutcome>,
    events: Vec<BoardEvent>,
    next_id: u32,
}

impl BoardState {
    /// Board with the starting rows filled with random colors
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut board = Self::empty(config, seed);
        board.fill_initial_rows();
        log::debug!(
            "Board generated from seed {}: {} bubbles",
            seed,
            board.bubbles.len()
        );
        board
    }

    /// Board with no bubbles (next color is still drawn from the seed)
    pub fn empty(config: GameConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let next_color = BubbleColor::random(&mut rng);
        Self {
            geometry: GridGeometry::new(&config),
            config,
            seed,
            rng,
            bubbles: Vec::new(),
            projectile: None,
            next_color,
            animations: Vec::new(),
            score: 0,
            outcome: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    fn fill_initial_rows(&mut self) {
        let rows = self.config.initial_rows.min(self.geometry.rows());
        for row in 0..rows {
            let cols = self
                .geometry
                .columns_in_row(row)
                .min(self.config.initial_max_cols);
            for col in 0..cols {
                let slot = self.geometry.slot(row, col);
                if slot.pos.x < self.config.playable_max_x {
                    let color = BubbleColor::random(&mut self.rng);
                    self.push_bubble(slot, color);
                }
            }
        }
    }

    /// Allocate a new bubble ID
    pub fn next_bubble_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push_bubble(&mut self, slot: Slot, color: BubbleColor) -> u32 {
        let id = self.next_bubble_id();
        let radius = self.config.bubble_radius;
        self.bubbles.push(Bubble::new(id, slot, color, radius));
        id
    }

    /// Put a bubble in an empty slot. Returns `None` for occupied or
    /// nonexistent cells.
    pub fn insert_bubble(&mut self, row: u32, col: u32, color: BubbleColor) -> Option<u32> {
        if !self.geometry.contains(row, col) || self.is_occupied(row, col) {
            return None;
        }
        let slot = self.geometry.slot(row, col);
        Some(self.push_bubble(slot, color))
    }

    pub fn is_occupied(&self, row: u32, col: u32) -> bool {
        self.bubbles.iter().any(|b| b.row == row && b.col == col)
    }

    pub fn in_flight(&self) -> bool {
        self.projectile.is_some()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Draw the color after the current one
    pub fn roll_next_color(&mut self) -> BubbleColor {
        let upcoming = BubbleColor::random(&mut self.rng);
        std::mem::replace(&mut self.next_color, upcoming)
    }

    /// Seed for the board that replaces this one
    pub fn successor_seed(&mut self) -> u64 {
        self.rng.random()
    }

    /// Drop the shot in flight without resolving it
    pub fn discard_projectile(&mut self) -> Option<Projectile> {
        self.projectile.take()
    }

    /// Record an event, dropping the oldest once `MAX_PENDING_EVENTS` are queued
    pub(crate) fn push_event(&mut self, event: BoardEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Take all events recorded since the last call.
    ///
    /// Front ends that only poll snapshots never need to call this; the queue
    /// is capped.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure bubbles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.bubbles.sort_by_key(|b| b.id);
    }
}
