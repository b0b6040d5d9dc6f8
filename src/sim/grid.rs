//! Staggered grid geometry
//!
//! Slots are addressed by (row, col). Odd rows are shifted right by half the
//! bubble spacing and hold one fewer column, which packs the bubbles like
//! bricks. Everything here is pure coordinate math.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// A grid address together with its pixel center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub row: u32,
    pub col: u32,
    pub pos: Vec2,
}

impl Slot {
    /// Same grid cell (ignores position)
    #[inline]
    pub fn same_cell(&self, row: u32, col: u32) -> bool {
        self.row == row && self.col == col
    }
}

/// Maps slots to pixels and back
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    origin: Vec2,
    spacing: f32,
    row_pitch: f32,
    rows: u32,
    cols: u32,
    min_x: f32,
    max_x: f32,
    launcher_x: f32,
}

impl GridGeometry {
    pub fn new(config: &GameConfig) -> Self {
        let spacing = config.spacing();
        Self {
            origin: config.grid_origin,
            spacing,
            row_pitch: spacing * config.row_pitch,
            rows: config.rows,
            cols: config.cols,
            min_x: config.grid_origin.x,
            max_x: config.playable_max_x,
            launcher_x: config.launcher().x,
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Column count for a row (odd rows lose one to the offset)
    #[inline]
    pub fn columns_in_row(&self, row: u32) -> u32 {
        if row % 2 == 1 {
            self.cols.saturating_sub(1)
        } else {
            self.cols
        }
    }

    /// Check if a (row, col) address exists in the grid
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row < self.rows && col < self.columns_in_row(row)
    }

    /// Pixel center of a slot
    pub fn position(&self, row: u32, col: u32) -> Vec2 {
        let offset_x = if row % 2 == 1 { self.spacing / 2.0 } else { 0.0 };
        Vec2::new(
            self.origin.x + offset_x + col as f32 * self.spacing,
            self.origin.y + row as f32 * self.row_pitch,
        )
    }

    pub fn slot(&self, row: u32, col: u32) -> Slot {
        Slot {
            row,
            col,
            pos: self.position(row, col),
        }
    }

    /// Whether a slot center lies inside the playable width
    #[inline]
    pub fn is_playable(&self, pos: Vec2) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x
    }

    /// All playable slots in scan order (row-major)
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns_in_row(row))
                .map(move |col| self.slot(row, col))
                .filter(|slot| self.is_playable(slot.pos))
        })
    }

    /// The playable slot whose center is closest to `point`.
    ///
    /// Exhaustive scan; on ties the first slot in scan order wins.
    pub fn nearest_slot(&self, point: Vec2) -> Slot {
        let mut best: Option<(Slot, f32)> = None;
        for slot in self.slots() {
            let distance = slot.pos.distance(point);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((slot, distance)),
            }
        }

        match best {
            Some((slot, _)) => slot,
            None => {
                log::warn!("No playable slot near {:?}, using launcher slot", point);
                self.fallback_slot()
            }
        }
    }

    /// Bottom-row slot closest to the launcher column
    pub fn fallback_slot(&self) -> Slot {
        let row = self.rows.saturating_sub(1);
        let offset_x = if row % 2 == 1 { self.spacing / 2.0 } else { 0.0 };
        let last_col = self.columns_in_row(row).saturating_sub(1);
        let col = ((self.launcher_x - self.origin.x - offset_x) / self.spacing)
            .round()
            .clamp(0.0, last_col as f32) as u32;
        self.slot(row, col)
    }
}
