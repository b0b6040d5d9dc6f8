//! Aim input
//!
//! Turns a pointer dragged away from the launcher into a shot direction and
//! power. Only upward shots are allowed: the angle is clamped to an arc that
//! stays clear of the side walls.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default drag distance (pixels) that maps to full power
pub const FULL_POWER_DRAG: f32 = 100.0;
/// Leftmost allowed aim (screen space, y down)
pub const MIN_AIM_ANGLE: f32 = -PI * 0.9;
/// Rightmost allowed aim
pub const MAX_AIM_ANGLE: f32 = -PI * 0.1;

/// A shot direction plus normalized power
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    /// Radians, screen space (negative is up)
    pub angle: f32,
    /// Unit vector along `angle`
    pub direction: Vec2,
    /// 0-1
    pub power: f32,
}

impl Aim {
    /// Aim at an angle, clamped to the upward arc
    pub fn from_angle(angle: f32, power: f32) -> Self {
        let angle = angle.clamp(MIN_AIM_ANGLE, MAX_AIM_ANGLE);
        Self {
            angle,
            direction: Vec2::from_angle(angle),
            power: power.clamp(0.0, 1.0),
        }
    }

    /// Aim from a pointer position relative to the launcher.
    ///
    /// A drag of `max_drag` pixels or more is full power; a non-positive
    /// `max_drag` falls back to `FULL_POWER_DRAG`. Returns `None` unless the
    /// pointer is above the launcher.
    pub fn from_drag(launcher: Vec2, pointer: Vec2, max_drag: f32) -> Option<Self> {
        let delta = pointer - launcher;
        if delta.y >= 0.0 {
            return None;
        }
        let max_drag = if max_drag > 0.0 { max_drag } else { FULL_POWER_DRAG };
        let angle = delta.y.atan2(delta.x);
        let power = (delta.length() / max_drag).min(1.0);
        Some(Self::from_angle(angle, power))
    }
}
