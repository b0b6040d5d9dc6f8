//! Fixed timestep board operations
//!
//! Firing, advancing the shot in flight and aging pop animations.

use glam::Vec2;

use super::cluster::connected_same_color;
use super::grid::Slot;
use super::projectile::{Arena, Outcome, advance};
use super::state::{
    Bubble, BoardEvent, BoardOutcome, BoardState, BubbleColor, PopAnimation, PopEvent, Projectile,
    Resolution,
};

/// Fire the next bubble from the launcher.
///
/// Silently ignored (returns `false`) while a shot is in flight, once the
/// board is over, for power below the activation threshold, or for a zero
/// direction.
pub fn fire(board: &mut BoardState, direction: Vec2, power: f32) -> bool {
    // Written so a NaN power is rejected too
    if board.in_flight() || board.is_over() || !(power >= board.config.min_power) {
        return false;
    }
    let direction = direction.normalize_or_zero();
    if direction == Vec2::ZERO {
        return false;
    }

    let speed = (power * board.config.power_scale).min(board.config.max_shot_speed);
    let color = board.roll_next_color();
    let projectile = Projectile::launch(
        board.config.launcher(),
        direction,
        speed,
        color,
        board.config.bubble_radius,
    );
    let vel = projectile.vel;
    board.projectile = Some(projectile);
    board.push_event(BoardEvent::Fired { color, vel });
    true
}

/// Advance the shot in flight by one tick.
///
/// Returns how the shot resolved, or `None` if nothing is in flight or it is
/// still moving. At most one resolution happens per tick.
pub fn tick(board: &mut BoardState) -> Option<Resolution> {
    let projectile = board.projectile.as_ref()?;
    let arena = Arena::new(&board.config);

    let resolution = match advance(projectile, &board.bubbles, &board.geometry, &arena) {
        Outcome::Continue(next) => {
            board.projectile = Some(next);
            return None;
        }
        Outcome::Place { slot, color } => place(board, slot, color),
        Outcome::MissBottom => {
            log::info!("Shot reached the bottom");
            board.outcome = Some(BoardOutcome::ReachedBottom);
            Resolution::ReachedBottom
        }
    };

    board.projectile = None;
    board.push_event(BoardEvent::Resolved(resolution.clone()));
    if board.outcome == Some(BoardOutcome::Cleared) {
        board.push_event(BoardEvent::Cleared);
    }
    Some(resolution)
}

/// Attach a bubble at `slot` and pop its cluster if it is big enough
fn place(board: &mut BoardState, slot: Slot, color: BubbleColor) -> Resolution {
    if board.is_occupied(slot.row, slot.col) {
        log::debug!("Slot ({}, {}) already taken, shot discarded", slot.row, slot.col);
        return Resolution::Discarded {
            row: slot.row,
            col: slot.col,
        };
    }

    let id = board.next_bubble_id();
    let placed = Bubble::new(id, slot, color, board.config.bubble_radius);
    board.bubbles.push(placed.clone());
    board.normalize_order();

    let threshold = board.config.adjacency_threshold();
    let cluster = connected_same_color(&placed, &board.bubbles, threshold);

    if cluster.len() < board.config.min_cluster_size {
        log::debug!(
            "Placed {} at ({}, {}), cluster of {}",
            color.as_str(),
            slot.row,
            slot.col,
            cluster.len()
        );
        return Resolution::Placed {
            id,
            row: slot.row,
            col: slot.col,
        };
    }

    let (popped, kept): (Vec<Bubble>, Vec<Bubble>) = std::mem::take(&mut board.bubbles)
        .into_iter()
        .partition(|b| cluster.contains(&b.id));
    board.bubbles = kept;

    board
        .animations
        .extend(popped.iter().map(|b| PopAnimation {
            pos: b.pos,
            color: b.color,
            frame: 0,
        }));

    let count = popped.len();
    let points = board.config.points_for(count);
    board.score += points;
    log::debug!(
        "Popped {} {} bubbles for {} points (score {})",
        count,
        color.as_str(),
        points,
        board.score
    );

    if board.bubbles.is_empty() {
        log::info!("Board cleared with score {}", board.score);
        board.outcome = Some(BoardOutcome::Cleared);
    }

    Resolution::Popped(PopEvent {
        color,
        count,
        points,
        positions: popped.iter().map(|b| b.pos).collect(),
    })
}

/// Age pop animations by one tick and drop the finished ones
pub fn tick_animations(board: &mut BoardState) {
    let lifetime = board.config.pop_animation_ticks;
    for anim in &mut board.animations {
        anim.frame += 1;
    }
    board.animations.retain(|a| a.frame < lifetime);
}
