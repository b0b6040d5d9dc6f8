//! Cluster detection
//!
//! Two bubbles are neighbors when their centers are within the adjacency
//! threshold, which tolerates the staggered row offset. A flood fill over
//! same-colored neighbors finds the cluster a bubble belongs to.

use std::collections::HashSet;

use super::state::Bubble;

/// IDs of the maximal same-color group reachable from `origin`.
///
/// `origin` is always the first entry, even when it has no neighbors. It does
/// not have to be a member of `bubbles`. Iterative depth-first search, O(n²).
pub fn connected_same_color(origin: &Bubble, bubbles: &[Bubble], threshold: f32) -> Vec<u32> {
    let mut cluster = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![origin];
    visited.insert(origin.id);

    while let Some(current) = stack.pop() {
        cluster.push(current.id);

        for other in bubbles {
            if other.color != origin.color || visited.contains(&other.id) {
                continue;
            }
            if other.pos.distance(current.pos) <= threshold {
                visited.insert(other.id);
                stack.push(other);
            }
        }
    }

    cluster
}
