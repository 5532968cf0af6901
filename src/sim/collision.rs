//! Bullet/bird collision detection
//!
//! A bullet hits a bird when its tip lies strictly inside the bird's AABB.
//! Boundary contact does not count.

use glam::Vec2;

use super::pool::Slice;
use super::state::GameState;

/// One scoring contact found during the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub bullet: usize,
    pub bird: usize,
}

/// Strict point-in-AABB test
#[inline]
pub fn point_in_aabb(point: Vec2, min: Vec2, max: Vec2) -> bool {
    point.x > min.x && point.x < max.x && point.y > min.y && point.y < max.y
}

/// Scan live bullets against live birds without mutating either slice.
///
/// Each bullet reports at most one hit, against the lowest-indexed bird its
/// tip is inside.
pub fn find_hits<A, B>(bullets: &Slice<A>, birds: &Slice<B>) -> Vec<Hit> {
    let mut hits = Vec::new();
    for bullet in 0..bullets.count() {
        let tip = bullets.world_tip(bullet);
        let target = (0..birds.count()).find(|&bird| {
            let (min, max) = birds.world_bounds(bird);
            point_in_aabb(tip, min, max)
        });
        if let Some(bird) = target {
            hits.push(Hit { bullet, bird });
        }
    }
    hits
}

/// Swap-remove every index in `indices` from `slice`.
///
/// Indices are applied highest first so that relocating the last live slot
/// never lands on an index still waiting to be removed. Duplicates are
/// removed once.
pub fn remove_descending<A: Copy + Default>(slice: &mut Slice<A>, mut indices: Vec<usize>) {
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices.dedup();
    for index in indices {
        slice.remove(index);
    }
}

/// Detect hits, score them and remove the hit bullets and birds
pub fn resolve_collisions(state: &mut GameState) -> Vec<Hit> {
    let hits = find_hits(&state.bullets, &state.birds);
    if hits.is_empty() {
        return hits;
    }

    for _ in &hits {
        state.record_hit();
    }

    remove_descending(&mut state.birds, hits.iter().map(|h| h.bird).collect());
    remove_descending(&mut state.bullets, hits.iter().map(|h| h.bullet).collect());

    hits
}
