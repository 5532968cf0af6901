//! Per-frame simulation tick
//!
//! Runs bird spawning, movement, firing, collisions and scoring in a fixed
//! order. Buffer sync is left to the caller.

use glam::Vec2;

use super::collision::{Hit, resolve_collisions};
use super::pool::Slice;
use super::state::GameState;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Fire key was pressed since the last tick
    pub fire: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub bird_spawned: bool,
    pub birds_escaped: usize,
    pub bullets_expired: usize,
    pub fired: bool,
    pub hits: Vec<Hit>,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> TickReport {
    let mut report = TickReport::default();

    report.bird_spawned = maybe_spawn_bird(state);

    let step = state.bird_step;
    let (near, far) = state.bird_offset_span();
    report.birds_escaped = advance(&mut state.birds, |offset, direction| {
        let moved = offset + step * direction;
        (moved, moved.x < near || moved.x > far)
    });

    let climb = Vec2::new(0.0, state.tuning.bullet_step);
    report.bullets_expired = advance(&mut state.bullets, |offset, _| {
        let moved = offset + climb;
        (moved, moved.y > TOP_EDGE + BULLET_HEIGHT)
    });

    if input.fire {
        report.fired = state.fire();
    }

    report.hits = resolve_collisions(state);
    report
}

/// Spawn at most one bird: always below the on-screen minimum, otherwise by chance
fn maybe_spawn_bird(state: &mut GameState) -> bool {
    let count = state.birds.count();
    let wanted = count < state.tuning.min_birds_on_screen
        || (count < state.birds.capacity() && state.roll() < state.tuning.spawn_probability);
    wanted && state.spawn_random_bird().is_some()
}

/// Move every live instance and drop the ones `step` flags as gone.
///
/// Walks slots in ascending order. After a removal the same index is examined
/// again, since it now holds the instance relocated from the end, which has
/// not moved yet this tick. Returns the number removed.
fn advance<A, F>(slice: &mut Slice<A>, mut step: F) -> usize
where
    A: Copy + Default,
    F: FnMut(Vec2, A) -> (Vec2, bool),
{
    let mut removed = 0;
    let mut i = 0;
    while i < slice.count() {
        let (moved, gone) = step(slice.offset(i), *slice.aux(i));
        if gone {
            slice.remove(i);
            removed += 1;
        } else {
            slice.set_offset(i, moved);
            i += 1;
        }
    }
    removed
}
