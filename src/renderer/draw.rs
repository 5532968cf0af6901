//! Draw list handed to the GPU pipeline
//!
//! One triangle-list draw per non-empty slice, covering only its live vertices.

use std::ops::Range;

use crate::sim::{GameState, Slice, SliceId};

/// A single draw over a contiguous vertex range
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub slice: SliceId,
    pub vertices: Range<u32>,
    pub colour: [f32; 4],
}

fn draw_for<A>(id: SliceId, slice: &Slice<A>) -> Option<DrawCall> {
    if slice.count() == 0 {
        return None;
    }
    let start = slice.start() as u32;
    let len = (slice.item_vertices() * slice.count()) as u32;
    Some(DrawCall {
        slice: id,
        vertices: start..start + len,
        colour: slice.colour(),
    })
}

/// Draws for the current frame, in buffer order
pub fn draw_list(state: &GameState) -> Vec<DrawCall> {
    [
        draw_for(SliceId::Turret, &state.turret),
        draw_for(SliceId::Bullets, &state.bullets),
        draw_for(SliceId::Birds, &state.birds),
        draw_for(SliceId::Scorecard, &state.scorecard),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;
    use crate::sim::Side;
    use crate::tuning::Tuning;

    #[test]
    fn test_empty_slices_are_skipped() {
        let state = GameState::new(Tuning::default(), 1);
        let draws = draw_list(&state);
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].slice, SliceId::Turret);
        assert_eq!(draws[0].vertices, 0..3);
        assert_eq!(draws[0].colour, colors::TURRET);
    }

    #[test]
    fn test_draw_covers_live_region_only() {
        let mut state = GameState::new(Tuning::default(), 1);
        state.spawn_bird_at(Side::Left, 0.0, 1.0).unwrap();
        state.spawn_bird_at(Side::Right, 0.0, 1.0).unwrap();

        let birds = draw_list(&state)
            .into_iter()
            .find(|d| d.slice == SliceId::Birds)
            .unwrap();
        let start = state.birds.start() as u32;
        assert_eq!(birds.vertices, start..start + 12);
        assert_eq!(birds.colour, colors::BIRD);
    }
}
